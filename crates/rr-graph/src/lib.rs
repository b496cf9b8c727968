//! `rr-graph` — road-network storage for the routing engine.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                  |
//! |----------------|-----------------------------------------------------------|
//! | [`model`]      | `Node`, `Edge`, `NodeSummary`                             |
//! | [`snapshot`]   | `GraphSnapshot` (adjacency + R-tree), `GraphSnapshotBuilder`, `GraphStats` |
//! | [`store`]      | `GraphStore`: atomic snapshot publication                 |
//! | [`loader`]     | `load_graph_csv`, `load_graph_reader`                     |
//! | [`synthetic`]  | `grid_city`: seeded synthetic networks                    |
//! | [`error`]      | `GraphError`, `GraphResult<T>`                            |
//!
//! # Snapshot model
//!
//! A [`GraphSnapshot`] is immutable once built.  [`GraphStore::rebuild`]
//! builds a complete new snapshot off to the side and then publishes it by
//! swapping a single `Arc`, so readers only ever hold a whole pre-rebuild or
//! a whole post-rebuild graph.

pub mod error;
pub mod loader;
pub mod model;
pub mod snapshot;
pub mod store;
pub mod synthetic;

#[cfg(test)]
mod tests;

pub use error::{GraphError, GraphResult};
pub use loader::{load_graph_csv, load_graph_reader};
pub use model::{AVAILABILITY_CONGESTION_LIMIT, Edge, Node, NodeSummary};
pub use snapshot::{GraphSnapshot, GraphSnapshotBuilder, GraphStats};
pub use store::GraphStore;
pub use synthetic::{GridCitySpec, grid_city};
