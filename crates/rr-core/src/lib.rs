//! `rr-core` — foundational types for the `rust_route` routing engine.
//!
//! Every other `rr-*` crate depends on this one.  It has no `rr-*`
//! dependencies and a single required external one (`thiserror`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module       | Contents                                                  |
//! |--------------|-----------------------------------------------------------|
//! | [`ids`]      | `NodeId`                                                  |
//! | [`geo`]      | `GeoPoint`, flat-earth distances                          |
//! | [`config`]   | `SearchBudget`, `SearchConfig`, `BidirectionalStop`, `CacheConfig`, `ClusterConfig`, `EngineConfig` |
//! | [`error`]    | `CoreError`, `CoreResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod error;
pub mod geo;
pub mod ids;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{
    BidirectionalStop, CacheConfig, ClusterConfig, EngineConfig, SearchBudget, SearchConfig,
};
pub use error::{CoreError, CoreResult};
pub use geo::{GeoPoint, KM_PER_DEGREE, METRES_PER_DEGREE};
pub use ids::NodeId;
