//! `rr-spatial` — point queries over geographic records.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                   |
//! |-------------|------------------------------------------------------------|
//! | [`tree`]    | `SpatialTree` k-d tree, `SpatialPoint`, `Neighbor`         |
//! | [`index`]   | `SpatialIndex` — shared tree handle with atomic replace    |
//! | [`cluster`] | `detect_clusters` grid hashing, `Cluster`, `RiskTier`      |
//! | [`error`]   | `SpatialError`, `SpatialResult<T>`                         |
//!
//! The tree answers "what is nearest" and "what is within r"; the cluster
//! detector answers "where is activity dense".  Neither depends on the road
//! graph.
//!
//! Distances use the flat-earth approximation (`KM_PER_DEGREE` km per
//! degree on both axes), which is adequate at city scale.
//!
//! # Feature flags
//!
//! | Flag       | Effect                                               |
//! |------------|------------------------------------------------------|
//! | `parallel` | cluster cells are aggregated with rayon              |

pub mod cluster;
pub mod error;
pub mod index;
pub mod tree;

#[cfg(test)]
mod tests;

pub use cluster::{Cluster, ClusterSample, Incident, RiskTier, Severity, detect_clusters};
pub use error::{SpatialError, SpatialResult};
pub use index::SpatialIndex;
pub use tree::{Neighbor, SpatialPoint, SpatialTree};
