//! Spatial-query error type.

use thiserror::Error;

/// Invalid query parameters.  Empty results are never errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SpatialError {
    #[error("k must be at least 1")]
    InvalidK,

    #[error("radius must be positive and finite, got {0} km")]
    InvalidRadius(f64),

    #[error("grid size must be positive and finite, got {0}°")]
    InvalidGridSize(f64),
}

pub type SpatialResult<T> = Result<T, SpatialError>;
