use thiserror::Error;

use rr_core::CoreError;

/// Programming and configuration errors.  Data conditions such as a missing
/// node or an unreachable target are reported through `RouteResult` instead.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("no search algorithm selected")]
    NoAlgorithmSelected,

    #[error("unknown search algorithm {0:?}")]
    UnknownAlgorithm(String),

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type SearchResult<T> = Result<T, SearchError>;
