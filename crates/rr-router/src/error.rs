use rr_core::CoreError;
use rr_graph::GraphError;
use rr_search::SearchError;
use thiserror::Error;

/// Request-aborting errors.  Routes that simply do not exist are reported
/// inside [`RouteResult`](rr_search::RouteResult), not here.
#[derive(Debug, Error)]
pub enum RoutingError {
    #[error("routing configuration error: {0}")]
    Config(#[from] CoreError),

    #[error(transparent)]
    Search(#[from] SearchError),

    #[error("graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("response serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

pub type RoutingResult<T> = Result<T, RoutingError>;
