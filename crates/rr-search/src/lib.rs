//! `rr-search` — shortest-path strategies over a [`GraphSnapshot`].
//!
//! # Crate layout
//!
//! | Module            | Contents                                                |
//! |-------------------|---------------------------------------------------------|
//! | [`algorithm`]     | `Algorithm` enum, name parsing, `find_path` dispatch    |
//! | [`dijkstra`]      | Dijkstra and the shared best-first core                 |
//! | [`astar`]         | A* with the straight-line estimate                      |
//! | [`bidirectional`] | Bidirectional Dijkstra and bidirectional A*             |
//! | [`trace`]         | `ExplorationStep`, `StepAction`, `SearchDirection`      |
//! | [`result`]        | `RouteResult`, `RouteFailure`                           |
//! | [`error`]         | `SearchError`, `SearchResult<T>`                        |
//!
//! # Outcomes
//!
//! Searches never return `Err`.  Missing endpoints, exhausted frontiers and
//! exhausted iteration budgets all produce a [`RouteResult`] with
//! `success == false` and a [`RouteFailure`], and the exploration trace is
//! kept so a client can still show where the search looked.  `Err` is
//! reserved for programming errors such as an unknown algorithm name.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use rr_core::SearchConfig;
//! use rr_search::{Algorithm, find_path};
//!
//! let algorithm: Algorithm = "astar".parse()?;
//! let result = find_path(&graph, start, end, algorithm, &SearchConfig::default());
//! if result.success {
//!     println!("{} m via {} nodes", result.total_distance, result.node_count);
//! }
//! ```

pub mod algorithm;
pub mod astar;
pub mod bidirectional;
pub mod dijkstra;
pub mod error;
pub mod result;
pub mod trace;

mod frontier;


pub use algorithm::{Algorithm, find_path};
pub use error::{SearchError, SearchResult};
pub use result::{RouteFailure, RouteResult};
pub use trace::{ExplorationStep, SearchDirection, StepAction};
