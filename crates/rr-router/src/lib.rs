//! `rr-router` — the routing engine callers talk to.
//!
//! # Request flow
//!
//! ```text
//! find_route(start, end, "astar")
//!   ① parse the algorithm name            (unknown name → Err)
//!   ② cache lookup (start, end, algorithm) → hit: RouteOutcome { cached: true }
//!   ③ snapshot the graph, run the search
//!   ④ cache the result if it succeeded and the graph was not rebuilt meanwhile
//!   ⑤ RouteOutcome { cached: false }
//! ```
//!
//! Rebuilding or clearing the graph through the engine always clears the
//! cache, so a cached route never outlives the network it was computed on.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use rr_core::EngineConfig;
//! use rr_router::RoutingEngineBuilder;
//!
//! let engine = RoutingEngineBuilder::new(EngineConfig::default())
//!     .graph(nodes, edges)
//!     .build()?;
//! let outcome = engine.find_route(start, end, "bidirectional-astar")?;
//! println!("{}", outcome.to_json()?);
//! ```

pub mod builder;
pub mod engine;
pub mod error;
pub mod outcome;


pub use builder::RoutingEngineBuilder;
pub use engine::{EngineStats, RoutingEngine};
pub use error::{RoutingError, RoutingResult};
pub use outcome::RouteOutcome;
