//! Algorithm selection and the single search entry point.
//!
//! Callers outside the engine pick an algorithm by lowercase name
//! (`"dijkstra"`, `"astar"`, …).  Inside, the choice is a closed enum and
//! [`find_path`] is the only dispatch point, so endpoint checks and the
//! trivial `start == end` case are handled once for every strategy.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use rr_core::{NodeId, SearchConfig};
use rr_graph::GraphSnapshot;

use crate::result::{RouteFailure, RouteResult};
use crate::trace::{StepAction, TraceRecorder};
use crate::{astar, bidirectional, dijkstra, SearchError};

/// The shortest-path strategies the engine offers.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Algorithm {
    #[default]
    #[serde(rename = "dijkstra")]
    Dijkstra,
    #[serde(rename = "astar")]
    AStar,
    #[serde(rename = "bidirectional-dijkstra")]
    BidirectionalDijkstra,
    #[serde(rename = "bidirectional-astar")]
    BidirectionalAStar,
}

impl Algorithm {
    pub const ALL: [Algorithm; 4] = [
        Algorithm::Dijkstra,
        Algorithm::AStar,
        Algorithm::BidirectionalDijkstra,
        Algorithm::BidirectionalAStar,
    ];

    /// Canonical lowercase name, also used in cache keys.
    pub fn as_str(self) -> &'static str {
        match self {
            Algorithm::Dijkstra => "dijkstra",
            Algorithm::AStar => "astar",
            Algorithm::BidirectionalDijkstra => "bidirectional-dijkstra",
            Algorithm::BidirectionalAStar => "bidirectional-astar",
        }
    }

    pub fn is_bidirectional(self) -> bool {
        matches!(self, Algorithm::BidirectionalDijkstra | Algorithm::BidirectionalAStar)
    }

    pub fn is_informed(self) -> bool {
        matches!(self, Algorithm::AStar | Algorithm::BidirectionalAStar)
    }

    /// Iteration cap for this algorithm under `config`.
    pub fn budget(self, config: &SearchConfig) -> usize {
        if self.is_bidirectional() {
            config.budget.bidirectional
        } else {
            config.budget.unidirectional
        }
    }

    /// Run this algorithm.  See [`find_path`].
    pub fn find_path(
        self,
        graph: &GraphSnapshot,
        start: NodeId,
        end: NodeId,
        config: &SearchConfig,
    ) -> RouteResult {
        find_path(graph, start, end, self, config)
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = SearchError;

    /// Case-insensitive; `-`, `_` and spaces are interchangeable.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_lowercase().replace(['_', ' '], "-");
        match name.as_str() {
            "" => Err(SearchError::NoAlgorithmSelected),
            "dijkstra" => Ok(Algorithm::Dijkstra),
            "astar" | "a*" | "a-star" => Ok(Algorithm::AStar),
            "bidirectional" | "bidirectional-dijkstra" | "bidijkstra" => {
                Ok(Algorithm::BidirectionalDijkstra)
            }
            "bidirectional-astar" | "bidirectional-a*" | "bidirectional-a-star" | "biastar" => {
                Ok(Algorithm::BidirectionalAStar)
            }
            _ => Err(SearchError::UnknownAlgorithm(s.trim().to_string())),
        }
    }
}

/// Find the cheapest path from `start` to `end` with `algorithm`.
///
/// - either endpoint missing → `NodeNotFound`, no search, empty trace
/// - `start == end` → single-node path, distance 0
/// - otherwise the chosen strategy runs under its iteration budget
pub fn find_path(
    graph: &GraphSnapshot,
    start: NodeId,
    end: NodeId,
    algorithm: Algorithm,
    config: &SearchConfig,
) -> RouteResult {
    if !graph.contains(start) || !graph.contains(end) {
        debug!(%start, %end, %algorithm, "endpoint missing from graph");
        return RouteResult::failed(algorithm, RouteFailure::NodeNotFound, 0, Vec::new(), false);
    }

    if start == end {
        let mut trace = TraceRecorder::new(graph, config);
        trace.record(StepAction::Start, start, 0.0, None, None, None);
        trace.record(StepAction::Finalize, start, 0.0, None, None, None);
        let (steps, truncated) = trace.finish();
        return RouteResult::found(graph, algorithm, vec![start], 0, steps, truncated);
    }

    let result = match algorithm {
        Algorithm::Dijkstra => dijkstra::dijkstra(graph, start, end, config),
        Algorithm::AStar => astar::astar(graph, start, end, config),
        Algorithm::BidirectionalDijkstra => {
            bidirectional::bidirectional_dijkstra(graph, start, end, config)
        }
        Algorithm::BidirectionalAStar => bidirectional::bidirectional_astar(graph, start, end, config),
    };

    debug!(
        %start,
        %end,
        %algorithm,
        success = result.success,
        iterations = result.iterations,
        distance = result.total_distance,
        steps = result.exploration.len(),
        "search finished"
    );
    result
}
