//! Search outcomes.

use std::fmt;

use serde::{Serialize, Serializer};

use rr_core::NodeId;
use rr_graph::{GraphSnapshot, NodeSummary};

use crate::algorithm::Algorithm;
use crate::trace::ExplorationStep;

/// Why a search produced no path.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum RouteFailure {
    /// The start or end node is absent from the graph.  No search ran.
    NodeNotFound,
    /// The frontier ran dry before reaching the target.
    NoPathFound,
    /// The iteration cap stopped the search first.
    SearchBudgetExceeded,
}

impl fmt::Display for RouteFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RouteFailure::NodeNotFound => "node not found",
            RouteFailure::NoPathFound => "no path found",
            RouteFailure::SearchBudgetExceeded => "search budget exceeded",
        })
    }
}

impl Serialize for RouteFailure {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// The outcome of one search.  Immutable once produced.
#[derive(Clone, Debug, Serialize)]
pub struct RouteResult {
    pub algorithm: Algorithm,
    pub success: bool,
    pub path: Vec<NodeId>,
    /// Coordinates of every node on `path`, for map rendering.
    pub path_details: Vec<NodeSummary>,
    /// Sum of edge weights along `path`.
    pub total_distance: f64,
    /// Sum of edge travel times along `path`, in seconds.
    pub total_time: f64,
    pub node_count: usize,
    /// Nodes settled before the search stopped.
    pub iterations: usize,
    pub exploration: Vec<ExplorationStep>,
    /// `true` if the trace hit its step limit and dropped steps.
    pub trace_truncated: bool,
    pub error: Option<RouteFailure>,
}

impl RouteResult {
    /// A successful result for `path`.  Totals are summed from the graph's
    /// cheapest edge between each consecutive pair.
    pub(crate) fn found(
        graph: &GraphSnapshot,
        algorithm: Algorithm,
        path: Vec<NodeId>,
        iterations: usize,
        exploration: Vec<ExplorationStep>,
        trace_truncated: bool,
    ) -> Self {
        let (total_distance, total_time) = path
            .windows(2)
            .filter_map(|pair| {
                let edge = graph.edge(pair[0], pair[1]);
                debug_assert!(edge.is_some(), "no edge {} -> {} on a found path", pair[0], pair[1]);
                edge
            })
            .fold((0.0, 0.0), |(d, t), e| (d + e.weight(), t + e.travel_time_s));

        let path_details = path
            .iter()
            .filter_map(|id| graph.node(*id).map(|n| n.summary()))
            .collect();

        Self {
            algorithm,
            success: true,
            node_count: path.len(),
            path,
            path_details,
            total_distance,
            total_time,
            iterations,
            exploration,
            trace_truncated,
            error: None,
        }
    }

    pub(crate) fn failed(
        algorithm: Algorithm,
        failure: RouteFailure,
        iterations: usize,
        exploration: Vec<ExplorationStep>,
        trace_truncated: bool,
    ) -> Self {
        Self {
            algorithm,
            success: false,
            path: Vec::new(),
            path_details: Vec::new(),
            total_distance: 0.0,
            total_time: 0.0,
            node_count: 0,
            iterations,
            exploration,
            trace_truncated,
            error: Some(failure),
        }
    }

    /// The error string clients display, if any.
    pub fn error_message(&self) -> Option<String> {
        self.error.map(|e| e.to_string())
    }

    pub fn start(&self) -> Option<NodeId> {
        self.path.first().copied()
    }

    pub fn end(&self) -> Option<NodeId> {
        self.path.last().copied()
    }
}
