//! A* search.
//!
//! `h` is the flat-earth straight-line distance to the target in metres
//! (degrees × 111 km × 1000), multiplied by the graph's heuristic scale so it
//! never overestimates an edge-weighted path.  With a consistent `h`, A*
//! settles the target at the same cost Dijkstra would.

use rr_core::{NodeId, SearchConfig};
use rr_graph::GraphSnapshot;

use crate::algorithm::Algorithm;
use crate::dijkstra::best_first;
use crate::result::{RouteFailure, RouteResult};

pub fn astar(graph: &GraphSnapshot, start: NodeId, end: NodeId, config: &SearchConfig) -> RouteResult {
    let Some(target) = graph.node(end).map(|n| n.position) else {
        return RouteResult::failed(Algorithm::AStar, RouteFailure::NodeNotFound, 0, Vec::new(), false);
    };
    best_first(graph, start, end, config, Algorithm::AStar, |pos| {
        Some(graph.estimate(pos, target))
    })
}
