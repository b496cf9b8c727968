//! Dijkstra's algorithm and the best-first core it shares with A*.
//!
//! # Loop
//!
//! ```text
//! push (start, g = 0)                                   → START
//! while frontier not empty:
//!   pop smallest key; skip if settled or stale
//!   budget spent?                → SearchBudgetExceeded
//!   settle node                                         → VISIT
//!   node == end?                 → path                 → FINALIZE
//!   relax each outgoing edge to an unsettled node       → RELAX
//! frontier empty                 → NoPathFound
//! ```
//!
//! Stopping as soon as the target is settled is exact for Dijkstra and for
//! A* with a consistent estimate, which the graph's heuristic scale
//! guarantees.

use std::collections::BinaryHeap;

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::warn;

use rr_core::{GeoPoint, NodeId, SearchConfig};
use rr_graph::GraphSnapshot;

use crate::algorithm::Algorithm;
use crate::frontier::Entry;
use crate::result::{RouteFailure, RouteResult};
use crate::trace::{StepAction, TraceRecorder};

/// Classic Dijkstra keyed by running distance.
pub fn dijkstra(graph: &GraphSnapshot, start: NodeId, end: NodeId, config: &SearchConfig) -> RouteResult {
    best_first(graph, start, end, config, Algorithm::Dijkstra, |_| None)
}

/// Best-first search keyed by `g + h`, where `estimate` yields `h` for a
/// node position (`None` means uninformed, i.e. Dijkstra).
pub(crate) fn best_first<H>(
    graph: &GraphSnapshot,
    start: NodeId,
    end: NodeId,
    config: &SearchConfig,
    algorithm: Algorithm,
    estimate: H,
) -> RouteResult
where
    H: Fn(GeoPoint) -> Option<f64>,
{
    let budget = algorithm.budget(config);
    let h_of = |id: NodeId| graph.node(id).and_then(|n| estimate(n.position));

    let mut trace = TraceRecorder::new(graph, config);
    let mut dist: FxHashMap<NodeId, f64> = FxHashMap::default();
    let mut parent: FxHashMap<NodeId, NodeId> = FxHashMap::default();
    let mut settled: FxHashSet<NodeId> = FxHashSet::default();
    let mut heap: BinaryHeap<Entry> = BinaryHeap::new();

    let h_start = h_of(start);
    dist.insert(start, 0.0);
    heap.push(Entry { key: h_start.unwrap_or(0.0), g: 0.0, node: start });
    trace.record(StepAction::Start, start, 0.0, h_start, None, None);

    let mut iterations = 0usize;

    while let Some(Entry { g, node, .. }) = heap.pop() {
        // Skip settled nodes and stale heap entries.
        if settled.contains(&node) || dist.get(&node).is_some_and(|&best| g > best) {
            continue;
        }

        if iterations >= budget {
            warn!(%start, %end, %algorithm, budget, "search budget exhausted");
            let (steps, truncated) = trace.finish();
            return RouteResult::failed(
                algorithm,
                RouteFailure::SearchBudgetExceeded,
                iterations,
                steps,
                truncated,
            );
        }

        settled.insert(node);
        iterations += 1;
        trace.record(StepAction::Visit, node, g, h_of(node), parent.get(&node).copied(), None);

        if node == end {
            trace.record(StepAction::Finalize, node, g, h_of(node), parent.get(&node).copied(), None);
            let path = reconstruct(&parent, start, end);
            let (steps, truncated) = trace.finish();
            return RouteResult::found(graph, algorithm, path, iterations, steps, truncated);
        }

        for edge in graph.edges_from(node) {
            let next = edge.to;
            if settled.contains(&next) || !passable(graph, next, start, end, config) {
                continue;
            }
            let new_g = g + edge.weight();
            if dist.get(&next).is_none_or(|&old| new_g < old) {
                let h = h_of(next);
                dist.insert(next, new_g);
                parent.insert(next, node);
                heap.push(Entry { key: new_g + h.unwrap_or(0.0), g: new_g, node: next });
                trace.record(StepAction::Relax, next, new_g, h, Some(node), None);
            }
        }
    }

    let (steps, truncated) = trace.finish();
    RouteResult::failed(algorithm, RouteFailure::NoPathFound, iterations, steps, truncated)
}

/// Whether a search may enter `node`.  Endpoints are always passable.
#[inline]
pub(crate) fn passable(
    graph: &GraphSnapshot,
    node: NodeId,
    start: NodeId,
    end: NodeId,
    config: &SearchConfig,
) -> bool {
    if !config.skip_unavailable || node == start || node == end {
        return true;
    }
    graph.node(node).is_some_and(|n| n.is_available())
}

/// Walk `parent` links back from `end` to `start`.
pub(crate) fn reconstruct(parent: &FxHashMap<NodeId, NodeId>, start: NodeId, end: NodeId) -> Vec<NodeId> {
    let mut path = vec![end];
    let mut current = end;
    while current != start {
        match parent.get(&current) {
            Some(&prev) => {
                path.push(prev);
                current = prev;
            }
            None => break,
        }
    }
    path.reverse();
    path
}
