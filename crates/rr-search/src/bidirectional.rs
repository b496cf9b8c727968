//! Bidirectional Dijkstra and bidirectional A*.
//!
//! A forward search grows from `start` over outgoing edges and a backward
//! search grows from `end` over incoming edges, alternating one settled node
//! each.  A meeting candidate at `v` costs `g_fwd(v) + g_bwd(v)`; the best
//! one so far is `best`.  [`BidirectionalStop`] picks how candidates are
//! found and when the search gives up on finding a cheaper one:
//!
//! ```text
//! HalfBest  candidates: nodes settled by both sides
//!           stop:       top_key(fwd) >= best / 2  and  top_key(bwd) >= best / 2
//! Exact     candidates: doubly settled nodes, and every scanned edge that
//!                       reaches a node the other side has labelled
//!           stop:       top_key(fwd) + top_key(bwd) >= best
//! ```
//!
//! `HalfBest` can stop before the cheapest meeting is seen.  The only
//! guarantee is that it finds *a* path whenever one exists.  `Exact` is exact
//! for non-negative weights; the property tests in this crate compare it
//! against Dijkstra.
//!
//! # Potentials (bidirectional A*)
//!
//! Plain `g + h` keys on each side break the stopping rule, so both sides
//! use the symmetric average potential
//!
//! ```text
//! p(v) = (h_end(v) − h_start(v)) / 2
//! key_fwd(v) = g_fwd(v) + p(v)        key_bwd(v) = g_bwd(v) − p(v)
//! ```
//!
//! Reduced edge costs `w − p(u) + p(v)` stay non-negative for a consistent
//! `h`, so the search is a bidirectional Dijkstra on reduced costs and the
//! same stopping rules apply.  Bidirectional Dijkstra is the `p ≡ 0` case.

use std::collections::BinaryHeap;

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::warn;

use rr_core::{BidirectionalStop, GeoPoint, NodeId, SearchConfig};
use rr_graph::{Edge, GraphSnapshot};

use crate::algorithm::Algorithm;
use crate::dijkstra::passable;
use crate::frontier::Entry;
use crate::result::{RouteFailure, RouteResult};
use crate::trace::{SearchDirection, StepAction, TraceRecorder};

pub fn bidirectional_dijkstra(
    graph: &GraphSnapshot,
    start: NodeId,
    end: NodeId,
    config: &SearchConfig,
) -> RouteResult {
    Bidirectional::new(graph, start, end, config, Algorithm::BidirectionalDijkstra, None).run()
}

pub fn bidirectional_astar(
    graph: &GraphSnapshot,
    start: NodeId,
    end: NodeId,
    config: &SearchConfig,
) -> RouteResult {
    let endpoints = graph
        .node(start)
        .zip(graph.node(end))
        .map(|(s, t)| (s.position, t.position));
    let Some(endpoints) = endpoints else {
        return RouteResult::failed(
            Algorithm::BidirectionalAStar,
            RouteFailure::NodeNotFound,
            0,
            Vec::new(),
            false,
        );
    };
    Bidirectional::new(graph, start, end, config, Algorithm::BidirectionalAStar, Some(endpoints)).run()
}

// ── One search direction ──────────────────────────────────────────────────────

struct Frontier {
    direction: SearchDirection,
    dist:      FxHashMap<NodeId, f64>,
    /// Forward: predecessor towards `start`.  Backward: successor towards `end`.
    parent:    FxHashMap<NodeId, NodeId>,
    settled:   FxHashSet<NodeId>,
    heap:      BinaryHeap<Entry>,
}

impl Frontier {
    fn new(direction: SearchDirection, origin: NodeId, key: f64) -> Self {
        let mut dist = FxHashMap::default();
        dist.insert(origin, 0.0);
        let mut heap = BinaryHeap::new();
        heap.push(Entry { key, g: 0.0, node: origin });
        Self { direction, dist, parent: FxHashMap::default(), settled: FxHashSet::default(), heap }
    }

    fn is_stale(&self, entry: &Entry) -> bool {
        self.settled.contains(&entry.node)
            || self.dist.get(&entry.node).is_some_and(|&best| entry.g > best)
    }

    /// Smallest live key, discarding stale entries on the way.
    fn top_key(&mut self) -> Option<f64> {
        while let Some(top) = self.heap.peek() {
            if self.is_stale(top) {
                self.heap.pop();
            } else {
                return Some(top.key);
            }
        }
        None
    }

    fn pop_live(&mut self) -> Option<Entry> {
        while let Some(entry) = self.heap.pop() {
            if !self.is_stale(&entry) {
                return Some(entry);
            }
        }
        None
    }

    /// Edges this side scans from `node`, with the node each one leads to.
    fn scan<'g>(&self, graph: &'g GraphSnapshot, node: NodeId) -> impl Iterator<Item = (&'g Edge, NodeId)> + 'g {
        let (edges, forward) = match self.direction {
            SearchDirection::Forward => (graph.edges_from(node), true),
            SearchDirection::Backward => (graph.edges_into(node), false),
        };
        edges.iter().map(move |e| (e, if forward { e.to } else { e.from }))
    }
}

// ── Search state ──────────────────────────────────────────────────────────────

struct Bidirectional<'g> {
    graph:     &'g GraphSnapshot,
    start:     NodeId,
    end:       NodeId,
    config:    &'g SearchConfig,
    algorithm: Algorithm,
    /// Positions of (start, end) for informed searches.
    endpoints: Option<(GeoPoint, GeoPoint)>,
    forward:   Frontier,
    backward:  Frontier,
    trace:     TraceRecorder<'g>,
    best:      f64,
    meeting:   Option<NodeId>,
}

impl<'g> Bidirectional<'g> {
    fn new(
        graph: &'g GraphSnapshot,
        start: NodeId,
        end: NodeId,
        config: &'g SearchConfig,
        algorithm: Algorithm,
        endpoints: Option<(GeoPoint, GeoPoint)>,
    ) -> Self {
        let p_start = potential_at(graph, endpoints, start);
        let p_end = potential_at(graph, endpoints, end);
        Self {
            graph,
            start,
            end,
            config,
            algorithm,
            endpoints,
            forward: Frontier::new(SearchDirection::Forward, start, p_start),
            backward: Frontier::new(SearchDirection::Backward, end, -p_end),
            trace: TraceRecorder::new(graph, config),
            best: f64::INFINITY,
            meeting: None,
        }
    }

    fn estimates(&self, node: NodeId) -> Option<(f64, f64)> {
        estimates_at(self.graph, self.endpoints, node)
    }

    fn potential(&self, node: NodeId) -> f64 {
        potential_at(self.graph, self.endpoints, node)
    }

    /// The h-score shown in the trace for `direction`.
    fn trace_heuristic(&self, node: NodeId, direction: SearchDirection) -> Option<f64> {
        self.estimates(node).map(|(h_end, h_start)| match direction {
            SearchDirection::Forward => h_end,
            SearchDirection::Backward => h_start,
        })
    }

    fn side_mut(&mut self, direction: SearchDirection) -> &mut Frontier {
        match direction {
            SearchDirection::Forward => &mut self.forward,
            SearchDirection::Backward => &mut self.backward,
        }
    }

    fn offer(&mut self, node: NodeId) {
        if let (Some(&f), Some(&b)) = (self.forward.dist.get(&node), self.backward.dist.get(&node)) {
            if f + b < self.best {
                self.best = f + b;
                self.meeting = Some(node);
            }
        }
    }

    fn should_stop(&self, top_f: f64, top_b: f64) -> bool {
        match self.config.bidirectional_stop {
            BidirectionalStop::HalfBest => {
                let half = self.best / 2.0;
                top_f >= half && top_b >= half
            }
            BidirectionalStop::Exact => top_f + top_b >= self.best,
        }
    }

    fn run(mut self) -> RouteResult {
        let budget = self.algorithm.budget(self.config);
        for (direction, origin) in [(SearchDirection::Forward, self.start), (SearchDirection::Backward, self.end)] {
            let h = self.trace_heuristic(origin, direction);
            self.trace.record(StepAction::Start, origin, 0.0, h, None, Some(direction));
        }

        let mut iterations = 0usize;

        loop {
            let (Some(top_f), Some(top_b)) = (self.forward.top_key(), self.backward.top_key()) else {
                break;
            };
            if self.should_stop(top_f, top_b) {
                break;
            }
            if iterations >= budget {
                warn!(
                    start = %self.start,
                    end = %self.end,
                    algorithm = %self.algorithm,
                    budget,
                    "search budget exhausted"
                );
                let (steps, truncated) = self.trace.finish();
                return RouteResult::failed(
                    self.algorithm,
                    RouteFailure::SearchBudgetExceeded,
                    iterations,
                    steps,
                    truncated,
                );
            }

            let direction = if iterations % 2 == 0 {
                SearchDirection::Forward
            } else {
                SearchDirection::Backward
            };
            iterations += 1;
            self.expand(direction);
        }

        let Some(meeting) = self.meeting else {
            let (steps, truncated) = self.trace.finish();
            return RouteResult::failed(
                self.algorithm,
                RouteFailure::NoPathFound,
                iterations,
                steps,
                truncated,
            );
        };

        let h = self.trace_heuristic(meeting, SearchDirection::Forward);
        let parent = self.forward.parent.get(&meeting).copied();
        self.trace.record(StepAction::Finalize, meeting, self.best, h, parent, None);

        let path = self.join(meeting);
        let (steps, truncated) = self.trace.finish();
        RouteResult::found(self.graph, self.algorithm, path, iterations, steps, truncated)
    }

    /// Settle the best node of one side and scan its edges.
    fn expand(&mut self, direction: SearchDirection) {
        let Some(Entry { g, node, .. }) = self.side_mut(direction).pop_live() else {
            return;
        };
        let sign = match direction {
            SearchDirection::Forward => 1.0,
            SearchDirection::Backward => -1.0,
        };

        let side = self.side_mut(direction);
        side.settled.insert(node);
        let parent = side.parent.get(&node).copied();
        let h = self.trace_heuristic(node, direction);
        self.trace.record(StepAction::Visit, node, g, h, parent, Some(direction));

        // Settled by both sides: a meeting point.
        self.offer(node);

        let (graph, start, end, config) = (self.graph, self.start, self.end, self.config);
        let side = self.side_mut(direction);
        let scans: Vec<(NodeId, f64)> = side
            .scan(graph, node)
            .filter(|(_, next)| !side.settled.contains(next))
            .filter(|(_, next)| passable(graph, *next, start, end, config))
            .map(|(edge, next)| (next, g + edge.weight()))
            .collect();

        let offer_on_scan = self.config.bidirectional_stop == BidirectionalStop::Exact;
        for (next, new_g) in scans {
            let key = new_g + sign * self.potential(next);
            let side = self.side_mut(direction);
            if side.dist.get(&next).is_none_or(|&old| new_g < old) {
                side.dist.insert(next, new_g);
                side.parent.insert(next, node);
                side.heap.push(Entry { key, g: new_g, node: next });
                let h = self.trace_heuristic(next, direction);
                self.trace.record(StepAction::Relax, next, new_g, h, Some(node), Some(direction));
            }
            // Scanned edge reaching the other side's labels.
            if offer_on_scan {
                self.offer(next);
            }
        }
    }

    /// `start … meeting` from forward parents, then `… end` from backward
    /// parents, with the meeting node appearing once.
    fn join(&self, meeting: NodeId) -> Vec<NodeId> {
        let mut path = vec![meeting];
        let mut current = meeting;
        while current != self.start {
            let Some(&prev) = self.forward.parent.get(&current) else { break };
            path.push(prev);
            current = prev;
        }
        path.reverse();

        current = meeting;
        while current != self.end {
            let Some(&next) = self.backward.parent.get(&current) else { break };
            path.push(next);
            current = next;
        }
        path
    }
}

// ── Estimates ─────────────────────────────────────────────────────────────────

/// Straight-line estimates `(to end, to start)` for `node`; `None` for the
/// uninformed variant.
fn estimates_at(
    graph: &GraphSnapshot,
    endpoints: Option<(GeoPoint, GeoPoint)>,
    node: NodeId,
) -> Option<(f64, f64)> {
    let (s, t) = endpoints?;
    let pos = graph.node(node)?.position;
    Some((graph.estimate(pos, t), graph.estimate(pos, s)))
}

/// Forward potential `p(v)`; the backward side uses `-p(v)`.
fn potential_at(graph: &GraphSnapshot, endpoints: Option<(GeoPoint, GeoPoint)>, node: NodeId) -> f64 {
    estimates_at(graph, endpoints, node).map_or(0.0, |(h_end, h_start)| (h_end - h_start) / 2.0)
}
