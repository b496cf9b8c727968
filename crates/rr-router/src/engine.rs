//! `RoutingEngine` — cache in front of path search over the current graph.

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use rr_cache::{CacheStats, RouteCache, RouteKey};
use rr_core::{EngineConfig, GeoPoint, NodeId};
use rr_graph::{Edge, GraphSnapshot, GraphStats, GraphStore, Node};
use rr_search::{Algorithm, find_path};

use crate::{RouteOutcome, RoutingResult};

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct EngineStats {
    pub graph: GraphStats,
    pub cache: CacheStats,
    /// Graph snapshots published since the engine was built.
    pub generation: u64,
}

/// The routing facade.  `Sync`: share one engine across request threads.
#[derive(Debug)]
pub struct RoutingEngine {
    store:  GraphStore,
    cache:  RouteCache,
    config: EngineConfig,
}

impl RoutingEngine {
    pub(crate) fn from_parts(store: GraphStore, cache: RouteCache, config: EngineConfig) -> Self {
        Self { store, cache, config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The current graph snapshot.
    pub fn graph(&self) -> Arc<GraphSnapshot> {
        self.store.snapshot()
    }

    pub fn cache(&self) -> &RouteCache {
        &self.cache
    }

    // ── Routing ───────────────────────────────────────────────────────────

    /// Route with an algorithm chosen by name (`"dijkstra"`, `"astar"`, …).
    pub fn find_route(&self, start: NodeId, end: NodeId, algorithm: &str) -> RoutingResult<RouteOutcome> {
        let algorithm: Algorithm = algorithm.parse()?;
        Ok(self.find_route_with(start, end, algorithm))
    }

    pub fn find_route_with(&self, start: NodeId, end: NodeId, algorithm: Algorithm) -> RouteOutcome {
        // Read the generation before the snapshot: if a rebuild lands while
        // we search, the result is returned but not cached.
        let generation = self.store.generation();
        let graph = self.store.snapshot();
        self.route_on(&graph, generation, start, end, algorithm)
    }

    /// Snap both points to their nearest graph nodes and route between them
    /// on the same snapshot.  An empty graph yields a "node not found"
    /// result.
    pub fn route_between_points(&self, from: GeoPoint, to: GeoPoint, algorithm: Algorithm) -> RouteOutcome {
        let generation = self.store.generation();
        let graph = self.store.snapshot();
        let start = graph.nearest_node(from).unwrap_or(NodeId::INVALID);
        let end = graph.nearest_node(to).unwrap_or(NodeId::INVALID);
        debug!(%start, %end, "snapped route endpoints");
        self.route_on(&graph, generation, start, end, algorithm)
    }

    /// Cache lookup, then search on `graph`, which was published as
    /// `generation`.
    fn route_on(
        &self,
        graph: &GraphSnapshot,
        generation: u64,
        start: NodeId,
        end: NodeId,
        algorithm: Algorithm,
    ) -> RouteOutcome {
        let key = RouteKey::new(start, end, algorithm);
        if let Some(result) = self.cache.get(&key) {
            debug!(%key, "route served from cache");
            return RouteOutcome { result, cached: true };
        }

        let result = Arc::new(find_path(graph, start, end, algorithm, &self.config.search));
        if result.success && self.store.generation() == generation {
            self.cache.put(key, Arc::clone(&result));
            // A rebuild may have published between the check and the put.
            if self.store.generation() != generation {
                self.cache.invalidate(&key);
            }
        }
        RouteOutcome { result, cached: false }
    }

    /// Run every algorithm for the same pair, in [`Algorithm::ALL`] order.
    pub fn compare_algorithms(&self, start: NodeId, end: NodeId) -> Vec<RouteOutcome> {
        Algorithm::ALL
            .into_iter()
            .map(|algorithm| self.find_route_with(start, end, algorithm))
            .collect()
    }

    // ── Graph lifecycle ───────────────────────────────────────────────────

    /// Replace the network and drop every cached route.  On invalid input
    /// the previous network stays in place.
    pub fn rebuild_graph(&self, nodes: Vec<Node>, edges: Vec<Edge>) -> RoutingResult<GraphStats> {
        let rebuilt = self.store.rebuild(nodes, edges);
        self.cache.clear();
        Ok(rebuilt?)
    }

    pub fn clear_graph(&self) {
        self.store.clear();
        self.cache.clear();
    }

    /// Drop cached routes touching `node`, e.g. after its congestion changed.
    pub fn invalidate_node(&self, node: NodeId) -> usize {
        self.cache.invalidate_node(node)
    }

    pub fn stats(&self) -> EngineStats {
        EngineStats {
            graph: self.store.stats(),
            cache: self.cache.stats(),
            generation: self.store.generation(),
        }
    }
}
