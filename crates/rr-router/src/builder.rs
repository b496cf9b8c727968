//! Fluent builder for constructing a [`RoutingEngine`].

use rr_cache::RouteCache;
use rr_core::EngineConfig;
use rr_graph::{Edge, GraphSnapshot, GraphSnapshotBuilder, GraphStore, Node};

use crate::{RoutingEngine, RoutingResult};

/// Fluent builder for [`RoutingEngine`].
///
/// # Optional inputs
///
/// | Method             | Default                 |
/// |--------------------|-------------------------|
/// | `.graph(n, e)`     | empty network           |
/// | `.snapshot(s)`     | empty network           |
///
/// `build()` validates the configuration and the network records; the
/// engine is never constructed from invalid input.
///
/// # Example
///
/// ```rust,ignore
/// let engine = RoutingEngineBuilder::new(config)
///     .graph(nodes, edges)
///     .build()?;
/// ```
pub struct RoutingEngineBuilder {
    config:  EngineConfig,
    records: Option<(Vec<Node>, Vec<Edge>)>,
    built:   Option<GraphSnapshot>,
}

impl RoutingEngineBuilder {
    pub fn new(config: EngineConfig) -> Self {
        Self { config, records: None, built: None }
    }

    /// Supply node and edge records; they are validated by `build()`.
    pub fn graph(mut self, nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        self.records = Some((nodes, edges));
        self.built = None;
        self
    }

    /// Supply an already-built snapshot.
    pub fn snapshot(mut self, snapshot: GraphSnapshot) -> Self {
        self.built = Some(snapshot);
        self.records = None;
        self
    }

    pub fn build(self) -> RoutingResult<RoutingEngine> {
        self.config.validate()?;
        let cache = RouteCache::from_config(&self.config.cache)?;

        let store = match (self.built, self.records) {
            (Some(snapshot), _) => GraphStore::with_snapshot(snapshot),
            (None, Some((nodes, edges))) => {
                GraphStore::with_snapshot(GraphSnapshotBuilder::from_records(nodes, edges).build()?)
            }
            (None, None) => GraphStore::new(),
        };

        Ok(RoutingEngine::from_parts(store, cache, self.config))
    }
}
