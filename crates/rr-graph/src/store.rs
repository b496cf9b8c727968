//! `GraphStore` — the single owner of the current road-network snapshot.
//!
//! # Publication
//!
//! ```text
//! rebuild(nodes, edges):
//!   ① build + validate a new GraphSnapshot   (no lock held)
//!   ② write-lock, swap the Arc, bump generation
//! ```
//!
//! Readers take the read lock only long enough to clone the `Arc`, then
//! search the snapshot lock-free.  A search that started before a rebuild
//! keeps its old snapshot alive until it finishes.  A rebuild whose input
//! fails validation publishes nothing and leaves the previous snapshot in
//! place.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use tracing::info;

use rr_core::NodeId;

use crate::model::{Edge, Node};
use crate::snapshot::{GraphSnapshot, GraphSnapshotBuilder, GraphStats};
use crate::GraphResult;

#[derive(Debug)]
pub struct GraphStore {
    current:    RwLock<Arc<GraphSnapshot>>,
    generation: AtomicU64,
}

impl GraphStore {
    /// A store holding an empty snapshot (generation 0).
    pub fn new() -> Self {
        Self::with_snapshot(GraphSnapshot::empty())
    }

    pub fn with_snapshot(snapshot: GraphSnapshot) -> Self {
        Self {
            current:    RwLock::new(Arc::new(snapshot)),
            generation: AtomicU64::new(0),
        }
    }

    /// The currently published snapshot.  Cheap: one `Arc` clone.
    pub fn snapshot(&self) -> Arc<GraphSnapshot> {
        self.current.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Number of snapshots published since construction.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Replace the whole network with `nodes` and `edges`.
    pub fn rebuild(&self, nodes: Vec<Node>, edges: Vec<Edge>) -> GraphResult<GraphStats> {
        let snapshot = GraphSnapshotBuilder::from_records(nodes, edges).build()?;
        let stats = snapshot.stats();
        let generation = self.publish(snapshot);
        info!(
            generation,
            nodes = stats.nodes,
            edges = stats.edges,
            "graph rebuilt"
        );
        Ok(stats)
    }

    /// Publish an empty network.
    pub fn clear(&self) {
        let generation = self.publish(GraphSnapshot::empty());
        info!(generation, "graph cleared");
    }

    /// Swap in an already-built snapshot and return its generation.
    pub fn publish(&self, snapshot: GraphSnapshot) -> u64 {
        let snapshot = Arc::new(snapshot);
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *current = snapshot;
        self.generation.fetch_add(1, Ordering::AcqRel) + 1
    }

    // ── Convenience lookups against the current snapshot ──────────────────

    pub fn get_node(&self, id: NodeId) -> Option<Node> {
        self.snapshot().node(id).cloned()
    }

    /// Outgoing edges of `id`; empty when the node is unknown.
    pub fn edges_from(&self, id: NodeId) -> Vec<Edge> {
        self.snapshot().edges_from(id).to_vec()
    }

    pub fn stats(&self) -> GraphStats {
        self.snapshot().stats()
    }
}

impl Default for GraphStore {
    fn default() -> Self {
        Self::new()
    }
}
