//! Immutable road-network snapshot and its builder.
//!
//! # Data layout
//!
//! Node ids are sparse (assigned by the data source), so adjacency is kept
//! in hash maps keyed by [`NodeId`] rather than in CSR arrays:
//!
//! ```text
//! nodes:    NodeId → Node
//! outgoing: NodeId → [Edge]   edges leaving the node   (forward search)
//! incoming: NodeId → [Edge]   edges entering the node  (backward search)
//! ```
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) maps `(lat, lng)` to the nearest `NodeId`, used to
//! snap arbitrary coordinates onto the network before routing.
//!
//! # Heuristic scale
//!
//! A* estimates remaining cost as the flat-earth straight-line distance in
//! metres.  Edge weights come from the data source and are not guaranteed to
//! be at least the straight-line length, so the builder computes
//!
//! ```text
//! scale = min(1, min over edges of weight(e) / straight_line_m(e))
//! ```
//!
//! and searches multiply the straight-line estimate by it.  The scaled
//! estimate never exceeds any edge's weight over its own span, which keeps it
//! admissible and consistent for every graph this builder accepts.

use rstar::{PointDistance, RTree, RTreeObject, AABB};
use rustc_hash::FxHashMap;
use serde::Serialize;

use rr_core::{GeoPoint, NodeId};

use crate::model::{Edge, Node};
use crate::{GraphError, GraphResult};

// ── R-tree node entry ─────────────────────────────────────────────────────────

/// Entry stored in the R-tree: a `[lat, lng]` point with its `NodeId`.
#[derive(Clone, Debug)]
struct NodeEntry {
    point: [f64; 2],
    id: NodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    /// Squared Euclidean distance in degree space.  Same ordering as the
    /// flat-earth metric used everywhere else in the engine.
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let d_lat = self.point[0] - point[0];
        let d_lng = self.point[1] - point[1];
        d_lat * d_lat + d_lng * d_lng
    }
}

// ── GraphStats ────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct GraphStats {
    pub nodes: usize,
    pub edges: usize,
    pub avg_out_degree: f64,
}

// ── GraphSnapshot ─────────────────────────────────────────────────────────────

/// A complete, immutable road network.  Build with [`GraphSnapshotBuilder`].
#[derive(Debug)]
pub struct GraphSnapshot {
    nodes:           FxHashMap<NodeId, Node>,
    outgoing:        FxHashMap<NodeId, Vec<Edge>>,
    incoming:        FxHashMap<NodeId, Vec<Edge>>,
    edge_count:      usize,
    heuristic_scale: f64,
    spatial_idx:     RTree<NodeEntry>,
}

impl GraphSnapshot {
    /// A snapshot with no nodes or edges.  Every route against it fails with
    /// "node not found".
    pub fn empty() -> Self {
        Self {
            nodes:           FxHashMap::default(),
            outgoing:        FxHashMap::default(),
            incoming:        FxHashMap::default(),
            edge_count:      0,
            heuristic_scale: 1.0,
            spatial_idx:     RTree::new(),
        }
    }

    // ── Dimensions ────────────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn stats(&self) -> GraphStats {
        let nodes = self.node_count();
        GraphStats {
            nodes,
            edges: self.edge_count,
            avg_out_degree: if nodes == 0 { 0.0 } else { self.edge_count as f64 / nodes as f64 },
        }
    }

    // ── Lookups ───────────────────────────────────────────────────────────

    #[inline]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    #[inline]
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Iterator over every node, in no particular order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.nodes.values()
    }

    /// Outgoing edges of `id`; empty for unknown nodes and dead ends.
    #[inline]
    pub fn edges_from(&self, id: NodeId) -> &[Edge] {
        self.outgoing.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Incoming edges of `id`; empty for unknown nodes and sources.
    #[inline]
    pub fn edges_into(&self, id: NodeId) -> &[Edge] {
        self.incoming.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The cheapest edge `from → to`, if any.  Parallel edges are allowed;
    /// searches always relax the cheapest, so path totals use it too.
    pub fn edge(&self, from: NodeId, to: NodeId) -> Option<&Edge> {
        self.edges_from(from)
            .iter()
            .filter(|e| e.to == to)
            .min_by(|a, b| a.weight().total_cmp(&b.weight()))
    }

    // ── Heuristic ─────────────────────────────────────────────────────────

    pub fn heuristic_scale(&self) -> f64 {
        self.heuristic_scale
    }

    /// Admissible estimate of the remaining cost between two positions, in
    /// the same units as [`Edge::weight`].
    #[inline]
    pub fn estimate(&self, from: GeoPoint, to: GeoPoint) -> f64 {
        from.flat_distance_m(to) * self.heuristic_scale
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// The node closest to `pos`, or `None` for an empty network.
    pub fn nearest_node(&self, pos: GeoPoint) -> Option<NodeId> {
        self.spatial_idx
            .nearest_neighbor(&[pos.lat, pos.lng])
            .map(|e| e.id)
    }

    /// Up to `k` nodes closest to `pos`, nearest first.
    pub fn k_nearest_nodes(&self, pos: GeoPoint, k: usize) -> Vec<NodeId> {
        self.spatial_idx
            .nearest_neighbor_iter(&[pos.lat, pos.lng])
            .take(k)
            .map(|e| e.id)
            .collect()
    }
}

impl Default for GraphSnapshot {
    fn default() -> Self {
        Self::empty()
    }
}

// ── GraphSnapshotBuilder ──────────────────────────────────────────────────────

/// Collects node and edge records, then validates and indexes them in
/// [`build`](Self::build).
///
/// # Example
///
/// ```
/// use rr_core::{GeoPoint, NodeId};
/// use rr_graph::{Edge, GraphSnapshotBuilder, Node};
///
/// let mut b = GraphSnapshotBuilder::new();
/// let a = b.add_node(Node::new(NodeId(1), "A", GeoPoint::new(14.60, 121.00)));
/// let c = b.add_node(Node::new(NodeId(2), "C", GeoPoint::new(14.61, 121.00)));
/// b.add_road(Edge::new(a, c, 1_200.0, 90.0));
/// let graph = b.build().unwrap();
/// assert_eq!(graph.node_count(), 2);
/// assert_eq!(graph.edge_count(), 2); // both directions
/// ```
#[derive(Default)]
pub struct GraphSnapshotBuilder {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

impl GraphSnapshotBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-allocate for bulk loads from the persistence layer.
    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self { nodes: Vec::with_capacity(nodes), edges: Vec::with_capacity(edges) }
    }

    /// Start from complete record lists.
    pub fn from_records(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        Self { nodes, edges }
    }

    /// Add a node and return its id.
    pub fn add_node(&mut self, node: Node) -> NodeId {
        let id = node.id;
        self.nodes.push(node);
        id
    }

    /// Add a **directed** edge.
    pub fn add_directed_edge(&mut self, edge: Edge) {
        self.edges.push(edge);
    }

    /// Add `edge` and its reverse: a two-way road segment.
    pub fn add_road(&mut self, edge: Edge) {
        self.edges.push(edge.reversed());
        self.edges.push(edge);
    }

    pub fn node_count(&self) -> usize { self.nodes.len() }
    pub fn edge_count(&self) -> usize { self.edges.len() }

    /// Validate every record and produce a [`GraphSnapshot`].
    ///
    /// Time complexity: O(N + E) for the maps plus O(N log N) for the R-tree
    /// bulk load.
    pub fn build(self) -> GraphResult<GraphSnapshot> {
        let mut nodes: FxHashMap<NodeId, Node> =
            FxHashMap::with_capacity_and_hasher(self.nodes.len(), Default::default());

        for node in self.nodes {
            validate_node(&node)?;
            let id = node.id;
            if nodes.insert(id, node).is_some() {
                return Err(GraphError::DuplicateNode(id));
            }
        }

        let mut outgoing: FxHashMap<NodeId, Vec<Edge>> = FxHashMap::default();
        let mut incoming: FxHashMap<NodeId, Vec<Edge>> = FxHashMap::default();
        let mut heuristic_scale: f64 = 1.0;
        let edge_count = self.edges.len();

        for edge in self.edges {
            let (Some(from), Some(to)) = (nodes.get(&edge.from), nodes.get(&edge.to)) else {
                let missing = if nodes.contains_key(&edge.from) { edge.to } else { edge.from };
                return Err(invalid_edge(&edge, format!("references unknown node {missing}")));
            };
            validate_edge(&edge)?;

            let span_m = from.position.flat_distance_m(to.position);
            if span_m > 0.0 {
                heuristic_scale = heuristic_scale.min(edge.weight() / span_m);
            }

            incoming.entry(edge.to).or_default().push(edge.clone());
            outgoing.entry(edge.from).or_default().push(edge);
        }

        let entries: Vec<NodeEntry> = nodes
            .values()
            .map(|n| NodeEntry { point: [n.position.lat, n.position.lng], id: n.id })
            .collect();

        Ok(GraphSnapshot {
            nodes,
            outgoing,
            incoming,
            edge_count,
            heuristic_scale,
            spatial_idx: RTree::bulk_load(entries),
        })
    }
}

// ── Validation ────────────────────────────────────────────────────────────────

fn validate_node(node: &Node) -> GraphResult<()> {
    if !node.id.is_valid() {
        return Err(GraphError::InvalidNode { id: node.id, reason: "reserved id".into() });
    }
    if node.congestion > 100 {
        return Err(GraphError::InvalidNode {
            id:     node.id,
            reason: format!("congestion {} outside 0..=100", node.congestion),
        });
    }
    if !node.position.is_valid() {
        return Err(GraphError::InvalidNode {
            id:     node.id,
            reason: format!("coordinate {} outside WGS-84 bounds", node.position),
        });
    }
    Ok(())
}

fn validate_edge(edge: &Edge) -> GraphResult<()> {
    if !(edge.distance_m.is_finite() && edge.distance_m >= 1.0) {
        return Err(invalid_edge(edge, format!("distance {} m is below 1", edge.distance_m)));
    }
    if !(edge.travel_time_s.is_finite() && edge.travel_time_s >= 1.0) {
        return Err(invalid_edge(edge, format!("travel time {} s is below 1", edge.travel_time_s)));
    }
    if !(edge.congestion_factor.is_finite() && edge.congestion_factor >= 1.0) {
        return Err(invalid_edge(
            edge,
            format!("congestion factor {} is below 1.0", edge.congestion_factor),
        ));
    }
    Ok(())
}

fn invalid_edge(edge: &Edge, reason: String) -> GraphError {
    GraphError::InvalidEdge { from: edge.from, to: edge.to, reason }
}
