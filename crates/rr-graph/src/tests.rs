//! Unit tests for rr-graph.
//!
//! All tests use hand-crafted or synthetic networks; no files on disk.

#[cfg(test)]
mod helpers {
    use rr_core::{GeoPoint, NodeId};
    use crate::{Edge, GraphSnapshot, GraphSnapshotBuilder, Node};

    pub fn node(id: u64, lat: f64, lng: f64) -> Node {
        Node::new(NodeId(id), format!("N{id}"), GeoPoint::new(lat, lng))
    }

    /// Three nodes on a line, 0.001° (111 m) apart:
    ///
    ///   1:(0,0) ── 2:(0,0.001) ── 3:(0,0.002)
    ///
    /// Two-way roads 1-2 (100 m), 2-3 (100 m), 1-3 (500 m).
    pub fn line_network() -> GraphSnapshot {
        let mut b = GraphSnapshotBuilder::new();
        b.add_node(node(1, 0.0, 0.0));
        b.add_node(node(2, 0.0, 0.001));
        b.add_node(node(3, 0.0, 0.002));
        b.add_road(Edge::new(NodeId(1), NodeId(2), 100.0, 10.0));
        b.add_road(Edge::new(NodeId(2), NodeId(3), 100.0, 10.0));
        b.add_road(Edge::new(NodeId(1), NodeId(3), 500.0, 50.0));
        b.build().unwrap()
    }
}

// ── Model ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod model {
    use rr_core::NodeId;
    use crate::Edge;
    use super::helpers::node;

    #[test]
    fn availability_rules() {
        assert!(node(1, 0.0, 0.0).is_available());
        assert!(node(1, 0.0, 0.0).with_congestion(89).is_available());
        assert!(!node(1, 0.0, 0.0).with_congestion(90).is_available());
        assert!(!node(1, 0.0, 0.0).with_blocked(true).is_available());
    }

    #[test]
    fn weight_is_distance_times_factor() {
        let e = Edge::new(NodeId(1), NodeId(2), 200.0, 20.0).with_congestion_factor(1.5);
        assert_eq!(e.weight(), 300.0);
        let r = e.reversed();
        assert_eq!((r.from, r.to), (NodeId(2), NodeId(1)));
        assert_eq!(r.weight(), 300.0);
    }
}

// ── Builder & snapshot ────────────────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use rr_core::NodeId;
    use crate::{Edge, GraphError, GraphSnapshotBuilder};
    use super::helpers::{line_network, node};

    #[test]
    fn empty_build() {
        let g = GraphSnapshotBuilder::new().build().unwrap();
        assert_eq!(g.node_count(), 0);
        assert_eq!(g.edge_count(), 0);
        assert!(g.is_empty());
        assert_eq!(g.stats().avg_out_degree, 0.0);
    }

    #[test]
    fn adjacency_both_directions() {
        let g = line_network();
        assert_eq!(g.node_count(), 3);
        assert_eq!(g.edge_count(), 6);
        assert_eq!(g.edges_from(NodeId(1)).len(), 2);
        assert_eq!(g.edges_into(NodeId(1)).len(), 2);
        assert!(g.edges_from(NodeId(1)).iter().all(|e| e.from == NodeId(1)));
        assert!(g.edges_into(NodeId(3)).iter().all(|e| e.to == NodeId(3)));
        assert_eq!(g.stats().avg_out_degree, 2.0);
    }

    #[test]
    fn unknown_node_lookups_are_empty() {
        let g = line_network();
        assert!(g.node(NodeId(99)).is_none());
        assert!(g.edges_from(NodeId(99)).is_empty());
        assert!(g.edges_into(NodeId(99)).is_empty());
    }

    #[test]
    fn directed_only_edge() {
        let mut b = GraphSnapshotBuilder::new();
        b.add_node(node(1, 0.0, 0.0));
        b.add_node(node(2, 0.0, 0.001));
        b.add_directed_edge(Edge::new(NodeId(1), NodeId(2), 100.0, 10.0));
        let g = b.build().unwrap();
        assert_eq!(g.edges_from(NodeId(1)).len(), 1);
        assert!(g.edges_from(NodeId(2)).is_empty());
        assert_eq!(g.edges_into(NodeId(2)).len(), 1);
    }

    #[test]
    fn cheapest_parallel_edge_wins() {
        let mut b = GraphSnapshotBuilder::new();
        b.add_node(node(1, 0.0, 0.0));
        b.add_node(node(2, 0.0, 0.001));
        b.add_directed_edge(Edge::new(NodeId(1), NodeId(2), 300.0, 10.0));
        b.add_directed_edge(Edge::new(NodeId(1), NodeId(2), 150.0, 10.0));
        let g = b.build().unwrap();
        assert_eq!(g.edge(NodeId(1), NodeId(2)).unwrap().distance_m, 150.0);
        assert!(g.edge(NodeId(2), NodeId(1)).is_none());
    }

    #[test]
    fn duplicate_node_rejected() {
        let mut b = GraphSnapshotBuilder::new();
        b.add_node(node(1, 0.0, 0.0));
        b.add_node(node(1, 0.0, 0.001));
        assert!(matches!(b.build(), Err(GraphError::DuplicateNode(NodeId(1)))));
    }

    #[test]
    fn edge_to_unknown_node_rejected() {
        let mut b = GraphSnapshotBuilder::new();
        b.add_node(node(1, 0.0, 0.0));
        b.add_directed_edge(Edge::new(NodeId(1), NodeId(7), 100.0, 10.0));
        assert!(matches!(b.build(), Err(GraphError::InvalidEdge { .. })));
    }

    #[test]
    fn edge_ranges_enforced() {
        for edge in [
            Edge::new(NodeId(1), NodeId(2), 0.5, 10.0),
            Edge::new(NodeId(1), NodeId(2), 100.0, 0.0),
            Edge::new(NodeId(1), NodeId(2), 100.0, 10.0).with_congestion_factor(0.9),
            Edge::new(NodeId(1), NodeId(2), f64::NAN, 10.0),
        ] {
            let mut b = GraphSnapshotBuilder::new();
            b.add_node(node(1, 0.0, 0.0));
            b.add_node(node(2, 0.0, 0.001));
            b.add_directed_edge(edge);
            assert!(matches!(b.build(), Err(GraphError::InvalidEdge { .. })));
        }
    }

    #[test]
    fn congestion_above_100_rejected() {
        let mut b = GraphSnapshotBuilder::new();
        b.add_node(node(1, 0.0, 0.0).with_congestion(101));
        assert!(matches!(b.build(), Err(GraphError::InvalidNode { .. })));
    }

    #[test]
    fn heuristic_scale_shrinks_for_short_edges() {
        // 1→2 spans 111 m in degree space but weighs 100 m.
        let g = line_network();
        let scale = g.heuristic_scale();
        assert!(scale < 1.0);
        assert!((scale - 100.0 / 111.0).abs() < 1e-9);
        // The scaled estimate never exceeds any single edge weight.
        for n in g.nodes() {
            for e in g.edges_from(n.id) {
                let to = g.node(e.to).unwrap();
                assert!(g.estimate(n.position, to.position) <= e.weight() + 1e-9);
            }
        }
    }

    #[test]
    fn heuristic_scale_capped_at_one() {
        let mut b = GraphSnapshotBuilder::new();
        b.add_node(node(1, 0.0, 0.0));
        b.add_node(node(2, 0.0, 0.001));
        b.add_road(Edge::new(NodeId(1), NodeId(2), 1_000.0, 60.0));
        assert_eq!(b.build().unwrap().heuristic_scale(), 1.0);
    }
}

// ── Spatial snap ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod snap {
    use rr_core::{GeoPoint, NodeId};
    use crate::GraphSnapshot;
    use super::helpers::line_network;

    #[test]
    fn snap_exact_and_nearest() {
        let g = line_network();
        assert_eq!(g.nearest_node(GeoPoint::new(0.0, 0.0)), Some(NodeId(1)));
        assert_eq!(g.nearest_node(GeoPoint::new(0.0, 0.0004)), Some(NodeId(1)));
        assert_eq!(g.nearest_node(GeoPoint::new(0.0, 0.0006)), Some(NodeId(2)));
    }

    #[test]
    fn k_nearest_order() {
        let g = line_network();
        let nearest = g.k_nearest_nodes(GeoPoint::new(0.0, 0.0021), 2);
        assert_eq!(nearest, vec![NodeId(3), NodeId(2)]);
    }

    #[test]
    fn empty_network_returns_none() {
        assert!(GraphSnapshot::empty().nearest_node(GeoPoint::new(0.0, 0.0)).is_none());
    }
}

// ── Store ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod store {
    use std::sync::Arc;

    use rr_core::NodeId;
    use crate::{Edge, GraphStore};
    use super::helpers::node;

    fn records(n: u64) -> (Vec<crate::Node>, Vec<Edge>) {
        let nodes: Vec<_> = (1..=n).map(|i| node(i, 0.0, i as f64 * 0.001)).collect();
        let edges = (1..n)
            .map(|i| Edge::new(NodeId(i), NodeId(i + 1), 120.0, 12.0))
            .collect();
        (nodes, edges)
    }

    #[test]
    fn rebuild_replaces_wholesale() {
        let store = GraphStore::new();
        assert_eq!(store.generation(), 0);
        let (nodes, edges) = records(5);
        let stats = store.rebuild(nodes, edges).unwrap();
        assert_eq!((stats.nodes, stats.edges), (5, 4));
        assert_eq!(store.generation(), 1);

        let (nodes, edges) = records(2);
        store.rebuild(nodes, edges).unwrap();
        assert_eq!(store.stats().nodes, 2);
        assert!(store.get_node(NodeId(5)).is_none());
        assert_eq!(store.edges_from(NodeId(1)).len(), 1);
        assert!(store.edges_from(NodeId(2)).is_empty());
    }

    #[test]
    fn failed_rebuild_keeps_previous_snapshot() {
        let store = GraphStore::new();
        let (nodes, edges) = records(3);
        store.rebuild(nodes, edges).unwrap();

        let (nodes, mut edges) = records(3);
        edges.push(Edge::new(NodeId(1), NodeId(42), 10.0, 1.0));
        assert!(store.rebuild(nodes, edges).is_err());
        assert_eq!(store.stats().nodes, 3);
        assert_eq!(store.generation(), 1);
    }

    #[test]
    fn clear_empties() {
        let store = GraphStore::new();
        let (nodes, edges) = records(3);
        store.rebuild(nodes, edges).unwrap();
        store.clear();
        assert_eq!(store.stats().nodes, 0);
        assert_eq!(store.stats().edges, 0);
        assert_eq!(store.generation(), 2);
    }

    #[test]
    fn held_snapshot_survives_rebuild() {
        let store = GraphStore::new();
        let (nodes, edges) = records(4);
        store.rebuild(nodes, edges).unwrap();
        let before = store.snapshot();
        store.clear();
        assert_eq!(before.node_count(), 4);
        assert_eq!(store.snapshot().node_count(), 0);
    }

    #[test]
    fn readers_never_see_partial_snapshots() {
        let store = Arc::new(GraphStore::new());
        std::thread::scope(|s| {
            let writer = Arc::clone(&store);
            s.spawn(move || {
                for round in 0..50u64 {
                    let (nodes, edges) = records(10 + round % 3 * 10);
                    writer.rebuild(nodes, edges).unwrap();
                }
            });
            for _ in 0..4 {
                let reader = Arc::clone(&store);
                s.spawn(move || {
                    for _ in 0..500 {
                        let g = reader.snapshot();
                        // Every published chain has exactly n - 1 edges.
                        if !g.is_empty() {
                            assert_eq!(g.edge_count(), g.node_count() - 1);
                        }
                    }
                });
            }
        });
    }
}

// ── Loader ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod loader {
    use std::io::Cursor;

    use rr_core::NodeId;
    use crate::{GraphError, GraphSnapshotBuilder, load_graph_reader};

    const NODES: &str = "\
id,name,lat,lng,congestion,blocked
1,Quiapo,14.5990,120.9840,20,false
2,Sampaloc,14.6040,120.9920,95,false
3,Binondo,14.6000,120.9740,0,true
";

    const EDGES: &str = "\
from,to,distance_m,travel_time_s,congestion_factor
1,2,1050,140,1.2
2,1,1050,140,1.2
1,3,1200,150,1.0
";

    #[test]
    fn parses_full_records() {
        let (nodes, edges) = load_graph_reader(Cursor::new(NODES), Cursor::new(EDGES)).unwrap();
        assert_eq!(nodes.len(), 3);
        assert_eq!(edges.len(), 3);
        assert_eq!(nodes[1].congestion, 95);
        assert!(!nodes[1].is_available());
        assert!(nodes[2].blocked);
        assert_eq!(edges[0].weight(), 1050.0 * 1.2);

        let g = GraphSnapshotBuilder::from_records(nodes, edges).build().unwrap();
        assert_eq!(g.edges_from(NodeId(1)).len(), 2);
    }

    #[test]
    fn optional_columns_default() {
        let nodes = "id,name,lat,lng\n1,A,0.0,0.0\n2,B,0.0,0.001\n";
        let edges = "from,to,distance_m,travel_time_s\n1,2,100,10\n";
        let (nodes, edges) = load_graph_reader(Cursor::new(nodes), Cursor::new(edges)).unwrap();
        assert_eq!(nodes[0].congestion, 0);
        assert!(!nodes[0].blocked);
        assert_eq!(edges[0].congestion_factor, 1.0);
    }

    #[test]
    fn malformed_row_is_parse_error() {
        let nodes = "id,name,lat,lng\nx,A,0.0,0.0\n";
        let result = load_graph_reader(Cursor::new(nodes), Cursor::new(EDGES));
        assert!(matches!(result, Err(GraphError::Parse(_))));
    }
}

// ── Synthetic networks ────────────────────────────────────────────────────────

#[cfg(test)]
mod synthetic {
    use crate::{GraphSnapshotBuilder, GridCitySpec, grid_city};

    #[test]
    fn deterministic_for_seed() {
        let spec = GridCitySpec::default();
        let (a_nodes, a_edges) = grid_city(&spec, 7);
        let (b_nodes, b_edges) = grid_city(&spec, 7);
        assert_eq!(a_nodes, b_nodes);
        assert_eq!(a_edges, b_edges);
    }

    #[test]
    fn lattice_shape_and_validity() {
        let spec = GridCitySpec { rows: 4, cols: 5, diagonal_ratio: 0.0, ..GridCitySpec::default() };
        let (nodes, edges) = grid_city(&spec, 1);
        assert_eq!(nodes.len(), 20);
        // Horizontal: 4 × 4, vertical: 3 × 5, both directions.
        assert_eq!(edges.len(), 2 * (16 + 15));
        let g = GraphSnapshotBuilder::from_records(nodes, edges).build().unwrap();
        // Streets are never shorter than the straight line.
        assert_eq!(g.heuristic_scale(), 1.0);
        assert_eq!(spec.node_id(3, 4).0, 20);
    }
}
