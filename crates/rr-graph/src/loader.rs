//! CSV road-network loader.
//!
//! # CSV format
//!
//! Two files, one row per node and one row per **directed** edge.
//!
//! ```csv
//! id,name,lat,lng,congestion,blocked
//! 1,Quiapo,14.5990,120.9840,20,false
//! 2,Sampaloc,14.6040,120.9920,95,false
//! ```
//!
//! ```csv
//! from,to,distance_m,travel_time_s,congestion_factor
//! 1,2,1050,140,1.2
//! 2,1,1050,140,1.2
//! ```
//!
//! `congestion`, `blocked` and `congestion_factor` columns may be omitted;
//! they default to `0`, `false` and `1.0`.  Records are only parsed here;
//! range checks happen when the snapshot is built.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use rr_core::{GeoPoint, NodeId};

use crate::model::{Edge, Node};
use crate::{GraphError, GraphResult};

// ── CSV records ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct NodeRecord {
    id:         u64,
    name:       String,
    lat:        f64,
    lng:        f64,
    #[serde(default)]
    congestion: u8,
    #[serde(default)]
    blocked:    bool,
}

#[derive(Deserialize)]
struct EdgeRecord {
    from:              u64,
    to:                u64,
    distance_m:        f64,
    travel_time_s:     f64,
    #[serde(default = "unit_factor")]
    congestion_factor: f64,
}

fn unit_factor() -> f64 {
    1.0
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load node and edge records from two CSV files.
pub fn load_graph_csv(nodes_path: &Path, edges_path: &Path) -> GraphResult<(Vec<Node>, Vec<Edge>)> {
    let nodes = std::fs::File::open(nodes_path)?;
    let edges = std::fs::File::open(edges_path)?;
    load_graph_reader(nodes, edges)
}

/// Like [`load_graph_csv`] but accepts any `Read` sources (e.g. a
/// `std::io::Cursor` over embedded data).
pub fn load_graph_reader<N: Read, E: Read>(nodes: N, edges: E) -> GraphResult<(Vec<Node>, Vec<Edge>)> {
    let nodes = csv::Reader::from_reader(nodes)
        .deserialize::<NodeRecord>()
        .map(|row| {
            let r = row.map_err(|e| GraphError::Parse(format!("nodes: {e}")))?;
            Ok(Node {
                id:         NodeId(r.id),
                name:       r.name,
                position:   GeoPoint::new(r.lat, r.lng),
                congestion: r.congestion,
                blocked:    r.blocked,
            })
        })
        .collect::<GraphResult<Vec<_>>>()?;

    let edges = csv::Reader::from_reader(edges)
        .deserialize::<EdgeRecord>()
        .map(|row| {
            let r = row.map_err(|e| GraphError::Parse(format!("edges: {e}")))?;
            Ok(Edge {
                from:              NodeId(r.from),
                to:                NodeId(r.to),
                distance_m:        r.distance_m,
                travel_time_s:     r.travel_time_s,
                congestion_factor: r.congestion_factor,
            })
        })
        .collect::<GraphResult<Vec<_>>>()?;

    Ok((nodes, edges))
}
