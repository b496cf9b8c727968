//! Seeded synthetic road networks.
//!
//! `grid_city` lays out a `rows × cols` lattice of intersections with two-way
//! streets between lattice neighbours and, optionally, a sprinkling of
//! diagonal shortcuts.  The same `(spec, seed)` always yields the same
//! records, which makes it suitable for re-seeding a demo database and for
//! randomised tests.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use rr_core::{GeoPoint, NodeId};

use crate::model::{Edge, Node};

/// Shape of a synthetic grid city.
#[derive(Clone, Debug)]
pub struct GridCitySpec {
    pub rows: usize,
    pub cols: usize,
    /// Position of the intersection at row 0, column 0.
    pub origin: GeoPoint,
    /// Lattice spacing in degrees (0.001° ≈ 111 m).
    pub spacing_deg: f64,
    /// Node congestion is drawn uniformly from `0..=max_congestion`.
    pub max_congestion: u8,
    /// Probability that an intersection is blocked.
    pub blocked_ratio: f64,
    /// Probability that a cell gets a diagonal shortcut.
    pub diagonal_ratio: f64,
}

impl Default for GridCitySpec {
    fn default() -> Self {
        Self {
            rows:           10,
            cols:           10,
            origin:         GeoPoint::new(14.5995, 120.9842),
            spacing_deg:    0.001,
            max_congestion: 60,
            blocked_ratio:  0.0,
            diagonal_ratio: 0.1,
        }
    }
}

impl GridCitySpec {
    /// Node id of the intersection at (`row`, `col`).  Ids start at 1.
    pub fn node_id(&self, row: usize, col: usize) -> NodeId {
        NodeId((row * self.cols + col) as u64 + 1)
    }
}

/// Generate the node and edge records for `spec`.
pub fn grid_city(spec: &GridCitySpec, seed: u64) -> (Vec<Node>, Vec<Edge>) {
    let mut rng = SmallRng::seed_from_u64(seed);
    let blocked_ratio = spec.blocked_ratio.clamp(0.0, 1.0);
    let diagonal_ratio = spec.diagonal_ratio.clamp(0.0, 1.0);

    let mut nodes = Vec::with_capacity(spec.rows * spec.cols);
    for row in 0..spec.rows {
        for col in 0..spec.cols {
            let position = GeoPoint::new(
                spec.origin.lat + row as f64 * spec.spacing_deg,
                spec.origin.lng + col as f64 * spec.spacing_deg,
            );
            nodes.push(Node {
                id:         spec.node_id(row, col),
                name:       format!("R{row}C{col}"),
                position,
                congestion: rng.gen_range(0..=spec.max_congestion.min(100)),
                blocked:    rng.gen_bool(blocked_ratio),
            });
        }
    }

    let mut edges = Vec::new();
    let mut road = |rng: &mut SmallRng, a: (usize, usize), b: (usize, usize)| {
        let from = &nodes[a.0 * spec.cols + a.1];
        let to = &nodes[b.0 * spec.cols + b.1];
        // Streets wind a little: never shorter than the straight line.
        let distance_m = (from.position.flat_distance_m(to.position) * rng.gen_range(1.0..1.3))
            .ceil()
            .max(1.0);
        let speed_mps: f64 = rng.gen_range(8.0..16.0);
        let edge = Edge {
            from:              from.id,
            to:                to.id,
            distance_m,
            travel_time_s:     (distance_m / speed_mps).ceil().max(1.0),
            congestion_factor: 1.0 + f64::from(to.congestion) / 100.0,
        };
        edges.push(edge.reversed());
        edges.push(edge);
    };

    for row in 0..spec.rows {
        for col in 0..spec.cols {
            if col + 1 < spec.cols {
                road(&mut rng, (row, col), (row, col + 1));
            }
            if row + 1 < spec.rows {
                road(&mut rng, (row, col), (row + 1, col));
            }
            if row + 1 < spec.rows && col + 1 < spec.cols && rng.gen_bool(diagonal_ratio) {
                road(&mut rng, (row, col), (row + 1, col + 1));
            }
        }
    }

    (nodes, edges)
}
