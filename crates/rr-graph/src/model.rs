//! Plain node and edge records.
//!
//! These are the value records exchanged with the persistence layer.  They
//! carry no behaviour beyond the availability and weight rules.

use serde::{Deserialize, Serialize};

use rr_core::{GeoPoint, NodeId};

/// Congestion level (0–100) at or above which a node is unavailable.
pub const AVAILABILITY_CONGESTION_LIMIT: u8 = 90;

/// A road-network node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub name: String,
    #[serde(flatten)]
    pub position: GeoPoint,
    /// Congestion level, 0 (free-flowing) to 100 (gridlock).
    pub congestion: u8,
    pub blocked: bool,
}

impl Node {
    pub fn new(id: NodeId, name: impl Into<String>, position: GeoPoint) -> Self {
        Self { id, name: name.into(), position, congestion: 0, blocked: false }
    }

    pub fn with_congestion(mut self, congestion: u8) -> Self {
        self.congestion = congestion;
        self
    }

    pub fn with_blocked(mut self, blocked: bool) -> Self {
        self.blocked = blocked;
        self
    }

    /// A node is available when it is not blocked and its congestion is below
    /// [`AVAILABILITY_CONGESTION_LIMIT`].
    #[inline]
    pub fn is_available(&self) -> bool {
        !self.blocked && self.congestion < AVAILABILITY_CONGESTION_LIMIT
    }

    pub fn summary(&self) -> NodeSummary {
        NodeSummary {
            id:   self.id,
            name: self.name.clone(),
            lat:  self.position.lat,
            lng:  self.position.lng,
        }
    }
}

/// A directed road segment.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub from: NodeId,
    pub to: NodeId,
    /// Physical length in metres (≥ 1).
    pub distance_m: f64,
    /// Free-flow travel time in seconds (≥ 1).
    pub travel_time_s: f64,
    /// Multiplier applied to the distance (≥ 1.0).
    pub congestion_factor: f64,
}

impl Edge {
    pub fn new(from: NodeId, to: NodeId, distance_m: f64, travel_time_s: f64) -> Self {
        Self { from, to, distance_m, travel_time_s, congestion_factor: 1.0 }
    }

    pub fn with_congestion_factor(mut self, factor: f64) -> Self {
        self.congestion_factor = factor;
        self
    }

    /// The same segment travelled in the opposite direction.
    pub fn reversed(&self) -> Edge {
        Edge { from: self.to, to: self.from, ..self.clone() }
    }

    /// Search cost: distance scaled by congestion.  Non-negative for every
    /// edge accepted by the snapshot builder.
    #[inline]
    pub fn weight(&self) -> f64 {
        self.distance_m * self.congestion_factor
    }
}

/// The slice of a [`Node`] that route responses and exploration traces carry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeSummary {
    pub id: NodeId,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
}
