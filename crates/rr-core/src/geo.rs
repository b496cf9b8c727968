//! Geographic coordinate type and distance helpers.
//!
//! Every distance in the engine is **flat-earth** (`flat_distance_km`,
//! `flat_distance_m`): Euclidean distance in degree space scaled by
//! 111 km/degree.  It obeys the triangle inequality and is accurate enough
//! at city scale.  The A* heuristic, the k-d tree and the cluster grid all
//! use it.

/// Kilometres per degree of arc in the flat-earth approximation.
pub const KM_PER_DEGREE: f64 = 111.0;

/// Metres per degree of arc in the flat-earth approximation.  Edge weights are
/// in metres, so heuristics computed in degrees are scaled by this.
pub const METRES_PER_DEGREE: f64 = KM_PER_DEGREE * 1_000.0;

/// A WGS-84 coordinate.  `f64` because k-d tree pruning compares tiny
/// axis deltas that single precision would blur.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    #[inline]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// `true` when both components are finite and inside WGS-84 bounds.
    pub fn is_valid(self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }

    /// Coordinate along axis `0` (latitude) or `1` (longitude).
    #[inline]
    pub fn axis(self, axis: usize) -> f64 {
        if axis % 2 == 0 { self.lat } else { self.lng }
    }

    /// Straight-line distance in degree space.
    #[inline]
    pub fn degree_distance(self, other: GeoPoint) -> f64 {
        let d_lat = self.lat - other.lat;
        let d_lng = self.lng - other.lng;
        (d_lat * d_lat + d_lng * d_lng).sqrt()
    }

    #[inline]
    pub fn flat_distance_km(self, other: GeoPoint) -> f64 {
        self.degree_distance(other) * KM_PER_DEGREE
    }

    #[inline]
    pub fn flat_distance_m(self, other: GeoPoint) -> f64 {
        self.degree_distance(other) * METRES_PER_DEGREE
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lng)
    }
}
