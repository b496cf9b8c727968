//! Grid-hash cluster detection ("blackspots").
//!
//! # Algorithm
//!
//! ```text
//! cell(p)  = (round(p.lat / g), round(p.lng / g))
//! per cell:  count, high-severity count, recent count
//! score    = count + 2 × high
//! output   = cells with count >= min_incidents,
//!            sorted by (score desc, count desc, cell asc), first top_k
//! ```
//!
//! A cell's center is `cell × g` on each axis and its reported radius is the
//! half-diagonal of a `g × g` square in metres.  "Recent" means reported no
//! more than `recent_window_secs` before `now`.
//!
//! Every call is independent: no state survives between calls.

use std::f64::consts::SQRT_2;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use rr_core::{ClusterConfig, GeoPoint, METRES_PER_DEGREE};

use crate::{SpatialError, SpatialResult};

/// A located event the cluster detector can bucket.
pub trait ClusterSample {
    fn location(&self) -> GeoPoint;

    fn is_high_severity(&self) -> bool;

    /// Report time in Unix seconds, if known.  Samples without one never
    /// count as recent.
    fn reported_at_unix_secs(&self) -> Option<i64>;
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    #[inline]
    pub fn is_high(self) -> bool {
        self >= Severity::High
    }
}

/// A reported incident, the usual cluster input.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Incident {
    pub id: u64,
    pub position: GeoPoint,
    pub severity: Severity,
    pub reported_at: Option<i64>,
}

impl Incident {
    pub fn new(id: u64, position: GeoPoint, severity: Severity) -> Self {
        Self { id, position, severity, reported_at: None }
    }

    pub fn reported_at(mut self, unix_secs: i64) -> Self {
        self.reported_at = Some(unix_secs);
        self
    }
}

impl ClusterSample for Incident {
    fn location(&self) -> GeoPoint {
        self.position
    }

    fn is_high_severity(&self) -> bool {
        self.severity.is_high()
    }

    fn reported_at_unix_secs(&self) -> Option<i64> {
        self.reported_at
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    pub fn from_score(score: u64) -> Self {
        match score {
            10.. => RiskTier::High,
            5.. => RiskTier::Medium,
            _ => RiskTier::Low,
        }
    }
}

/// One dense grid cell.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Cluster {
    pub center: GeoPoint,
    pub count: u64,
    pub high_severity_count: u64,
    pub recent_count: u64,
    pub severity_score: u64,
    pub risk: RiskTier,
    pub grid_size_deg: f64,
    pub radius_m: f64,
}

type CellKey = (i64, i64);

#[derive(Clone, Copy, Default)]
struct CellTally {
    count: u64,
    high: u64,
    recent: u64,
}

#[cfg(feature = "parallel")]
impl CellTally {
    fn merge(&mut self, other: CellTally) {
        self.count += other.count;
        self.high += other.high;
        self.recent += other.recent;
    }
}

/// Rank the densest grid cells of `samples`.
pub fn detect_clusters<S>(samples: &[S], config: &ClusterConfig, now_unix_secs: i64) -> SpatialResult<Vec<Cluster>>
where
    S: ClusterSample + Sync,
{
    let grid = config.grid_size_deg;
    if !(grid.is_finite() && grid > 0.0) {
        return Err(SpatialError::InvalidGridSize(grid));
    }

    let cells = tally(samples, grid, now_unix_secs.saturating_sub(config.recent_window_secs));
    let radius_m = grid * METRES_PER_DEGREE * SQRT_2 / 2.0;

    let mut ranked: Vec<(CellKey, CellTally)> = cells
        .into_iter()
        .filter(|(_, t)| t.count >= config.min_incidents as u64)
        .collect();
    ranked.sort_unstable_by(|(ka, a), (kb, b)| {
        score(b)
            .cmp(&score(a))
            .then_with(|| b.count.cmp(&a.count))
            .then_with(|| ka.cmp(kb))
    });
    ranked.truncate(config.top_k);

    debug!(samples = samples.len(), clusters = ranked.len(), grid, "clusters detected");

    Ok(ranked
        .into_iter()
        .map(|((row, col), t)| {
            let severity_score = score(&t);
            Cluster {
                center: GeoPoint::new(row as f64 * grid, col as f64 * grid),
                count: t.count,
                high_severity_count: t.high,
                recent_count: t.recent,
                severity_score,
                risk: RiskTier::from_score(severity_score),
                grid_size_deg: grid,
                radius_m,
            }
        })
        .collect())
}

#[inline]
fn score(t: &CellTally) -> u64 {
    t.count + 2 * t.high
}

#[inline]
fn cell_of(p: GeoPoint, grid: f64) -> CellKey {
    ((p.lat / grid).round() as i64, (p.lng / grid).round() as i64)
}

fn add_sample<S: ClusterSample>(cells: &mut FxHashMap<CellKey, CellTally>, s: &S, grid: f64, recent_since: i64) {
    let tally = cells.entry(cell_of(s.location(), grid)).or_default();
    tally.count += 1;
    if s.is_high_severity() {
        tally.high += 1;
    }
    if s.reported_at_unix_secs().is_some_and(|t| t >= recent_since) {
        tally.recent += 1;
    }
}

#[cfg(not(feature = "parallel"))]
fn tally<S: ClusterSample + Sync>(samples: &[S], grid: f64, recent_since: i64) -> FxHashMap<CellKey, CellTally> {
    let mut cells = FxHashMap::default();
    for s in samples {
        add_sample(&mut cells, s, grid, recent_since);
    }
    cells
}

#[cfg(feature = "parallel")]
fn tally<S: ClusterSample + Sync>(samples: &[S], grid: f64, recent_since: i64) -> FxHashMap<CellKey, CellTally> {
    use rayon::prelude::*;

    samples
        .par_iter()
        .fold(FxHashMap::default, |mut cells, s| {
            add_sample(&mut cells, s, grid, recent_since);
            cells
        })
        .reduce(FxHashMap::default, |mut into, from| {
            for (key, t) in from {
                into.entry(key).or_default().merge(t);
            }
            into
        })
}
