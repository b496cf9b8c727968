//! Engine configuration.
//!
//! Plain structs with `Default` impls.  Applications typically load an
//! [`EngineConfig`] from a JSON file (with the `serde` feature every field
//! is optional and falls back to its default) and hand it to the routing
//! engine builder, which calls [`EngineConfig::validate`].

use crate::{CoreError, CoreResult};

// ── Search ────────────────────────────────────────────────────────────────────

/// Iteration caps for path searches.
///
/// An iteration is one node settled by a frontier.  The caps guard against
/// runaway searches on huge or disconnected graphs; they are not a
/// correctness bound.  Bidirectional searches get a larger cap because two
/// frontiers share it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SearchBudget {
    pub unidirectional: usize,
    pub bidirectional: usize,
}

impl SearchBudget {
    /// A budget large enough to never trigger on any realistic graph.
    pub const UNLIMITED: SearchBudget = SearchBudget {
        unidirectional: usize::MAX,
        bidirectional: usize::MAX,
    };
}

impl Default for SearchBudget {
    fn default() -> Self {
        Self { unidirectional: 1_000, bidirectional: 2_000 }
    }
}

/// When a bidirectional search stops looking for a cheaper meeting point.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum BidirectionalStop {
    /// Meetings are only recognised on nodes settled by both frontiers, and
    /// the search stops once both frontier keys reach half the best meeting
    /// cost.  Fast, but can return a costlier path than Dijkstra.
    #[default]
    HalfBest,
    /// Meetings are also recognised on every scanned edge, and the search
    /// stops once the two frontier keys together reach the best meeting
    /// cost.  Always matches Dijkstra.
    Exact,
}

/// Per-search behaviour shared by every algorithm.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SearchConfig {
    pub budget: SearchBudget,

    /// Record a RELAX step for every improved tentative distance.  Turn off
    /// on large graphs to keep traces small.
    pub record_relaxations: bool,

    /// Upper bound on recorded exploration steps.  START and FINALIZE are
    /// recorded even past the limit.
    pub trace_limit: usize,

    /// Refuse to route through unavailable nodes (blocked, or congestion at
    /// or above the availability threshold).  Endpoints are always allowed.
    pub skip_unavailable: bool,

    pub bidirectional_stop: BidirectionalStop,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            budget:             SearchBudget::default(),
            record_relaxations: true,
            trace_limit:        50_000,
            skip_unavailable:   true,
            bidirectional_stop: BidirectionalStop::HalfBest,
        }
    }
}

impl SearchConfig {
    pub fn validate(&self) -> CoreResult<()> {
        if self.budget.unidirectional == 0 || self.budget.bidirectional == 0 {
            return Err(CoreError::Config("search budget must be at least 1 iteration".into()));
        }
        Ok(())
    }
}

// ── Cache ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CacheConfig {
    /// Maximum number of cached routes before LRU eviction.
    pub capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { capacity: 256 }
    }
}

impl CacheConfig {
    pub fn validate(&self) -> CoreResult<()> {
        if self.capacity == 0 {
            return Err(CoreError::Config("cache capacity must be non-zero".into()));
        }
        Ok(())
    }
}

// ── Clusters ──────────────────────────────────────────────────────────────────

/// Parameters for grid-hash cluster detection.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ClusterConfig {
    /// Cell edge length in degrees.  0.005° ≈ 555 m.
    pub grid_size_deg: f64,
    /// Number of cells returned, highest severity first.
    pub top_k: usize,
    /// Trailing window for the "recent" counter.
    pub recent_window_secs: i64,
    /// Cells with fewer samples are dropped before ranking.
    pub min_incidents: usize,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            grid_size_deg:      0.005,
            top_k:              10,
            recent_window_secs: 30 * 86_400,
            min_incidents:      1,
        }
    }
}

// ── Engine ────────────────────────────────────────────────────────────────────

/// Top-level configuration for the routing engine.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    pub search: SearchConfig,
    pub cache: CacheConfig,
}

impl EngineConfig {
    pub fn validate(&self) -> CoreResult<()> {
        self.search.validate()?;
        self.cache.validate()
    }
}
