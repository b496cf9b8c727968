//! Strongly typed road-node identifier.
//!
//! Node ids come from the persistence layer, so unlike an arena index they
//! are sparse and never used to index a `Vec` directly.  The wrapper is
//! `Copy + Ord + Hash` so it works as a map key and sorts deterministically.

use std::fmt;
use std::str::FromStr;

/// Identity of a road-network node as assigned by the data source.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct NodeId(pub u64);

impl NodeId {
    /// Sentinel meaning "no node" — equivalent to `u64::MAX`.
    pub const INVALID: NodeId = NodeId(u64::MAX);

    #[inline(always)]
    pub fn get(self) -> u64 {
        self.0
    }

    #[inline(always)]
    pub fn is_valid(self) -> bool {
        self != Self::INVALID
    }
}

impl Default for NodeId {
    /// Returns the `INVALID` sentinel so uninitialized ids are visibly invalid.
    #[inline(always)]
    fn default() -> Self {
        Self::INVALID
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u64> for NodeId {
    #[inline(always)]
    fn from(raw: u64) -> Self {
        NodeId(raw)
    }
}

impl FromStr for NodeId {
    type Err = std::num::ParseIntError;

    /// Accepts both `"42"` and the display form `"#42"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        s.strip_prefix('#').unwrap_or(s).parse::<u64>().map(NodeId)
    }
}
