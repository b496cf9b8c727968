//! Min-priority queue entries shared by every strategy.

use std::cmp::Ordering;

use rr_core::NodeId;

/// A frontier entry.  `key` orders the queue (g for Dijkstra, g + h for
/// A*); `g` is kept alongside so stale entries can be recognised.
#[derive(Copy, Clone, Debug)]
pub(crate) struct Entry {
    pub key: f64,
    pub g: f64,
    pub node: NodeId,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    /// Reversed so `BinaryHeap` (a max-heap) pops the smallest key first.
    /// `NodeId` breaks ties deterministically.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .key
            .total_cmp(&self.key)
            .then_with(|| other.node.cmp(&self.node))
    }
}
