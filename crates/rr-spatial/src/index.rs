//! `SpatialIndex` — a shared, replaceable [`SpatialTree`].
//!
//! A finished tree is read-only, so queries run against an `Arc` snapshot
//! without holding any lock.  New data is indexed by building a fresh tree
//! off to the side and swapping the `Arc`; queries already in flight keep
//! the tree they started with.

use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;

use crate::tree::{SpatialPoint, SpatialTree};

pub struct SpatialIndex<T> {
    current: RwLock<Arc<SpatialTree<T>>>,
}

impl<T> SpatialIndex<T> {
    pub fn new(points: Vec<SpatialPoint<T>>) -> Self {
        Self { current: RwLock::new(Arc::new(SpatialTree::build(points))) }
    }

    /// The tree queries should run against.
    pub fn snapshot(&self) -> Arc<SpatialTree<T>> {
        self.current.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Build a balanced tree over `points` and publish it.
    pub fn replace(&self, points: Vec<SpatialPoint<T>>) {
        let tree = Arc::new(SpatialTree::build(points));
        let (len, depth) = (tree.len(), tree.depth());
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = tree;
        debug!(points = len, depth, "spatial index replaced");
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot().is_empty()
    }
}

impl<T> Default for SpatialIndex<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}
