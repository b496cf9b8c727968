//! `SpatialTree` — a 2-d tree over latitude/longitude.
//!
//! # Layout
//!
//! Nodes live in one arena `Vec`; children are arena indices.  Depth `d`
//! splits on axis `d % 2` (0 = latitude, 1 = longitude).  For a node with
//! split value `s`:
//!
//! ```text
//! left subtree   axis value <= s
//! right subtree  axis value >= s
//! ```
//!
//! Equal values may sit on either side, so both queries treat the split
//! plane as inclusive when deciding whether a subtree can be skipped.
//!
//! # Balance
//!
//! [`SpatialTree::build`] splits at the median of each axis and produces a
//! tree of depth ⌈log₂(n + 1)⌉.  [`SpatialTree::insert`] descends without
//! rebalancing; after many inserts, rebuild (see
//! [`SpatialIndex::replace`](crate::SpatialIndex::replace)).

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use serde::{Deserialize, Serialize};

use rr_core::{GeoPoint, KM_PER_DEGREE};

use crate::{SpatialError, SpatialResult};

/// A located record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpatialPoint<T> {
    pub position: GeoPoint,
    pub payload: T,
}

impl<T> SpatialPoint<T> {
    pub fn new(position: GeoPoint, payload: T) -> Self {
        Self { position, payload }
    }
}

/// A query hit and its distance from the query center.
#[derive(Debug, Serialize)]
pub struct Neighbor<'a, T> {
    pub point: &'a SpatialPoint<T>,
    pub distance_km: f64,
}

// Manual impls: a derive would require `T: Clone`.
impl<T> Clone for Neighbor<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Neighbor<'_, T> {}

struct KdNode<T> {
    point: SpatialPoint<T>,
    axis:  usize,
    left:  Option<usize>,
    right: Option<usize>,
}

impl<T> KdNode<T> {
    #[inline]
    fn split(&self) -> f64 {
        self.point.position.axis(self.axis)
    }
}

pub struct SpatialTree<T> {
    nodes: Vec<KdNode<T>>,
    root:  Option<usize>,
}

impl<T> SpatialTree<T> {
    pub fn new() -> Self {
        Self { nodes: Vec::new(), root: None }
    }

    /// Build a balanced tree from `points` in O(n log n).
    pub fn build(points: Vec<SpatialPoint<T>>) -> Self {
        let mut tree = Self { nodes: Vec::with_capacity(points.len()), root: None };
        tree.root = tree.build_subtree(points, 0);
        tree
    }

    fn build_subtree(&mut self, mut points: Vec<SpatialPoint<T>>, depth: usize) -> Option<usize> {
        if points.is_empty() {
            return None;
        }
        let axis = depth % 2;
        let mid = points.len() / 2;
        points.select_nth_unstable_by(mid, |a, b| a.position.axis(axis).total_cmp(&b.position.axis(axis)));

        let right = points.split_off(mid + 1);
        let median = points.pop()?;
        let left = points;

        let idx = self.nodes.len();
        self.nodes.push(KdNode { point: median, axis, left: None, right: None });
        let left = self.build_subtree(left, depth + 1);
        let right = self.build_subtree(right, depth + 1);
        self.nodes[idx].left = left;
        self.nodes[idx].right = right;
        Some(idx)
    }

    /// Add one point without rebalancing.
    pub fn insert(&mut self, point: SpatialPoint<T>) {
        let idx = self.nodes.len();
        let Some(mut current) = self.root else {
            self.nodes.push(KdNode { point, axis: 0, left: None, right: None });
            self.root = Some(idx);
            return;
        };

        loop {
            let node = &self.nodes[current];
            let go_left = point.position.axis(node.axis) < node.split();
            let child = if go_left { node.left } else { node.right };
            match child {
                Some(next) => current = next,
                None => {
                    let axis = (node.axis + 1) % 2;
                    self.nodes.push(KdNode { point, axis, left: None, right: None });
                    let parent = &mut self.nodes[current];
                    if go_left {
                        parent.left = Some(idx);
                    } else {
                        parent.right = Some(idx);
                    }
                    return;
                }
            }
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of nodes on the longest root-to-leaf path (0 when empty).
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack: Vec<(usize, usize)> = self.root.map(|r| (r, 1)).into_iter().collect();
        while let Some((idx, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            let node = &self.nodes[idx];
            stack.extend(node.left.map(|c| (c, depth + 1)));
            stack.extend(node.right.map(|c| (c, depth + 1)));
        }
        deepest
    }

    /// Every stored point, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &SpatialPoint<T>> + '_ {
        self.nodes.iter().map(|n| &n.point)
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// The `k` points closest to `center`, nearest first.  Fewer than `k`
    /// are returned only when the tree holds fewer points.
    pub fn nearest(&self, center: GeoPoint, k: usize) -> SpatialResult<Vec<Neighbor<'_, T>>> {
        if k == 0 {
            return Err(SpatialError::InvalidK);
        }
        let mut best: BinaryHeap<Candidate> = BinaryHeap::with_capacity(k + 1);
        // (node, distance from `center` to the plane that separates it)
        let mut stack: Vec<(usize, f64)> = self.root.map(|r| (r, 0.0)).into_iter().collect();
        while let Some((idx, plane_km)) = stack.pop() {
            // The subtree can only help if its plane is closer than the
            // current k-th best.
            if best.len() == k && best.peek().is_some_and(|worst| plane_km > worst.distance_km) {
                continue;
            }
            let node = &self.nodes[idx];
            let distance_km = center.flat_distance_km(node.point.position);
            if best.len() < k {
                best.push(Candidate { distance_km, idx });
            } else if best.peek().is_some_and(|worst| distance_km < worst.distance_km) {
                best.pop();
                best.push(Candidate { distance_km, idx });
            }

            let gap = center.axis(node.axis) - node.split();
            let (near, far) = if gap < 0.0 { (node.left, node.right) } else { (node.right, node.left) };
            // Far side first so the near side pops next.
            stack.extend(far.map(|c| (c, gap.abs() * KM_PER_DEGREE)));
            stack.extend(near.map(|c| (c, plane_km)));
        }
        Ok(self.ranked(best.into_vec()))
    }

    /// Every point within `radius_km` of `center` (inclusive), nearest
    /// first.
    pub fn within_radius(&self, center: GeoPoint, radius_km: f64) -> SpatialResult<Vec<Neighbor<'_, T>>> {
        if !(radius_km.is_finite() && radius_km > 0.0) {
            return Err(SpatialError::InvalidRadius(radius_km));
        }
        let mut hits = Vec::new();
        let mut stack: Vec<usize> = self.root.into_iter().collect();
        while let Some(idx) = stack.pop() {
            let node = &self.nodes[idx];
            let distance_km = center.flat_distance_km(node.point.position);
            if distance_km <= radius_km {
                hits.push(Candidate { distance_km, idx });
            }
            let gap_km = (center.axis(node.axis) - node.split()) * KM_PER_DEGREE;
            if let Some(left) = node.left.filter(|_| gap_km <= radius_km) {
                stack.push(left);
            }
            if let Some(right) = node.right.filter(|_| -gap_km <= radius_km) {
                stack.push(right);
            }
        }
        Ok(self.ranked(hits))
    }

    fn ranked(&self, mut candidates: Vec<Candidate>) -> Vec<Neighbor<'_, T>> {
        candidates.sort_unstable();
        candidates
            .into_iter()
            .map(|c| Neighbor { point: &self.nodes[c.idx].point, distance_km: c.distance_km })
            .collect()
    }
}

impl<T> Default for SpatialTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<SpatialPoint<T>> for SpatialTree<T> {
    fn from_iter<I: IntoIterator<Item = SpatialPoint<T>>>(iter: I) -> Self {
        Self::build(iter.into_iter().collect())
    }
}

impl<T> std::fmt::Debug for SpatialTree<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpatialTree")
            .field("len", &self.len())
            .field("depth", &self.depth())
            .finish()
    }
}

// ── Candidate ordering ────────────────────────────────────────────────────────

/// Max-heap entry: the farthest candidate sits on top so it can be evicted.
#[derive(Clone, Copy, Debug)]
struct Candidate {
    distance_km: f64,
    idx: usize,
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.distance_km
            .total_cmp(&other.distance_km)
            .then_with(|| self.idx.cmp(&other.idx))
    }
}
