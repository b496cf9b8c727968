//! Unit tests for rr-spatial.
//!
//! Tree queries are checked against a brute-force scan over seeded random
//! point sets.

#[cfg(test)]
mod helpers {
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    use rr_core::GeoPoint;

    use crate::SpatialPoint;

    /// `n` points in a 0.1° box around Manila, payload = index.
    pub fn random_points(seed: u64, n: usize) -> Vec<SpatialPoint<usize>> {
        let mut rng = SmallRng::seed_from_u64(seed);
        (0..n)
            .map(|i| {
                let p = GeoPoint::new(14.55 + rng.gen_range(0.0..0.1), 120.95 + rng.gen_range(0.0..0.1));
                SpatialPoint::new(p, i)
            })
            .collect()
    }

    /// Distances from `center` to every point, ascending.
    pub fn brute_force(points: &[SpatialPoint<usize>], center: GeoPoint) -> Vec<(f64, usize)> {
        let mut all: Vec<(f64, usize)> = points
            .iter()
            .map(|p| (center.flat_distance_km(p.position), p.payload))
            .collect();
        all.sort_by(|a, b| a.0.total_cmp(&b.0));
        all
    }
}

// ── Build ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod build {
    use rr_core::GeoPoint;

    use crate::{SpatialPoint, SpatialTree};
    use super::helpers::random_points;

    #[test]
    fn empty_tree() {
        let tree: SpatialTree<()> = SpatialTree::build(Vec::new());
        assert!(tree.is_empty());
        assert_eq!(tree.depth(), 0);
        assert!(tree.nearest(GeoPoint::new(0.0, 0.0), 3).unwrap().is_empty());
    }

    #[test]
    fn median_build_is_balanced() {
        let tree = SpatialTree::build(random_points(1, 1_000));
        assert_eq!(tree.len(), 1_000);
        // ⌈log₂(1001)⌉ = 10
        assert_eq!(tree.depth(), 10);
        let mut payloads: Vec<usize> = tree.iter().map(|p| p.payload).collect();
        payloads.sort_unstable();
        assert_eq!(payloads, (0..1_000).collect::<Vec<_>>());
    }

    #[test]
    fn duplicate_coordinates_are_kept() {
        let p = GeoPoint::new(14.6, 121.0);
        let tree: SpatialTree<u8> = (0..5).map(|i| SpatialPoint::new(p, i)).collect();
        let hits = tree.within_radius(p, 0.001).unwrap();
        assert_eq!(hits.len(), 5);
        assert!(hits.iter().all(|n| n.distance_km == 0.0));
    }

    #[test]
    fn sorted_input_inserts_degenerate() {
        let mut tree = SpatialTree::new();
        for i in 0..8 {
            tree.insert(SpatialPoint::new(GeoPoint::new(i as f64 * 0.01, i as f64 * 0.01), i));
        }
        assert_eq!(tree.len(), 8);
        assert_eq!(tree.depth(), 8, "insert does not rebalance");
    }
}

// ── Nearest neighbours ────────────────────────────────────────────────────────

#[cfg(test)]
mod nearest {
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    use rr_core::GeoPoint;

    use crate::{SpatialError, SpatialPoint, SpatialTree};
    use super::helpers::{brute_force, random_points};

    #[test]
    fn exact_coordinates_give_distance_zero() {
        let points = random_points(2, 300);
        let tree = SpatialTree::build(points.clone());
        for p in points.iter().step_by(17) {
            let hit = tree.nearest(p.position, 1).unwrap();
            assert_eq!(hit.len(), 1);
            assert_eq!(hit[0].distance_km, 0.0);
            assert_eq!(hit[0].point.position, p.position);
        }
    }

    #[test]
    fn k_zero_is_an_error() {
        let tree = SpatialTree::build(random_points(3, 10));
        assert_eq!(tree.nearest(GeoPoint::new(14.6, 121.0), 0).unwrap_err(), SpatialError::InvalidK);
    }

    #[test]
    fn k_larger_than_tree_returns_everything() {
        let tree = SpatialTree::build(random_points(4, 7));
        let hits = tree.nearest(GeoPoint::new(14.6, 121.0), 50).unwrap();
        assert_eq!(hits.len(), 7);
    }

    #[test]
    fn matches_brute_force() {
        let mut rng = SmallRng::seed_from_u64(5);
        for seed in 0..5 {
            let points = random_points(seed, 500);
            let tree = SpatialTree::build(points.clone());
            for _ in 0..40 {
                let center = GeoPoint::new(14.5 + rng.gen_range(0.0..0.2), 120.9 + rng.gen_range(0.0..0.2));
                let k = rng.gen_range(1..12);
                let expected = brute_force(&points, center);
                let hits = tree.nearest(center, k).unwrap();
                assert_eq!(hits.len(), k);
                for (hit, (distance, _)) in hits.iter().zip(&expected) {
                    assert!((hit.distance_km - distance).abs() < 1e-12);
                }
                assert!(hits.windows(2).all(|w| w[0].distance_km <= w[1].distance_km));
            }
        }
    }

    #[test]
    fn degenerate_chain_does_not_exhaust_the_stack() {
        const N: usize = 30_000;
        let at = |i: usize| GeoPoint::new(i as f64 * 1e-5, i as f64 * 1e-5);
        let mut tree = SpatialTree::new();
        for i in 0..N {
            tree.insert(SpatialPoint::new(at(i), i));
        }
        assert_eq!(tree.depth(), N);

        let hit = tree.nearest(at(N - 1), 1).unwrap();
        assert_eq!(hit[0].point.payload, N - 1);
        assert_eq!(hit[0].distance_km, 0.0);

        let payloads: Vec<_> = tree.nearest(at(N / 2), 3).unwrap().iter().map(|n| n.point.payload).collect();
        assert_eq!(payloads[0], N / 2);
        let mut rest = payloads[1..].to_vec();
        rest.sort_unstable();
        assert_eq!(rest, [N / 2 - 1, N / 2 + 1]);

        assert_eq!(tree.within_radius(at(0), 0.005).unwrap().len(), 4);
    }

    #[test]
    fn inserted_points_are_found() {
        let mut tree = SpatialTree::build(random_points(6, 100));
        let extra = GeoPoint::new(14.7, 121.2);
        tree.insert(SpatialPoint::new(extra, 999));
        let hit = tree.nearest(GeoPoint::new(14.7001, 121.2), 1).unwrap();
        assert_eq!(hit[0].point.payload, 999);
    }
}

// ── Radius queries ────────────────────────────────────────────────────────────

#[cfg(test)]
mod radius {
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    use rr_core::GeoPoint;

    use crate::{SpatialError, SpatialPoint, SpatialTree};
    use super::helpers::{brute_force, random_points};

    #[test]
    fn no_false_negatives_no_duplicates() {
        let mut rng = SmallRng::seed_from_u64(8);
        for seed in 0..5 {
            let mut points = random_points(seed, 400);
            let mut tree = SpatialTree::build(points.clone());
            // A few unbalanced inserts too.
            for i in 0..40 {
                let p = SpatialPoint::new(
                    GeoPoint::new(14.55 + rng.gen_range(0.0..0.1), 120.95 + rng.gen_range(0.0..0.1)),
                    400 + i,
                );
                tree.insert(p.clone());
                points.push(p);
            }
            for _ in 0..30 {
                let center = GeoPoint::new(14.55 + rng.gen_range(0.0..0.1), 120.95 + rng.gen_range(0.0..0.1));
                let radius_km = rng.gen_range(0.1..3.0);
                let expected: Vec<usize> = brute_force(&points, center)
                    .into_iter()
                    .filter(|(d, _)| *d <= radius_km)
                    .map(|(_, id)| id)
                    .collect();

                let hits = tree.within_radius(center, radius_km).unwrap();
                let mut got: Vec<usize> = hits.iter().map(|n| n.point.payload).collect();
                assert!(hits.windows(2).all(|w| w[0].distance_km <= w[1].distance_km));
                got.sort_unstable();
                let mut want = expected.clone();
                want.sort_unstable();
                assert_eq!(got, want);
            }
        }
    }

    #[test]
    fn invalid_radius() {
        let tree = SpatialTree::build(random_points(9, 5));
        let c = GeoPoint::new(14.6, 121.0);
        assert!(matches!(tree.within_radius(c, 0.0), Err(SpatialError::InvalidRadius(_))));
        assert!(matches!(tree.within_radius(c, -1.0), Err(SpatialError::InvalidRadius(_))));
        assert!(matches!(tree.within_radius(c, f64::NAN), Err(SpatialError::InvalidRadius(_))));
    }

    #[test]
    fn neighbors_serialize() {
        let tree = SpatialTree::build(vec![SpatialPoint::new(GeoPoint::new(1.0, 2.0), "shelter")]);
        let hits = tree.nearest(GeoPoint::new(1.0, 2.0), 1).unwrap();
        let json = serde_json::to_value(&hits).unwrap();
        assert_eq!(json[0]["point"]["payload"], "shelter");
        assert_eq!(json[0]["distance_km"], 0.0);
    }
}

// ── Shared index ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod index {
    use std::thread;

    use rr_core::GeoPoint;

    use crate::SpatialIndex;
    use super::helpers::random_points;

    #[test]
    fn replace_swaps_atomically() {
        let index = SpatialIndex::new(random_points(10, 50));
        let before = index.snapshot();
        index.replace(random_points(11, 80));
        assert_eq!(before.len(), 50, "old snapshot unaffected");
        assert_eq!(index.len(), 80);
    }

    #[test]
    fn concurrent_queries_during_replace() {
        let index = SpatialIndex::new(random_points(12, 200));
        let center = GeoPoint::new(14.6, 121.0);
        thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(|| {
                    for _ in 0..50 {
                        let tree = index.snapshot();
                        let n = tree.len();
                        assert!(n == 200 || n == 300);
                        assert_eq!(tree.nearest(center, 5).unwrap().len(), 5);
                    }
                });
            }
            s.spawn(|| index.replace(random_points(13, 300)));
        });
        assert_eq!(index.len(), 300);
    }
}

// ── Clusters ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod clusters {
    use rr_core::{ClusterConfig, GeoPoint};

    use crate::{Incident, RiskTier, Severity, SpatialError, detect_clusters};

    const NOW: i64 = 1_700_000_000;
    const DAY: i64 = 86_400;

    fn incidents() -> Vec<Incident> {
        let mut out = Vec::new();
        let mut id = 0;
        let mut push = |lat: f64, lng: f64, severity: Severity, age_days: i64| {
            id += 1;
            out.push(Incident::new(id, GeoPoint::new(lat, lng), severity).reported_at(NOW - age_days * DAY));
        };
        // Cell (2920, 24197): 4 incidents, 2 high → score 8.
        push(14.6001, 120.9851, Severity::High, 1);
        push(14.6002, 120.9852, Severity::Critical, 40);
        push(14.6003, 120.9853, Severity::Low, 2);
        push(14.6004, 120.9854, Severity::Medium, 100);
        // Another cell: 6 low incidents → score 6.
        for _ in 0..6 {
            push(14.5101, 121.0201, Severity::Low, 3);
        }
        // Singleton → score 1.
        push(14.7001, 121.1001, Severity::Low, 0);
        out
    }

    #[test]
    fn ranks_by_severity_score() {
        let clusters = detect_clusters(&incidents(), &ClusterConfig::default(), NOW).unwrap();
        assert_eq!(clusters.len(), 3);
        let scores: Vec<u64> = clusters.iter().map(|c| c.severity_score).collect();
        assert_eq!(scores, [8, 6, 1]);

        let top = &clusters[0];
        assert_eq!(top.count, 4);
        assert_eq!(top.high_severity_count, 2);
        assert_eq!(top.recent_count, 2);
        assert_eq!(top.risk, RiskTier::Medium);
        assert_eq!(top.grid_size_deg, 0.005);
        assert!((top.center.lat - 14.6).abs() < 1e-9);
        assert!((top.center.lng - 120.985).abs() < 1e-9);
        assert!((top.radius_m - 0.005 * 111_000.0 * std::f64::consts::SQRT_2 / 2.0).abs() < 1e-9);

        assert_eq!(clusters[2].risk, RiskTier::Low);
    }

    #[test]
    fn top_k_is_monotone() {
        let samples = incidents();
        let mut previous = 0;
        for top_k in 0..6 {
            let config = ClusterConfig { top_k, ..ClusterConfig::default() };
            let n = detect_clusters(&samples, &config, NOW).unwrap().len();
            assert!(n >= previous);
            assert_eq!(n, top_k.min(3));
            previous = n;
        }
    }

    #[test]
    fn min_incidents_filters_sparse_cells() {
        let config = ClusterConfig { min_incidents: 2, ..ClusterConfig::default() };
        let clusters = detect_clusters(&incidents(), &config, NOW).unwrap();
        assert_eq!(clusters.len(), 2);
    }

    #[test]
    fn risk_tiers() {
        assert_eq!(RiskTier::from_score(0), RiskTier::Low);
        assert_eq!(RiskTier::from_score(4), RiskTier::Low);
        assert_eq!(RiskTier::from_score(5), RiskTier::Medium);
        assert_eq!(RiskTier::from_score(10), RiskTier::High);
    }

    #[test]
    fn invalid_grid_size() {
        for grid_size_deg in [0.0, -0.1, f64::INFINITY] {
            let config = ClusterConfig { grid_size_deg, ..ClusterConfig::default() };
            assert!(matches!(
                detect_clusters(&incidents(), &config, NOW),
                Err(SpatialError::InvalidGridSize(_))
            ));
        }
    }

    #[test]
    fn no_samples_no_clusters() {
        let none: Vec<Incident> = Vec::new();
        assert!(detect_clusters(&none, &ClusterConfig::default(), NOW).unwrap().is_empty());
    }

    #[test]
    fn cluster_json_shape() {
        let clusters = detect_clusters(&incidents(), &ClusterConfig::default(), NOW).unwrap();
        let json = serde_json::to_value(&clusters[0]).unwrap();
        assert_eq!(json["risk"], "medium");
        assert_eq!(json["severity_score"], 8);
    }
}
