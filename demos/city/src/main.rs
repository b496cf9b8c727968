//! city — end-to-end tour of the rust_route engine on a small Manila network.
//!
//! Usage: `city [engine-config.json]`
//!
//! Routes Binondo → Santa Mesa with every algorithm, shows the cache at
//! work, snaps raw coordinates to the network, re-seeds the graph with a
//! synthetic grid city, and finishes with nearest-incident and blackspot
//! queries.  Set `RUST_LOG=debug` to see per-search and cache logging.

mod network;

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use rr_core::{ClusterConfig, EngineConfig, GeoPoint, NodeId};
use rr_graph::{GridCitySpec, grid_city};
use rr_router::{RouteOutcome, RoutingEngineBuilder};
use rr_search::Algorithm;
use rr_spatial::{Incident, Severity, SpatialIndex, SpatialPoint, detect_clusters};

use network::load_network;

// ── Constants ─────────────────────────────────────────────────────────────────

const BINONDO:    NodeId = NodeId(3);
const SANTA_MESA: NodeId = NodeId(7);
const SEED:       u64    = 42;
const NOW:        i64    = 1_700_000_000; // fixed reference time for "recent"

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("=== city — rust_route engine tour ===");
    println!();

    // 1. Configuration.
    let config = match std::env::args().nth(1) {
        Some(path) => load_config(Path::new(&path))?,
        None => EngineConfig::default(),
    };

    // 2. Network + engine.
    let (nodes, edges) = load_network().context("loading embedded network")?;
    let engine = RoutingEngineBuilder::new(config).graph(nodes, edges).build()?;
    let stats = engine.stats();
    println!(
        "Road network: {} nodes, {} edges, avg out-degree {:.2}",
        stats.graph.nodes, stats.graph.edges, stats.graph.avg_out_degree
    );
    println!();

    // 3. Every algorithm, Binondo → Santa Mesa.
    println!("{:<24} {:>10} {:>8} {:>6} {:>6}  path", "algorithm", "cost", "time s", "iters", "steps");
    for outcome in engine.compare_algorithms(BINONDO, SANTA_MESA) {
        print_row(&outcome);
    }
    println!();

    // 4. Cache hit on the second lookup.
    let t0 = Instant::now();
    let again = engine.find_route(BINONDO, SANTA_MESA, "astar")?;
    println!("Second A* lookup: cached = {} ({:?})", again.cached, t0.elapsed());
    let cache = engine.stats().cache;
    println!("Cache: {}/{} entries, hit rate {:.0}%", cache.size, cache.capacity, cache.hit_rate * 100.0);
    println!();

    // 5. Frontend payload, trimmed to the first few trace steps.
    let mut payload = again.to_json_value()?;
    if let Some(trace) = payload.get_mut("exploration").and_then(|v| v.as_array_mut()) {
        trace.truncate(3);
    }
    println!("A* response (trace truncated to 3 steps):");
    println!("{}", serde_json::to_string_pretty(&payload)?);
    println!();

    // 6. Failure outcomes are data, not errors.
    let missing = engine.find_route(BINONDO, NodeId(404), "dijkstra")?;
    println!("Route to unknown node: success = {}, error = {:?}", missing.result.success, missing.result.error_message());
    if let Err(e) = engine.find_route(BINONDO, SANTA_MESA, "teleport") {
        println!("Unknown algorithm rejected: {e}");
    }
    println!();

    // 7. Snap raw coordinates.
    let snapped = engine.route_between_points(
        GeoPoint::new(14.6011, 120.9752),
        GeoPoint::new(14.5731, 120.9893),
        Algorithm::BidirectionalAStar,
    );
    print_row(&snapped);
    println!();

    // 8. Re-seed with a synthetic grid city; the cache is cleared.
    let spec = GridCitySpec { rows: 30, cols: 30, blocked_ratio: 0.05, ..GridCitySpec::default() };
    let (grid_nodes, grid_edges) = grid_city(&spec, SEED);
    let grid_stats = engine.rebuild_graph(grid_nodes, grid_edges)?;
    info!(nodes = grid_stats.nodes, edges = grid_stats.edges, "re-seeded");
    println!("{:<24} {:>10} {:>8} {:>6} {:>6}  path", "algorithm (30×30 grid)", "cost", "time s", "iters", "steps");
    for outcome in engine.compare_algorithms(spec.node_id(0, 0), spec.node_id(29, 29)) {
        print_row(&outcome);
    }
    println!();

    // 9. Incidents: nearest, radius, blackspots.
    let incidents = synthetic_incidents();
    let index = SpatialIndex::new(
        incidents
            .iter()
            .map(|i| SpatialPoint::new(i.position, i.id))
            .collect(),
    );
    let here = GeoPoint::new(14.5995, 120.9842);
    let tree = index.snapshot();
    let nearest = tree.nearest(here, 3)?;
    println!("Nearest incidents to Quiapo:");
    for n in &nearest {
        println!("  #{:<4} {:.3} km", n.point.payload, n.distance_km);
    }
    let within = tree.within_radius(here, 1.0)?;
    println!("Incidents within 1 km: {}", within.len());
    println!();

    let clusters = detect_clusters(&incidents, &ClusterConfig::default(), NOW)?;
    println!("Blackspots:");
    println!("{}", serde_json::to_string_pretty(&clusters)?);

    Ok(())
}

fn load_config(path: &Path) -> Result<EngineConfig> {
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let config: EngineConfig = serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
    info!(path = %path.display(), "loaded engine config");
    Ok(config)
}

fn print_row(outcome: &RouteOutcome) {
    let r = &outcome.result;
    let path = if r.success {
        r.path_details.iter().map(|d| d.name.as_str()).collect::<Vec<_>>().join(" → ")
    } else {
        r.error_message().unwrap_or_default()
    };
    println!(
        "{:<24} {:>10.1} {:>8.0} {:>6} {:>6}  {}{}",
        r.algorithm.as_str(),
        r.total_distance,
        r.total_time,
        r.iterations,
        r.exploration.len(),
        path,
        if outcome.cached { "  (cached)" } else { "" },
    );
}

/// A deterministic scatter of incidents: two dense pockets and some noise.
fn synthetic_incidents() -> Vec<Incident> {
    let pockets = [
        (GeoPoint::new(14.6000, 120.9840), 9),
        (GeoPoint::new(14.5800, 121.0000), 5),
    ];
    let mut out = Vec::new();
    let mut id = 0u64;
    for (center, count) in pockets {
        for k in 0..count {
            id += 1;
            let jitter = k as f64 * 0.0002;
            let severity = match k % 4 {
                0 => Severity::Critical,
                1 => Severity::High,
                2 => Severity::Medium,
                _ => Severity::Low,
            };
            out.push(
                Incident::new(id, GeoPoint::new(center.lat + jitter, center.lng - jitter), severity)
                    .reported_at(NOW - (k as i64) * 7 * 86_400),
            );
        }
    }
    for k in 0..6 {
        id += 1;
        let p = GeoPoint::new(14.55 + k as f64 * 0.013, 120.96 + k as f64 * 0.011);
        out.push(Incident::new(id, p, Severity::Low));
    }
    out
}
