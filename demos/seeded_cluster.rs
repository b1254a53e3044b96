//! Seeded local clustering example
//!
//! Finds the community around a seed in a small social graph: two friend
//! groups joined by a single acquaintance edge.
//!
//! Run with: cargo run --example seeded_cluster
//! Set `RUST_LOG=seedclust=debug` to see push and sweep statistics.

use anyhow::Result;
use seedclust::{
    approximate_pagerank, conductance, seeded_cluster, sweep_cut, CsrGraph, NodeId, PushConfig,
    PushMode, SweepOrder,
};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("🦀 seedclust: local clustering around a seed\n");

    // 1. Build the graph
    println!("📊 Building friendship graph...");
    let names = [
        "alice", "bob", "carol", "dave", "erin", // group A
        "frank", "grace", "heidi", "ivan", "judy", // group B
    ];
    let mut edges = Vec::new();
    for block in [0, 5] {
        for i in block..block + 5 {
            for j in (i + 1)..block + 5 {
                edges.push((NodeId(i), NodeId(j), 1.0));
            }
        }
    }
    edges.push((NodeId(4), NodeId(5), 0.5)); // erin knows frank
    let graph: CsrGraph = CsrGraph::from_undirected_edges(&edges)?;

    println!(
        "  ✅ Graph built: {} nodes, {} arcs, volume {:.1}\n",
        graph.num_nodes(),
        graph.num_arcs(),
        graph.total_volume()
    );

    // 2. Push PageRank from carol
    let seed = NodeId(2);
    println!("🎯 Push PageRank from {}...", names[seed.0]);
    let config = PushConfig::default().with_eps(1e-5);
    let scores = approximate_pagerank(&graph, &[seed], &config)?;

    println!(
        "  {} pushes, converged: {}, residual mass {:.2e}",
        scores.steps, scores.converged, scores.residual_mass
    );
    for (node, score) in scores.vector.iter().take(6) {
        println!("    {:<6} {:.5}", names[node.0], score);
    }
    println!();

    // 3. Sweep the ranking
    println!("🧹 Sweep cut over the ranking...");
    let best = sweep_cut(&graph, SweepOrder::from(&scores.vector), None)?;
    for (i, phi) in best.profile.iter().enumerate() {
        let marker = if i + 1 == best.len() { " ←" } else { "" };
        println!("    prefix {:>2}: φ = {:.4}{}", i + 1, phi, marker);
    }
    println!();

    // 4. One-shot pipeline, degree-normalized ranking
    println!("🔗 seeded_cluster with degree-normalized scores...");
    let normalized = config.with_mode(PushMode::DegreeNormalized);
    let cluster = seeded_cluster(&graph, &[seed], &normalized)?;
    let members: Vec<&str> = cluster.members.iter().map(|id| names[id.0]).collect();
    println!("  Members: {}", members.join(", "));
    println!(
        "  Conductance: {:.4} (cut {:.1}, volume {:.1})",
        cluster.conductance, cluster.cut, cluster.volume
    );

    let check = conductance(&graph, &cluster.members, None)?;
    println!("  Recomputed: {check:.4}\n");

    println!("✨ Done");

    Ok(())
}
