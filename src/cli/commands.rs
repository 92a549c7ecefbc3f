//! CLI command implementations.

use std::path::Path;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::cache::AttributeCaches;
use crate::engine::{TrueBCounter, NO_ROOT};
use crate::facade::CacheConfig;
use crate::format::{TreeReader, TreeWriter};
use crate::graph::{populate, AttributeStore, TraversalOrder, TreeGraph, TreeShape};
use crate::types::{LabelKind, RelationType, TrvResult};

/// Generate a tree into a .ttree file, creating the file if needed.
pub fn cmd_populate(
    path: &Path,
    shape: TreeShape,
    seed: Option<u64>,
    json: bool,
) -> TrvResult<()> {
    let mut graph = if path.exists() {
        TreeReader::read_from_file(path)?
    } else {
        TreeGraph::new()
    };
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let report = populate(&mut graph, shape, &mut rng)?;
    TreeWriter::new().write_to_file(&graph, path)?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).unwrap_or_default()
        );
    } else {
        println!("{}", report.total_nodes);
        println!(
            "Populated {} (depth {}, fanout {}): {} true B nodes",
            path.display(),
            report.shape.depth,
            report.shape.fanout,
            report.true_b_nodes
        );
    }
    Ok(())
}

/// Count the true-valued B nodes, optionally several times to show the cache effect.
pub fn cmd_traverse(
    path: &Path,
    depth_first: bool,
    cache: Option<&str>,
    repeat: usize,
    clear_between: bool,
    json: bool,
) -> TrvResult<()> {
    let graph = TreeReader::read_from_file(path)?;
    let caches = AttributeCaches::new();
    let config = CacheConfig::parse(cache);
    let counter = TrueBCounter::new(&graph, caches.facade(config));
    let order = TraversalOrder::from_depth_first(depth_first);

    let mut runs = Vec::new();
    for run in 1..=repeat.max(1) {
        if clear_between && run > 1 {
            caches.clear();
        }
        let outcome = counter.run(order)?;
        let count = outcome.map(|o| o.count()).unwrap_or(NO_ROOT);
        let elapsed_ms = outcome
            .map(|o| o.elapsed_micros as f64 / 1000.0)
            .unwrap_or(0.0);

        if json {
            runs.push(serde_json::json!({
                "run": run,
                "count": count,
                "visited": outcome.map(|o| o.stats.visited),
                "max_frontier": outcome.map(|o| o.stats.max_frontier),
                "elapsed_ms": elapsed_ms,
            }));
        } else if repeat > 1 {
            println!("Run {}: {} ({:.3} ms)", run, count, elapsed_ms);
        } else {
            println!("{}", count);
        }
    }

    if json {
        let result = serde_json::json!({
            "file": path.display().to_string(),
            "order": order.name(),
            "cache": config.to_string(),
            "runs": runs,
            "cache_report": config.any().then(|| caches.report()),
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&result).unwrap_or_default()
        );
    } else if config.any() {
        println!("{}", caches.report());
    }
    Ok(())
}

/// Display information about a .ttree file.
pub fn cmd_info(path: &Path, json: bool) -> TrvResult<()> {
    let graph = TreeReader::read_from_file(path)?;
    let file_size = std::fs::metadata(path)?.len();
    let labels = graph.label_index();
    let roots = graph.find_root_nodes();
    let count_relation = |relation: RelationType| {
        graph
            .edges()
            .iter()
            .filter(|e| e.relation == relation)
            .count()
    };

    if json {
        let info = serde_json::json!({
            "file": path.display().to_string(),
            "version": 1,
            "nodes": graph.node_count(),
            "edges": graph.edge_count(),
            "file_size": file_size,
            "roots": roots,
            "labels": {
                "Root": labels.count(LabelKind::Root.name()),
                "A": labels.count(LabelKind::A.name()),
                "B": labels.count(LabelKind::B.name()),
            },
            "relations": {
                "HAS_A": count_relation(RelationType::HasA),
                "HAS_B": count_relation(RelationType::HasB),
            }
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&info).unwrap_or_default()
        );
    } else {
        println!("File: {}", path.display());
        println!("Version: 1");
        println!("Nodes: {}", graph.node_count());
        println!("Edges: {}", graph.edge_count());
        println!("File size: {}", format_size(file_size));
        println!("Roots: {:?}", roots);
        println!("Labels:");
        for kind in LabelKind::ALL {
            println!("  {}: {}", kind, labels.count(kind.name()));
        }
        println!("Relations:");
        println!("  HAS_A: {}", count_relation(RelationType::HasA));
        println!("  HAS_B: {}", count_relation(RelationType::HasB));
    }
    Ok(())
}

fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else if bytes < 1024 * 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else {
        format!("{:.2} GB", bytes as f64 / (1024.0 * 1024.0 * 1024.0))
    }
}
