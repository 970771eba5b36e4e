//! Full-graph validation: cycles and dangling dependencies

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use std::path::Path;

use crate::graph::{detect_cycles, DependencyGraph};
use crate::store::{DirStore, TrackStore};

#[derive(Serialize)]
struct ValidationReport {
    valid: bool,
    node_count: usize,
    edge_count: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    cycle_nodes: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    missing_dependencies: Vec<String>,
}

pub fn execute(store_dir: &Path) -> Result<i32> {
    let store = DirStore::new(store_dir);
    let tracks = store.list_tracks()?;
    let graph = DependencyGraph::build(&tracks);

    let cycle_nodes = detect_cycles(&graph);
    let missing = graph.missing_dependencies().to_vec();
    let valid = cycle_nodes.is_empty() && missing.is_empty();

    let report = ValidationReport {
        valid,
        node_count: graph.node_count(),
        edge_count: graph.edge_count(),
        cycle_nodes,
        missing_dependencies: missing,
    };
    super::emit(&report)?;

    if valid {
        eprintln!(
            "{} Dependency graph is valid ({} nodes, {} edges)",
            "✓".green().bold(),
            report.node_count,
            report.edge_count
        );
        Ok(0)
    } else {
        if !report.cycle_nodes.is_empty() {
            eprintln!(
                "{} Dependency cycle involving: {}",
                "✗".red().bold(),
                report.cycle_nodes.join(", ")
            );
        }
        if !report.missing_dependencies.is_empty() {
            eprintln!(
                "{} Dangling dependencies: {}",
                "✗".red().bold(),
                report.missing_dependencies.join(", ")
            );
        }
        Ok(1)
    }
}
