//! What-if check for a single new dependency edge

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use std::path::Path;

use crate::graph::{edge_would_cycle, DependencyGraph};
use crate::store::{DirStore, TrackStore};

#[derive(Serialize)]
struct EdgeReport<'a> {
    cycle: bool,
    source: &'a str,
    target: &'a str,
}

pub fn execute(store_dir: &Path, source: &str, target: &str) -> Result<i32> {
    let store = DirStore::new(store_dir);
    let tracks = store.list_tracks()?;
    let graph = DependencyGraph::build(&tracks);

    let cycle = edge_would_cycle(&graph, source, target);
    super::emit(&EdgeReport { cycle, source, target })?;

    if cycle {
        eprintln!(
            "{} Adding '{source} depends on {target}' would create a cycle",
            "✗".red().bold()
        );
        Ok(1)
    } else {
        eprintln!("{} Edge '{source} -> {target}' is safe to add", "✓".green().bold());
        Ok(0)
    }
}
