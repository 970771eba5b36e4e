//! Wave computation and verification of authored wave numbers

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use std::path::Path;

use crate::graph::{assign_waves, verify_waves, DependencyGraph, WaveAssignment, WaveViolation};
use crate::store::{DirStore, TrackStore};

#[derive(Serialize)]
struct VerifyReport {
    valid: bool,
    violations: Vec<WaveViolation>,
}

#[derive(Serialize)]
struct WavesReport {
    waves: Vec<WaveAssignment>,
    total_tracks: usize,
    total_waves: usize,
}

pub fn execute(store_dir: &Path, verify: bool) -> Result<i32> {
    let store = DirStore::new(store_dir);
    let tracks = store.list_tracks()?;

    if verify {
        let violations = verify_waves(&tracks);
        let valid = violations.is_empty();
        super::emit(&VerifyReport {
            valid,
            violations: violations.clone(),
        })?;

        if valid {
            eprintln!("{} Authored wave numbers respect the dependency graph", "✓".green().bold());
            return Ok(0);
        }
        for v in &violations {
            eprintln!("{} {}", "✗".red().bold(), v.message);
        }
        return Ok(1);
    }

    let graph = DependencyGraph::build(&tracks);
    let waves = assign_waves(&graph)?;
    let report = WavesReport {
        total_tracks: graph.node_count(),
        total_waves: waves.len(),
        waves,
    };
    super::emit(&report)?;

    eprintln!(
        "{} {} tracks scheduled across {} waves",
        "✓".green().bold(),
        report.total_tracks,
        report.total_waves
    );
    Ok(0)
}
