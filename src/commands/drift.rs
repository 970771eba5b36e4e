//! Drift report between the component inventory and track claims

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use std::path::Path;

use crate::drift::{detect_drift, DriftFinding};
use crate::store::{DirStore, TrackStore};

#[derive(Serialize)]
struct DriftReport {
    in_sync: bool,
    findings: Vec<DriftFinding>,
}

pub fn execute(store_dir: &Path) -> Result<i32> {
    let store = DirStore::new(store_dir);
    let tracks = store.list_tracks()?;
    let components = store.components()?;

    let findings = detect_drift(&components, &tracks);
    super::emit(&DriftReport {
        in_sync: findings.is_empty(),
        findings: findings.clone(),
    })?;

    if findings.is_empty() {
        eprintln!(
            "{} No drift between {} component(s) and {} track(s)",
            "✓".green().bold(),
            components.len(),
            tracks.len()
        );
        Ok(0)
    } else {
        eprintln!("{} {} drift finding(s)", "⚠".yellow().bold(), findings.len());
        Ok(1)
    }
}
