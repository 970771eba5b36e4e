//! Weighted progress report

use anyhow::Result;
use colored::Colorize;
use std::path::Path;

use crate::progress::{ProgressAggregator, WeightTable};
use crate::store::DirStore;

pub fn execute(store_dir: &Path) -> Result<i32> {
    let store = DirStore::new(store_dir);
    let aggregator = ProgressAggregator::new(WeightTable::default());
    let report = aggregator.report(&store)?;
    super::emit(&report)?;

    eprintln!(
        "{} Overall progress {:.1}% across {} track(s) in {} wave(s)",
        "→".cyan().bold(),
        report.overall_progress * 100.0,
        report.total_tracks,
        report.waves.len()
    );
    Ok(0)
}
