//! Record a manual gate override in a track's audit trail

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use std::path::Path;

use crate::gate::record_override;
use crate::models::track::OverrideEntry;
use crate::store::DirStore;

#[derive(Serialize)]
struct OverrideReport<'a> {
    track_id: &'a str,
    recorded: &'a OverrideEntry,
    override_count: usize,
}

pub fn execute(store_dir: &Path, track_id: &str, check: &str, reason: &str) -> Result<i32> {
    let store = DirStore::new(store_dir);
    let track = record_override(&store, track_id, check, reason)?;

    // record_override just appended, so the log is non-empty.
    let recorded = track
        .override_log
        .last()
        .ok_or_else(|| anyhow::anyhow!("Override log unexpectedly empty after append"))?;

    super::emit(&OverrideReport {
        track_id,
        recorded,
        override_count: track.override_log.len(),
    })?;

    eprintln!(
        "{} Override of check '{check}' recorded on {track_id} (audit trail only; the \
         check outcome is unchanged)",
        "⚠".yellow().bold()
    );
    Ok(0)
}
