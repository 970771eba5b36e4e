//! Lifecycle consistency checks for one track or the whole store

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use std::path::Path;

use crate::lifecycle::{validate_track, validate_transition, ArtifactFacts, Severity};
use crate::models::track::{Track, TrackStatus};
use crate::store::{ArtifactKind, DirStore, TrackStore};

#[derive(Serialize)]
struct TrackFinding {
    track_id: String,
    check: String,
    severity: Severity,
    message: String,
}

#[derive(Serialize)]
struct LifecycleReport {
    valid: bool,
    violations: Vec<TrackFinding>,
}

pub fn execute(
    store_dir: &Path,
    track_id: Option<&str>,
    transition_to: Option<TrackStatus>,
) -> Result<i32> {
    let store = DirStore::new(store_dir);

    let tracks: Vec<Track> = match track_id {
        Some(id) => vec![store.load_track(id)?],
        None => store.list_tracks()?,
    };

    let mut violations = Vec::new();
    for track in &tracks {
        let facts = ArtifactFacts {
            has_spec: store.has_artifact(&track.id, ArtifactKind::Spec),
            has_plan: store.has_artifact(&track.id, ArtifactKind::Plan),
        };

        let mut found = validate_track(track, &facts);
        if let Some(to) = transition_to {
            found.extend(validate_transition(track, to));
        }

        violations.extend(found.into_iter().map(|v| TrackFinding {
            track_id: track.id.clone(),
            check: v.check,
            severity: v.severity,
            message: v.message,
        }));
    }

    let blocking = violations
        .iter()
        .filter(|v| v.severity == Severity::Blocking)
        .count();
    let valid = blocking == 0;

    super::emit(&LifecycleReport { valid, violations })?;

    if valid {
        eprintln!(
            "{} {} track record(s) are lifecycle-consistent",
            "✓".green().bold(),
            tracks.len()
        );
        Ok(0)
    } else {
        eprintln!("{} {blocking} blocking lifecycle violation(s)", "✗".red().bold());
        Ok(1)
    }
}
