//! Track lifecycle validation
//!
//! A pure checker, not a driver: status changes are made by external actors
//! (humans or agents) and re-validated here against the recorded facts.
//! Every violation is returned, each tagged with a severity, so callers can
//! report informational findings without halting on them.

use serde::Serialize;

use crate::models::track::{Track, TrackStatus};

/// How seriously a violation should be taken.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// The record is inconsistent; downstream decisions must not trust it.
    Blocking,
    /// Worth surfacing, safe to proceed.
    Info,
}

#[derive(Debug, Clone, Serialize)]
pub struct LifecycleViolation {
    pub check: String,
    pub severity: Severity,
    pub message: String,
}

impl LifecycleViolation {
    fn blocking(check: &str, message: String) -> Self {
        Self {
            check: check.to_string(),
            severity: Severity::Blocking,
            message,
        }
    }

    fn info(check: &str, message: String) -> Self {
        Self {
            check: check.to_string(),
            severity: Severity::Info,
            message,
        }
    }
}

/// Externally supplied facts about a track's planning artifacts.
///
/// The checker never probes the filesystem itself; the store adapter answers
/// `has_artifact` questions and the caller passes the booleans in.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArtifactFacts {
    pub has_spec: bool,
    pub has_plan: bool,
}

/// Validate a track's declared status against its recorded facts.
///
/// Returns every violation found. An empty list means the record is
/// internally consistent; it says nothing about gate readiness.
pub fn validate_track(track: &Track, facts: &ArtifactFacts) -> Vec<LifecycleViolation> {
    let mut violations = Vec::new();

    match track.status {
        TrackStatus::New => {
            if track.started_at.is_some() {
                violations.push(LifecycleViolation::blocking(
                    "started_at",
                    format!(
                        "{}: status is 'new' but started_at is set; work has begun \
                         without a status change",
                        track.id
                    ),
                ));
            }
        }
        TrackStatus::InProgress => {
            if !facts.has_spec {
                violations.push(LifecycleViolation::blocking(
                    "artifacts",
                    format!("{}: status is 'in_progress' but no spec artifact exists", track.id),
                ));
            }
            if !facts.has_plan {
                violations.push(LifecycleViolation::blocking(
                    "artifacts",
                    format!("{}: status is 'in_progress' but no plan artifact exists", track.id),
                ));
            }
        }
        TrackStatus::Completed => {
            if track.completed_at.is_none() {
                violations.push(LifecycleViolation::blocking(
                    "completed_at",
                    format!("{}: status is 'completed' but completed_at is null", track.id),
                ));
            }
            let pending = track.pending_patches().count();
            if pending > 0 {
                violations.push(LifecycleViolation::info(
                    "patches",
                    format!("{}: completed with {pending} pending patch(es)", track.id),
                ));
            }
        }
        TrackStatus::NeedsPatch | TrackStatus::Paused | TrackStatus::Blocked => {}
    }

    if let (Some(started), Some(completed)) = (track.started_at, track.completed_at) {
        if completed < started {
            violations.push(LifecycleViolation::blocking(
                "timestamps",
                format!(
                    "{}: completed_at ({completed}) precedes started_at ({started})",
                    track.id
                ),
            ));
        }
    }

    violations
}

/// Validate a requested status transition for a track.
///
/// Combines transition-table legality with the record checks the target
/// status would have to satisfy.
pub fn validate_transition(track: &Track, to: TrackStatus) -> Vec<LifecycleViolation> {
    let mut violations = Vec::new();

    if !track.status.can_transition_to(to) {
        violations.push(LifecycleViolation::blocking(
            "transition",
            format!(
                "{}: transition {} -> {} is not allowed",
                track.id, track.status, to
            ),
        ));
    }

    violations
}
