//! Wave completion gate
//!
//! A wave may only be declared complete when every track in it clears a
//! fixed battery of checks. All checks run for all tracks even after a
//! failure, so one report gives the whole picture instead of revealing
//! problems one gate attempt at a time.

mod checks;
mod verification;

pub use verification::{parse_timeout, run_verification, VerificationOutcome};

use anyhow::{bail, Context, Result};
use chrono::Utc;
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::info;

use crate::models::track::{OverrideEntry, Track, TrackStatus};
use crate::store::TrackStore;

/// Default wall-clock bound for a verification command.
pub const DEFAULT_VERIFICATION_TIMEOUT: Duration = Duration::from_secs(300);

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CheckStatus {
    Pass,
    Fail,
    /// Worth attention but not gating.
    Warn,
    /// Purely advisory context.
    Info,
}

/// One finding from one check against one track.
#[derive(Debug, Clone, Serialize)]
pub struct CheckResult {
    pub track_id: String,
    pub check: String,
    pub status: CheckStatus,
    pub message: String,
}

impl CheckResult {
    fn with_status(track_id: &str, check: &str, status: CheckStatus, message: String) -> Self {
        Self {
            track_id: track_id.to_string(),
            check: check.to_string(),
            status,
            message,
        }
    }

    pub(crate) fn pass(track_id: &str, check: &str, message: String) -> Self {
        Self::with_status(track_id, check, CheckStatus::Pass, message)
    }

    pub(crate) fn fail(track_id: &str, check: &str, message: String) -> Self {
        Self::with_status(track_id, check, CheckStatus::Fail, message)
    }

    pub(crate) fn warn(track_id: &str, check: &str, message: String) -> Self {
        Self::with_status(track_id, check, CheckStatus::Warn, message)
    }

    pub(crate) fn info(track_id: &str, check: &str, message: String) -> Self {
        Self::with_status(track_id, check, CheckStatus::Info, message)
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct GateSummary {
    pub pass: usize,
    pub fail: usize,
    pub warn: usize,
}

/// Full report for one gate evaluation.
#[derive(Debug, Clone, Serialize)]
pub struct WaveReport {
    pub wave: u32,
    pub passed: bool,
    pub results: Vec<CheckResult>,
    pub summary: GateSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Knobs for one gate evaluation.
#[derive(Debug, Clone)]
pub struct GateConfig {
    skip_verification: bool,
    verification_timeout: Duration,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            skip_verification: false,
            verification_timeout: DEFAULT_VERIFICATION_TIMEOUT,
        }
    }
}

impl GateConfig {
    pub fn skip_verification(mut self, skip: bool) -> Self {
        self.skip_verification = skip;
        self
    }

    pub fn verification_timeout(mut self, timeout: Duration) -> Self {
        self.verification_timeout = timeout;
        self
    }
}

/// Evaluate the completion gate for one wave.
///
/// Runs every check against every track in the wave; the wave passes only
/// when no check fails. An empty wave fails: gating a wave that holds no
/// tracks is almost always a typo'd wave number.
pub fn evaluate_wave(
    store: &dyn TrackStore,
    wave: u32,
    config: &GateConfig,
) -> Result<WaveReport> {
    let tracks = store.list_tracks()?;
    let status_by_id: BTreeMap<&str, TrackStatus> =
        tracks.iter().map(|t| (t.id.as_str(), t.status)).collect();
    let pending = store.pending_discoveries()?;

    let wave_tracks: Vec<&Track> = tracks.iter().filter(|t| t.wave == wave).collect();
    if wave_tracks.is_empty() {
        return Ok(WaveReport {
            wave,
            passed: false,
            results: Vec::new(),
            summary: GateSummary::default(),
            message: Some(format!("No tracks found in wave {wave}")),
        });
    }

    let mut results = Vec::new();
    for track in &wave_tracks {
        let before = results.len();

        results.extend(checks::check_prerequisites(track, &status_by_id));
        results.extend(checks::check_phases(track, store.checklist(&track.id)?));
        results.extend(run_verification_check(track, config));
        results.extend(checks::check_quality(track));
        results.extend(checks::check_discoveries(track, &pending));
        results.extend(checks::check_patches(track, wave));

        let track_failed = results[before..]
            .iter()
            .any(|r| r.status == CheckStatus::Fail);
        if !track_failed {
            results.push(CheckResult::pass(
                &track.id,
                "all",
                "All completion checks passed".to_string(),
            ));
        }
    }

    let summary = GateSummary {
        pass: count(&results, CheckStatus::Pass),
        fail: count(&results, CheckStatus::Fail),
        warn: count(&results, CheckStatus::Warn),
    };
    let passed = summary.fail == 0;

    info!(wave, passed, fail = summary.fail, warn = summary.warn, "Gate evaluated");

    Ok(WaveReport {
        wave,
        passed,
        results,
        summary,
        message: None,
    })
}

fn count(results: &[CheckResult], status: CheckStatus) -> usize {
    results.iter().filter(|r| r.status == status).count()
}

/// Run (or account for skipping) a track's verification command.
fn run_verification_check(track: &Track, config: &GateConfig) -> Option<CheckResult> {
    let Some(command) = track.verification_command.as_deref() else {
        return Some(CheckResult::warn(
            &track.id,
            "tests",
            "No verification command declared".to_string(),
        ));
    };

    if config.skip_verification {
        return Some(CheckResult::warn(
            &track.id,
            "tests",
            "Verification skipped by request".to_string(),
        ));
    }

    let timeout = track
        .verification_timeout_seconds
        .map(Duration::from_secs)
        .unwrap_or(config.verification_timeout);

    match verification::run_verification(command, timeout) {
        VerificationOutcome::Passed => None,
        VerificationOutcome::Failed { exit_code, tail } => Some(CheckResult::fail(
            &track.id,
            "tests",
            match exit_code {
                Some(code) => format!("Verification failed with exit code {code}: {tail}"),
                None => format!("Verification terminated by signal: {tail}"),
            },
        )),
        VerificationOutcome::TimedOut { timeout } => Some(CheckResult::fail(
            &track.id,
            "tests",
            format!("Verification timed out after {}s", timeout.as_secs()),
        )),
        VerificationOutcome::LaunchFailed { reason } => Some(CheckResult::fail(
            &track.id,
            "tests",
            format!("Verification command could not start: {reason}"),
        )),
    }
}

/// Append a manual override to a track's audit trail.
///
/// Overrides never change what the gate reports; they record that a human
/// accepted a specific failure, with a mandatory reason.
pub fn record_override(
    store: &dyn TrackStore,
    track_id: &str,
    check: &str,
    reason: &str,
) -> Result<Track> {
    if reason.trim().is_empty() {
        bail!("An override requires a non-empty reason");
    }

    let mut track = store
        .load_track(track_id)
        .with_context(|| format!("Cannot override checks on '{track_id}'"))?;

    track.override_log.push(OverrideEntry {
        check: check.to_string(),
        reason: reason.trim().to_string(),
        timestamp: Utc::now(),
    });
    store.save_track(&track)?;

    info!(track_id, check, "Recorded gate override");
    Ok(track)
}
