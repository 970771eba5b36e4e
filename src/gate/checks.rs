//! Individual wave-gate checks
//!
//! Each check inspects one aspect of a track and reports a finding when
//! something is off, or nothing when the track is clean on that axis. The
//! gate runs every check for every track regardless of earlier failures.

use std::collections::BTreeMap;

use super::CheckResult;
use crate::models::track::{Track, TrackStatus};
use crate::models::discovery::Discovery;
use crate::store::Checklist;

/// How many blocking discovery ids to name before truncating.
const DISCOVERY_SAMPLE: usize = 3;

/// Test prerequisites must be completed tracks.
///
/// Unlike dependencies these carry no wave-ordering requirement, so the
/// check resolves them against current status alone. Each unmet id is named
/// with why it is unmet.
pub fn check_prerequisites(
    track: &Track,
    status_by_id: &BTreeMap<&str, TrackStatus>,
) -> Option<CheckResult> {
    let mut unmet = Vec::new();

    for prereq in &track.test_prerequisites {
        match status_by_id.get(prereq.as_str()) {
            Some(TrackStatus::Completed) => {}
            Some(status) => unmet.push(format!("{prereq} ({status})")),
            None => unmet.push(format!("{prereq} (missing)")),
        }
    }

    if unmet.is_empty() {
        return None;
    }

    Some(CheckResult::fail(
        &track.id,
        "prerequisites",
        format!("Unmet test prerequisites: {}", unmet.join(", ")),
    ))
}

/// All plan phases must be checked off.
pub fn check_phases(track: &Track, checklist: Option<Checklist>) -> Option<CheckResult> {
    let Some(checklist) = checklist else {
        return Some(CheckResult::fail(
            &track.id,
            "phases",
            "No plan artifact found".to_string(),
        ));
    };

    if checklist.total == 0 {
        return Some(CheckResult::fail(
            &track.id,
            "phases",
            "Plan contains no checklist items".to_string(),
        ));
    }

    if checklist.outstanding() > 0 {
        return Some(CheckResult::fail(
            &track.id,
            "phases",
            format!("{}/{} phases complete", checklist.done, checklist.total),
        ));
    }

    None
}

/// Quality thresholds are advisory. When a track declares them the gate
/// surfaces an INFO finding so the reviewer knows what was promised; it
/// never measures or enforces them.
pub fn check_quality(track: &Track) -> Option<CheckResult> {
    let threshold = track.quality_threshold.as_ref()?;

    Some(CheckResult::info(
        &track.id,
        "quality",
        format!(
            "Declared thresholds: line_coverage >= {}%, pass_rate >= {}%",
            threshold.line_coverage, threshold.pass_rate
        ),
    ))
}

/// No untriaged BLOCKING discoveries may exist for the track.
pub fn check_discoveries(track: &Track, pending: &[Discovery]) -> Option<CheckResult> {
    let blocking: Vec<&str> = pending
        .iter()
        .filter(|d| d.track_id == track.id && d.is_blocking())
        .map(|d| d.id.as_str())
        .collect();

    if blocking.is_empty() {
        return None;
    }

    let sample = blocking
        .iter()
        .take(DISCOVERY_SAMPLE)
        .copied()
        .collect::<Vec<_>>()
        .join(", ");
    let suffix = if blocking.len() > DISCOVERY_SAMPLE {
        format!(" and {} more", blocking.len() - DISCOVERY_SAMPLE)
    } else {
        String::new()
    };

    Some(CheckResult::fail(
        &track.id,
        "discoveries",
        format!(
            "{} blocking discover{} pending triage: {sample}{suffix}",
            blocking.len(),
            if blocking.len() == 1 { "y" } else { "ies" },
        ),
    ))
}

/// Pending patches that block the next wave must be cleared before the gate
/// opens it.
pub fn check_patches(track: &Track, wave: u32) -> Option<CheckResult> {
    let blocking: Vec<&str> = track
        .patches_blocking(wave + 1)
        .map(|p| p.id.as_str())
        .collect();

    if blocking.is_empty() {
        return None;
    }

    Some(CheckResult::fail(
        &track.id,
        "patches",
        format!(
            "Patch{} blocking wave {}: {}",
            if blocking.len() == 1 { "" } else { "es" },
            wave + 1,
            blocking.join(", ")
        ),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::CheckStatus;
    use crate::models::discovery::Urgency;
    use crate::models::track::{Patch, PatchStatus, QualityThreshold};

    fn statuses(entries: &[(&'static str, TrackStatus)]) -> BTreeMap<&'static str, TrackStatus> {
        entries.iter().copied().collect()
    }

    #[test]
    fn test_prerequisites_met() {
        let mut track = Track::new("t", 1);
        track.test_prerequisites = vec!["x".to_string()];

        let result = check_prerequisites(&track, &statuses(&[("x", TrackStatus::Completed)]));

        assert!(result.is_none());
    }

    #[test]
    fn test_prerequisites_name_status_and_missing() {
        let mut track = Track::new("t", 1);
        track.test_prerequisites = vec!["x".to_string(), "ghost".to_string()];

        let result =
            check_prerequisites(&track, &statuses(&[("x", TrackStatus::InProgress)])).unwrap();

        assert_eq!(result.status, CheckStatus::Fail);
        assert!(result.message.contains("x (in_progress)"));
        assert!(result.message.contains("ghost (missing)"));
    }

    #[test]
    fn test_phases_no_plan_fails() {
        let track = Track::new("t", 1);
        let result = check_phases(&track, None).unwrap();

        assert_eq!(result.status, CheckStatus::Fail);
        assert!(result.message.contains("No plan"));
    }

    #[test]
    fn test_phases_empty_checklist_fails() {
        let track = Track::new("t", 1);
        let result = check_phases(&track, Some(Checklist { done: 0, total: 0 })).unwrap();

        assert_eq!(result.status, CheckStatus::Fail);
    }

    #[test]
    fn test_phases_outstanding_items_fail_with_counts() {
        let track = Track::new("t", 1);
        let result = check_phases(&track, Some(Checklist { done: 3, total: 5 })).unwrap();

        assert!(result.message.contains("3/5"));
    }

    #[test]
    fn test_phases_all_done_passes() {
        let track = Track::new("t", 1);
        assert!(check_phases(&track, Some(Checklist { done: 5, total: 5 })).is_none());
    }

    #[test]
    fn test_quality_is_info_only_when_declared() {
        let mut track = Track::new("t", 1);
        assert!(check_quality(&track).is_none());

        track.quality_threshold = Some(QualityThreshold {
            line_coverage: 80.0,
            pass_rate: 95.0,
        });
        let result = check_quality(&track).unwrap();

        assert_eq!(result.status, CheckStatus::Info);
        assert!(result.message.contains("80"));
    }

    #[test]
    fn test_discoveries_only_blocking_for_this_track() {
        let track = Track::new("t", 1);
        let pending = vec![
            Discovery {
                id: "D-1".to_string(),
                track_id: "t".to_string(),
                urgency: Urgency::Blocking,
                summary: None,
            },
            Discovery {
                id: "D-2".to_string(),
                track_id: "other".to_string(),
                urgency: Urgency::Blocking,
                summary: None,
            },
            Discovery {
                id: "D-3".to_string(),
                track_id: "t".to_string(),
                urgency: Urgency::Backlog,
                summary: None,
            },
        ];

        let result = check_discoveries(&track, &pending).unwrap();

        assert!(result.message.contains("D-1"));
        assert!(!result.message.contains("D-2"));
        assert!(!result.message.contains("D-3"));
    }

    #[test]
    fn test_discoveries_sample_is_truncated() {
        let track = Track::new("t", 1);
        let pending: Vec<Discovery> = (0..5)
            .map(|i| Discovery {
                id: format!("D-{i}"),
                track_id: "t".to_string(),
                urgency: Urgency::Blocking,
                summary: None,
            })
            .collect();

        let result = check_discoveries(&track, &pending).unwrap();

        assert!(result.message.contains("and 2 more"));
    }

    #[test]
    fn test_patches_blocking_next_wave() {
        let mut track = Track::new("t", 2);
        track.patches = vec![
            Patch {
                id: "p1".to_string(),
                status: PatchStatus::Pending,
                blocks_wave: 3,
            },
            Patch {
                id: "p2".to_string(),
                status: PatchStatus::Complete,
                blocks_wave: 3,
            },
            Patch {
                id: "p3".to_string(),
                status: PatchStatus::Pending,
                blocks_wave: 4,
            },
        ];

        let result = check_patches(&track, 2).unwrap();

        assert!(result.message.contains("p1"));
        assert!(!result.message.contains("p2"));
        assert!(!result.message.contains("p3"));
    }

    #[test]
    fn test_patches_none_blocking() {
        let track = Track::new("t", 2);
        assert!(check_patches(&track, 2).is_none());
    }

    #[test]
    fn test_skipped_patch_still_counts_as_pending() {
        let mut track = Track::new("t", 1);
        track.patches = vec![Patch {
            id: "p1".to_string(),
            status: PatchStatus::Skipped,
            blocks_wave: 2,
        }];

        assert!(check_patches(&track, 1).is_some());
    }
}
