//! Progress and drift reporting over a populated store

use cadence::drift::{detect_drift, DriftKind};
use cadence::models::track::{Complexity, Track, TrackStatus};
use cadence::progress::{ProgressAggregator, WeightTable};
use cadence::store::TrackStore;

use crate::helpers::{completed_track, Fixture};

#[test]
fn progress_report_over_mixed_store() {
    let fx = Fixture::new();

    let mut done = completed_track("01_infra", 1);
    done.complexity = Complexity::L;
    fx.add_track(&done);
    fx.write_plan("01_infra", 2, 0);

    let mut halfway = Track::new("02_db", 2);
    halfway.status = TrackStatus::InProgress;
    halfway.complexity = Complexity::M;
    fx.add_track(&halfway);
    fx.write_plan("02_db", 1, 1);

    fx.add_track(&Track::new("03_api", 2));

    let report = ProgressAggregator::new(WeightTable::default())
        .report(&fx.store)
        .unwrap();

    // L done (3 * 1.0) + M halfway (2 * 0.5) + M new (2 * 0.0) over weight 7.
    assert_eq!(report.total_tracks, 3);
    assert_eq!(report.total_weighted_units, 7);
    assert_eq!(report.completed_weighted_units, 4.0);
    assert_eq!(report.overall_progress, 0.571);
    assert_eq!(report.waves.len(), 2);
    assert_eq!(report.waves[0].progress, 1.0);
    assert_eq!(report.tracks_by_status.get("in_progress"), Some(&1));
    assert!((0.0..=1.0).contains(&report.overall_progress));
}

#[test]
fn drift_report_over_store_inventory() {
    let fx = Fixture::new();
    fx.write_components(
        r#"[
            {"name": "auth service", "status": "planned"},
            {"name": "report generator", "status": "planned"}
        ]"#,
    );

    let mut track = completed_track("01_auth", 1);
    track.boundaries = vec!["auth".to_string(), "billing engine".to_string()];
    fx.add_track(&track);

    let tracks = fx.store.list_tracks().unwrap();
    let components = fx.store.components().unwrap();
    let findings = detect_drift(&components, &tracks);

    let kinds: Vec<DriftKind> = findings.iter().map(|f| f.kind).collect();
    assert_eq!(
        kinds,
        [
            DriftKind::UndeclaredComponent,
            DriftKind::UncoveredComponent,
            DriftKind::StaleStatus,
        ]
    );
}

#[test]
fn empty_store_reports_are_degenerate_not_fatal() {
    let fx = Fixture::new();

    let report = ProgressAggregator::new(WeightTable::default())
        .report(&fx.store)
        .unwrap();
    assert_eq!(report.overall_progress, 0.0);

    let findings = detect_drift(
        &fx.store.components().unwrap(),
        &fx.store.list_tracks().unwrap(),
    );
    assert!(findings.is_empty());
}
