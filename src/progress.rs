//! Weighted progress aggregation
//!
//! Reporting only: nothing here enforces an invariant. Completion fractions
//! are derived from status and checklist counts, weighted by complexity, and
//! rolled up per wave and overall.

use anyhow::Result;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::models::track::{Complexity, Track, TrackStatus};
use crate::store::{Checklist, TrackStore};

/// Complexity-to-weight mapping, passed in at construction rather than read
/// from a shared table.
#[derive(Debug, Clone, Copy)]
pub struct WeightTable {
    pub s: u32,
    pub m: u32,
    pub l: u32,
    pub xl: u32,
}

impl Default for WeightTable {
    fn default() -> Self {
        Self { s: 1, m: 2, l: 3, xl: 4 }
    }
}

impl WeightTable {
    pub fn weight(&self, complexity: Complexity) -> u32 {
        match complexity {
            Complexity::S => self.s,
            Complexity::M => self.m,
            Complexity::L => self.l,
            Complexity::XL => self.xl,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TrackProgress {
    pub track_id: String,
    pub status: TrackStatus,
    pub complexity: Complexity,
    pub weight: u32,
    pub completion: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct WaveProgress {
    pub wave: u32,
    pub tracks: Vec<TrackProgress>,
    pub total_weight: u32,
    pub progress: f64,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct PendingItems {
    pub discoveries: usize,
    pub patches: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProgressReport {
    pub overall_progress: f64,
    pub total_tracks: usize,
    pub total_weighted_units: u32,
    pub completed_weighted_units: f64,
    pub waves: Vec<WaveProgress>,
    pub tracks_by_status: BTreeMap<String, usize>,
    pub pending_items: PendingItems,
}

pub struct ProgressAggregator {
    weights: WeightTable,
}

impl ProgressAggregator {
    pub fn new(weights: WeightTable) -> Self {
        Self { weights }
    }

    /// Completion fraction for one track, always in `[0, 1]`.
    ///
    /// `completed` with no pending patches is the only way to reach 1.0;
    /// a missing plan or pending patches cap the fraction at 0.9 so a track
    /// never reads as fully done while follow-up work remains.
    pub fn track_completion(&self, track: &Track, checklist: Option<Checklist>) -> f64 {
        if track.status == TrackStatus::New {
            return 0.0;
        }

        let Some(checklist) = checklist else {
            return if track.status == TrackStatus::Completed { 0.9 } else { 0.1 };
        };

        if track.status == TrackStatus::Completed {
            if track.pending_patches().next().is_none() {
                return 1.0;
            }
            let ratio = if checklist.total == 0 {
                1.0
            } else {
                checklist.done as f64 / checklist.total as f64
            };
            return ratio.min(0.9);
        }

        if checklist.total == 0 {
            return if track.status == TrackStatus::InProgress { 0.5 } else { 0.0 };
        }

        checklist.done as f64 / checklist.total as f64
    }

    /// Build the full report from a store snapshot.
    pub fn report(&self, store: &dyn TrackStore) -> Result<ProgressReport> {
        let tracks = store.list_tracks()?;

        let mut by_wave: BTreeMap<u32, Vec<TrackProgress>> = BTreeMap::new();
        let mut tracks_by_status: BTreeMap<String, usize> = BTreeMap::new();
        let mut pending_patches = 0usize;

        for track in &tracks {
            let checklist = store.checklist(&track.id)?;
            let weight = self.weights.weight(track.complexity);
            let completion = self.track_completion(track, checklist);

            *tracks_by_status.entry(track.status.to_string()).or_default() += 1;
            pending_patches += track.pending_patches().count();

            by_wave.entry(track.wave).or_default().push(TrackProgress {
                track_id: track.id.clone(),
                status: track.status,
                complexity: track.complexity,
                weight,
                completion: round2(completion),
            });
        }

        let mut waves = Vec::new();
        let mut total_weight = 0u32;
        let mut completed_units = 0f64;

        for (wave, tracks) in by_wave {
            let wave_weight: u32 = tracks.iter().map(|t| t.weight).sum();
            let wave_units: f64 = tracks
                .iter()
                .map(|t| t.weight as f64 * t.completion)
                .sum();

            total_weight += wave_weight;
            completed_units += wave_units;

            waves.push(WaveProgress {
                wave,
                progress: weighted_fraction(wave_units, wave_weight),
                total_weight: wave_weight,
                tracks,
            });
        }

        let discoveries = store.pending_discoveries()?.len();

        Ok(ProgressReport {
            overall_progress: round3(if total_weight == 0 {
                0.0
            } else {
                completed_units / total_weight as f64
            }),
            total_tracks: tracks.len(),
            total_weighted_units: total_weight,
            completed_weighted_units: round2(completed_units),
            waves,
            tracks_by_status,
            pending_items: PendingItems {
                discoveries,
                patches: pending_patches,
            },
        })
    }
}

/// Zero weight yields 0.0 rather than dividing by zero.
fn weighted_fraction(units: f64, weight: u32) -> f64 {
    if weight == 0 {
        0.0
    } else {
        round3(units / weight as f64)
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn round3(v: f64) -> f64 {
    (v * 1000.0).round() / 1000.0
}
