//! Shared fixtures: a temp-dir store populated with realistic records

use cadence::models::track::{Track, TrackStatus};
use cadence::store::{DirStore, TrackStore};
use chrono::Utc;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

pub struct Fixture {
    pub temp: TempDir,
    pub store: DirStore,
}

impl Fixture {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("temp dir");
        fs::create_dir_all(temp.path().join("tracks")).expect("tracks dir");
        let store = DirStore::new(temp.path());
        Self { temp, store }
    }

    pub fn root(&self) -> &Path {
        self.temp.path()
    }

    pub fn add_track(&self, track: &Track) {
        self.store.save_track(track).expect("save track");
    }

    /// Write a plan artifact with the given checked/unchecked item counts.
    pub fn write_plan(&self, track_id: &str, done: usize, open: usize) {
        let dir = self.root().join("tracks").join(track_id);
        fs::create_dir_all(&dir).expect("track dir");
        let mut plan = String::from("# Plan\n");
        for i in 0..done {
            plan.push_str(&format!("- [x] phase {i}\n"));
        }
        for i in 0..open {
            plan.push_str(&format!("- [ ] phase {}\n", done + i));
        }
        fs::write(dir.join("plan.md"), plan).expect("plan");
    }

    pub fn write_spec(&self, track_id: &str) {
        let dir = self.root().join("tracks").join(track_id);
        fs::create_dir_all(&dir).expect("track dir");
        fs::write(dir.join("spec.md"), "# Spec\n").expect("spec");
    }

    pub fn write_pending_discovery(&self, json: &str, name: &str) {
        let dir = self.root().join("discovery").join("pending");
        fs::create_dir_all(&dir).expect("discovery dir");
        fs::write(dir.join(name), json).expect("discovery");
    }

    pub fn write_components(&self, json: &str) {
        fs::write(self.root().join("components.json"), json).expect("components");
    }
}

/// A completed track ready to clear every gate check.
pub fn completed_track(id: &str, wave: u32) -> Track {
    let mut track = Track::new(id, wave);
    track.status = TrackStatus::Completed;
    track.completed_at = Some(Utc::now());
    track.verification_command = Some("true".to_string());
    track
}
