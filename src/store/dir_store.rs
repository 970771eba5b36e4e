//! Filesystem-backed store
//!
//! Layout under the store root:
//!
//! ```text
//! <root>/tracks/<id>/track.json    the serde JSON track record
//! <root>/tracks/<id>/spec.md       planning spec artifact
//! <root>/tracks/<id>/plan.md       plan with `- [ ]` / `- [x]` checklist
//! <root>/discovery/pending/*.json  discoveries awaiting triage
//! <root>/components.json           declared component inventory
//! ```

use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::warn;

use super::locking;
use super::{ArtifactKind, Checklist, StoreError, TrackStore};
use crate::models::component::Component;
use crate::models::discovery::Discovery;
use crate::models::track::Track;

pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn tracks_dir(&self) -> PathBuf {
        self.root.join("tracks")
    }

    fn track_dir(&self, id: &str) -> PathBuf {
        self.tracks_dir().join(id)
    }

    fn record_path(&self, id: &str) -> PathBuf {
        self.track_dir(id).join("track.json")
    }

    fn artifact_path(&self, id: &str, kind: ArtifactKind) -> PathBuf {
        let name = match kind {
            ArtifactKind::Spec => "spec.md",
            ArtifactKind::Plan => "plan.md",
        };
        self.track_dir(id).join(name)
    }

    fn read_record(&self, path: &Path) -> Result<Track, StoreError> {
        let content = locking::locked_read(path).map_err(|e| StoreError::Unreadable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        serde_json::from_str(&content).map_err(|e| StoreError::Unreadable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }
}

impl TrackStore for DirStore {
    fn list_tracks(&self) -> Result<Vec<Track>, StoreError> {
        let tracks_dir = self.tracks_dir();
        if !tracks_dir.is_dir() {
            return Err(StoreError::MissingStore(tracks_dir));
        }

        let entries = fs::read_dir(&tracks_dir).map_err(|e| StoreError::Unreadable {
            path: tracks_dir.clone(),
            reason: e.to_string(),
        })?;

        let mut tracks = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StoreError::Unreadable {
                path: tracks_dir.clone(),
                reason: e.to_string(),
            })?;
            if !entry.path().is_dir() {
                continue;
            }
            let record = entry.path().join("track.json");
            if !record.is_file() {
                warn!(dir = %entry.path().display(), "Track directory has no track.json, skipping");
                continue;
            }
            tracks.push(self.read_record(&record)?);
        }

        tracks.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(tracks)
    }

    fn load_track(&self, id: &str) -> Result<Track, StoreError> {
        let path = self.record_path(id);
        if !path.is_file() {
            return Err(StoreError::TrackNotFound(id.to_string()));
        }
        self.read_record(&path)
    }

    fn save_track(&self, track: &Track) -> Result<(), StoreError> {
        let dir = self.track_dir(&track.id);
        fs::create_dir_all(&dir).map_err(|e| StoreError::WriteFailed {
            path: dir.clone(),
            reason: e.to_string(),
        })?;

        let path = self.record_path(&track.id);
        let content =
            serde_json::to_string_pretty(track).map_err(|e| StoreError::WriteFailed {
                path: path.clone(),
                reason: e.to_string(),
            })?;
        locking::locked_write(&path, &content).map_err(|e| StoreError::WriteFailed {
            path,
            reason: e.to_string(),
        })
    }

    fn has_artifact(&self, track_id: &str, kind: ArtifactKind) -> bool {
        self.artifact_path(track_id, kind).is_file()
    }

    fn checklist(&self, track_id: &str) -> Result<Option<Checklist>, StoreError> {
        let path = self.artifact_path(track_id, ArtifactKind::Plan);
        if !path.is_file() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path).map_err(|e| StoreError::Unreadable {
            path: path.clone(),
            reason: e.to_string(),
        })?;

        Ok(Some(count_checklist(&content)))
    }

    fn pending_discoveries(&self) -> Result<Vec<Discovery>, StoreError> {
        let pending_dir = self.root.join("discovery").join("pending");
        if !pending_dir.is_dir() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&pending_dir).map_err(|e| StoreError::Unreadable {
            path: pending_dir.clone(),
            reason: e.to_string(),
        })?;

        let mut discoveries = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StoreError::Unreadable {
                path: pending_dir.clone(),
                reason: e.to_string(),
            })?;
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }
            let content = fs::read_to_string(&path).map_err(|e| StoreError::Unreadable {
                path: path.clone(),
                reason: e.to_string(),
            })?;
            match serde_json::from_str::<Discovery>(&content) {
                Ok(discovery) => discoveries.push(discovery),
                Err(e) => {
                    // A malformed pending discovery should not make gating
                    // impossible for every wave.
                    warn!(path = %path.display(), error = %e, "Skipping malformed discovery");
                }
            }
        }

        discoveries.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(discoveries)
    }

    fn components(&self) -> Result<Vec<Component>, StoreError> {
        let path = self.root.join("components.json");
        if !path.is_file() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&path).map_err(|e| StoreError::Unreadable {
            path: path.clone(),
            reason: e.to_string(),
        })?;
        serde_json::from_str(&content).map_err(|e| StoreError::Unreadable {
            path,
            reason: e.to_string(),
        })
    }
}

/// Count `- [x]` / `- [ ]` checklist items. Checked boxes match
/// case-insensitively, mirroring how plans are hand-edited in practice.
fn count_checklist(plan: &str) -> Checklist {
    static CHECKED: OnceLock<Regex> = OnceLock::new();
    static UNCHECKED: OnceLock<Regex> = OnceLock::new();

    let checked = CHECKED.get_or_init(|| Regex::new(r"(?i)- \[x\]").expect("static regex"));
    let unchecked = UNCHECKED.get_or_init(|| Regex::new(r"- \[ \]").expect("static regex"));

    let done = checked.find_iter(plan).count();
    let open = unchecked.find_iter(plan).count();
    Checklist {
        done,
        total: done + open,
    }
}
