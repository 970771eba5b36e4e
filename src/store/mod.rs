//! Track store adapter: the boundary between the graph engine and whatever
//! medium actually holds the records
//!
//! The engine only assumes records can be listed, read, and rewritten, and
//! that artifact-existence questions can be answered. Locking for concurrent
//! writers is the store's responsibility, not the engine's.

mod dir_store;
pub mod locking;

pub use dir_store::DirStore;

use std::path::PathBuf;
use thiserror::Error;

use crate::models::component::Component;
use crate::models::discovery::Discovery;
use crate::models::track::Track;

/// Errors from the store, split so callers can tell "your project is
/// invalid" apart from "this tool could not even read your project".
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store directory not found: {0}")]
    MissingStore(PathBuf),

    #[error("Track not found: {0}")]
    TrackNotFound(String),

    #[error("Unreadable record {path}: {reason}")]
    Unreadable { path: PathBuf, reason: String },

    #[error("Failed to write {path}: {reason}")]
    WriteFailed { path: PathBuf, reason: String },
}

impl StoreError {
    /// Environment failures mean the store itself is broken or absent, as
    /// opposed to records that parse but violate rules.
    pub fn is_environment(&self) -> bool {
        matches!(
            self,
            StoreError::MissingStore(_) | StoreError::Unreadable { .. } | StoreError::WriteFailed { .. }
        )
    }
}

/// Planning artifacts whose existence the lifecycle checker asks about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Spec,
    Plan,
}

/// Done/total counts from a track's planning checklist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checklist {
    pub done: usize,
    pub total: usize,
}

impl Checklist {
    pub fn outstanding(&self) -> usize {
        self.total - self.done
    }
}

/// Capability interface the engine programs against.
///
/// Reads hand back snapshots; the engine never holds live references into
/// the store. `save_track` is the single mutation point and implementations
/// must make it safe against concurrent writers of the same record.
pub trait TrackStore {
    /// All track records, in stable id order.
    fn list_tracks(&self) -> Result<Vec<Track>, StoreError>;

    fn load_track(&self, id: &str) -> Result<Track, StoreError>;

    fn save_track(&self, track: &Track) -> Result<(), StoreError>;

    /// Whether a planning artifact exists for the track. Answered here so
    /// the lifecycle checker carries no filesystem dependency.
    fn has_artifact(&self, track_id: &str, kind: ArtifactKind) -> bool;

    /// Checklist counts parsed from the track's plan, `None` when no plan
    /// artifact exists.
    fn checklist(&self, track_id: &str) -> Result<Option<Checklist>, StoreError>;

    /// Discoveries still awaiting triage.
    fn pending_discoveries(&self) -> Result<Vec<Discovery>, StoreError>;

    /// The declared component inventory, empty when none has been authored.
    fn components(&self) -> Result<Vec<Component>, StoreError>;
}
