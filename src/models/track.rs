use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A unit of implementation work with its own lifecycle and dependency set.
///
/// The record shape is the contract other tooling must honor: field names and
/// enum spellings here are what external collaborators read and write.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub status: TrackStatus,
    /// Wave number assigned at decomposition time. This is authoritative
    /// input to scheduling: the engine verifies it against the dependency
    /// graph and can derive a fresh assignment, but never rewrites it.
    pub wave: u32,
    /// Track ids that must be completed before this track may start.
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub complexity: Complexity,
    /// Architectural areas this track touches. Opaque to the scheduler,
    /// consumed by the drift detector.
    #[serde(default)]
    pub boundaries: Vec<String>,
    #[serde(default)]
    pub scope: Vec<String>,
    /// Deferred fix-ups that must be cleared before a later wave may proceed.
    #[serde(default)]
    pub patches: Vec<Patch>,
    /// Track ids whose completion is required before this track's tests are
    /// meaningful. Unlike `dependencies`, these carry no wave-ordering
    /// restriction; the gate resolves them against current status only.
    #[serde(default)]
    pub test_prerequisites: Vec<String>,
    /// Advisory thresholds. Reported by the gate, never a cause of failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality_threshold: Option<QualityThreshold>,
    /// Append-only audit trail of manual gate overrides.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub override_log: Vec<OverrideEntry>,
    /// Shell command the gate runs to verify this track's work.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification_command: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification_timeout_seconds: Option<u64>,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Track {
    /// Create a minimal record in the initial `new` status.
    pub fn new(id: impl Into<String>, wave: u32) -> Self {
        Self {
            id: id.into(),
            status: TrackStatus::New,
            wave,
            dependencies: Vec::new(),
            complexity: Complexity::default(),
            boundaries: Vec::new(),
            scope: Vec::new(),
            patches: Vec::new(),
            test_prerequisites: Vec::new(),
            quality_threshold: None,
            override_log: Vec::new(),
            verification_command: None,
            verification_timeout_seconds: None,
            started_at: None,
            completed_at: None,
        }
    }

    /// Patches that are not yet COMPLETE, regardless of which wave they block.
    pub fn pending_patches(&self) -> impl Iterator<Item = &Patch> {
        self.patches
            .iter()
            .filter(|p| p.status != PatchStatus::Complete)
    }

    /// Pending patches that block the given wave from beginning.
    pub fn patches_blocking(&self, wave: u32) -> impl Iterator<Item = &Patch> {
        self.pending_patches().filter(move |p| p.blocks_wave == wave)
    }
}

/// Status of a track in its lifecycle.
///
/// State machine (checked, never driven, by this engine):
/// - `new` → `in_progress` (when planning artifacts are generated)
/// - `in_progress` → `completed` | `needs_patch` | `paused` | `blocked`
/// - `needs_patch` | `paused` | `blocked` → `in_progress`
/// - `completed` → `needs_patch` (drift discovered after completion)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TrackStatus {
    /// Created, no work started yet.
    New,
    /// Planning artifacts exist and work is underway.
    InProgress,
    /// All work and gating checks passed; may still carry pending patches.
    Completed,
    /// A deferred fix-up is required before downstream waves proceed.
    NeedsPatch,
    /// Work intentionally suspended.
    Paused,
    /// Stopped on a prerequisite failure or blocking discovery.
    Blocked,
}

impl TrackStatus {
    /// Check whether a requested transition is legal.
    ///
    /// Same-status is always a no-op. The engine only validates requests;
    /// the transition itself is made by an external actor.
    pub fn can_transition_to(&self, new_status: TrackStatus) -> bool {
        if *self == new_status {
            return true;
        }

        match self {
            TrackStatus::New => matches!(new_status, TrackStatus::InProgress),
            TrackStatus::InProgress => matches!(
                new_status,
                TrackStatus::Completed
                    | TrackStatus::NeedsPatch
                    | TrackStatus::Paused
                    | TrackStatus::Blocked
            ),
            TrackStatus::Completed => matches!(new_status, TrackStatus::NeedsPatch),
            TrackStatus::NeedsPatch | TrackStatus::Paused | TrackStatus::Blocked => {
                matches!(new_status, TrackStatus::InProgress)
            }
        }
    }
}

impl std::fmt::Display for TrackStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TrackStatus::New => "new",
            TrackStatus::InProgress => "in_progress",
            TrackStatus::Completed => "completed",
            TrackStatus::NeedsPatch => "needs_patch",
            TrackStatus::Paused => "paused",
            TrackStatus::Blocked => "blocked",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for TrackStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(TrackStatus::New),
            "in_progress" => Ok(TrackStatus::InProgress),
            "completed" => Ok(TrackStatus::Completed),
            "needs_patch" => Ok(TrackStatus::NeedsPatch),
            "paused" => Ok(TrackStatus::Paused),
            "blocked" => Ok(TrackStatus::Blocked),
            other => anyhow::bail!(
                "Unknown track status '{other}' (expected one of: new, in_progress, \
                 completed, needs_patch, paused, blocked)"
            ),
        }
    }
}

/// Complexity class, mapped to integer weights for progress aggregation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Complexity {
    S,
    M,
    L,
    XL,
}

impl Default for Complexity {
    fn default() -> Self {
        Complexity::M
    }
}

/// A deferred, trackable fix-up tied to unblocking a specific future wave.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patch {
    pub id: String,
    pub status: PatchStatus,
    /// Wave that may not begin until this patch is COMPLETE.
    pub blocks_wave: u32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PatchStatus {
    Pending,
    Complete,
    Skipped,
}

/// Advisory quality thresholds. Degenerate values (including zero) are
/// reported as-is and never block completion.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct QualityThreshold {
    pub line_coverage: f64,
    pub pass_rate: f64,
}

/// One entry in a track's override audit trail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverrideEntry {
    /// Name of the gate check that was overridden.
    pub check: String,
    /// Human-readable justification. Required; overrides are never silent.
    pub reason: String,
    pub timestamp: DateTime<Utc>,
}
