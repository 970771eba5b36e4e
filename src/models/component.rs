use serde::{Deserialize, Serialize};

/// One entry in the declared architecture's component inventory.
///
/// The inventory is authored by the architecture tooling; the drift detector
/// compares it against the boundary and scope tags tracks actually carry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Component {
    pub name: String,
    pub status: ComponentStatus,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ComponentStatus {
    /// Declared in the architecture but not yet implemented by any track.
    Planned,
    Implemented,
    Modified,
    /// Already flagged as diverged by a previous drift pass.
    Drift,
}
