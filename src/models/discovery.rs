use serde::{Deserialize, Serialize};

/// A finding raised during track execution that may affect other tracks.
///
/// Discoveries live in the store's pending queue until triaged. Only
/// BLOCKING discoveries participate in wave gating; the rest are backlog
/// material for future decomposition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Discovery {
    pub id: String,
    /// Track the discovery was raised against.
    pub track_id: String,
    #[serde(default)]
    pub urgency: Urgency,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

impl Discovery {
    pub fn is_blocking(&self) -> bool {
        self.urgency == Urgency::Blocking
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Urgency {
    /// Must be resolved before the affected track's wave can complete.
    Blocking,
    /// Should be scheduled into the next wave's decomposition.
    NextWave,
    /// No scheduling pressure.
    Backlog,
}

impl Default for Urgency {
    fn default() -> Self {
        Urgency::Backlog
    }
}
