//! Structural drift detection
//!
//! Compares the declared component inventory against the boundary and scope
//! tags tracks carry, using token overlap between names. Heuristic and
//! advisory: findings never block a gate, but the same inputs must always
//! produce the same findings.

use serde::Serialize;
use std::collections::BTreeSet;

use crate::models::component::{Component, ComponentStatus};
use crate::models::track::{Track, TrackStatus};

/// Words too generic to indicate a real match between a component name and
/// a boundary tag.
const STOPWORDS: &[&str] = &[
    "the", "and", "for", "with", "from", "into", "that", "this", "layer", "module", "system",
];

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DriftKind {
    /// A track claims a boundary no declared component matches.
    UndeclaredComponent,
    /// A planned component no track's scope or boundary references.
    UncoveredComponent,
    /// A component still marked planned although a track that plausibly
    /// implements it is already completed.
    StaleStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct DriftFinding {
    #[serde(rename = "type")]
    pub kind: DriftKind,
    pub component: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track_id: Option<String>,
    pub message: String,
}

/// Lowercased words of three or more letters, minus stopwords.
fn significant_tokens(text: &str) -> BTreeSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .map(str::to_lowercase)
        .filter(|w| w.len() >= 3 && !STOPWORDS.contains(&w.as_str()))
        .collect()
}

fn overlaps(a: &BTreeSet<String>, b: &BTreeSet<String>) -> bool {
    a.intersection(b).next().is_some()
}

/// Compare components and tracks, returning every drift finding.
///
/// Output is sorted by kind, component, then track id so repeated runs over
/// an unchanged project diff cleanly.
pub fn detect_drift(components: &[Component], tracks: &[Track]) -> Vec<DriftFinding> {
    let component_tokens: Vec<(usize, BTreeSet<String>)> = components
        .iter()
        .enumerate()
        .map(|(i, c)| (i, significant_tokens(&c.name)))
        .collect();

    let track_tags: Vec<(&Track, Vec<(String, BTreeSet<String>)>)> = tracks
        .iter()
        .map(|t| {
            let tags = t
                .boundaries
                .iter()
                .chain(t.scope.iter())
                .map(|tag| (tag.clone(), significant_tokens(tag)))
                .collect();
            (t, tags)
        })
        .collect();

    let mut findings = Vec::new();

    // Track tags that match no component.
    for (track, tags) in &track_tags {
        for (tag, tokens) in tags {
            if tokens.is_empty() {
                continue;
            }
            let matched = component_tokens.iter().any(|(_, ct)| overlaps(tokens, ct));
            if !matched {
                findings.push(DriftFinding {
                    kind: DriftKind::UndeclaredComponent,
                    component: tag.clone(),
                    track_id: Some(track.id.clone()),
                    message: format!(
                        "Track {} claims boundary '{tag}' which matches no declared component",
                        track.id
                    ),
                });
            }
        }
    }

    for (i, tokens) in &component_tokens {
        let component = &components[*i];
        if component.status != ComponentStatus::Planned {
            continue;
        }

        let covering: Vec<&Track> = track_tags
            .iter()
            .filter(|(_, tags)| tags.iter().any(|(_, tt)| overlaps(tt, tokens)))
            .map(|(t, _)| *t)
            .collect();

        if covering.is_empty() {
            findings.push(DriftFinding {
                kind: DriftKind::UncoveredComponent,
                component: component.name.clone(),
                track_id: None,
                message: format!(
                    "Component '{}' is planned but no track's scope or boundary covers it",
                    component.name
                ),
            });
            continue;
        }

        for track in covering {
            if track.status == TrackStatus::Completed {
                findings.push(DriftFinding {
                    kind: DriftKind::StaleStatus,
                    component: component.name.clone(),
                    track_id: Some(track.id.clone()),
                    message: format!(
                        "Component '{}' is still planned but track {} covering it is completed",
                        component.name, track.id
                    ),
                });
            }
        }
    }

    findings.sort_by(|a, b| {
        (kind_rank(a.kind), a.component.as_str(), a.track_id.as_deref())
            .cmp(&(kind_rank(b.kind), b.component.as_str(), b.track_id.as_deref()))
    });
    findings
}

fn kind_rank(kind: DriftKind) -> u8 {
    match kind {
        DriftKind::UndeclaredComponent => 0,
        DriftKind::UncoveredComponent => 1,
        DriftKind::StaleStatus => 2,
    }
}
