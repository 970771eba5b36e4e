//! Wave assignment: layered topological sort and wave-number verification

use anyhow::{bail, Result};
use serde::Serialize;
use std::collections::BTreeMap;

use super::{cycle, DependencyGraph};
use crate::models::track::Track;

/// One wave in the computed execution sequence. All tracks in a wave are
/// mutually independent and may run concurrently.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct WaveAssignment {
    pub wave_number: u32,
    pub track_ids: Vec<String>,
}

/// A hand-authored wave number that contradicts the dependency graph.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct WaveViolation {
    pub track_id: String,
    pub track_wave: u32,
    pub dependency_id: String,
    pub dependency_wave: u32,
    pub message: String,
}

/// Partition an acyclic graph into ordered waves.
///
/// Wave 1 holds nodes with no dependencies; wave k holds nodes whose entire
/// dependency set lies in waves < k. Ids within a wave are sorted so that
/// an unchanged graph always yields byte-identical output.
pub fn assign_waves(graph: &DependencyGraph) -> Result<Vec<WaveAssignment>> {
    let cycle_nodes = cycle::detect_cycles(graph);
    if !cycle_nodes.is_empty() {
        bail!(
            "Cannot assign waves: dependency cycle involving {}",
            cycle_nodes.join(", ")
        );
    }

    let mut remaining: BTreeMap<&str, usize> = graph
        .iter()
        .map(|(node, deps)| (node.as_str(), deps.len()))
        .collect();

    let mut dependents: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for (node, deps) in graph.iter() {
        for dep in deps {
            dependents.entry(dep).or_default().push(node);
        }
    }

    let mut waves = Vec::new();
    let mut wave_number = 1u32;

    while !remaining.is_empty() {
        // BTreeMap iteration already yields sorted ids.
        let ready: Vec<String> = remaining
            .iter()
            .filter(|(_, &deg)| deg == 0)
            .map(|(&node, _)| node.to_string())
            .collect();

        // Acyclicity was checked up front, so an empty layer is unreachable;
        // guard anyway rather than loop forever on a logic error.
        if ready.is_empty() {
            bail!("Wave assignment stalled with {} nodes unplaced", remaining.len());
        }

        for id in &ready {
            remaining.remove(id.as_str());
            for &dependent in dependents.get(id.as_str()).map(Vec::as_slice).unwrap_or(&[]) {
                if let Some(deg) = remaining.get_mut(dependent) {
                    *deg -= 1;
                }
            }
        }

        waves.push(WaveAssignment {
            wave_number,
            track_ids: ready,
        });
        wave_number += 1;
    }

    Ok(waves)
}

/// Verify authoritative wave numbers against the dependency edges.
///
/// For every edge `A depends on B` the invariant is `wave(B) < wave(A)`,
/// strictly. Every violation is reported; callers typically need to fix
/// several at once, so failing fast on the first would only slow them down.
/// Dependencies without a record are skipped here; the graph builder
/// already surfaces those as missing.
pub fn verify_waves(tracks: &[Track]) -> Vec<WaveViolation> {
    let wave_of: BTreeMap<&str, u32> = tracks
        .iter()
        .map(|t| (t.id.as_str(), t.wave))
        .collect();

    let mut violations = Vec::new();

    for track in tracks {
        for dep in &track.dependencies {
            let Some(&dep_wave) = wave_of.get(dep.as_str()) else {
                continue;
            };
            if dep_wave >= track.wave {
                violations.push(WaveViolation {
                    track_id: track.id.clone(),
                    track_wave: track.wave,
                    dependency_id: dep.clone(),
                    dependency_wave: dep_wave,
                    message: format!(
                        "{} (wave {}) depends on {} (wave {}): dependency wave must be \
                         strictly earlier",
                        track.id, track.wave, dep, dep_wave
                    ),
                });
            }
        }
    }

    violations.sort_by(|a, b| {
        (a.track_id.as_str(), a.dependency_id.as_str())
            .cmp(&(b.track_id.as_str(), b.dependency_id.as_str()))
    });
    violations
}
