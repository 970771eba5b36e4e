//! Dependency graph for tracks: construction, cycle detection, wave layout

mod cycle;
mod waves;


use std::collections::BTreeMap;

use crate::models::track::Track;

pub use cycle::{detect_cycles, edge_would_cycle};
pub use waves::{assign_waves, verify_waves, WaveAssignment, WaveViolation};

/// Adjacency view of the track dependency graph.
///
/// Maps each track id to the ids it depends on. Every id that appears as a
/// dependency target is present as a node even when no record backs it, so
/// dangling references surface as `missing_dependencies` findings instead of
/// panics during traversal. `BTreeMap` keeps iteration order deterministic
/// for reproducible output and diffs.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    adjacency: BTreeMap<String, Vec<String>>,
    missing: Vec<String>,
}

impl DependencyGraph {
    /// Build the graph from a snapshot of track records. Pure transform,
    /// no validation beyond recording dangling dependency targets.
    pub fn build(tracks: &[Track]) -> Self {
        let mut adjacency: BTreeMap<String, Vec<String>> = BTreeMap::new();

        for track in tracks {
            adjacency.insert(track.id.clone(), track.dependencies.clone());
        }

        // Dependency targets without a record of their own become empty
        // nodes so traversal never chases an absent key.
        let mut missing = Vec::new();
        let targets: Vec<String> = adjacency.values().flatten().cloned().collect();
        for target in targets {
            if !adjacency.contains_key(&target) {
                adjacency.insert(target.clone(), Vec::new());
                missing.push(target);
            }
        }
        missing.sort();
        missing.dedup();

        Self { adjacency, missing }
    }

    /// Number of nodes, including phantom nodes for dangling targets.
    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Total number of dependency edges.
    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(Vec::len).sum()
    }

    /// Ids referenced as dependencies but not backed by any track record.
    pub fn missing_dependencies(&self) -> &[String] {
        &self.missing
    }

    /// Dependencies of a node, empty for unknown ids.
    pub fn dependencies_of(&self, id: &str) -> &[String] {
        self.adjacency.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.adjacency.contains_key(id)
    }

    /// Iterate `(node, dependencies)` pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.adjacency.iter()
    }

    /// Clone the graph with one extra `source → target` edge appended.
    ///
    /// Both endpoints are created if absent. The receiver is left untouched,
    /// which is what makes repeated what-if exploration safe.
    pub fn with_edge(&self, source: &str, target: &str) -> Self {
        let mut candidate = self.clone();
        candidate
            .adjacency
            .entry(target.to_string())
            .or_default();
        candidate
            .adjacency
            .entry(source.to_string())
            .or_default()
            .push(target.to_string());
        candidate
    }
}
