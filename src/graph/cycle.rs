//! Cycle detection via Kahn's in-degree reduction
//!
//! This is the single canonical cycle check: full validation, incremental
//! edge checks, and wave assignment all reduce to it, so the answer cannot
//! drift between call sites.

use std::collections::{BTreeMap, VecDeque};

use super::DependencyGraph;

/// Find the set of nodes involved in dependency cycles.
///
/// In-degree here counts dependencies a node still needs, not dependents.
/// Nodes with zero in-degree are peeled off repeatedly; whatever survives
/// with positive in-degree sits on a cycle. Returns the sorted surviving
/// set, empty when the graph is acyclic.
pub fn detect_cycles(graph: &DependencyGraph) -> Vec<String> {
    let mut in_degree: BTreeMap<&str, usize> = BTreeMap::new();
    let mut dependents: BTreeMap<&str, Vec<&str>> = BTreeMap::new();

    for (node, deps) in graph.iter() {
        in_degree.insert(node, deps.len());
        for dep in deps {
            dependents.entry(dep).or_default().push(node);
        }
    }

    let mut queue: VecDeque<&str> = in_degree
        .iter()
        .filter(|(_, &deg)| deg == 0)
        .map(|(&node, _)| node)
        .collect();

    let mut removed = 0usize;
    while let Some(node) = queue.pop_front() {
        removed += 1;
        for &dependent in dependents.get(node).map(Vec::as_slice).unwrap_or(&[]) {
            if let Some(deg) = in_degree.get_mut(dependent) {
                *deg -= 1;
                if *deg == 0 {
                    queue.push_back(dependent);
                }
            }
        }
    }

    if removed == in_degree.len() {
        return Vec::new();
    }

    in_degree
        .into_iter()
        .filter(|(_, deg)| *deg > 0)
        .map(|(node, _)| node.to_string())
        .collect()
}

/// Check whether adding `source → target` ("source depends on target") would
/// introduce a cycle.
///
/// Works on a cloned adjacency map and re-runs full detection; correctness
/// over micro-optimization. The caller's graph is never mutated, so this is
/// safe to call repeatedly while exploring candidate decompositions.
pub fn edge_would_cycle(graph: &DependencyGraph, source: &str, target: &str) -> bool {
    !detect_cycles(&graph.with_edge(source, target)).is_empty()
}
