use std::collections::HashSet;

use tracing::{debug, info};

use crate::config::ConvertOptions;
use crate::graph::{Graph, VertexId};

/// Counts of what the transforms changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransformReport {
    pub self_loops_removed: usize,
    pub reciprocal_edges_added: usize,
}

/// Apply the transforms selected in `options`: self-loop removal first,
/// then undirected closure.
pub fn apply_transforms(graph: &mut Graph, options: &ConvertOptions) -> TransformReport {
    let mut report = TransformReport::default();
    if options.remove_self_loops {
        report.self_loops_removed = remove_self_loops(graph);
    }
    if options.enforce_undirected {
        report.reciprocal_edges_added = enforce_undirected(graph);
    }
    report
}

/// Remove one `v → v` entry from each vertex's adjacency.
///
/// A vertex listing itself several times keeps the remaining copies; running
/// the transform again removes the next one. Returns the number of entries
/// removed.
pub fn remove_self_loops(graph: &mut Graph) -> usize {
    let ids = graph.vertices().to_vec();
    let mut removed = 0;
    for v in ids {
        if let Some(neighbors) = graph.neighbors_mut(v) {
            if let Some(pos) = neighbors.iter().position(|&w| w == v) {
                neighbors.remove(pos);
                removed += 1;
            }
        }
    }
    debug!(removed, "removed self-loops");
    removed
}

/// Every `(to, from)` reciprocal edge missing from `graph`, in detection
/// order. Each pair appears once however many parallel edges produced it.
pub fn missing_reciprocals(graph: &Graph) -> Vec<(VertexId, VertexId)> {
    let mut seen = HashSet::new();
    let mut missing = Vec::new();
    for (v, neighbors) in graph.iter() {
        for &w in neighbors {
            if !graph.neighbors(w).contains(&v) && seen.insert((w, v)) {
                missing.push((w, v));
            }
        }
    }
    missing
}

/// Close the graph under edge reversal.
///
/// Detection runs over the unmodified graph before any edge is added, so a
/// reciprocal edge added here is never mistaken for one that was already
/// present. Returns the number of edges added.
pub fn enforce_undirected(graph: &mut Graph) -> usize {
    let missing = missing_reciprocals(graph);
    if missing.is_empty() {
        debug!("graph is already undirected");
        return 0;
    }

    info!(missing = missing.len(), "found directed edges, correcting");
    for &(to, from) in &missing {
        graph.add_edge(to, from);
    }
    info!("directness correction complete");
    missing.len()
}
