//! Text and JSON rendering of mining results.

use std::fmt::Write as _;

use serde::Serialize;

use crate::load::LabelDict;
use crate::materialize::Instance;
use crate::pattern::Pattern;
use crate::types::VertexId;

/// Machine-readable summary of one retained pattern.
#[derive(Debug, Serialize)]
pub struct PatternSummary {
    /// Position in the result collection.
    pub id: usize,
    /// Vertex count.
    pub vertices: usize,
    /// Edge count.
    pub edges: usize,
    /// Support under the mining threshold.
    pub support: usize,
    /// Canonical code, serialized.
    pub code: String,
    /// Number of representative instances, when materialized.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instances: Option<usize>,
}

/// Machine-readable summary of one full run.
#[derive(Debug, Serialize)]
pub struct RunSummary {
    /// Support threshold of the run.
    pub threshold: usize,
    /// Minimum pattern size of the run.
    pub min_pattern_vertices: usize,
    /// Retained patterns.
    pub patterns: Vec<PatternSummary>,
}

/// Renders a pattern in the input's `v`/`e` shape, resolving label ids
/// through the inverse dictionaries.
pub fn render_pattern(
    pattern: &Pattern,
    vertex_labels: &LabelDict,
    edge_labels: &LabelDict,
) -> String {
    let store = pattern.store();
    let mut out = String::new();
    for vertex in store.vertex_ids() {
        let label = store.vertex_label(vertex);
        let name = vertex_labels.resolve(label.0).unwrap_or("?");
        let _ = writeln!(out, "v {vertex} {name}");
    }
    for edge in store.edge_ids() {
        let name = edge_labels.resolve(store.edge_label(edge).0).unwrap_or("?");
        let _ = writeln!(out, "e {} {} {}", store.source(edge), store.target(edge), name);
    }
    out
}

/// Renders one representative instance with its variant listing.
pub fn render_instance(instance: &Instance) -> String {
    let mut out = String::new();
    let vertices: Vec<String> = instance.vertices().iter().map(VertexId::to_string).collect();
    let _ = writeln!(out, "vertices: {{{}}}", vertices.join(", "));
    for edge in instance.edges() {
        let _ = writeln!(out, "  {} -> {} ({})", edge.source, edge.target, edge.label);
    }
    if !instance.variants().is_empty() {
        let _ = writeln!(out, "  variants: {}", instance.variants().len());
        for (i, variant) in instance.variants().iter().enumerate() {
            let vertices: Vec<String> =
                variant.vertices().iter().map(VertexId::to_string).collect();
            let _ = writeln!(out, "    #{}: {{{}}}", i + 1, vertices.join(", "));
        }
    }
    out
}

/// Builds the run summary for a set of retained patterns.
pub fn summarize(
    threshold: usize,
    min_pattern_vertices: usize,
    patterns: &[Pattern],
    instance_counts: Option<&[usize]>,
) -> RunSummary {
    RunSummary {
        threshold,
        min_pattern_vertices,
        patterns: patterns
            .iter()
            .enumerate()
            .map(|(id, p)| PatternSummary {
                id,
                vertices: p.vertex_count(),
                edges: p.edge_count(),
                support: p.support(),
                code: p.code().to_string(),
                instances: instance_counts.map(|counts| counts[id]),
            })
            .collect(),
    }
}
