//! Load-time statistics preserved un-pruned across threshold changes.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::Serialize;

use crate::types::{EdgeLabelId, LabelId, VertexId};

/// A `(source label, edge label, target label)` edge shape in the target
/// graph.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Serialize)]
pub struct EdgeType {
    /// Label of the source endpoint.
    pub source_label: LabelId,
    /// Label of the edge itself.
    pub edge_label: EdgeLabelId,
    /// Label of the target endpoint.
    pub target_label: LabelId,
}

#[derive(Debug, Default, Clone)]
struct EdgeTypeTally {
    sources: FxHashSet<VertexId>,
    targets: FxHashSet<VertexId>,
    occurrences: usize,
}

impl EdgeTypeTally {
    /// Support of a single-edge pattern of this type: distinct endpoints,
    /// whichever side is scarcer.
    fn support(&self) -> usize {
        self.sources.len().min(self.targets.len())
    }
}

/// Global occurrence tallies recorded once at load time.
///
/// Threshold changes only ever read this; they never mutate it, which is what
/// makes thresholds reversible without re-reading the input.
#[derive(Debug, Default, Clone)]
pub struct GraphStats {
    vertices_by_label: FxHashMap<LabelId, Vec<VertexId>>,
    edge_types: FxHashMap<EdgeType, EdgeTypeTally>,
    edge_label_occurrences: FxHashMap<EdgeLabelId, usize>,
    max_edge_support: usize,
}

impl GraphStats {
    /// Empty statistics context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one loaded vertex.
    pub fn record_vertex(&mut self, vertex: VertexId, label: LabelId) {
        self.vertices_by_label.entry(label).or_default().push(vertex);
    }

    /// Records one loaded edge together with its endpoint labels.
    pub fn record_edge(
        &mut self,
        source: VertexId,
        source_label: LabelId,
        target: VertexId,
        target_label: LabelId,
        edge_label: EdgeLabelId,
    ) {
        let ty = EdgeType {
            source_label,
            edge_label,
            target_label,
        };
        let tally = self.edge_types.entry(ty).or_default();
        tally.sources.insert(source);
        tally.targets.insert(target);
        tally.occurrences += 1;
        *self.edge_label_occurrences.entry(edge_label).or_default() += 1;
        self.max_edge_support = self.max_edge_support.max(tally.support());
    }

    /// Distinct vertices carrying `label`.
    pub fn label_frequency(&self, label: LabelId) -> usize {
        self.vertices_by_label
            .get(&label)
            .map_or(0, |vertices| vertices.len())
    }

    /// Vertices carrying `label`, in load order.
    pub fn vertices_with_label(&self, label: LabelId) -> &[VertexId] {
        self.vertices_by_label
            .get(&label)
            .map_or(&[], |vertices| vertices.as_slice())
    }

    /// All labels seen at load time together with their frequencies.
    pub fn labels(&self) -> impl Iterator<Item = (LabelId, usize)> + '_ {
        self.vertices_by_label
            .iter()
            .map(|(&label, vertices)| (label, vertices.len()))
    }

    /// Support of a single-edge pattern of the given type.
    pub fn edge_type_support(&self, ty: &EdgeType) -> usize {
        self.edge_types.get(ty).map_or(0, EdgeTypeTally::support)
    }

    /// All edge types seen at load time together with their supports.
    pub fn edge_types(&self) -> impl Iterator<Item = (EdgeType, usize)> + '_ {
        self.edge_types.iter().map(|(&ty, tally)| (ty, tally.support()))
    }

    /// Total occurrences of one edge label, irrespective of endpoint labels.
    pub fn edge_label_occurrences(&self, edge_label: EdgeLabelId) -> usize {
        self.edge_label_occurrences
            .get(&edge_label)
            .copied()
            .unwrap_or(0)
    }

    /// All edge labels seen at load time together with their total
    /// occurrence counts.
    pub fn edge_labels(&self) -> impl Iterator<Item = (EdgeLabelId, usize)> + '_ {
        self.edge_label_occurrences
            .iter()
            .map(|(&label, &count)| (label, count))
    }

    /// The highest single-edge-type support observed. Any threshold above
    /// this value cannot produce a frequent pattern.
    pub fn max_edge_support(&self) -> usize {
        self.max_edge_support
    }

    /// Every distinct single-edge-type support, descending. Only these
    /// values can change what a threshold sweep reports.
    pub fn observed_supports(&self) -> Vec<usize> {
        let supports: std::collections::BTreeSet<usize> = self
            .edge_types
            .values()
            .map(EdgeTypeTally::support)
            .collect();
        supports.into_iter().rev().collect()
    }
}
