//! Target graph index: the input graph plus its per-threshold frequent view.

mod neighbors;
mod stats;

pub use neighbors::{Neighbor, VertexNeighbors};
pub use stats::{EdgeType, GraphStats};

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

use crate::graph::GraphStore;
use crate::types::{EdgeLabelId, LabelId, VertexId};

/// The loaded target graph, its preserved load-time statistics, and the
/// frequent view derived for the active threshold.
///
/// `set_threshold` re-derives the whole frequent view from the preserved
/// statistics, so thresholds can be raised and lowered freely without
/// re-reading input. The index is intentionally shared, mutate-in-place
/// state: one full search + materialization cycle must finish before the
/// next threshold change.
#[derive(Debug)]
pub struct TargetIndex {
    store: GraphStore,
    stats: GraphStats,
    threshold: usize,
    frequent_labels: Vec<LabelId>,
    label_ranks: FxHashMap<LabelId, u32>,
    frequent_edge_types: FxHashSet<EdgeType>,
    frequent_edge_labels: FxHashSet<EdgeLabelId>,
    out_types: FxHashMap<LabelId, Vec<(EdgeLabelId, LabelId)>>,
    in_types: FxHashMap<LabelId, Vec<(EdgeLabelId, LabelId)>>,
    neighbors: Vec<VertexNeighbors>,
}

impl TargetIndex {
    /// Wraps a loaded store and its statistics. No frequent view exists
    /// until the first `set_threshold` call.
    pub fn new(store: GraphStore, stats: GraphStats) -> Self {
        Self {
            store,
            stats,
            threshold: 0,
            frequent_labels: Vec::new(),
            label_ranks: FxHashMap::default(),
            frequent_edge_types: FxHashSet::default(),
            frequent_edge_labels: FxHashSet::default(),
            out_types: FxHashMap::default(),
            in_types: FxHashMap::default(),
            neighbors: Vec::new(),
        }
    }

    /// The target graph.
    pub fn store(&self) -> &GraphStore {
        &self.store
    }

    /// The preserved load-time statistics.
    pub fn stats(&self) -> &GraphStats {
        &self.stats
    }

    /// The active threshold (0 before the first `set_threshold`).
    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// The highest single-edge-type support in the graph.
    pub fn max_edge_support(&self) -> usize {
        self.stats.max_edge_support()
    }

    /// Distinct single-edge-type supports, descending: the only thresholds
    /// at which a sweep can report something new.
    pub fn observed_supports(&self) -> Vec<usize> {
        self.stats.observed_supports()
    }

    /// Re-derives the frequent view for `threshold` from the preserved
    /// statistics: frequent labels, frequent edge types, and the per-vertex
    /// one-hop neighbor index restricted to both. The previous view is
    /// discarded wholesale, so nothing stale survives a threshold change.
    pub fn set_threshold(&mut self, threshold: usize) {
        self.threshold = threshold;

        let mut labels: Vec<(LabelId, usize)> = self
            .stats
            .labels()
            .filter(|&(_, freq)| freq >= threshold)
            .collect();
        // Descending frequency; ascending label id keeps ties stable. This
        // order defines the label ranks canonical growth compares by.
        labels.sort_unstable_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        self.frequent_labels = labels.iter().map(|&(label, _)| label).collect();
        self.label_ranks = self
            .frequent_labels
            .iter()
            .enumerate()
            .map(|(rank, &label)| (label, rank as u32))
            .collect();

        let frequent_edge_labels: FxHashSet<EdgeLabelId> = self
            .stats
            .edge_labels()
            .filter(|&(_, occurrences)| occurrences >= threshold)
            .map(|(label, _)| label)
            .collect();

        let frequent_edge_types: FxHashSet<EdgeType> = self
            .stats
            .edge_types()
            .filter(|&(ty, support)| {
                support >= threshold
                    && self.label_ranks.contains_key(&ty.source_label)
                    && self.label_ranks.contains_key(&ty.target_label)
                    && frequent_edge_labels.contains(&ty.edge_label)
            })
            .map(|(ty, _)| ty)
            .collect();
        self.frequent_edge_labels = frequent_edge_labels;
        self.frequent_edge_types = frequent_edge_types;

        self.out_types.clear();
        self.in_types.clear();
        for ty in &self.frequent_edge_types {
            self.out_types
                .entry(ty.source_label)
                .or_default()
                .push((ty.edge_label, ty.target_label));
            self.in_types
                .entry(ty.target_label)
                .or_default()
                .push((ty.edge_label, ty.source_label));
        }
        for list in self.out_types.values_mut().chain(self.in_types.values_mut()) {
            list.sort_unstable();
            list.dedup();
        }

        self.rebuild_neighbors();
        debug!(
            threshold,
            frequent_labels = self.frequent_labels.len(),
            frequent_edge_types = self.frequent_edge_types.len(),
            "frequent view rebuilt"
        );
    }

    /// Rebuilds the one-hop index from scratch for the current frequent
    /// view. Entries that referenced now-infrequent labels or edge types
    /// simply do not reappear.
    fn rebuild_neighbors(&mut self) {
        let slot_upper_bound = self
            .store
            .vertex_ids()
            .map(|v| v.index() + 1)
            .max()
            .unwrap_or(0);
        let mut neighbors = vec![VertexNeighbors::default(); slot_upper_bound];
        for vertex in self.store.vertex_ids() {
            let source_label = self.store.vertex_label(vertex);
            if !self.label_ranks.contains_key(&source_label) {
                continue;
            }
            for edge in self.store.out_edges(vertex) {
                let other = self.store.target(edge);
                let target_label = self.store.vertex_label(other);
                let ty = EdgeType {
                    source_label,
                    edge_label: self.store.edge_label(edge),
                    target_label,
                };
                if !self.frequent_edge_types.contains(&ty) {
                    continue;
                }
                let edge_label = ty.edge_label;
                neighbors[vertex.index()].add_out(
                    target_label,
                    Neighbor {
                        vertex: other,
                        edge_label,
                    },
                );
                neighbors[other.index()].add_in(
                    source_label,
                    Neighbor {
                        vertex,
                        edge_label,
                    },
                );
            }
        }
        self.neighbors = neighbors;
    }

    /// Frequent labels in descending global frequency (ascending label id on
    /// ties).
    pub fn frequent_labels(&self) -> &[LabelId] {
        &self.frequent_labels
    }

    /// Position of `label` in the frequent ordering, if frequent.
    pub fn label_rank(&self, label: LabelId) -> Option<u32> {
        self.label_ranks.get(&label).copied()
    }

    /// Whether `label` is frequent under the active threshold.
    pub fn is_frequent_label(&self, label: LabelId) -> bool {
        self.label_ranks.contains_key(&label)
    }

    /// Whether the edge type is frequent under the active threshold.
    pub fn is_frequent_edge_type(&self, ty: &EdgeType) -> bool {
        self.frequent_edge_types.contains(ty)
    }

    /// Frequent edge types in a deterministic order.
    pub fn frequent_edge_types(&self) -> Vec<EdgeType> {
        let mut types: Vec<EdgeType> = self.frequent_edge_types.iter().copied().collect();
        types.sort_unstable();
        types
    }

    /// Frequent `(edge label, target label)` continuations out of a source
    /// label.
    pub fn out_edge_types(&self, source_label: LabelId) -> &[(EdgeLabelId, LabelId)] {
        self.out_types
            .get(&source_label)
            .map_or(&[], |list| list.as_slice())
    }

    /// Frequent `(edge label, source label)` continuations into a target
    /// label.
    pub fn in_edge_types(&self, target_label: LabelId) -> &[(EdgeLabelId, LabelId)] {
        self.in_types
            .get(&target_label)
            .map_or(&[], |list| list.as_slice())
    }

    /// Vertices carrying `label`, straight from the preserved statistics.
    pub fn vertices_with_label(&self, label: LabelId) -> &[VertexId] {
        self.stats.vertices_with_label(label)
    }

    /// The one-hop neighbors of `vertex` under the active frequent view.
    pub fn neighbors(&self, vertex: VertexId) -> &VertexNeighbors {
        &self.neighbors[vertex.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Direction;

    /// Two A->B edges (label 0) plus one C->A edge whose label C is unique.
    fn small_index() -> TargetIndex {
        let mut store = GraphStore::new();
        let mut stats = GraphStats::new();
        let a = LabelId(0);
        let b = LabelId(1);
        let c = LabelId(2);
        let l = EdgeLabelId(0);
        let labels = [a, b, a, b, c];
        let vertices: Vec<VertexId> = labels
            .iter()
            .map(|&label| {
                let v = store.add_vertex(label);
                stats.record_vertex(v, label);
                v
            })
            .collect();
        for &(s, t) in &[(0usize, 1usize), (2, 3), (4, 0)] {
            store.add_edge(vertices[s], vertices[t], l, Direction::Forward);
            stats.record_edge(vertices[s], labels[s], vertices[t], labels[t], l);
        }
        TargetIndex::new(store, stats)
    }

    #[test]
    fn frequent_labels_follow_the_threshold() {
        let mut index = small_index();
        index.set_threshold(2);
        for &label in index.frequent_labels() {
            assert!(index.stats().label_frequency(label) >= 2);
        }
        assert!(!index.is_frequent_label(LabelId(2)), "C appears once");
        assert_eq!(index.frequent_labels(), &[LabelId(0), LabelId(1)]);

        index.set_threshold(1);
        assert!(index.is_frequent_label(LabelId(2)));
        assert_eq!(index.frequent_labels().len(), 3);
    }

    #[test]
    fn label_order_is_descending_frequency_with_stable_ties() {
        let mut index = small_index();
        index.set_threshold(1);
        // A and B both appear twice; the tie resolves to the lower label id.
        assert_eq!(
            index.frequent_labels(),
            &[LabelId(0), LabelId(1), LabelId(2)]
        );
        assert_eq!(index.label_rank(LabelId(0)), Some(0));
        assert_eq!(index.label_rank(LabelId(2)), Some(2));
    }

    #[test]
    fn neighbor_index_drops_infrequent_entries_on_rethreshold() {
        let mut index = small_index();
        index.set_threshold(1);
        let a0 = VertexId(0);
        assert_eq!(index.neighbors(a0).in_degree(LabelId(2)), 1);

        index.set_threshold(2);
        assert_eq!(
            index.neighbors(a0).in_degree(LabelId(2)),
            0,
            "entry for the now-infrequent C label is evicted"
        );
        assert_eq!(index.neighbors(a0).out_degree(LabelId(1)), 1);
    }

    #[test]
    fn max_edge_support_bounds_useful_thresholds() {
        let index = small_index();
        assert_eq!(index.max_edge_support(), 2);
    }
}
