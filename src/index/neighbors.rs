//! Per-vertex one-hop neighbor index over the frequent view.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::types::{EdgeLabelId, LabelId, VertexId};

/// One reachable neighbor together with the edge label connecting it.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Neighbor {
    /// The neighboring vertex.
    pub vertex: VertexId,
    /// Label of the connecting edge.
    pub edge_label: EdgeLabelId,
}

type NeighborList = SmallVec<[Neighbor; 4]>;

/// Outgoing and incoming one-hop neighbors of a single vertex, keyed by the
/// neighbor's label. Only rebuilt through
/// [`TargetIndex::set_threshold`](crate::index::TargetIndex::set_threshold),
/// so every entry is frequent under the active threshold.
#[derive(Debug, Default, Clone)]
pub struct VertexNeighbors {
    out: FxHashMap<LabelId, NeighborList>,
    inc: FxHashMap<LabelId, NeighborList>,
}

impl VertexNeighbors {
    pub(crate) fn add_out(&mut self, label: LabelId, neighbor: Neighbor) {
        self.out.entry(label).or_default().push(neighbor);
    }

    pub(crate) fn add_in(&mut self, label: LabelId, neighbor: Neighbor) {
        self.inc.entry(label).or_default().push(neighbor);
    }

    /// Number of outgoing edges towards neighbors of `label`.
    pub fn out_degree(&self, label: LabelId) -> usize {
        self.out.get(&label).map_or(0, |list| list.len())
    }

    /// Number of incoming edges from neighbors of `label`.
    pub fn in_degree(&self, label: LabelId) -> usize {
        self.inc.get(&label).map_or(0, |list| list.len())
    }

    /// Outgoing neighbors of `label`.
    pub fn out_with_label(&self, label: LabelId) -> &[Neighbor] {
        self.out.get(&label).map_or(&[], |list| list.as_slice())
    }

    /// Incoming neighbors of `label`.
    pub fn in_with_label(&self, label: LabelId) -> &[Neighbor] {
        self.inc.get(&label).map_or(&[], |list| list.as_slice())
    }

    /// Outgoing neighbors of `label` reached through `edge_label`.
    pub fn out_with(
        &self,
        label: LabelId,
        edge_label: EdgeLabelId,
    ) -> impl Iterator<Item = VertexId> + '_ {
        self.out_with_label(label)
            .iter()
            .filter(move |n| n.edge_label == edge_label)
            .map(|n| n.vertex)
    }

    /// Incoming neighbors of `label` reaching this vertex through
    /// `edge_label`.
    pub fn in_with(
        &self,
        label: LabelId,
        edge_label: EdgeLabelId,
    ) -> impl Iterator<Item = VertexId> + '_ {
        self.in_with_label(label)
            .iter()
            .filter(move |n| n.edge_label == edge_label)
            .map(|n| n.vertex)
    }
}
