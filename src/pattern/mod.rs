//! Patterns: small candidate subgraphs under frequency evaluation.

mod code;
mod extend;

pub use code::{is_min, rightmost_path, CodeEdge, DfsCode};
pub use extend::Extender;

use crate::csp::{self, DomainSet};
use crate::graph::GraphStore;
use crate::index::{EdgeType, TargetIndex};
use crate::types::{Direction, VertexId};

/// A connected candidate subgraph together with its canonical code and the
/// candidate domains that witnessed its support.
///
/// Invariant: the store's vertex ids are dense and equal the code's
/// discovery ids, so the last-added vertex is always `vertex_count - 1`.
/// A pattern exclusively owns its store and domains; the search either moves
/// it into the result collection or drops it.
#[derive(Debug, Clone)]
pub struct Pattern {
    store: GraphStore,
    code: DfsCode,
    domains: DomainSet,
}

impl Pattern {
    pub(crate) fn from_parts(store: GraphStore, code: DfsCode, domains: DomainSet) -> Self {
        debug_assert_eq!(store.edge_count(), code.len());
        Self {
            store,
            code,
            domains,
        }
    }

    /// Builds the canonical single-edge pattern for a frequent edge type and
    /// evaluates its domains. Returns `None` when the domains end up below
    /// `threshold`.
    pub fn seed(index: &TargetIndex, ty: EdgeType, threshold: usize) -> Option<Self> {
        let source_rank = index.label_rank(ty.source_label)?;
        let target_rank = index.label_rank(ty.target_label)?;

        // Two possible one-edge codes: discovery starting at the source or
        // at the target. The canonical form is the smaller of the two.
        let from_source = CodeEdge {
            from: 0,
            to: 1,
            from_rank: source_rank,
            to_rank: target_rank,
            edge_label: ty.edge_label,
            dir: Direction::Forward,
        };
        let from_target = CodeEdge {
            from: 0,
            to: 1,
            from_rank: target_rank,
            to_rank: source_rank,
            edge_label: ty.edge_label,
            dir: Direction::Reverse,
        };
        let edge = from_source.min(from_target);

        let mut store = GraphStore::with_capacity(2, 1);
        let (first, second) = if edge.dir == Direction::Forward {
            (ty.source_label, ty.target_label)
        } else {
            (ty.target_label, ty.source_label)
        };
        let v0 = store.add_vertex(first);
        let v1 = store.add_vertex(second);
        store.add_edge(v0, v1, ty.edge_label, edge.dir);

        let domains = csp::propagate(index, &store, None, threshold);
        if !domains.is_frequent(threshold) {
            return None;
        }
        Some(Self::from_parts(store, DfsCode(vec![edge]), domains))
    }

    /// The pattern's graph.
    pub fn store(&self) -> &GraphStore {
        &self.store
    }

    /// The pattern's canonical DFS code.
    pub fn code(&self) -> &DfsCode {
        &self.code
    }

    /// Candidate domains from the pattern's last propagation.
    pub fn domains(&self) -> &DomainSet {
        &self.domains
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.store.vertex_count()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.store.edge_count()
    }

    /// Support under the domains' threshold: the smallest domain size.
    pub fn support(&self) -> usize {
        self.domains.support()
    }

    /// The most recently added vertex (the rightmost vertex of the code).
    pub fn last_vertex(&self) -> VertexId {
        VertexId(self.store.vertex_count() as u32 - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::GraphStats;
    use crate::types::{EdgeLabelId, LabelId};

    fn two_pair_index() -> TargetIndex {
        let mut store = GraphStore::new();
        let mut stats = GraphStats::new();
        let labels = [LabelId(0), LabelId(1), LabelId(0), LabelId(1)];
        let vertices: Vec<VertexId> = labels
            .iter()
            .map(|&label| {
                let v = store.add_vertex(label);
                stats.record_vertex(v, label);
                v
            })
            .collect();
        for &(s, t) in &[(0usize, 1usize), (2, 3)] {
            store.add_edge(vertices[s], vertices[t], EdgeLabelId(0), Direction::Forward);
            stats.record_edge(vertices[s], labels[s], vertices[t], labels[t], EdgeLabelId(0));
        }
        let mut index = TargetIndex::new(store, stats);
        index.set_threshold(2);
        index
    }

    #[test]
    fn seed_builds_the_canonical_one_edge_form() {
        let index = two_pair_index();
        let ty = EdgeType {
            source_label: LabelId(0),
            edge_label: EdgeLabelId(0),
            target_label: LabelId(1),
        };
        let seed = Pattern::seed(&index, ty, 2).expect("A->B is frequent");
        assert_eq!(seed.vertex_count(), 2);
        assert_eq!(seed.support(), 2);
        assert!(is_min(seed.store(), seed.code(), |l| index
            .label_rank(l)
            .unwrap_or(u32::MAX)));
    }

    #[test]
    fn seed_rejects_types_below_threshold() {
        let index = two_pair_index();
        let ty = EdgeType {
            source_label: LabelId(0),
            edge_label: EdgeLabelId(0),
            target_label: LabelId(1),
        };
        assert!(Pattern::seed(&index, ty, 3).is_none());
    }
}
