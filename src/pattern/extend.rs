//! Canonical one-edge extension of patterns.

use tracing::trace;

use crate::csp;
use crate::graph::GraphStore;
use crate::index::TargetIndex;
use crate::pattern::code::{is_min, rightmost_path, CodeEdge};
use crate::pattern::Pattern;
use crate::types::{Direction, EdgeLabelId, LabelId, VertexId};

/// Generates the canonical, frequent one-edge children of a pattern.
///
/// Candidates follow the rightmost-path discipline of the minimum-DFS-code
/// canonical form: back edges close from the rightmost vertex to a
/// rightmost-path ancestor, tree edges grow a new vertex off any
/// rightmost-path vertex. A candidate survives only if its extended code is
/// the minimum code of the extended graph and the CSP engine confirms its
/// support, so every returned child is already known frequent.
pub struct Extender<'a> {
    index: &'a TargetIndex,
    threshold: usize,
}

impl<'a> Extender<'a> {
    /// Extender over the index's current frequent view.
    pub fn new(index: &'a TargetIndex, threshold: usize) -> Self {
        Self { index, threshold }
    }

    /// All canonical frequent children of `parent`, in code order.
    pub fn children(&self, parent: &Pattern) -> Vec<Pattern> {
        let store = parent.store();
        let code = parent.code();
        let path = rightmost_path(code.edges());
        let rightmost = *path.last().expect("patterns have at least one vertex");
        let next_id = store.vertex_count() as u32;

        let mut candidates: Vec<(CodeEdge, Option<LabelId>)> = Vec::new();

        // Back extensions: rightmost vertex to a rightmost-path ancestor.
        let vr = VertexId(rightmost);
        let label_r = store.vertex_label(vr);
        for &t in &path[..path.len() - 1] {
            let vt = VertexId(t);
            let label_t = store.vertex_label(vt);
            for (edge_label, dir) in self.edge_labels_between(label_r, label_t) {
                if self.duplicate_edge(store, vr, vt, edge_label, dir) {
                    continue;
                }
                candidates.push((
                    CodeEdge {
                        from: rightmost,
                        to: t,
                        from_rank: self.rank(label_r),
                        to_rank: self.rank(label_t),
                        edge_label,
                        dir,
                    },
                    None,
                ));
            }
        }

        // Tree extensions: a new vertex off any rightmost-path vertex, with
        // every frequent continuation of the path vertex's label.
        for &v in &path {
            let label_v = store.vertex_label(VertexId(v));
            for &(edge_label, target_label) in self.index.out_edge_types(label_v) {
                candidates.push((
                    CodeEdge {
                        from: v,
                        to: next_id,
                        from_rank: self.rank(label_v),
                        to_rank: self.rank(target_label),
                        edge_label,
                        dir: Direction::Forward,
                    },
                    Some(target_label),
                ));
            }
            for &(edge_label, source_label) in self.index.in_edge_types(label_v) {
                candidates.push((
                    CodeEdge {
                        from: v,
                        to: next_id,
                        from_rank: self.rank(label_v),
                        to_rank: self.rank(source_label),
                        edge_label,
                        dir: Direction::Reverse,
                    },
                    Some(source_label),
                ));
            }
        }

        candidates.sort_unstable_by(|a, b| a.0.cmp(&b.0));

        let mut children = Vec::new();
        for (edge, new_label) in candidates {
            let mut child_store = store.clone();
            let to = match new_label {
                Some(label) => child_store.add_vertex(label),
                None => VertexId(edge.to),
            };
            child_store.add_edge(VertexId(edge.from), to, edge.edge_label, edge.dir);
            let child_code = code.extended(edge);

            if !is_min(&child_store, &child_code, |l| self.rank(l)) {
                continue;
            }
            let domains = csp::propagate(self.index, &child_store, None, self.threshold);
            if !domains.is_frequent(self.threshold) {
                trace!(code = %child_code, support = domains.support(), "child infrequent");
                continue;
            }
            children.push(Pattern::from_parts(child_store, child_code, domains));
        }
        children
    }

    fn rank(&self, label: LabelId) -> u32 {
        self.index.label_rank(label).unwrap_or(u32::MAX)
    }

    /// Frequent edge labels between two fixed endpoint labels, in both
    /// orientations. `Forward` runs `a -> b`.
    fn edge_labels_between(
        &self,
        a: LabelId,
        b: LabelId,
    ) -> Vec<(EdgeLabelId, Direction)> {
        let mut labels = Vec::new();
        for &(edge_label, target) in self.index.out_edge_types(a) {
            if target == b {
                labels.push((edge_label, Direction::Forward));
            }
        }
        for &(edge_label, source) in self.index.in_edge_types(a) {
            if source == b {
                labels.push((edge_label, Direction::Reverse));
            }
        }
        labels
    }

    /// Whether the pattern already holds an identical edge (same endpoints,
    /// orientation and label).
    fn duplicate_edge(
        &self,
        store: &GraphStore,
        a: VertexId,
        b: VertexId,
        edge_label: EdgeLabelId,
        dir: Direction,
    ) -> bool {
        let (source, target) = match dir {
            Direction::Forward => (a, b),
            Direction::Reverse => (b, a),
        };
        store
            .out_edges(source)
            .any(|e| store.target(e) == target && store.edge_label(e) == edge_label)
    }
}
