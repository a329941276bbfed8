//! DFS codes: the canonical serialization of pattern structure.
//!
//! A code is the edge sequence of one depth-first construction of the
//! pattern. Vertices are numbered in discovery order, labels are compared by
//! their frequency rank (position in the index's frequency-ordered label
//! list), and every pattern built by the search keeps the invariant that its
//! store's vertex ids equal its code's discovery ids. The designated
//! canonical form of a pattern is the minimum code under [`CodeEdge`]'s
//! total order.

use std::cmp::Ordering;
use std::fmt;

use rustc_hash::FxHashSet;
use serde::Serialize;

use crate::graph::GraphStore;
use crate::types::{Direction, EdgeId, EdgeLabelId, LabelId, VertexId};

/// One edge of a DFS code.
///
/// `from`/`to` are discovery ids; `dir` orients the underlying pattern edge
/// relative to them (`Forward` runs `from -> to`). A tree (forward) edge has
/// `to > from`, a back edge `to < from`.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Serialize)]
pub struct CodeEdge {
    /// Discovery id the extension grew from.
    pub from: u32,
    /// Discovery id the extension reached.
    pub to: u32,
    /// Frequency rank of `from`'s label.
    pub from_rank: u32,
    /// Frequency rank of `to`'s label.
    pub to_rank: u32,
    /// Label of the pattern edge.
    pub edge_label: EdgeLabelId,
    /// Orientation of the pattern edge relative to `(from, to)`.
    pub dir: Direction,
}

impl CodeEdge {
    /// Whether this is a tree (forward) extension.
    #[inline]
    pub fn is_forward(&self) -> bool {
        self.to > self.from
    }
}

impl Ord for CodeEdge {
    fn cmp(&self, other: &Self) -> Ordering {
        let structural = match (self.is_forward(), other.is_forward()) {
            (true, true) => self
                .to
                .cmp(&other.to)
                .then_with(|| other.from.cmp(&self.from)),
            (false, false) => self
                .from
                .cmp(&other.from)
                .then_with(|| self.to.cmp(&other.to)),
            // A back edge precedes a tree edge unless the tree edge closes
            // at or before the back edge's source.
            (false, true) => {
                if self.from < other.to {
                    Ordering::Less
                } else {
                    Ordering::Greater
                }
            }
            (true, false) => {
                if other.from < self.to {
                    Ordering::Greater
                } else {
                    Ordering::Less
                }
            }
        };
        structural
            .then_with(|| self.from_rank.cmp(&other.from_rank))
            .then_with(|| self.dir.cmp(&other.dir))
            .then_with(|| self.edge_label.cmp(&other.edge_label))
            .then_with(|| self.to_rank.cmp(&other.to_rank))
    }
}

impl PartialOrd for CodeEdge {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A full DFS code; compares lexicographically edge by edge.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Serialize)]
pub struct DfsCode(pub Vec<CodeEdge>);

impl DfsCode {
    /// Number of edges.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the code has no edges.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The code's edges in construction order.
    pub fn edges(&self) -> &[CodeEdge] {
        &self.0
    }

    /// Code extended by one more edge.
    pub fn extended(&self, edge: CodeEdge) -> Self {
        let mut edges = self.0.clone();
        edges.push(edge);
        DfsCode(edges)
    }
}

impl fmt::Display for DfsCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            let arrow = match e.dir {
                Direction::Forward => "->",
                Direction::Reverse => "<-",
            };
            write!(
                f,
                "({},{},{},{}{}{})",
                e.from, e.to, e.from_rank, e.edge_label, arrow, e.to_rank
            )?;
        }
        Ok(())
    }
}

/// Discovery ids on the rightmost path of a code prefix, root first.
pub fn rightmost_path(edges: &[CodeEdge]) -> Vec<u32> {
    let mut path = vec![0u32];
    for e in edges.iter().filter(|e| e.is_forward()) {
        while *path.last().expect("path never empties") != e.from {
            path.pop();
        }
        path.push(e.to);
    }
    path
}

#[derive(Clone)]
struct Embedding {
    /// Discovery id -> store vertex.
    map: Vec<VertexId>,
    mapped: FxHashSet<VertexId>,
    used: FxHashSet<EdgeId>,
}

/// Whether `code` is the minimum DFS code of `store`, i.e. the pattern's
/// canonical form.
///
/// Re-runs the DFS-code construction on the pattern itself, keeping every
/// partial embedding that still matches the code prefix; the code is minimal
/// iff no step can produce a strictly smaller edge. `rank` must be the same
/// label ranking the code was built with.
pub fn is_min(store: &GraphStore, code: &DfsCode, rank: impl Fn(LabelId) -> u32) -> bool {
    let edges = code.edges();
    if edges.is_empty() {
        return true;
    }

    let mut embeddings: Vec<Embedding> = Vec::new();
    for e in store.edge_ids() {
        let s = store.source(e);
        let t = store.target(e);
        for (u, w, dir) in [(s, t, Direction::Forward), (t, s, Direction::Reverse)] {
            let cand = CodeEdge {
                from: 0,
                to: 1,
                from_rank: rank(store.vertex_label(u)),
                to_rank: rank(store.vertex_label(w)),
                edge_label: store.edge_label(e),
                dir,
            };
            match cand.cmp(&edges[0]) {
                Ordering::Less => return false,
                Ordering::Equal => embeddings.push(Embedding {
                    map: vec![u, w],
                    mapped: [u, w].into_iter().collect(),
                    used: [e].into_iter().collect(),
                }),
                Ordering::Greater => {}
            }
        }
    }

    for k in 1..edges.len() {
        let path = rightmost_path(&edges[..k]);
        let rightmost = *path.last().expect("prefix has a rightmost vertex");
        let next_id = {
            // All embeddings of the same prefix map the same number of ids.
            embeddings
                .first()
                .map(|emb| emb.map.len() as u32)
                .unwrap_or(0)
        };
        let target = edges[k];
        let mut matching: Vec<Embedding> = Vec::new();

        for emb in &embeddings {
            let vr = emb.map[rightmost as usize];
            // Back extensions: rightmost vertex to an earlier rightmost-path
            // vertex over an unused parallel edge.
            for &t in &path[..path.len() - 1] {
                let vt = emb.map[t as usize];
                for edge in store.incident_edges(vr) {
                    if emb.used.contains(&edge) || store.other_endpoint(edge, vr) != vt {
                        continue;
                    }
                    let dir = if store.source(edge) == vr {
                        Direction::Forward
                    } else {
                        Direction::Reverse
                    };
                    let cand = CodeEdge {
                        from: rightmost,
                        to: t,
                        from_rank: rank(store.vertex_label(vr)),
                        to_rank: rank(store.vertex_label(vt)),
                        edge_label: store.edge_label(edge),
                        dir,
                    };
                    match cand.cmp(&target) {
                        Ordering::Less => return false,
                        Ordering::Equal => {
                            let mut next = emb.clone();
                            next.used.insert(edge);
                            matching.push(next);
                        }
                        Ordering::Greater => {}
                    }
                }
            }
            // Tree extensions: any rightmost-path vertex to an unmapped
            // vertex.
            for &v in &path {
                let vv = emb.map[v as usize];
                for edge in store.incident_edges(vv) {
                    if emb.used.contains(&edge) {
                        continue;
                    }
                    let w = store.other_endpoint(edge, vv);
                    if emb.mapped.contains(&w) {
                        continue;
                    }
                    let dir = if store.source(edge) == vv {
                        Direction::Forward
                    } else {
                        Direction::Reverse
                    };
                    let cand = CodeEdge {
                        from: v,
                        to: next_id,
                        from_rank: rank(store.vertex_label(vv)),
                        to_rank: rank(store.vertex_label(w)),
                        edge_label: store.edge_label(edge),
                        dir,
                    };
                    match cand.cmp(&target) {
                        Ordering::Less => return false,
                        Ordering::Equal => {
                            let mut next = emb.clone();
                            next.map.push(w);
                            next.mapped.insert(w);
                            next.used.insert(edge);
                            matching.push(next);
                        }
                        Ordering::Greater => {}
                    }
                }
            }
        }

        debug_assert!(
            !matching.is_empty(),
            "a pattern's own code always embeds into it"
        );
        embeddings = matching;
    }
    true
}
