#![allow(missing_docs)]

use proptest::prelude::*;

use grafito::csp::propagate;
use grafito::{
    Direction, EdgeLabelId, GraphStats, GraphStore, LabelId, TargetIndex, VertexId,
};

#[derive(Debug, Clone)]
enum Operation {
    AddVertex { label: u32 },
    RemoveVertex { slot: usize },
    AddEdge { from: usize, to: usize, label: u32 },
    RemoveEdge { slot: usize },
}

fn arb_operation() -> impl Strategy<Value = Operation> {
    prop_oneof![
        (0u32..4).prop_map(|label| Operation::AddVertex { label }),
        (0usize..24).prop_map(|slot| Operation::RemoveVertex { slot }),
        (0usize..24, 0usize..24, 0u32..3)
            .prop_map(|(from, to, label)| Operation::AddEdge { from, to, label }),
        (0usize..48).prop_map(|slot| Operation::RemoveEdge { slot }),
    ]
}

proptest! {
    /// After any interleaving of adds and removes, per-vertex degrees match
    /// the live incident-edge count and freed vertex slots come back clean.
    #[test]
    fn store_degrees_track_live_edges(ops in proptest::collection::vec(arb_operation(), 1..60)) {
        let mut store = GraphStore::new();
        let mut live_vertices: Vec<VertexId> = Vec::new();
        let mut live_edges: Vec<(grafito::EdgeId, VertexId, VertexId)> = Vec::new();

        for op in ops {
            match op {
                Operation::AddVertex { label } => {
                    let v = store.add_vertex(LabelId(label));
                    prop_assert_eq!(store.degree(v), 0, "fresh slot has no edges");
                    live_vertices.push(v);
                }
                Operation::RemoveVertex { slot } => {
                    if live_vertices.is_empty() {
                        continue;
                    }
                    let v = live_vertices.remove(slot % live_vertices.len());
                    store.remove_vertex(v);
                    live_edges.retain(|&(_, a, b)| a != v && b != v);
                }
                Operation::AddEdge { from, to, label } => {
                    if live_vertices.is_empty() {
                        continue;
                    }
                    let a = live_vertices[from % live_vertices.len()];
                    let b = live_vertices[to % live_vertices.len()];
                    let e = store.add_edge(a, b, EdgeLabelId(label), Direction::Forward);
                    live_edges.push((e, a, b));
                }
                Operation::RemoveEdge { slot } => {
                    if live_edges.is_empty() {
                        continue;
                    }
                    let (e, _, _) = live_edges.remove(slot % live_edges.len());
                    store.remove_edge(e);
                }
            }
        }

        prop_assert_eq!(store.vertex_count(), live_vertices.len());
        prop_assert_eq!(store.edge_count(), live_edges.len());
        for &v in &live_vertices {
            let expected_out = live_edges.iter().filter(|&&(_, a, _)| a == v).count();
            let expected_in = live_edges.iter().filter(|&&(_, _, b)| b == v).count();
            prop_assert_eq!(store.out_degree(v), expected_out);
            prop_assert_eq!(store.in_degree(v), expected_in);
            prop_assert_eq!(store.degree(v), expected_out + expected_in);
        }
    }

    /// Propagated domains never exceed the label-initialized ones, and
    /// propagation is deterministic across runs.
    #[test]
    fn propagation_only_shrinks_and_is_deterministic(
        edges in proptest::collection::vec((0usize..8, 0usize..8), 1..14),
    ) {
        let mut store = GraphStore::new();
        let mut stats = GraphStats::new();
        let labels: Vec<LabelId> = (0..8).map(|i| LabelId(i % 3)).collect();
        let vertices: Vec<VertexId> = labels
            .iter()
            .map(|&label| {
                let v = store.add_vertex(label);
                stats.record_vertex(v, label);
                v
            })
            .collect();
        for &(s, t) in &edges {
            if s == t {
                continue;
            }
            store.add_edge(vertices[s], vertices[t], EdgeLabelId(0), Direction::Forward);
            stats.record_edge(vertices[s], labels[s], vertices[t], labels[t], EdgeLabelId(0));
        }
        let mut index = TargetIndex::new(store, stats);
        index.set_threshold(1);

        // A two-vertex pattern over the most common shape in the graph.
        let Some((s, t)) = edges.iter().copied().find(|&(s, t)| s != t) else {
            return Ok(());
        };
        let mut pattern = GraphStore::new();
        let p = pattern.add_vertex(labels[s]);
        let q = pattern.add_vertex(labels[t]);
        pattern.add_edge(p, q, EdgeLabelId(0), Direction::Forward);

        let first = propagate(&index, &pattern, None, 1);
        let second = propagate(&index, &pattern, None, 1);
        for i in 0..first.len() {
            let initial = index.vertices_with_label(pattern.vertex_label(VertexId(i as u32))).len();
            prop_assert!(first.domain(i).len() <= initial, "domains only shrink");
            prop_assert_eq!(first.domain(i).sorted(), second.domain(i).sorted());
        }
    }
}
