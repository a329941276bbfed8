#![allow(missing_docs)]

use grafito::{Direction, EdgeLabelId, GraphStore, LabelId};

#[test]
fn freed_ids_come_back_reset() {
    let mut store = GraphStore::new();
    let a = store.add_vertex(LabelId(0));
    let b = store.add_vertex(LabelId(1));
    let c = store.add_vertex(LabelId(2));
    store.add_edge(a, b, EdgeLabelId(0), Direction::Forward);
    store.add_edge(b, c, EdgeLabelId(0), Direction::Forward);
    assert_eq!(store.degree(b), 2);

    store.remove_vertex(b);
    assert_eq!(store.vertex_count(), 2);
    assert_eq!(store.edge_count(), 0);

    let reused = store.add_vertex(LabelId(7));
    assert_eq!(reused, b, "slot is reused");
    assert_eq!(store.degree(reused), 0);
    assert_eq!(store.vertex_label(reused), LabelId(7));
}

#[test]
fn interleaved_add_remove_keeps_degrees_consistent() {
    let mut store = GraphStore::new();
    let vertices: Vec<_> = (0..5).map(|i| store.add_vertex(LabelId(i))).collect();
    let mut live: Vec<(u32, u32)> = Vec::new();
    let pairs = [(0u32, 1u32), (1, 2), (2, 3), (3, 4), (4, 0), (0, 2), (1, 3)];
    let mut edges = Vec::new();
    for &(s, t) in &pairs {
        edges.push(store.add_edge(
            vertices[s as usize],
            vertices[t as usize],
            EdgeLabelId(0),
            Direction::Forward,
        ));
        live.push((s, t));
    }
    // Remove every other edge, then re-add one.
    for i in (0..edges.len()).step_by(2).rev() {
        store.remove_edge(edges[i]);
        live.remove(i);
    }
    store.add_edge(vertices[2], vertices[0], EdgeLabelId(1), Direction::Forward);
    live.push((2, 0));

    for (i, &v) in vertices.iter().enumerate() {
        let expected_out = live.iter().filter(|&&(s, _)| s == i as u32).count();
        let expected_in = live.iter().filter(|&&(_, t)| t == i as u32).count();
        assert_eq!(store.out_degree(v), expected_out, "out degree of {v}");
        assert_eq!(store.in_degree(v), expected_in, "in degree of {v}");
        assert_eq!(store.degree(v), expected_out + expected_in);
    }
    assert_eq!(store.edge_count(), live.len());
}

#[test]
fn deep_clone_survives_source_mutation() {
    let mut store = GraphStore::new();
    let a = store.add_vertex(LabelId(0));
    let b = store.add_vertex(LabelId(1));
    store.add_edge(a, b, EdgeLabelId(0), Direction::Forward);

    let snapshot = store.clone();
    store.remove_vertex(a);
    store.add_vertex(LabelId(9));

    assert_eq!(snapshot.vertex_count(), 2);
    assert_eq!(snapshot.edge_count(), 1);
    assert_eq!(snapshot.vertex_label(a), LabelId(0));
}
