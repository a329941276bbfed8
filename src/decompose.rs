//! Connected-component decomposition of patterns.
//!
//! Structural analysis utility for cyclic patterns: removing one edge at a
//! time and splitting the remainder into components exposes the pattern's
//! internal symmetry.

use crate::graph::GraphStore;
use crate::pattern::Pattern;
use crate::types::VertexId;

/// One connected component of a pattern with an edge removed.
#[derive(Debug, Clone)]
pub struct Component {
    /// The component's own graph, with component-local ids.
    pub store: GraphStore,
    /// Component-local id -> id in the edge-removed pattern.
    pub mapping: Vec<VertexId>,
}

/// For each edge of `pattern` (in live edge order): removes the edge from a
/// clone, splits the remainder into connected components by depth-first
/// traversal, and keeps components with at least two vertices that contain
/// the pattern's last-added vertex.
pub fn decompose(pattern: &Pattern) -> Vec<Vec<Component>> {
    let source = pattern.store();
    let last_added = pattern.last_vertex();
    let mut per_edge = Vec::with_capacity(source.edge_count());

    for removed in source.edge_ids() {
        let mut remainder = source.clone();
        remainder.remove_edge(removed);
        per_edge.push(components_of(&remainder, last_added));
    }
    per_edge
}

/// Splits `graph` into connected components (edge direction ignored for
/// connectivity, preserved in the component), restricted to components of
/// two or more vertices containing `must_contain`.
fn components_of(graph: &GraphStore, must_contain: VertexId) -> Vec<Component> {
    let slot_bound = graph
        .vertex_ids()
        .map(|v| v.index() + 1)
        .max()
        .unwrap_or(0);
    let mut colored = vec![false; slot_bound];
    let mut components = Vec::new();

    for start in graph.vertex_ids() {
        if colored[start.index()] {
            continue;
        }
        let mut store = GraphStore::new();
        let mut mapping: Vec<VertexId> = Vec::new();
        let mut stack = vec![start];
        store.add_vertex(graph.vertex_label(start));
        mapping.push(start);

        while let Some(current) = stack.pop() {
            if colored[current.index()] {
                continue;
            }
            colored[current.index()] = true;
            let local_current = local_id(&mapping, current);
            for edge in graph.incident_edges(current) {
                let other = graph.other_endpoint(edge, current);
                if colored[other.index()] {
                    continue;
                }
                let local_other = match mapping.iter().position(|&v| v == other) {
                    Some(pos) => VertexId(pos as u32),
                    None => {
                        mapping.push(other);
                        store.add_vertex(graph.vertex_label(other))
                    }
                };
                let forward = graph.source(edge) == current;
                let (a, b) = if forward {
                    (local_current, local_other)
                } else {
                    (local_other, local_current)
                };
                store.add_edge(a, b, graph.edge_label(edge), crate::types::Direction::Forward);
                stack.push(other);
            }
        }

        if store.vertex_count() > 1 && mapping.contains(&must_contain) {
            components.push(Component { store, mapping });
        }
    }
    components
}

fn local_id(mapping: &[VertexId], vertex: VertexId) -> VertexId {
    let pos = mapping
        .iter()
        .position(|&v| v == vertex)
        .expect("visited vertex is mapped");
    VertexId(pos as u32)
}
