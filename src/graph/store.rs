//! Arena-backed mutable graph with dense, reusable integer ids.
//!
//! Vertices and edges live in slot arrays; freed slot indices are kept on
//! explicit free stacks and handed out again on the next insertion. Ids are
//! stable until removed. Queries against removed or foreign ids are a caller
//! contract violation: the store does not defend against them beyond the
//! panics ordinary slot indexing produces.

use smallvec::SmallVec;

use crate::types::{Direction, EdgeId, EdgeLabelId, LabelId, VertexId};

type EdgeList = SmallVec<[EdgeId; 4]>;

#[derive(Debug, Clone)]
struct VertexData {
    label: LabelId,
    out_edges: EdgeList,
    in_edges: EdgeList,
}

#[derive(Debug, Clone, Copy)]
struct EdgeData {
    source: VertexId,
    target: VertexId,
    label: EdgeLabelId,
}

/// Dense-id mutable graph store with slot reuse.
///
/// Backs both the target graph and every pattern candidate. `Clone` produces
/// a fully independent deep copy.
#[derive(Debug, Clone, Default)]
pub struct GraphStore {
    vertices: Vec<Option<VertexData>>,
    edges: Vec<Option<EdgeData>>,
    free_vertices: Vec<u32>,
    free_edges: Vec<u32>,
    vertex_count: usize,
    edge_count: usize,
}

impl GraphStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty store with slot capacity reserved for `vertices`/`edges`.
    pub fn with_capacity(vertices: usize, edges: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertices),
            edges: Vec::with_capacity(edges),
            ..Self::default()
        }
    }

    /// Number of live vertices.
    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    /// Number of live edges.
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Adds a vertex, reusing a freed slot when one is available. The reused
    /// slot comes back with zeroed degree counters.
    pub fn add_vertex(&mut self, label: LabelId) -> VertexId {
        let data = VertexData {
            label,
            out_edges: EdgeList::new(),
            in_edges: EdgeList::new(),
        };
        self.vertex_count += 1;
        match self.free_vertices.pop() {
            Some(idx) => {
                debug_assert!(self.vertices[idx as usize].is_none());
                self.vertices[idx as usize] = Some(data);
                VertexId(idx)
            }
            None => {
                let idx = self.vertices.len() as u32;
                self.vertices.push(Some(data));
                VertexId(idx)
            }
        }
    }

    /// Adds an edge between two live vertices. `direction` orients the edge
    /// relative to the argument order; storage is normalized to
    /// source -> target.
    pub fn add_edge(
        &mut self,
        a: VertexId,
        b: VertexId,
        label: EdgeLabelId,
        direction: Direction,
    ) -> EdgeId {
        let (source, target) = match direction {
            Direction::Forward => (a, b),
            Direction::Reverse => (b, a),
        };
        let data = EdgeData {
            source,
            target,
            label,
        };
        self.edge_count += 1;
        let id = match self.free_edges.pop() {
            Some(idx) => {
                debug_assert!(self.edges[idx as usize].is_none());
                self.edges[idx as usize] = Some(data);
                EdgeId(idx)
            }
            None => {
                let idx = self.edges.len() as u32;
                self.edges.push(Some(data));
                EdgeId(idx)
            }
        };
        self.vertex_mut(source).out_edges.push(id);
        self.vertex_mut(target).in_edges.push(id);
        id
    }

    /// Removes an edge and unlinks it from both endpoints.
    pub fn remove_edge(&mut self, edge: EdgeId) {
        let data = self.edges[edge.index()]
            .take()
            .expect("remove_edge on freed slot");
        detach(&mut self.vertex_mut(data.source).out_edges, edge);
        detach(&mut self.vertex_mut(data.target).in_edges, edge);
        self.free_edges.push(edge.0);
        self.edge_count -= 1;
    }

    /// Removes a vertex, cascading to every incident edge.
    pub fn remove_vertex(&mut self, vertex: VertexId) {
        let data = self.vertices[vertex.index()]
            .as_ref()
            .expect("remove_vertex on freed slot");
        let mut incident: Vec<EdgeId> = Vec::with_capacity(data.out_edges.len() + data.in_edges.len());
        incident.extend_from_slice(&data.out_edges);
        incident.extend_from_slice(&data.in_edges);
        for edge in incident {
            self.remove_edge(edge);
        }
        self.vertices[vertex.index()] = None;
        self.free_vertices.push(vertex.0);
        self.vertex_count -= 1;
    }

    /// Label of a live vertex.
    pub fn vertex_label(&self, vertex: VertexId) -> LabelId {
        self.vertex(vertex).label
    }

    /// Total live incident edge count.
    pub fn degree(&self, vertex: VertexId) -> usize {
        let data = self.vertex(vertex);
        data.out_edges.len() + data.in_edges.len()
    }

    /// Live outgoing edge count.
    pub fn out_degree(&self, vertex: VertexId) -> usize {
        self.vertex(vertex).out_edges.len()
    }

    /// Live incoming edge count.
    pub fn in_degree(&self, vertex: VertexId) -> usize {
        self.vertex(vertex).in_edges.len()
    }

    /// Source endpoint of an edge.
    pub fn source(&self, edge: EdgeId) -> VertexId {
        self.edge(edge).source
    }

    /// Target endpoint of an edge.
    pub fn target(&self, edge: EdgeId) -> VertexId {
        self.edge(edge).target
    }

    /// Label of a live edge.
    pub fn edge_label(&self, edge: EdgeId) -> EdgeLabelId {
        self.edge(edge).label
    }

    /// The endpoint of `edge` that is not `vertex`.
    ///
    /// `vertex` must be one of the edge's endpoints.
    pub fn other_endpoint(&self, edge: EdgeId, vertex: VertexId) -> VertexId {
        let data = self.edge(edge);
        if data.source == vertex {
            data.target
        } else {
            debug_assert_eq!(data.target, vertex, "vertex is not an endpoint of edge");
            data.source
        }
    }

    /// First live edge running `from -> to`, or `None`. Missing adjacency is
    /// not an error.
    pub fn edge_between(&self, from: VertexId, to: VertexId) -> Option<EdgeId> {
        self.vertex(from)
            .out_edges
            .iter()
            .copied()
            .find(|&e| self.edge(e).target == to)
    }

    /// Live outgoing edge ids of a vertex.
    pub fn out_edges(&self, vertex: VertexId) -> impl Iterator<Item = EdgeId> + '_ {
        self.vertex(vertex).out_edges.iter().copied()
    }

    /// Live incoming edge ids of a vertex.
    pub fn in_edges(&self, vertex: VertexId) -> impl Iterator<Item = EdgeId> + '_ {
        self.vertex(vertex).in_edges.iter().copied()
    }

    /// All live incident edge ids of a vertex, outgoing first.
    pub fn incident_edges(&self, vertex: VertexId) -> impl Iterator<Item = EdgeId> + '_ {
        let data = self.vertex(vertex);
        data.out_edges.iter().chain(data.in_edges.iter()).copied()
    }

    /// Live vertex ids in ascending slot order, skipping freed slots.
    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.vertices
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_some())
            .map(|(idx, _)| VertexId(idx as u32))
    }

    /// Live edge ids in ascending slot order, skipping freed slots.
    pub fn edge_ids(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.edges
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_some())
            .map(|(idx, _)| EdgeId(idx as u32))
    }

    /// Whether the slot behind `vertex` is live.
    pub fn is_live_vertex(&self, vertex: VertexId) -> bool {
        self.vertices
            .get(vertex.index())
            .is_some_and(|slot| slot.is_some())
    }

    fn vertex(&self, vertex: VertexId) -> &VertexData {
        self.vertices[vertex.index()]
            .as_ref()
            .expect("access to freed vertex slot")
    }

    fn vertex_mut(&mut self, vertex: VertexId) -> &mut VertexData {
        self.vertices[vertex.index()]
            .as_mut()
            .expect("access to freed vertex slot")
    }

    fn edge(&self, edge: EdgeId) -> &EdgeData {
        self.edges[edge.index()]
            .as_ref()
            .expect("access to freed edge slot")
    }
}

/// Swap-removes one occurrence of `edge` from an endpoint's edge list.
fn detach(list: &mut EdgeList, edge: EdgeId) {
    let pos = list
        .iter()
        .position(|&e| e == edge)
        .expect("edge missing from endpoint list");
    list.swap_remove(pos);
}
