//! Reconstruction of concrete, deduplicated pattern occurrences.

use std::collections::BTreeSet;

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::index::TargetIndex;
use crate::pattern::Pattern;
use crate::types::{Direction, EdgeLabelId, VertexId};

/// One concrete edge of an instance, in target-graph ids.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct RealEdge {
    /// Source target vertex.
    pub source: VertexId,
    /// Target target vertex.
    pub target: VertexId,
    /// Edge label.
    pub label: EdgeLabelId,
}

/// A mapping variant: target vertex -> pattern vertex it plays.
pub type Mapping = FxHashMap<VertexId, u32>;

/// A concrete occurrence of a pattern: an injective binding of pattern
/// vertices to target vertices plus the induced edge set.
///
/// After grouping, an instance may carry `variants` — alternate occurrences
/// recognized as symmetric re-embeddings of the same spot — and the valid
/// mappings of all of them.
#[derive(Debug, Clone, Default)]
pub struct Instance {
    vertices: BTreeSet<VertexId>,
    edges: Vec<RealEdge>,
    binding: FxHashMap<u32, VertexId>,
    inverse: Mapping,
    mappings: Vec<Mapping>,
    variants: Vec<Instance>,
}

impl Instance {
    /// Concrete vertices, ascending.
    pub fn vertices(&self) -> &BTreeSet<VertexId> {
        &self.vertices
    }

    /// Concrete edges in pattern-code order.
    pub fn edges(&self) -> &[RealEdge] {
        &self.edges
    }

    /// Target vertex bound to a pattern vertex, if any.
    pub fn bound(&self, pattern_vertex: u32) -> Option<VertexId> {
        self.binding.get(&pattern_vertex).copied()
    }

    /// All recorded valid mappings, the instance's own first.
    pub fn mappings(&self) -> &[Mapping] {
        &self.mappings
    }

    /// Alternate occurrences grouped under this representative.
    pub fn variants(&self) -> &[Instance] {
        &self.variants
    }

    /// Binds or confirms one endpoint. `true` if the binding is compatible.
    fn admits(&self, pattern_vertex: u32, target: VertexId) -> bool {
        match self.binding.get(&pattern_vertex) {
            Some(&bound) => bound == target,
            // Injective: a target vertex may play only one pattern vertex.
            None => !self.inverse.contains_key(&target),
        }
    }

    fn bind(&mut self, pattern_vertex: u32, target: VertexId) {
        self.binding.insert(pattern_vertex, target);
        self.inverse.insert(target, pattern_vertex);
        self.vertices.insert(target);
    }

    fn with_edge(&self, pu: u32, pv: u32, edge: RealEdge) -> Option<Instance> {
        if !self.admits(pu, edge.source) || !self.admits(pv, edge.target) {
            return None;
        }
        let mut next = self.clone();
        next.bind(pu, edge.source);
        next.bind(pv, edge.target);
        next.edges.push(edge);
        Some(next)
    }
}

/// Reconstructs, deduplicates, and groups the concrete occurrences of a
/// retained pattern. Returns one representative per equivalence class, each
/// carrying its variant list.
pub fn materialize(pattern: &Pattern, index: &TargetIndex) -> Vec<Instance> {
    let generic_edges = generic_edge_table(pattern, index);
    let Some((first, rest)) = generic_edges.split_first() else {
        return Vec::new();
    };

    // Seed one partial instance per concrete realization of the first
    // generic edge.
    let mut instances: Vec<Instance> = Vec::new();
    for &edge in &first.candidates {
        let seed = Instance::default();
        if let Some(seeded) = seed.with_edge(first.pu, first.pv, edge) {
            instances.push(seeded);
        }
    }

    // Extend every partial instance by every matching realization of each
    // remaining generic edge; instances with no valid extension drop out.
    for generic in rest {
        let mut extended: Vec<Instance> = Vec::new();
        for instance in &instances {
            for &edge in &generic.candidates {
                let confirms = instance.bound(generic.pu) == Some(edge.source)
                    && instance.bound(generic.pv) == Some(edge.target);
                if !confirms {
                    let known_endpoints = usize::from(instance.vertices.contains(&edge.source))
                        + usize::from(instance.vertices.contains(&edge.target));
                    if known_endpoints == 2 {
                        // Both endpoints sit inside the instance without
                        // matching this edge's roles: no new binding
                        // information.
                        continue;
                    }
                    if known_endpoints == 0 {
                        // Disconnected from everything bound so far.
                        continue;
                    }
                }
                if let Some(next) = instance.with_edge(generic.pu, generic.pv, edge) {
                    extended.push(next);
                }
            }
        }
        instances = extended;
    }

    debug!(
        raw = instances.len(),
        code = %pattern.code(),
        "raw instances materialized"
    );
    let deduplicated = merge_duplicates(instances);
    group_variants(deduplicated)
}

struct GenericEdge {
    pu: u32,
    pv: u32,
    candidates: Vec<RealEdge>,
}

/// Per pattern edge (in code order): every concrete `(source, target)` pair
/// with a correctly directed and labeled edge between candidates of the two
/// endpoint domains.
fn generic_edge_table(pattern: &Pattern, index: &TargetIndex) -> Vec<GenericEdge> {
    let store = pattern.store();
    let domains = pattern.domains();
    let mut table = Vec::with_capacity(store.edge_count());
    for code_edge in pattern.code().edges() {
        let (pu, pv) = match code_edge.dir {
            Direction::Forward => (code_edge.from, code_edge.to),
            Direction::Reverse => (code_edge.to, code_edge.from),
        };
        let target_label = store.vertex_label(VertexId(pv));
        let mut candidates = Vec::new();
        for a in domains.domain(pu as usize).iter() {
            for b in index
                .neighbors(a)
                .out_with(target_label, code_edge.edge_label)
            {
                if domains.domain(pv as usize).contains(b) {
                    candidates.push(RealEdge {
                        source: a,
                        target: b,
                        label: code_edge.edge_label,
                    });
                }
            }
        }
        candidates.sort_unstable_by_key(|e| (e.source, e.target));
        table.push(GenericEdge { pu, pv, candidates });
    }
    table
}

/// Merges instances with identical concrete vertex sets, unioning their
/// recorded valid mappings.
fn merge_duplicates(instances: Vec<Instance>) -> Vec<Instance> {
    let mut merged: Vec<Instance> = Vec::new();
    for mut instance in instances {
        instance.mappings = vec![instance.inverse.clone()];
        match merged
            .iter_mut()
            .find(|existing| existing.vertices == instance.vertices)
        {
            Some(existing) => existing.mappings.push(instance.inverse.clone()),
            None => merged.push(instance),
        }
    }
    merged
}

/// Groups instances sharing at least one consistently mapped target vertex
/// under one representative. Best-effort clustering of symmetric
/// re-embeddings, not a verified equivalence relation.
fn group_variants(mut instances: Vec<Instance>) -> Vec<Instance> {
    let mut representatives: Vec<Instance> = Vec::new();
    while !instances.is_empty() {
        let mut representative = instances.remove(0);
        let mut remaining: Vec<Instance> = Vec::new();
        for candidate in instances {
            if is_variant(&representative, &candidate) {
                representative
                    .mappings
                    .extend(candidate.mappings.iter().cloned());
                representative.variants.push(candidate);
            } else {
                remaining.push(candidate);
            }
        }
        instances = remaining;
        representatives.push(representative);
    }
    representatives
}

/// Whether two instances share a target vertex that some pair of their
/// recorded mappings assigns to the same pattern vertex.
fn is_variant(a: &Instance, b: &Instance) -> bool {
    let shared: Vec<VertexId> = a.vertices.intersection(&b.vertices).copied().collect();
    if shared.is_empty() {
        return false;
    }
    for map_a in &a.mappings {
        for map_b in &b.mappings {
            for vertex in &shared {
                if let (Some(pa), Some(pb)) = (map_a.get(vertex), map_b.get(vertex)) {
                    if pa == pb {
                        return true;
                    }
                }
            }
        }
    }
    false
}
