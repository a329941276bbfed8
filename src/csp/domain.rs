//! Candidate domains: the target vertices each pattern vertex may map to.

use rustc_hash::FxHashSet;

use crate::types::VertexId;

/// Candidate set of one pattern vertex. Domains are mutated in place by
/// propagation and only ever shrink.
#[derive(Debug, Clone, Default)]
pub struct Domain {
    values: FxHashSet<VertexId>,
}

impl Domain {
    pub(crate) fn from_set(values: FxHashSet<VertexId>) -> Self {
        Self { values }
    }

    /// Number of candidates left.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no candidate survived.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Whether `vertex` is still a candidate.
    pub fn contains(&self, vertex: VertexId) -> bool {
        self.values.contains(&vertex)
    }

    /// Remaining candidates, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.values.iter().copied()
    }

    /// Remaining candidates in ascending id order.
    pub fn sorted(&self) -> Vec<VertexId> {
        let mut values: Vec<VertexId> = self.values.iter().copied().collect();
        values.sort_unstable();
        values
    }

    pub(crate) fn retain(&mut self, keep: impl FnMut(&VertexId) -> bool) {
        self.values.retain(keep);
    }

    pub(crate) fn replace(&mut self, values: FxHashSet<VertexId>) {
        debug_assert!(values.len() <= self.values.len(), "domains only shrink");
        self.values = values;
    }
}

/// All domains of one pattern, indexed by pattern vertex id.
///
/// Owned exclusively by a single pattern; never shared across patterns.
#[derive(Debug, Clone, Default)]
pub struct DomainSet {
    domains: Vec<Domain>,
}

impl DomainSet {
    pub(crate) fn new(domains: Vec<Domain>) -> Self {
        Self { domains }
    }

    /// Domain of one pattern vertex.
    pub fn domain(&self, pattern_vertex: usize) -> &Domain {
        &self.domains[pattern_vertex]
    }

    pub(crate) fn domain_mut(&mut self, pattern_vertex: usize) -> &mut Domain {
        &mut self.domains[pattern_vertex]
    }

    /// Number of pattern vertices covered.
    pub fn len(&self) -> usize {
        self.domains.len()
    }

    /// Whether the set covers no vertices at all.
    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    /// Pattern support: the size of the smallest domain (0 for an empty
    /// set).
    pub fn support(&self) -> usize {
        self.domains.iter().map(Domain::len).min().unwrap_or(0)
    }

    /// Whether every domain still holds at least `threshold` candidates.
    pub fn is_frequent(&self, threshold: usize) -> bool {
        self.support() >= threshold
    }

    /// All domains in pattern-vertex order.
    pub fn iter(&self) -> impl Iterator<Item = &Domain> {
        self.domains.iter()
    }
}
