//! AC-3 style propagation over a pattern's label and adjacency constraints.

use std::collections::VecDeque;

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::trace;

use crate::csp::domain::{Domain, DomainSet};
use crate::graph::GraphStore;
use crate::index::TargetIndex;
use crate::types::{EdgeLabelId, LabelId, VertexId};

/// Optional pre-narrowing: target vertices a pattern vertex must not map to.
pub type Exclusions = FxHashMap<usize, FxHashSet<VertexId>>;

/// One directed pairwise constraint `p -[label]-> q` between pattern
/// vertices.
#[derive(Copy, Clone, Debug)]
struct Arc {
    p: usize,
    q: usize,
    label: EdgeLabelId,
}

/// Computes maximal consistent candidate domains for `pattern` against the
/// index's frequent view.
///
/// Arc-consistency runs to fixpoint, or aborts as soon as any domain drops
/// below `threshold` — the pattern is immediately infrequent either way, and
/// the caller reads the decision off the returned domain sizes. Domains that
/// survive propagation are then refined to candidates that take part in at
/// least one injective embedding, so domain sizes count distinct
/// occurrences. Pattern vertex ids must be dense (`0..vertex_count`), which
/// holds for every pattern the search constructs.
pub fn propagate(
    index: &TargetIndex,
    pattern: &GraphStore,
    exclusions: Option<&Exclusions>,
    threshold: usize,
) -> DomainSet {
    let vertex_count = pattern.vertex_count();
    let labels: Vec<LabelId> = (0..vertex_count)
        .map(|i| pattern.vertex_label(VertexId(i as u32)))
        .collect();
    let arcs: Vec<Arc> = pattern
        .edge_ids()
        .map(|e| {
            let p = pattern.source(e).index();
            let q = pattern.target(e).index();
            debug_assert_ne!(p, q, "patterns carry no self loops");
            Arc {
                p,
                q,
                label: pattern.edge_label(e),
            }
        })
        .collect();

    let mut domains = init_domains(index, &labels, exclusions);
    degree_prefilter(index, &labels, &arcs, &mut domains);
    if domains.iter().any(Domain::is_empty) {
        return domains;
    }

    // Arcs constraining a vertex from the left side: x -> v.
    let mut constrained_by: Vec<Vec<usize>> = vec![Vec::new(); vertex_count];
    for (idx, arc) in arcs.iter().enumerate() {
        constrained_by[arc.q].push(idx);
    }

    let mut queue: VecDeque<usize> = (0..arcs.len()).collect();
    let mut queued: FxHashSet<usize> = queue.iter().copied().collect();

    while let Some(arc_idx) = queue.pop_front() {
        queued.remove(&arc_idx);
        let arc = arcs[arc_idx];
        if domains.domain(arc.p).len() < threshold || domains.domain(arc.q).len() < threshold {
            return domains;
        }
        let (p_changed, q_changed) = revise(index, &labels, &mut domains, arc);
        trace!(
            arc = arc_idx,
            p = arc.p,
            q = arc.q,
            p_len = domains.domain(arc.p).len(),
            q_len = domains.domain(arc.q).len(),
            "revised"
        );
        if p_changed {
            if domains.domain(arc.p).len() < threshold {
                return domains;
            }
            requeue(&mut queue, &mut queued, &constrained_by[arc.p], &arcs, &domains);
        }
        if q_changed {
            if domains.domain(arc.q).len() < threshold {
                return domains;
            }
            requeue(&mut queue, &mut queued, &constrained_by[arc.q], &arcs, &domains);
        }
    }

    refine_distinct(index, &labels, &arcs, &mut domains, threshold);
    domains
}

/// Keeps only candidates that appear in at least one injective embedding of
/// the whole pattern, anchored at that candidate.
///
/// Arc-consistency alone admits wrap-around assignments that reuse target
/// vertices; those are not occurrences, and without this step cyclic regions
/// of the target would keep arbitrarily long chain patterns "frequent"
/// forever. A found embedding confirms every assignment it contains, so most
/// candidates never trigger their own search. Aborts as soon as a domain
/// drops below `threshold`.
fn refine_distinct(
    index: &TargetIndex,
    labels: &[LabelId],
    arcs: &[Arc],
    domains: &mut DomainSet,
    threshold: usize,
) {
    let vertex_count = labels.len();
    if vertex_count < 3 {
        // One constraint between two vertices cannot alias: revision already
        // pairs every candidate with a distinct partner.
        return;
    }
    let mut confirmed: Vec<FxHashSet<VertexId>> = vec![FxHashSet::default(); vertex_count];
    // Smallest domains first, so failures surface on the cheap side.
    let mut order: Vec<usize> = (0..vertex_count).collect();
    order.sort_unstable_by_key(|&i| domains.domain(i).len());

    for &p in &order {
        for v in domains.domain(p).sorted() {
            if confirmed[p].contains(&v) {
                continue;
            }
            if let Some(assignment) = embed_anchored(index, labels, arcs, domains, p, v) {
                for (q, w) in assignment.into_iter().enumerate() {
                    confirmed[q].insert(w);
                }
            }
        }
        let keep = std::mem::take(&mut confirmed[p]);
        domains.domain_mut(p).retain(|v| keep.contains(v));
        confirmed[p] = keep;
        if domains.domain(p).len() < threshold {
            return;
        }
    }
}

/// Searches for one injective embedding with `anchor` fixed to `value`.
/// Returns the full assignment (pattern vertex -> target vertex) on success.
fn embed_anchored(
    index: &TargetIndex,
    labels: &[LabelId],
    arcs: &[Arc],
    domains: &DomainSet,
    anchor: usize,
    value: VertexId,
) -> Option<Vec<VertexId>> {
    let vertex_count = labels.len();
    let mut order: Vec<usize> = (0..vertex_count).filter(|&i| i != anchor).collect();
    order.sort_unstable_by_key(|&i| domains.domain(i).len());

    let mut assignment: Vec<Option<VertexId>> = vec![None; vertex_count];
    assignment[anchor] = Some(value);
    let mut used: FxHashSet<VertexId> = [value].into_iter().collect();

    fn consistent(
        index: &TargetIndex,
        labels: &[LabelId],
        arcs: &[Arc],
        assignment: &[Option<VertexId>],
    ) -> bool {
        arcs.iter().all(|arc| {
            match (assignment[arc.p], assignment[arc.q]) {
                (Some(v), Some(w)) => index
                    .neighbors(v)
                    .out_with(labels[arc.q], arc.label)
                    .any(|n| n == w),
                _ => true,
            }
        })
    }

    fn backtrack(
        index: &TargetIndex,
        labels: &[LabelId],
        arcs: &[Arc],
        domains: &DomainSet,
        order: &[usize],
        depth: usize,
        assignment: &mut Vec<Option<VertexId>>,
        used: &mut FxHashSet<VertexId>,
    ) -> bool {
        let Some(&p) = order.get(depth) else {
            return true;
        };
        for v in domains.domain(p).sorted() {
            if used.contains(&v) {
                continue;
            }
            assignment[p] = Some(v);
            used.insert(v);
            if consistent(index, labels, arcs, assignment)
                && backtrack(index, labels, arcs, domains, order, depth + 1, assignment, used)
            {
                return true;
            }
            assignment[p] = None;
            used.remove(&v);
        }
        false
    }

    if !consistent(index, labels, arcs, &assignment) {
        return None;
    }
    if backtrack(
        index,
        labels,
        arcs,
        domains,
        &order,
        0,
        &mut assignment,
        &mut used,
    ) {
        Some(assignment.into_iter().map(|v| v.expect("full assignment")).collect())
    } else {
        None
    }
}

/// Each domain starts as every target vertex sharing the pattern vertex's
/// label, minus any explicit exclusions.
fn init_domains(
    index: &TargetIndex,
    labels: &[LabelId],
    exclusions: Option<&Exclusions>,
) -> DomainSet {
    let domains = labels
        .iter()
        .enumerate()
        .map(|(i, &label)| {
            let mut values: FxHashSet<VertexId> =
                index.vertices_with_label(label).iter().copied().collect();
            if let Some(excluded) = exclusions.and_then(|map| map.get(&i)) {
                values.retain(|v| !excluded.contains(v));
            }
            Domain::from_set(values)
        })
        .collect();
    DomainSet::new(domains)
}

/// Drops candidates whose per-label in/out degree cannot satisfy the
/// pattern's own adjacent-edge tally. Cheap, local, applied once up front.
fn degree_prefilter(
    index: &TargetIndex,
    labels: &[LabelId],
    arcs: &[Arc],
    domains: &mut DomainSet,
) {
    let mut required_out: Vec<FxHashMap<LabelId, usize>> = vec![FxHashMap::default(); labels.len()];
    let mut required_in: Vec<FxHashMap<LabelId, usize>> = vec![FxHashMap::default(); labels.len()];
    for arc in arcs {
        *required_out[arc.p].entry(labels[arc.q]).or_default() += 1;
        *required_in[arc.q].entry(labels[arc.p]).or_default() += 1;
    }
    for i in 0..labels.len() {
        let out_needs = &required_out[i];
        let in_needs = &required_in[i];
        if out_needs.is_empty() && in_needs.is_empty() {
            continue;
        }
        domains.domain_mut(i).retain(|&v| {
            let neighbors = index.neighbors(v);
            out_needs
                .iter()
                .all(|(&label, &need)| neighbors.out_degree(label) >= need)
                && in_needs
                    .iter()
                    .all(|(&label, &need)| neighbors.in_degree(label) >= need)
        });
    }
}

/// Revises both sides of one arc together: `p` keeps candidates with a
/// matching out-neighbor inside `dom(q)`, and `dom(q)` is restricted to the
/// neighbors actually used.
fn revise(
    index: &TargetIndex,
    labels: &[LabelId],
    domains: &mut DomainSet,
    arc: Arc,
) -> (bool, bool) {
    let label_q = labels[arc.q];
    let mut new_p: FxHashSet<VertexId> = FxHashSet::default();
    let mut new_q: FxHashSet<VertexId> = FxHashSet::default();
    {
        let dom_q = domains.domain(arc.q);
        for v in domains.domain(arc.p).iter() {
            let mut supported = false;
            for w in index.neighbors(v).out_with(label_q, arc.label) {
                if dom_q.contains(w) {
                    new_q.insert(w);
                    supported = true;
                }
            }
            if supported {
                new_p.insert(v);
            }
        }
    }
    let p_changed = new_p.len() != domains.domain(arc.p).len();
    let q_changed = new_q.len() != domains.domain(arc.q).len();
    domains.domain_mut(arc.p).replace(new_p);
    domains.domain_mut(arc.q).replace(new_q);
    (p_changed, q_changed)
}

/// Queues every not-yet-queued arc, ordered so arcs touching the smallest
/// current domain propagate first.
fn requeue(
    queue: &mut VecDeque<usize>,
    queued: &mut FxHashSet<usize>,
    candidates: &[usize],
    arcs: &[Arc],
    domains: &DomainSet,
) {
    for &arc_idx in candidates {
        if !queued.insert(arc_idx) {
            continue;
        }
        let key = arc_min_len(arcs[arc_idx], domains);
        let pos = queue
            .iter()
            .position(|&other| arc_min_len(arcs[other], domains) > key)
            .unwrap_or(queue.len());
        queue.insert(pos, arc_idx);
    }
}

fn arc_min_len(arc: Arc, domains: &DomainSet) -> usize {
    domains.domain(arc.p).len().min(domains.domain(arc.q).len())
}
