#![allow(missing_docs)]

use grafito::{load_str, materialize, mine, MineConfig};

const WORKED_EXAMPLE: &str = "#\n\
                              v 0 A\nv 1 B\nv 2 A\nv 3 B\n\
                              e 0 1 1\ne 2 3 1\ne 1 2 1\n";

const TWO_CYCLES: &str = "#\n\
                          v 0 A\nv 1 B\nv 2 C\nv 3 A\nv 4 B\nv 5 C\n\
                          e 0 1 1\ne 1 2 1\ne 2 0 1\n\
                          e 3 4 1\ne 4 5 1\ne 5 3 1\n";

#[test]
fn worked_example_end_to_end() {
    let mut loaded = load_str(WORKED_EXAMPLE).expect("example parses");
    let config = MineConfig {
        min_support: 2,
        min_pattern_vertices: 2,
    };
    let (patterns, stats) = mine(&mut loaded.index, &config);
    assert_eq!(patterns.len(), 1, "A->B is the only frequent pattern");
    assert_eq!(stats.stored, 1);
    let pattern = &patterns[0];
    assert!(pattern.support() >= 2);

    let instances = materialize(pattern, &loaded.index);
    let mut sets: Vec<Vec<u32>> = instances
        .iter()
        .map(|i| i.vertices().iter().map(|v| v.0).collect())
        .collect();
    sets.sort();
    assert_eq!(sets, vec![vec![0, 1], vec![2, 3]]);
}

#[test]
fn threshold_above_max_support_reports_nothing() {
    let mut loaded = load_str(WORKED_EXAMPLE).expect("example parses");
    assert_eq!(loaded.index.max_edge_support(), 2);
    let config = MineConfig {
        min_support: 3,
        min_pattern_vertices: 2,
    };
    let (patterns, stats) = mine(&mut loaded.index, &config);
    assert!(patterns.is_empty());
    assert_eq!(stats.seeds, 0, "no frequent single edge seeds the search");
}

#[test]
fn three_cycle_stores_one_canonical_representative() {
    let mut loaded = load_str(TWO_CYCLES).expect("cycles parse");
    let config = MineConfig {
        min_support: 2,
        min_pattern_vertices: 3,
    };
    let (patterns, _) = mine(&mut loaded.index, &config);
    let cycles: Vec<_> = patterns.iter().filter(|p| p.edge_count() == 3).collect();
    assert_eq!(
        cycles.len(),
        1,
        "rotations of the cycle never appear as separate entries"
    );
    let instances = materialize(cycles[0], &loaded.index);
    assert_eq!(instances.len(), 2);
    for instance in &instances {
        assert_eq!(instance.edges().len(), 3);
    }
}

#[test]
fn thresholds_are_reversible_without_reloading() {
    let mut loaded = load_str(WORKED_EXAMPLE).expect("example parses");
    let at_two = mine(
        &mut loaded.index,
        &MineConfig {
            min_support: 2,
            min_pattern_vertices: 2,
        },
    )
    .0
    .len();
    // Raise past the maximum, then come back down: the preserved statistics
    // must reproduce the original view.
    let at_three = mine(
        &mut loaded.index,
        &MineConfig {
            min_support: 3,
            min_pattern_vertices: 2,
        },
    )
    .0
    .len();
    let again_at_two = mine(
        &mut loaded.index,
        &MineConfig {
            min_support: 2,
            min_pattern_vertices: 2,
        },
    )
    .0
    .len();
    assert_eq!(at_three, 0);
    assert_eq!(at_two, again_at_two);
}

#[test]
fn every_stored_pattern_reverifies_and_every_label_is_frequent() {
    let mut loaded = load_str(TWO_CYCLES).expect("cycles parse");
    let config = MineConfig {
        min_support: 2,
        min_pattern_vertices: 3,
    };
    let (patterns, _) = mine(&mut loaded.index, &config);
    assert!(!patterns.is_empty());

    for &label in loaded.index.frequent_labels() {
        assert!(loaded.index.stats().label_frequency(label) >= 2);
    }
    for pattern in &patterns {
        assert!(pattern.vertex_count() >= config.min_pattern_vertices);
        // CSP engine as an independent oracle for the stored support.
        let domains = grafito::csp::propagate(
            &loaded.index,
            pattern.store(),
            None,
            config.min_support,
        );
        assert!(domains.is_frequent(config.min_support));
        assert_eq!(domains.support(), pattern.support());
    }
}
