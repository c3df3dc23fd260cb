use fingermatch::lowlevel::{correspond, ScoreMatrix};
use fingermatch::{
    match_templates, FingerprintTemplate, MinutiaKind, MinutiaeSet, Point, Tolerance,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;

fn random_minutiae(seed: u64, terminations: usize, bifurcations: usize) -> MinutiaeSet {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut seen = HashSet::new();
    let mut points = Vec::new();
    while points.len() < terminations + bifurcations {
        let p = Point::new(rng.random_range(0..480), rng.random_range(0..480));
        if seen.insert(p) {
            points.push(p);
        }
    }
    let bifs = points.split_off(terminations);
    MinutiaeSet::new(points, bifs)
}

#[test]
fn self_match_pairs_every_point_with_itself() {
    let minutiae = random_minutiae(1, 24, 14);
    let template = FingerprintTemplate::build(&minutiae, 5);
    let matched = match_templates(&template, &template, Tolerance::default());

    assert_eq!(matched.count(), minutiae.len());
    assert_eq!(matched.matched_base(), matched.matched_test());
    for (_, pair) in matched.iter() {
        assert_eq!(pair.score, 10);
    }
}

#[test]
fn pairs_never_cross_types() {
    let a = FingerprintTemplate::build(&random_minutiae(2, 20, 20), 3);
    let b = FingerprintTemplate::build(&random_minutiae(3, 20, 20), 3);
    // loose tolerances so plenty of pairs form
    let matched = match_templates(&a, &b, Tolerance::new(0.3, 20.0));
    assert!(matched.count() > 0);

    for (kind, pair) in matched.iter() {
        assert!(a.bucket(kind).contains_key(&pair.base));
        assert!(b.bucket(kind).contains_key(&pair.test));
        let other = match kind {
            MinutiaKind::Termination => MinutiaKind::Bifurcation,
            MinutiaKind::Bifurcation => MinutiaKind::Termination,
        };
        assert!(!a.bucket(other).contains_key(&pair.base));
        assert!(!b.bucket(other).contains_key(&pair.test));
    }
}

#[test]
fn matched_sequences_are_index_aligned() {
    let a = FingerprintTemplate::build(&random_minutiae(4, 15, 10), 3);
    let b = FingerprintTemplate::build(&random_minutiae(5, 12, 9), 3);
    let matched = match_templates(&a, &b, Tolerance::new(0.3, 20.0));
    let base = matched.matched_base();
    let test = matched.matched_test();
    assert_eq!(base.len(), test.len());
    for (i, (_, pair)) in matched.iter().enumerate() {
        assert_eq!(base[i], pair.base);
        assert_eq!(test[i], pair.test);
    }
    assert!(matched.count() <= 12 + 9);
}

#[test]
fn empty_bucket_contributes_nothing() {
    let only_terms = random_minutiae(6, 12, 0);
    let a = FingerprintTemplate::build(&only_terms, 3);
    let matched = match_templates(&a, &a, Tolerance::default());
    assert!(matched.bifurcations.is_empty());
    assert_eq!(matched.terminations.len(), 12);

    let empty = FingerprintTemplate::default();
    assert_eq!(match_templates(&a, &empty, Tolerance::default()).count(), 0);
    assert_eq!(match_templates(&empty, &a, Tolerance::default()).count(), 0);
}

#[test]
fn correspond_follows_greedy_matrix_assignment() {
    let a = FingerprintTemplate::build(&random_minutiae(8, 18, 0), 4);
    let b = FingerprintTemplate::build(&random_minutiae(9, 16, 0), 4);
    let tol = Tolerance::new(0.2, 10.0);

    let found = correspond(a.terminations(), b.terminations(), tol);
    let matrix = ScoreMatrix::compute(a.terminations(), b.terminations(), tol);
    assert_eq!(matrix.rows(), 16);
    assert_eq!(matrix.cols(), 18);

    let expected = matrix.assign_greedy(6 / 2);
    assert_eq!(found.len(), expected.len());
    for (pair, assignment) in found.pairs().iter().zip(&expected) {
        assert_eq!(pair.score, assignment.score);
        assert_eq!(
            Some(pair.base),
            a.terminations().get_index(assignment.col).map(|(k, _)| k)
        );
        assert_eq!(
            Some(pair.test),
            b.terminations().get_index(assignment.row).map(|(k, _)| k)
        );
    }
}
