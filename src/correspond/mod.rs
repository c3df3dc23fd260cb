//! Point correspondences between two fingerprints.
//!
//! Correspondences are built per type bucket: every test profile is scored
//! against every base profile and the resulting matrix is assigned greedily.
//! Pairs scoring below half the slot count consume their points but are not
//! reported as matches.

mod matrix;
mod partitioned;

pub use matrix::{Assignment, ScoreMatrix};
pub use partitioned::{match_templates, TemplateMatch};
#[cfg(feature = "rayon")]
pub use partitioned::match_templates_par;

use crate::minutiae::PointKey;
use crate::profile::ProfileSet;
use crate::score::Tolerance;

/// A base/test point pair judged to be the same physical minutia.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MatchedPair {
    pub base: PointKey,
    pub test: PointKey,
    /// Slot agreement between the two profiles.
    pub score: usize,
}

/// Index-aligned matched points of one type bucket.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Correspondence {
    pairs: Vec<MatchedPair>,
}

impl Correspondence {
    /// Matched pairs in commit order.
    pub fn pairs(&self) -> &[MatchedPair] {
        &self.pairs
    }

    /// Matched base points, aligned with [`Correspondence::matched_test`].
    pub fn matched_base(&self) -> Vec<PointKey> {
        self.pairs.iter().map(|p| p.base).collect()
    }

    /// Matched test points, aligned with [`Correspondence::matched_base`].
    pub fn matched_test(&self) -> Vec<PointKey> {
        self.pairs.iter().map(|p| p.test).collect()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Matches two profile sets of the same type.
///
/// The quality floor is `T / 2` (integer division), where `T` is the slot
/// count of the first test profile. Empty sides produce no correspondences.
/// Profiles without slots give `T = 0`, so every committed pair counts.
pub fn correspond(base: &ProfileSet, test: &ProfileSet, tol: Tolerance) -> Correspondence {
    let Some(slots) = slot_count(base, test) else {
        return Correspondence::default();
    };
    let matrix = ScoreMatrix::compute(base, test, tol);
    collect_pairs(&matrix, base, test, slots)
}

/// Same as [`correspond`], scoring test rows in parallel.
#[cfg(feature = "rayon")]
pub fn correspond_par(base: &ProfileSet, test: &ProfileSet, tol: Tolerance) -> Correspondence {
    let Some(slots) = slot_count(base, test) else {
        return Correspondence::default();
    };
    let matrix = ScoreMatrix::compute_par(base, test, tol);
    collect_pairs(&matrix, base, test, slots)
}

fn slot_count(base: &ProfileSet, test: &ProfileSet) -> Option<usize> {
    if base.is_empty() {
        return None;
    }
    Some(test.get_index(0)?.1.slot_count())
}

fn collect_pairs(
    matrix: &ScoreMatrix,
    base: &ProfileSet,
    test: &ProfileSet,
    slots: usize,
) -> Correspondence {
    let pairs = matrix
        .assign_greedy(slots / 2)
        .into_iter()
        .filter_map(|a| {
            let (base_key, _) = base.get_index(a.col)?;
            let (test_key, _) = test.get_index(a.row)?;
            Some(MatchedPair {
                base: base_key,
                test: test_key,
                score: a.score,
            })
        })
        .collect();
    Correspondence { pairs }
}

#[cfg(test)]
mod tests {
    use super::correspond;
    use crate::minutiae::PointKey;
    use crate::profile::{ProfileSet, TupleProfile};
    use crate::score::Tolerance;

    fn set(entries: &[((i32, i32), [f64; 3], [f64; 3])]) -> ProfileSet {
        entries
            .iter()
            .map(|&((x, y), ratios, angles)| {
                (
                    PointKey::new(x, y),
                    TupleProfile::new(ratios.to_vec(), angles.to_vec()).unwrap(),
                )
            })
            .collect()
    }

    #[test]
    fn identical_sets_match_point_to_point() {
        let base = set(&[
            ((10, 10), [0.2, 0.5, 0.9], [20.0, 70.0, 150.0]),
            ((40, 12), [0.3, 0.6, 0.8], [35.0, 95.0, 120.0]),
        ]);
        let found = correspond(&base, &base, Tolerance::default());
        assert_eq!(found.len(), 2);
        for pair in found.pairs() {
            assert_eq!(pair.base, pair.test);
            assert_eq!(pair.score, 3);
        }
    }

    #[test]
    fn empty_side_yields_nothing() {
        let base = set(&[((1, 1), [0.2, 0.5, 0.9], [20.0, 70.0, 150.0])]);
        let empty = ProfileSet::new();
        assert!(correspond(&base, &empty, Tolerance::default()).is_empty());
        assert!(correspond(&empty, &base, Tolerance::default()).is_empty());
    }

    #[test]
    fn slotless_profiles_pair_at_zero_floor() {
        let base: ProfileSet = [
            (PointKey::new(1, 1), TupleProfile::default()),
            (PointKey::new(9, 4), TupleProfile::default()),
        ]
        .into_iter()
        .collect();
        let test: ProfileSet = [(PointKey::new(3, 3), TupleProfile::default())]
            .into_iter()
            .collect();
        let found = correspond(&base, &test, Tolerance::default());
        assert_eq!(found.len(), 1);
        assert_eq!(found.pairs()[0].base, PointKey::new(1, 1));
        assert_eq!(found.pairs()[0].test, PointKey::new(3, 3));
        assert_eq!(found.pairs()[0].score, 0);
    }

    #[test]
    fn weak_pairs_are_dropped() {
        let base = set(&[((1, 1), [0.2, 0.5, 0.9], [20.0, 70.0, 150.0])]);
        let test = set(&[((2, 2), [0.2, 0.1, 0.1], [20.0, 1.0, 1.0])]);
        // one slot agrees, floor is 3 / 2 = 1
        assert_eq!(correspond(&base, &test, Tolerance::default()).len(), 1);
        let test = set(&[((2, 2), [0.1, 0.1, 0.1], [1.0, 1.0, 1.0])]);
        assert!(correspond(&base, &test, Tolerance::default()).is_empty());
    }
}
