//! Dense score matrix between two profile sets and its greedy assignment.

use crate::profile::ProfileSet;
use crate::score::{score_profiles, Tolerance};
use crate::util::{FingerMatchError, FingerMatchResult};
#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Row-major slot-agreement scores; rows are test points, columns base points.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScoreMatrix {
    rows: usize,
    cols: usize,
    data: Vec<usize>,
}

/// A committed (row, column) pair and its score.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Assignment {
    /// Test index.
    pub row: usize,
    /// Base index.
    pub col: usize,
    pub score: usize,
}

impl ScoreMatrix {
    /// Wraps precomputed scores.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<usize>) -> FingerMatchResult<Self> {
        let needed = rows
            .checked_mul(cols)
            .ok_or(FingerMatchError::InvalidDimensions {
                width: cols,
                height: rows,
            })?;
        if data.len() != needed {
            return Err(FingerMatchError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self { rows, cols, data })
    }

    /// Scores every (test, base) profile pair.
    pub fn compute(base: &ProfileSet, test: &ProfileSet, tol: Tolerance) -> Self {
        let mut data = Vec::with_capacity(base.len() * test.len());
        for (_, tp) in test.iter() {
            data.extend(base.iter().map(|(_, bp)| score_profiles(tp, bp, tol)));
        }
        Self {
            rows: test.len(),
            cols: base.len(),
            data,
        }
    }

    /// Scores every (test, base) profile pair, one rayon task per test row.
    #[cfg(feature = "rayon")]
    pub fn compute_par(base: &ProfileSet, test: &ProfileSet, tol: Tolerance) -> Self {
        let rows: Vec<Vec<usize>> = (0..test.len())
            .into_par_iter()
            .map(|row| match test.get_index(row) {
                Some((_, tp)) => base.iter().map(|(_, bp)| score_profiles(tp, bp, tol)).collect(),
                None => Vec::new(),
            })
            .collect();
        Self {
            rows: test.len(),
            cols: base.len(),
            data: rows.concat(),
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Score at `(row, col)`, or `None` if out of range.
    pub fn get(&self, row: usize, col: usize) -> Option<usize> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.data.get(row * self.cols + col).copied()
    }

    /// Greedy one-to-one assignment by descending score.
    ///
    /// Cells are visited once in descending score order, ties in row-major
    /// order. A cell whose row or column is already taken is skipped,
    /// otherwise the pair is committed. At most `min(rows, cols)` pairs are
    /// committed. Pairs scoring below `min_score` still take their row and
    /// column but are left out of the result.
    pub fn assign_greedy(&self, min_score: usize) -> Vec<Assignment> {
        let limit = self.rows.min(self.cols);
        if limit == 0 {
            return Vec::new();
        }

        let mut order: Vec<usize> = (0..self.data.len()).collect();
        // stable sort keeps row-major order among equal scores
        order.sort_by(|&a, &b| self.data[b].cmp(&self.data[a]));

        let mut row_taken = vec![false; self.rows];
        let mut col_taken = vec![false; self.cols];
        let mut committed = 0usize;
        let mut out = Vec::new();

        for cell in order {
            if committed == limit {
                break;
            }
            let (row, col) = (cell / self.cols, cell % self.cols);
            if row_taken[row] || col_taken[col] {
                continue;
            }
            row_taken[row] = true;
            col_taken[col] = true;
            committed += 1;

            let score = self.data[cell];
            if score >= min_score {
                out.push(Assignment { row, col, score });
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::{Assignment, ScoreMatrix};
    use crate::util::FingerMatchError;

    fn pairs(found: &[Assignment]) -> Vec<(usize, usize)> {
        found.iter().map(|a| (a.row, a.col)).collect()
    }

    #[test]
    fn from_vec_checks_length() {
        let err = ScoreMatrix::from_vec(2, 3, vec![0; 5]).unwrap_err();
        assert_eq!(err, FingerMatchError::BufferTooSmall { needed: 6, got: 5 });
    }

    #[test]
    fn picks_global_maximum_first() {
        let m = ScoreMatrix::from_vec(2, 2, vec![2, 1, 3, 0]).unwrap();
        // (1, 0) = 3 wins, leaving (0, 1)
        assert_eq!(pairs(&m.assign_greedy(0)), vec![(1, 0), (0, 1)]);
    }

    #[test]
    fn ties_resolve_in_row_major_order() {
        let m = ScoreMatrix::from_vec(2, 2, vec![2, 2, 2, 2]).unwrap();
        assert_eq!(pairs(&m.assign_greedy(0)), vec![(0, 0), (1, 1)]);

        let m = ScoreMatrix::from_vec(2, 2, vec![0, 3, 3, 0]).unwrap();
        assert_eq!(pairs(&m.assign_greedy(0)), vec![(0, 1), (1, 0)]);
    }

    #[test]
    fn low_scores_consume_without_reporting() {
        let m = ScoreMatrix::from_vec(2, 2, vec![5, 1, 4, 0]).unwrap();
        let found = m.assign_greedy(3);
        assert_eq!(
            found,
            vec![Assignment {
                row: 0,
                col: 0,
                score: 5,
            }]
        );
    }

    #[test]
    fn commits_at_most_min_dimension() {
        let m = ScoreMatrix::from_vec(1, 3, vec![1, 4, 2]).unwrap();
        assert_eq!(pairs(&m.assign_greedy(0)), vec![(0, 1)]);

        let empty = ScoreMatrix::from_vec(0, 3, Vec::new()).unwrap();
        assert!(empty.assign_greedy(0).is_empty());
    }
}
