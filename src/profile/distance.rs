//! Dense pairwise distance matrix over a point cloud.

use crate::minutiae::Point;
use crate::util::euclidean_distance;
#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Row-major `n x n` matrix of Euclidean distances.
#[derive(Clone, Debug)]
pub struct DistanceMatrix {
    n: usize,
    data: Vec<f64>,
}

impl DistanceMatrix {
    /// Computes all pairwise distances.
    pub fn build(points: &[Point]) -> Self {
        let n = points.len();
        let mut data = Vec::with_capacity(n * n);
        for &p in points {
            data.extend(points.iter().map(|&q| euclidean_distance(p, q)));
        }
        Self { n, data }
    }

    /// Computes all pairwise distances with one rayon task per row.
    #[cfg(feature = "rayon")]
    pub fn build_par(points: &[Point]) -> Self {
        let n = points.len();
        let rows: Vec<Vec<f64>> = points
            .par_iter()
            .map(|&p| points.iter().map(|&q| euclidean_distance(p, q)).collect())
            .collect();
        Self {
            n,
            data: rows.concat(),
        }
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.n
    }

    /// Returns true for an empty cloud.
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Distances from point `i` to every point, or `None` if out of range.
    pub fn row(&self, i: usize) -> Option<&[f64]> {
        if i >= self.n {
            return None;
        }
        self.data.get(i * self.n..(i + 1) * self.n)
    }

    /// Indices of the `k` nearest points to `i`, nearest first.
    ///
    /// The point itself and any coincident point (distance 0) are excluded.
    /// Equal distances keep index order and each yields its own point. Fewer
    /// than `k` indices are returned when the cloud is too small.
    pub fn nearest(&self, i: usize, k: usize) -> Vec<usize> {
        let Some(row) = self.row(i) else {
            return Vec::new();
        };
        let mut candidates: Vec<usize> = (0..self.n).filter(|&j| j != i && row[j] > 0.0).collect();
        // stable: ties keep their first-encountered order
        candidates.sort_by(|&a, &b| row[a].total_cmp(&row[b]));
        candidates.truncate(k);
        candidates
    }
}

#[cfg(test)]
mod tests {
    use super::DistanceMatrix;
    use crate::minutiae::Point;

    #[test]
    fn matrix_is_symmetric_with_zero_diagonal() {
        let points = [Point::new(0, 0), Point::new(3, 4), Point::new(6, 8)];
        let m = DistanceMatrix::build(&points);
        assert_eq!(m.len(), 3);
        for i in 0..3 {
            let row = m.row(i).unwrap();
            assert_eq!(row[i], 0.0);
            for j in 0..3 {
                assert_eq!(row[j], m.row(j).unwrap()[i]);
            }
        }
        assert!((m.row(0).unwrap()[2] - 10.0).abs() < 1e-12);
        assert!(m.row(3).is_none());
    }

    #[test]
    fn nearest_breaks_ties_by_index_and_skips_coincident() {
        let points = [
            Point::new(0, 0),
            Point::new(0, 0),
            Point::new(0, 5),
            Point::new(5, 0),
            Point::new(1, 0),
        ];
        let m = DistanceMatrix::build(&points);
        assert_eq!(m.nearest(0, 3), vec![4, 2, 3]);
        assert_eq!(m.nearest(0, 10), vec![4, 2, 3]);
        assert!(m.nearest(9, 2).is_empty());
    }
}
