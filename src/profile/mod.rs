//! Tuple profiles: rotation-invariant local-shape signatures of minutiae.
//!
//! A profile for minutia `m` looks at its `k` nearest neighbours in the whole
//! cloud. Every unordered neighbour pair contributes one slot: the ratio of
//! the nearer distance over the farther one, and the angle subtended at `m`.
//! Slots are ordered by neighbour rank, so `ratios[i]` and `angles[i]`
//! always describe the same pair.

mod distance;

pub use distance::DistanceMatrix;

use crate::minutiae::{Point, PointKey};
use crate::util::math::round_to;
use crate::util::{segment_angle_deg, FingerMatchError, FingerMatchResult};
use std::collections::{HashMap, HashSet};

/// Decimals kept for distance ratios.
pub const RATIO_DECIMALS: usize = 2;
/// Decimals kept for angles in degrees.
pub const ANGLE_DECIMALS: usize = 2;

/// Raw `(ratios, angles)` pair as persisted.
pub type RawProfile = (Vec<f64>, Vec<f64>);

/// Index-aligned distance ratios and angles for one minutia.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "RawProfile", into = "RawProfile")
)]
pub struct TupleProfile {
    ratios: Vec<f64>,
    angles: Vec<f64>,
}

impl TupleProfile {
    /// Creates a profile; both sequences must have the same length.
    pub fn new(ratios: Vec<f64>, angles: Vec<f64>) -> FingerMatchResult<Self> {
        if ratios.len() != angles.len() {
            return Err(FingerMatchError::ProfileLengthMismatch {
                ratios: ratios.len(),
                angles: angles.len(),
            });
        }
        Ok(Self { ratios, angles })
    }

    /// Builds the profile of `center` from its neighbours, nearest first.
    ///
    /// `distances[i]` is the distance from `center` to `neighbours[i]`.
    pub(crate) fn from_neighbours(center: Point, neighbours: &[Point], distances: &[f64]) -> Self {
        debug_assert_eq!(neighbours.len(), distances.len());
        let slots = crate::util::pair_count(neighbours.len());
        let mut ratios = Vec::with_capacity(slots);
        let mut angles = Vec::with_capacity(slots);
        for a in 0..neighbours.len() {
            for b in a + 1..neighbours.len() {
                ratios.push(round_to(distances[a] / distances[b], RATIO_DECIMALS));
                angles.push(round_to(
                    segment_angle_deg(center, neighbours[a], neighbours[b]),
                    ANGLE_DECIMALS,
                ));
            }
        }
        Self { ratios, angles }
    }

    /// Distance ratios, one per slot.
    pub fn ratios(&self) -> &[f64] {
        &self.ratios
    }

    /// Angles in degrees, one per slot.
    pub fn angles(&self) -> &[f64] {
        &self.angles
    }

    /// Number of slots, C(k, 2) for `k` neighbours.
    pub fn slot_count(&self) -> usize {
        self.ratios.len()
    }
}

impl TryFrom<RawProfile> for TupleProfile {
    type Error = FingerMatchError;

    fn try_from((ratios, angles): RawProfile) -> FingerMatchResult<Self> {
        Self::new(ratios, angles)
    }
}

impl From<TupleProfile> for RawProfile {
    fn from(profile: TupleProfile) -> Self {
        (profile.ratios, profile.angles)
    }
}

/// Insertion-ordered map from point key to profile (one type bucket).
///
/// Iteration order is insertion order; the correspondence matcher's
/// tie-breaking depends on it.
#[derive(Clone, Debug, Default)]
pub struct ProfileSet {
    entries: Vec<(PointKey, TupleProfile)>,
    index: HashMap<PointKey, usize>,
}

impl ProfileSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a profile. An existing key keeps its position and gets the new
    /// profile; the old one is returned.
    pub fn insert(&mut self, key: PointKey, profile: TupleProfile) -> Option<TupleProfile> {
        if let Some(&idx) = self.index.get(&key) {
            return Some(std::mem::replace(&mut self.entries[idx].1, profile));
        }
        self.index.insert(key, self.entries.len());
        self.entries.push((key, profile));
        None
    }

    /// Looks up the profile stored for a key.
    pub fn get(&self, key: &PointKey) -> Option<&TupleProfile> {
        self.index.get(key).map(|&idx| &self.entries[idx].1)
    }

    /// Returns the entry at a position in insertion order.
    pub fn get_index(&self, idx: usize) -> Option<(PointKey, &TupleProfile)> {
        self.entries.get(idx).map(|(key, profile)| (*key, profile))
    }

    pub fn contains_key(&self, key: &PointKey) -> bool {
        self.index.contains_key(key)
    }

    /// Iterates entries in insertion order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (PointKey, &TupleProfile)> + '_ {
        self.entries.iter().map(|(key, profile)| (*key, profile))
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl ExactSizeIterator<Item = PointKey> + '_ {
        self.entries.iter().map(|(key, _)| *key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl PartialEq for ProfileSet {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl FromIterator<(PointKey, TupleProfile)> for ProfileSet {
    fn from_iter<I: IntoIterator<Item = (PointKey, TupleProfile)>>(iter: I) -> Self {
        let mut set = Self::new();
        for (key, profile) in iter {
            set.insert(key, profile);
        }
        set
    }
}

/// Builds profiles for the members of `subset`, using the whole of
/// `all_points` as the neighbourhood.
///
/// Output follows the order of `all_points`. Fewer than `k` available
/// neighbours shrink the profile instead of failing.
pub fn build_profiles(all_points: &[Point], subset: &[Point], k: usize) -> ProfileSet {
    let matrix = DistanceMatrix::build(all_points);
    profiles_from_matrix(&matrix, all_points, subset, k)
}

/// Same as [`build_profiles`], computing distance rows in parallel.
#[cfg(feature = "rayon")]
pub fn build_profiles_par(all_points: &[Point], subset: &[Point], k: usize) -> ProfileSet {
    let matrix = DistanceMatrix::build_par(all_points);
    profiles_from_matrix(&matrix, all_points, subset, k)
}

/// Builds profiles from a precomputed distance matrix over `all_points`.
pub(crate) fn profiles_from_matrix(
    matrix: &DistanceMatrix,
    all_points: &[Point],
    subset: &[Point],
    k: usize,
) -> ProfileSet {
    debug_assert_eq!(matrix.len(), all_points.len());
    let members: HashSet<Point> = subset.iter().copied().collect();
    let mut out = ProfileSet::new();
    if members.is_empty() {
        return out;
    }

    for (i, &center) in all_points.iter().enumerate() {
        if !members.contains(&center) {
            continue;
        }
        let Some(row) = matrix.row(i) else {
            continue;
        };
        let nearest = matrix.nearest(i, k);
        let neighbours: Vec<Point> = nearest.iter().map(|&j| all_points[j]).collect();
        let distances: Vec<f64> = nearest.iter().map(|&j| row[j]).collect();
        out.insert(
            PointKey::from(center),
            TupleProfile::from_neighbours(center, &neighbours, &distances),
        );
    }
    out
}
