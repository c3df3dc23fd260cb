//! Slot-level agreement between two tuple profiles.

use crate::profile::TupleProfile;

/// Absolute tolerances used when comparing two profile slots.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tolerance {
    /// Maximum ratio difference.
    pub ratio: f64,
    /// Maximum angle difference in degrees.
    pub angle_deg: f64,
}

impl Tolerance {
    pub const fn new(ratio: f64, angle_deg: f64) -> Self {
        Self { ratio, angle_deg }
    }

    #[inline]
    fn accepts(&self, ratio_a: f64, angle_a: f64, ratio_b: f64, angle_b: f64) -> bool {
        ratio_a >= ratio_b - self.ratio
            && ratio_a <= ratio_b + self.ratio
            && angle_a >= angle_b - self.angle_deg
            && angle_a <= angle_b + self.angle_deg
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            ratio: 0.1,
            angle_deg: 2.0,
        }
    }
}

/// Counts slots of `a` that pair with a distinct slot of `b`.
///
/// Slots of `a` are visited in index order and each one takes the first
/// unused compatible slot of `b`. This is a first-fit greedy pairing, not a
/// maximum matching; persisted databases were scored this way.
pub fn score_profiles(a: &TupleProfile, b: &TupleProfile, tol: Tolerance) -> usize {
    let (ratios_b, angles_b) = (b.ratios(), b.angles());
    let mut used = vec![false; ratios_b.len()];
    let mut count = 0usize;

    for (&ratio_a, &angle_a) in a.ratios().iter().zip(a.angles()) {
        let hit = (0..ratios_b.len())
            .find(|&j| !used[j] && tol.accepts(ratio_a, angle_a, ratios_b[j], angles_b[j]));
        if let Some(j) = hit {
            used[j] = true;
            count += 1;
        }
    }
    count
}
