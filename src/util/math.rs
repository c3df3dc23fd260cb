//! Geometry helpers for tuple profiles.

use crate::minutiae::Point;

/// Euclidean distance between two points.
pub fn euclidean_distance(p: Point, q: Point) -> f64 {
    let dx = f64::from(p.x) - f64::from(q.x);
    let dy = f64::from(p.y) - f64::from(q.y);
    dx.hypot(dy)
}

/// Angle in degrees at `origin` between the segments `origin -> a` and
/// `origin -> b`, folded into [0, 180].
///
/// The cosine is rounded to 6 decimals before `acos`, which keeps collinear
/// configurations inside the domain and matches persisted profiles. Returns 0
/// when either segment has zero length.
pub fn segment_angle_deg(origin: Point, a: Point, b: Point) -> f64 {
    let (ax, ay) = (
        f64::from(origin.x) - f64::from(a.x),
        f64::from(origin.y) - f64::from(a.y),
    );
    let (bx, by) = (
        f64::from(origin.x) - f64::from(b.x),
        f64::from(origin.y) - f64::from(b.y),
    );
    let mag = ax.hypot(ay) * bx.hypot(by);
    if mag == 0.0 {
        return 0.0;
    }
    let cos = round_to((ax * bx + ay * by) / mag, 6).clamp(-1.0, 1.0);
    let degrees = cos.acos().to_degrees() % 360.0;
    if degrees >= 180.0 {
        360.0 - degrees
    } else {
        degrees
    }
}

/// Number of unordered pairs among `k` items, C(k, 2).
pub fn pair_count(k: usize) -> usize {
    k * k.saturating_sub(1) / 2
}

/// Rounds to a fixed number of decimals, ties to even.
///
/// Rounding happens on the exact decimal expansion of `value`, so `0.625`
/// becomes `0.62` while `2.675` (stored as 2.67499..) becomes `2.67`. This
/// reproduces the values held in persisted template databases.
pub(crate) fn round_to(value: f64, decimals: usize) -> f64 {
    if !value.is_finite() {
        return value;
    }
    // float formatting is exact and breaks ties to even
    format!("{value:.decimals$}").parse().unwrap_or(value)
}
