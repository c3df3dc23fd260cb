//! Minutiae primitives produced by the extraction stage.
//!
//! Coordinates are integer pixel positions. `PointKey` is the ordered key
//! under which a minutia's tuple profile is stored; its textual form
//! `"(x, y)"` is the one used by persisted template databases.

use crate::util::{FingerMatchError, FingerMatchResult};
use std::fmt;
use std::str::FromStr;

/// 2D pixel coordinate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "[i32; 2]", into = "[i32; 2]")
)]
pub struct Point {
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
}

impl Point {
    /// Creates a point from its coordinates.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<[i32; 2]> for Point {
    fn from([x, y]: [i32; 2]) -> Self {
        Self { x, y }
    }
}

impl From<Point> for [i32; 2] {
    fn from(p: Point) -> Self {
        [p.x, p.y]
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// Ordered mapping key identifying a minutia by its coordinate.
///
/// Two minutiae sharing a coordinate share a key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PointKey {
    x: i32,
    y: i32,
}

impl PointKey {
    /// Creates a key from raw coordinates.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the coordinate this key encodes.
    pub const fn point(self) -> Point {
        Point::new(self.x, self.y)
    }
}

impl From<Point> for PointKey {
    fn from(p: Point) -> Self {
        Self::new(p.x, p.y)
    }
}

impl fmt::Display for PointKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl FromStr for PointKey {
    type Err = FingerMatchError;

    fn from_str(text: &str) -> FingerMatchResult<Self> {
        let invalid = || FingerMatchError::InvalidPointKey {
            text: text.to_owned(),
        };
        let inner = text
            .trim()
            .strip_prefix('(')
            .and_then(|s| s.strip_suffix(')'))
            .ok_or_else(invalid)?;
        let (x, y) = inner.split_once(',').ok_or_else(invalid)?;
        let x = x.trim().parse().map_err(|_| invalid())?;
        let y = y.trim().parse().map_err(|_| invalid())?;
        Ok(Self::new(x, y))
    }
}

/// Ridge feature type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MinutiaKind {
    /// Ridge ending.
    Termination,
    /// Ridge split.
    Bifurcation,
}

impl MinutiaKind {
    /// Both kinds in bucket order.
    pub const ALL: [MinutiaKind; 2] = [MinutiaKind::Termination, MinutiaKind::Bifurcation];

    /// Bucket name used by persisted templates.
    pub fn as_str(self) -> &'static str {
        match self {
            MinutiaKind::Termination => "Termination",
            MinutiaKind::Bifurcation => "Bifurcation",
        }
    }
}

impl fmt::Display for MinutiaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A located minutia.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Minutia {
    /// Pixel location.
    pub point: Point,
    /// Feature type.
    pub kind: MinutiaKind,
}

impl Minutia {
    pub const fn new(point: Point, kind: MinutiaKind) -> Self {
        Self { point, kind }
    }
}

/// Minutiae extracted from one fingerprint, split by type.
///
/// The full point cloud is the terminations followed by the bifurcations.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MinutiaeSet {
    #[cfg_attr(feature = "serde", serde(default))]
    terminations: Vec<Point>,
    #[cfg_attr(feature = "serde", serde(default))]
    bifurcations: Vec<Point>,
}

impl MinutiaeSet {
    /// Creates a set from per-type point lists.
    pub fn new(terminations: Vec<Point>, bifurcations: Vec<Point>) -> Self {
        Self {
            terminations,
            bifurcations,
        }
    }

    /// Groups typed minutiae, keeping their relative order within each type.
    pub fn from_minutiae<I>(minutiae: I) -> Self
    where
        I: IntoIterator<Item = Minutia>,
    {
        let mut set = Self::default();
        for m in minutiae {
            match m.kind {
                MinutiaKind::Termination => set.terminations.push(m.point),
                MinutiaKind::Bifurcation => set.bifurcations.push(m.point),
            }
        }
        set
    }

    /// Points of one type.
    pub fn of_kind(&self, kind: MinutiaKind) -> &[Point] {
        match kind {
            MinutiaKind::Termination => &self.terminations,
            MinutiaKind::Bifurcation => &self.bifurcations,
        }
    }

    /// Termination points.
    pub fn terminations(&self) -> &[Point] {
        &self.terminations
    }

    /// Bifurcation points.
    pub fn bifurcations(&self) -> &[Point] {
        &self.bifurcations
    }

    /// The whole cloud regardless of type.
    pub fn all_points(&self) -> Vec<Point> {
        self.terminations
            .iter()
            .chain(self.bifurcations.iter())
            .copied()
            .collect()
    }

    /// Iterates over all minutiae with their types.
    pub fn iter(&self) -> impl Iterator<Item = Minutia> + '_ {
        MinutiaKind::ALL.into_iter().flat_map(move |kind| {
            self.of_kind(kind)
                .iter()
                .map(move |&point| Minutia::new(point, kind))
        })
    }

    /// Total number of minutiae.
    pub fn len(&self) -> usize {
        self.terminations.len() + self.bifurcations.len()
    }

    /// Returns true when no minutiae were found.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
