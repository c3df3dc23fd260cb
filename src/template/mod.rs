//! Fingerprint templates: per-type tuple profiles of one fingerprint.
//!
//! Both type buckets are built from a single distance matrix over the whole
//! minutiae cloud, so neighbourhoods cross types even though matching later
//! runs per type.

use crate::minutiae::{MinutiaKind, MinutiaeSet, Point};
use crate::profile::{profiles_from_matrix, DistanceMatrix, ProfileSet};
use crate::trace::{trace_event, trace_span};

/// Tuple profiles of one fingerprint, split by minutia type.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FingerprintTemplate {
    #[cfg_attr(feature = "serde", serde(rename = "Termination", default))]
    terminations: ProfileSet,
    #[cfg_attr(feature = "serde", serde(rename = "Bifurcation", default))]
    bifurcations: ProfileSet,
}

impl FingerprintTemplate {
    /// Assembles a template from prebuilt buckets.
    pub fn from_parts(terminations: ProfileSet, bifurcations: ProfileSet) -> Self {
        Self {
            terminations,
            bifurcations,
        }
    }

    /// Builds profiles with `k` neighbours for every minutia.
    pub fn build(minutiae: &MinutiaeSet, k: usize) -> Self {
        let points = minutiae.all_points();
        let _span = trace_span!("build_template", points = points.len(), k = k).entered();
        let matrix = DistanceMatrix::build(&points);
        Self::from_matrix(&matrix, &points, minutiae, k)
    }

    /// Same as [`FingerprintTemplate::build`], computing distance rows in parallel.
    #[cfg(feature = "rayon")]
    pub fn build_par(minutiae: &MinutiaeSet, k: usize) -> Self {
        let points = minutiae.all_points();
        let _span = trace_span!("build_template", points = points.len(), k = k, parallel = true)
            .entered();
        let matrix = DistanceMatrix::build_par(&points);
        Self::from_matrix(&matrix, &points, minutiae, k)
    }

    fn from_matrix(
        matrix: &DistanceMatrix,
        points: &[Point],
        minutiae: &MinutiaeSet,
        k: usize,
    ) -> Self {
        let template = Self {
            terminations: profiles_from_matrix(matrix, points, minutiae.terminations(), k),
            bifurcations: profiles_from_matrix(matrix, points, minutiae.bifurcations(), k),
        };
        trace_event!(
            "template_profiles",
            terminations = template.terminations.len(),
            bifurcations = template.bifurcations.len()
        );
        template
    }

    /// Profiles of one type.
    pub fn bucket(&self, kind: MinutiaKind) -> &ProfileSet {
        match kind {
            MinutiaKind::Termination => &self.terminations,
            MinutiaKind::Bifurcation => &self.bifurcations,
        }
    }

    pub fn terminations(&self) -> &ProfileSet {
        &self.terminations
    }

    pub fn bifurcations(&self) -> &ProfileSet {
        &self.bifurcations
    }

    /// Total profile count across both types.
    pub fn len(&self) -> usize {
        self.terminations.len() + self.bifurcations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
