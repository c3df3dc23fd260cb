//! Type-partitioned matching of two fingerprint templates.

use super::{correspond, Correspondence, MatchedPair};
#[cfg(feature = "rayon")]
use super::correspond_par;
use crate::minutiae::{MinutiaKind, PointKey};
use crate::score::Tolerance;
use crate::template::FingerprintTemplate;

/// Correspondences of two templates, one per minutia type.
///
/// Terminations are only ever paired with terminations, bifurcations with
/// bifurcations.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TemplateMatch {
    pub terminations: Correspondence,
    pub bifurcations: Correspondence,
}

impl TemplateMatch {
    /// Correspondence of one type bucket.
    pub fn of_kind(&self, kind: MinutiaKind) -> &Correspondence {
        match kind {
            MinutiaKind::Termination => &self.terminations,
            MinutiaKind::Bifurcation => &self.bifurcations,
        }
    }

    /// All pairs, terminations first, tagged with their type.
    pub fn iter(&self) -> impl Iterator<Item = (MinutiaKind, &MatchedPair)> + '_ {
        MinutiaKind::ALL
            .into_iter()
            .flat_map(move |kind| self.of_kind(kind).pairs().iter().map(move |p| (kind, p)))
    }

    /// Matched base points, terminations then bifurcations.
    pub fn matched_base(&self) -> Vec<PointKey> {
        self.iter().map(|(_, p)| p.base).collect()
    }

    /// Matched test points, aligned with [`TemplateMatch::matched_base`].
    pub fn matched_test(&self) -> Vec<PointKey> {
        self.iter().map(|(_, p)| p.test).collect()
    }

    /// Number of common points across both types.
    pub fn count(&self) -> usize {
        self.terminations.len() + self.bifurcations.len()
    }
}

/// Matches two templates bucket by bucket.
///
/// A template with fewer than two minutiae has no geometry to compare and
/// matches nothing.
pub fn match_templates(
    base: &FingerprintTemplate,
    test: &FingerprintTemplate,
    tol: Tolerance,
) -> TemplateMatch {
    if too_small(base, test) {
        return TemplateMatch::default();
    }
    TemplateMatch {
        terminations: correspond(base.terminations(), test.terminations(), tol),
        bifurcations: correspond(base.bifurcations(), test.bifurcations(), tol),
    }
}

/// Same as [`match_templates`], scoring matrix rows in parallel.
#[cfg(feature = "rayon")]
pub fn match_templates_par(
    base: &FingerprintTemplate,
    test: &FingerprintTemplate,
    tol: Tolerance,
) -> TemplateMatch {
    if too_small(base, test) {
        return TemplateMatch::default();
    }
    TemplateMatch {
        terminations: correspond_par(base.terminations(), test.terminations(), tol),
        bifurcations: correspond_par(base.bifurcations(), test.bifurcations(), tol),
    }
}

fn too_small(base: &FingerprintTemplate, test: &FingerprintTemplate) -> bool {
    base.len() < 2 || test.len() < 2
}

#[cfg(test)]
mod tests {
    use super::match_templates;
    use crate::minutiae::{MinutiaeSet, Point};
    use crate::score::Tolerance;
    use crate::template::FingerprintTemplate;

    #[test]
    fn two_point_templates_match_without_slots() {
        let pair = MinutiaeSet::new(vec![Point::new(0, 0), Point::new(30, 40)], Vec::new());
        let other = MinutiaeSet::new(vec![Point::new(5, 5), Point::new(90, 1)], Vec::new());
        let a = FingerprintTemplate::build(&pair, 3);
        let b = FingerprintTemplate::build(&other, 3);
        // one neighbour each, so no slots and a zero quality floor
        let matched = match_templates(&a, &b, Tolerance::default());
        assert_eq!(matched.terminations.len(), 2);
        assert!(matched.bifurcations.is_empty());
    }

    #[test]
    fn single_point_template_matches_nothing() {
        let lonely = MinutiaeSet::new(vec![Point::new(3, 3)], Vec::new());
        let pair = MinutiaeSet::new(vec![Point::new(0, 0), Point::new(30, 40)], Vec::new());
        let a = FingerprintTemplate::build(&lonely, 3);
        let b = FingerprintTemplate::build(&pair, 3);
        assert_eq!(match_templates(&a, &b, Tolerance::default()).count(), 0);
        assert_eq!(match_templates(&b, &a, Tolerance::default()).count(), 0);
    }
}
