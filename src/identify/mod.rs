//! Identification of a query fingerprint against an enrolled database.
//!
//! The query's tuple profiles are matched against every enrolled template.
//! The number of common points is normalized by the mean minutiae count of
//! the two fingerprints, and the highest-scoring label wins. Ties keep the
//! earliest enrollment.

use crate::correspond::match_templates;
#[cfg(feature = "rayon")]
use crate::correspond::match_templates_par;
use crate::database::{Enrollment, TemplateDatabase};
use crate::extract::{ExtractionError, MinutiaeExtractor};
use crate::image::ImageView;
use crate::minutiae::MinutiaeSet;
use crate::score::Tolerance;
use crate::template::FingerprintTemplate;
use crate::trace::{trace_event, trace_span};
use crate::util::{FingerMatchError, FingerMatchResult};
#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Configuration for identification.
#[derive(Clone, Debug, PartialEq)]
pub struct IdentifyConfig {
    /// Neighbours per tuple profile; must match the enrolled templates.
    pub k: usize,
    /// Maximum distance-ratio difference for two slots to agree.
    pub th_range: f64,
    /// Maximum angle difference in degrees for two slots to agree.
    pub th_angle: f64,
    /// Minimum normalized score accepted as a match. Any positive score
    /// qualifies when unset.
    pub acceptance_floor: Option<f64>,
    /// Enable parallel scoring (requires the `rayon` feature).
    pub parallel: bool,
}

impl Default for IdentifyConfig {
    fn default() -> Self {
        Self {
            k: 3,
            th_range: 0.1,
            th_angle: 2.0,
            acceptance_floor: None,
            parallel: false,
        }
    }
}

impl IdentifyConfig {
    /// Checks that every value is usable.
    pub fn validate(&self) -> FingerMatchResult<()> {
        if self.k < 2 {
            return Err(FingerMatchError::InvalidConfig {
                reason: "k must be at least 2",
            });
        }
        if !self.th_range.is_finite() || self.th_range < 0.0 {
            return Err(FingerMatchError::InvalidConfig {
                reason: "th_range must be finite and >= 0",
            });
        }
        if !self.th_angle.is_finite() || self.th_angle < 0.0 {
            return Err(FingerMatchError::InvalidConfig {
                reason: "th_angle must be finite and >= 0",
            });
        }
        if self.acceptance_floor.is_some_and(|f| !f.is_finite()) {
            return Err(FingerMatchError::InvalidConfig {
                reason: "acceptance_floor must be finite",
            });
        }
        Ok(())
    }

    /// Slot comparison tolerances.
    pub fn tolerance(&self) -> Tolerance {
        Tolerance::new(self.th_range, self.th_angle)
    }
}

/// A scored database entry.
#[derive(Clone, Debug, PartialEq)]
pub struct Candidate {
    pub label: String,
    /// Normalized similarity in [0, 1].
    pub score: f64,
    /// Common points found across both minutia types.
    pub common_points: usize,
}

/// Outcome of identifying one fingerprint.
#[derive(Clone, Debug, PartialEq)]
pub enum Identification {
    /// A label cleared the acceptance floor.
    Match(Candidate),
    /// Nothing scored above zero or above the floor. `best` is the top entry,
    /// if the database was not empty.
    NoMatch { best: Option<Candidate> },
    /// The query has no minutiae.
    Featureless,
    /// The extraction stage failed before matching could start.
    ExtractionFailed(ExtractionError),
}

impl Identification {
    /// Accepted candidate, if any.
    pub fn candidate(&self) -> Option<&Candidate> {
        match self {
            Identification::Match(candidate) => Some(candidate),
            _ => None,
        }
    }

    /// Accepted `(label, score)`, if any.
    pub fn best(&self) -> Option<(&str, f64)> {
        self.candidate().map(|c| (c.label.as_str(), c.score))
    }

    pub fn into_candidate(self) -> Option<Candidate> {
        match self {
            Identification::Match(candidate) => Some(candidate),
            _ => None,
        }
    }

    pub fn is_match(&self) -> bool {
        matches!(self, Identification::Match(_))
    }
}

/// Common points normalized by the mean profile count of both fingerprints.
pub fn similarity_score(common_points: usize, query_len: usize, enrolled_len: usize) -> f64 {
    let total = query_len + enrolled_len;
    if total == 0 {
        return 0.0;
    }
    common_points as f64 / (total as f64 / 2.0)
}

/// Identifies fingerprints against an immutable template database.
///
/// `Identifier` is `Send + Sync`; wrap it in an `Arc` to serve concurrent
/// requests from one loaded database.
#[derive(Clone, Debug)]
pub struct Identifier {
    database: TemplateDatabase,
    cfg: IdentifyConfig,
}

impl Identifier {
    /// Creates an identifier with the default configuration.
    pub fn new(database: TemplateDatabase) -> Self {
        Self {
            database,
            cfg: IdentifyConfig::default(),
        }
    }

    /// Replaces the configuration after validating it.
    pub fn with_config(mut self, cfg: IdentifyConfig) -> FingerMatchResult<Self> {
        cfg.validate()?;
        self.cfg = cfg;
        Ok(self)
    }

    pub fn config(&self) -> &IdentifyConfig {
        &self.cfg
    }

    pub fn database(&self) -> &TemplateDatabase {
        &self.database
    }

    /// Releases the database, e.g. to enroll more templates.
    pub fn into_database(self) -> TemplateDatabase {
        self.database
    }

    /// Builds the query's template with the configured `k`.
    pub fn query_template(&self, query: &MinutiaeSet) -> FingerprintTemplate {
        #[cfg(feature = "rayon")]
        {
            if self.cfg.parallel {
                return FingerprintTemplate::build_par(query, self.cfg.k);
            }
        }
        FingerprintTemplate::build(query, self.cfg.k)
    }

    /// Best accepted label and score for a set of minutiae.
    pub fn identify(&self, query: &MinutiaeSet) -> Option<Candidate> {
        self.identify_detailed(query).into_candidate()
    }

    /// Identifies a set of minutiae, reporting why nothing matched.
    pub fn identify_detailed(&self, query: &MinutiaeSet) -> Identification {
        let _span = trace_span!(
            "identify",
            minutiae = query.len(),
            templates = self.database.len()
        )
        .entered();

        if query.is_empty() {
            return Identification::Featureless;
        }
        let template = self.query_template(query);
        let scored = self.score_all(&template);

        let mut best: Option<Candidate> = None;
        for candidate in scored {
            if best.as_ref().map_or(true, |b| candidate.score > b.score) {
                best = Some(candidate);
            }
        }

        let top_score = best.as_ref().map_or(0.0, |c| c.score);
        trace_event!("identify_scores", top_score = top_score);
        match best {
            Some(candidate) if self.accepts(candidate.score) => Identification::Match(candidate),
            best => Identification::NoMatch { best },
        }
    }

    /// Runs the extractor on `image` and identifies the result.
    ///
    /// Extraction failures become [`Identification::ExtractionFailed`].
    pub fn identify_image<E>(&self, extractor: &E, image: ImageView<'_, u8>) -> Identification
    where
        E: MinutiaeExtractor + ?Sized,
    {
        match extractor.extract(image) {
            Ok(minutiae) => self.identify_detailed(&minutiae),
            Err(err) => {
                let reason = err.to_string();
                trace_event!("extraction_failed", reason = reason.as_str());
                Identification::ExtractionFailed(err)
            }
        }
    }

    /// Scores every enrolled label, best first. Equal scores keep
    /// enrollment order.
    pub fn rank(&self, query: &MinutiaeSet) -> Vec<Candidate> {
        if query.is_empty() {
            return Vec::new();
        }
        let template = self.query_template(query);
        let mut scored = self.score_all(&template);
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored
    }

    /// Whether `score` clears zero and the configured acceptance floor.
    pub fn accepts(&self, score: f64) -> bool {
        score > 0.0 && self.cfg.acceptance_floor.map_or(true, |floor| score >= floor)
    }

    /// Scores in database order.
    fn score_all(&self, query: &FingerprintTemplate) -> Vec<Candidate> {
        let entries = self.database.entries();
        #[cfg(feature = "rayon")]
        {
            if self.cfg.parallel {
                // few templates: parallelize inside each score matrix instead
                if entries.len() < rayon::current_num_threads() {
                    return entries
                        .iter()
                        .map(|entry| self.score_one(query, entry, true))
                        .collect();
                }
                return entries
                    .par_iter()
                    .map(|entry| self.score_one(query, entry, false))
                    .collect();
            }
        }
        entries
            .iter()
            .map(|entry| self.score_one(query, entry, false))
            .collect()
    }

    fn score_one(
        &self,
        query: &FingerprintTemplate,
        entry: &Enrollment,
        row_parallel: bool,
    ) -> Candidate {
        let tol = self.cfg.tolerance();
        #[cfg(feature = "rayon")]
        let matched = if row_parallel {
            match_templates_par(query, &entry.template, tol)
        } else {
            match_templates(query, &entry.template, tol)
        };
        #[cfg(not(feature = "rayon"))]
        let matched = {
            let _ = row_parallel;
            match_templates(query, &entry.template, tol)
        };
        let common_points = matched.count();
        Candidate {
            label: entry.label.clone(),
            score: similarity_score(common_points, query.len(), entry.template.len()),
            common_points,
        }
    }
}
