//! FingerMatch identifies fingerprints from minutiae geometry.
//!
//! Each minutia is described by a tuple profile: distance ratios and angles
//! among its nearest neighbours, which do not change under rotation or
//! translation. Profiles of two fingerprints are paired greedily per minutia
//! type, and the number of common points ranks enrolled identities.
//!
//! Minutiae extraction is external; plug it in through
//! [`MinutiaeExtractor`]. Parallel scoring is available via the `rayon`
//! feature and JSON template databases via the `serde` feature.

pub mod correspond;
pub mod database;
pub mod extract;
pub mod identify;
pub mod image;
pub mod lowlevel;
pub mod minutiae;
pub mod profile;
pub mod score;
pub mod template;
mod trace;
pub mod util;

#[cfg(feature = "image-io")]
pub use image::io;

pub use correspond::{match_templates, TemplateMatch};
pub use database::{Enrollment, TemplateDatabase};
pub use extract::{ExtractionError, MinutiaeExtractor};
pub use identify::{similarity_score, Candidate, Identification, IdentifyConfig, Identifier};
pub use image::{ImageView, OwnedImage};
pub use minutiae::{Minutia, MinutiaKind, MinutiaeSet, Point, PointKey};
pub use profile::{ProfileSet, TupleProfile};
pub use score::Tolerance;
pub use template::FingerprintTemplate;
pub use util::{FingerMatchError, FingerMatchResult};
