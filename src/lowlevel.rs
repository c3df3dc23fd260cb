//! Low-level building blocks for custom matching pipelines.
//!
//! These expose the distance matrix, slot scorer, and greedy assignment used
//! by the high-level [`Identifier`](crate::Identifier). Most users should
//! prefer `Identifier` and `TemplateDatabase`.

pub use crate::correspond::{correspond, Assignment, Correspondence, MatchedPair, ScoreMatrix};
#[cfg(feature = "rayon")]
pub use crate::correspond::{correspond_par, match_templates_par};
pub use crate::profile::{build_profiles, DistanceMatrix, ANGLE_DECIMALS, RATIO_DECIMALS};
#[cfg(feature = "rayon")]
pub use crate::profile::build_profiles_par;
pub use crate::score::score_profiles;
pub use crate::util::{euclidean_distance, pair_count, segment_angle_deg};
