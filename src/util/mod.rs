//! Shared utility helpers.

pub mod error;
pub(crate) mod math;

pub use error::{FingerMatchError, Result as FingerMatchResult};
pub use math::{euclidean_distance, pair_count, segment_angle_deg};
