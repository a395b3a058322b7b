//! Learner module - Longitudinal per-user state.
//!
//! Capability levels, the trajectory window, interaction records and the
//! `UserProfile` aggregate that ties them together.

mod capability;
mod interaction;
mod profile;
mod trajectory;

pub use capability::{
    clamp_score, CapabilityLevel, Trend, BEGINNER_MAX, DEFAULT_CAPABILITY_SCORE,
    INTERMEDIATE_MAX, MAX_SCORE, MIN_SCORE,
};
pub use interaction::InteractionRecord;
pub use profile::{ProfileSummary, UserProfile};
pub use trajectory::{TrajectoryWindow, DEFAULT_WINDOW_CAPACITY};
