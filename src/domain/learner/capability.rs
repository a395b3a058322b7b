//! Capability level and trend classification.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Score assumed for a learner with no history.
pub const DEFAULT_CAPABILITY_SCORE: f64 = 50.0;

/// Lowest possible capability score.
pub const MIN_SCORE: f64 = 0.0;

/// Highest possible capability score.
pub const MAX_SCORE: f64 = 100.0;

/// Highest rounded score still classified as beginner.
pub const BEGINNER_MAX: f64 = 33.0;

/// Highest rounded score still classified as intermediate.
pub const INTERMEDIATE_MAX: f64 = 66.0;

/// Coarse capability bucket derived from the smoothed score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapabilityLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl CapabilityLevel {
    /// All levels in ascending order.
    pub const ALL: [CapabilityLevel; 3] = [
        CapabilityLevel::Beginner,
        CapabilityLevel::Intermediate,
        CapabilityLevel::Advanced,
    ];

    /// Classifies a score into a level.
    ///
    /// The score is clamped to `[0, 100]` and rounded to the nearest whole
    /// point, so the boundaries sit exactly at 33/34 and 66/67.
    pub fn from_score(score: f64) -> Self {
        let rounded = clamp_score(score).round();
        if rounded <= BEGINNER_MAX {
            CapabilityLevel::Beginner
        } else if rounded <= INTERMEDIATE_MAX {
            CapabilityLevel::Intermediate
        } else {
            CapabilityLevel::Advanced
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CapabilityLevel::Beginner => "beginner",
            CapabilityLevel::Intermediate => "intermediate",
            CapabilityLevel::Advanced => "advanced",
        }
    }
}

impl fmt::Display for CapabilityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Short-term direction of the capability score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Improving,
    #[default]
    Stable,
    Declining,
}

impl Trend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Improving => "improving",
            Trend::Stable => "stable",
            Trend::Declining => "declining",
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Clamps a score to `[0, 100]`. NaN collapses to the default score.
pub fn clamp_score(score: f64) -> f64 {
    if score.is_nan() {
        return DEFAULT_CAPABILITY_SCORE;
    }
    score.clamp(MIN_SCORE, MAX_SCORE)
}
