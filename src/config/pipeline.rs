//! Guidance pipeline configuration

use serde::Deserialize;
use std::time::Duration;

use crate::domain::guidance::{AssessorConfig, GuardianConfig, InterpreterMode};

use super::error::ValidationError;

/// Pipeline configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    /// Rule-based or provider-delegated intent interpretation
    #[serde(default)]
    pub intent_mode: InterpreterMode,

    /// Bound on a single provider call, in milliseconds
    #[serde(default = "default_provider_timeout_ms")]
    pub provider_timeout_ms: u64,

    /// Maximum query (and context) length in characters
    #[serde(default = "default_max_query_len")]
    pub max_query_len: usize,

    /// Keep query text in interaction history
    #[serde(default = "default_true")]
    pub retain_query_text: bool,

    #[serde(default = "default_inquiry_delta")]
    pub inquiry_delta: f64,

    #[serde(default = "default_inquiry_marker_cap")]
    pub inquiry_marker_cap: u32,

    #[serde(default = "default_struggle_delta")]
    pub struggle_delta: f64,

    #[serde(default = "default_reasoning_delta")]
    pub reasoning_delta: f64,

    #[serde(default = "default_shortcut_penalty")]
    pub shortcut_penalty: f64,

    #[serde(default = "default_max_delta")]
    pub max_delta: f64,

    /// Trajectory window size
    #[serde(default = "default_window_capacity")]
    pub window_capacity: usize,

    #[serde(default = "default_trend_threshold")]
    pub trend_threshold: f64,

    /// Consecutive dependency turns before repetition is flagged
    #[serde(default = "default_repetition_threshold")]
    pub repetition_threshold: u32,
}

impl PipelineConfig {
    pub fn provider_timeout(&self) -> Duration {
        Duration::from_millis(self.provider_timeout_ms)
    }

    pub fn assessor(&self) -> AssessorConfig {
        AssessorConfig {
            inquiry_delta: self.inquiry_delta,
            inquiry_marker_cap: self.inquiry_marker_cap,
            struggle_delta: self.struggle_delta,
            reasoning_delta: self.reasoning_delta,
            shortcut_penalty: self.shortcut_penalty,
            max_delta: self.max_delta,
            window_capacity: self.window_capacity,
            trend_threshold: self.trend_threshold,
        }
    }

    pub fn guardian(&self) -> GuardianConfig {
        GuardianConfig {
            repetition_threshold: self.repetition_threshold,
        }
    }

    /// Validate pipeline configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.provider_timeout_ms == 0 || self.provider_timeout_ms > 60_000 {
            return Err(ValidationError::InvalidProviderTimeout);
        }
        if self.max_query_len == 0 {
            return Err(ValidationError::OutOfRange {
                field: "max_query_len",
                reason: "must be positive",
            });
        }
        if self.window_capacity == 0 {
            return Err(ValidationError::OutOfRange {
                field: "window_capacity",
                reason: "must be positive",
            });
        }
        if self.repetition_threshold == 0 {
            return Err(ValidationError::OutOfRange {
                field: "repetition_threshold",
                reason: "must be positive",
            });
        }
        let deltas = [
            self.inquiry_delta,
            self.struggle_delta,
            self.reasoning_delta,
            self.shortcut_penalty,
            self.max_delta,
            self.trend_threshold,
        ];
        if deltas.iter().any(|d| !d.is_finite() || *d < 0.0) {
            return Err(ValidationError::OutOfRange {
                field: "assessor",
                reason: "deltas and thresholds must be finite and non-negative",
            });
        }
        Ok(())
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        let assessor = AssessorConfig::default();
        Self {
            intent_mode: InterpreterMode::default(),
            provider_timeout_ms: default_provider_timeout_ms(),
            max_query_len: default_max_query_len(),
            retain_query_text: true,
            inquiry_delta: assessor.inquiry_delta,
            inquiry_marker_cap: assessor.inquiry_marker_cap,
            struggle_delta: assessor.struggle_delta,
            reasoning_delta: assessor.reasoning_delta,
            shortcut_penalty: assessor.shortcut_penalty,
            max_delta: assessor.max_delta,
            window_capacity: assessor.window_capacity,
            trend_threshold: assessor.trend_threshold,
            repetition_threshold: default_repetition_threshold(),
        }
    }
}

fn default_provider_timeout_ms() -> u64 {
    5000
}

fn default_max_query_len() -> usize {
    crate::application::DEFAULT_MAX_QUERY_LEN
}

fn default_true() -> bool {
    true
}

fn default_inquiry_delta() -> f64 {
    AssessorConfig::default().inquiry_delta
}

fn default_inquiry_marker_cap() -> u32 {
    AssessorConfig::default().inquiry_marker_cap
}

fn default_struggle_delta() -> f64 {
    AssessorConfig::default().struggle_delta
}

fn default_reasoning_delta() -> f64 {
    AssessorConfig::default().reasoning_delta
}

fn default_shortcut_penalty() -> f64 {
    AssessorConfig::default().shortcut_penalty
}

fn default_max_delta() -> f64 {
    AssessorConfig::default().max_delta
}

fn default_window_capacity() -> usize {
    AssessorConfig::default().window_capacity
}

fn default_trend_threshold() -> f64 {
    AssessorConfig::default().trend_threshold
}

fn default_repetition_threshold() -> u32 {
    GuardianConfig::default().repetition_threshold
}
