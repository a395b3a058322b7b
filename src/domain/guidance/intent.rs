//! Intent interpretation values and the rule-based interpreter.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::learner::UserProfile;

use super::signals::{SignalKind, SignalSet};

/// Confidence reported by the rule-based interpreter.
pub const DETERMINISTIC_CONFIDENCE: f64 = 0.6;

/// Topic label used when no topic could be detected.
pub const GENERAL_TOPIC: &str = "general";

/// What the learner asked for, what they need, and why they asked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentResult {
    pub surface_request: String,
    pub deep_need: String,
    pub motivation: String,
    /// Always within `[0, 1]`.
    pub confidence: f64,
    pub topic: String,
}

impl IntentResult {
    /// Creates an intent result, clamping confidence and defaulting an
    /// empty topic to [`GENERAL_TOPIC`].
    pub fn new(
        surface_request: impl Into<String>,
        deep_need: impl Into<String>,
        motivation: impl Into<String>,
        confidence: f64,
        topic: impl Into<String>,
    ) -> Self {
        let topic = topic.into();
        Self {
            surface_request: surface_request.into(),
            deep_need: deep_need.into(),
            motivation: motivation.into(),
            confidence: clamp_confidence(confidence),
            topic: if topic.trim().is_empty() {
                GENERAL_TOPIC.to_string()
            } else {
                topic
            },
        }
    }

    /// True when neither the surface request nor the deep need is known.
    pub fn is_blank(&self) -> bool {
        self.surface_request.trim().is_empty() && self.deep_need.trim().is_empty()
    }
}

/// Clamps a confidence to `[0, 1]`. NaN becomes zero.
pub fn clamp_confidence(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Canonical motivation labels produced by the rule-based interpreter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Motivation {
    TimePressure,
    FearOfFailure,
    ConvenienceSeeking,
    Curiosity,
    Growth,
}

impl Motivation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Motivation::TimePressure => "time_pressure",
            Motivation::FearOfFailure => "fear_of_failure",
            Motivation::ConvenienceSeeking => "convenience_seeking",
            Motivation::Curiosity => "curiosity",
            Motivation::Growth => "growth",
        }
    }

    /// Motivation implied by the first cue present, in the order time
    /// pressure, anxiety, convenience, curiosity.
    pub fn from_cues(signals: &SignalSet) -> Option<Self> {
        const PRECEDENCE: [(SignalKind, Motivation); 4] = [
            (SignalKind::TimePressure, Motivation::TimePressure),
            (SignalKind::Anxiety, Motivation::FearOfFailure),
            (SignalKind::Convenience, Motivation::ConvenienceSeeking),
            (SignalKind::Curiosity, Motivation::Curiosity),
        ];
        PRECEDENCE
            .iter()
            .find(|(kind, _)| signals.has(*kind))
            .map(|(_, motivation)| *motivation)
    }
}

impl fmt::Display for Motivation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which interpreter produced an intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterpreterMode {
    #[default]
    Deterministic,
    Delegated,
}

impl InterpreterMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            InterpreterMode::Deterministic => "deterministic",
            InterpreterMode::Delegated => "delegated",
        }
    }
}

impl fmt::Display for InterpreterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for InterpreterMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "deterministic" | "rule_based" | "rules" => Ok(InterpreterMode::Deterministic),
            "delegated" | "provider" | "llm" => Ok(InterpreterMode::Delegated),
            other => Err(format!("unknown intent mode '{}'", other)),
        }
    }
}

/// How an interpretation was obtained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterpretationMetadata {
    /// Configured mode of the interpreter that was asked.
    pub mode: InterpreterMode,
    pub fallback_used: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_reason: Option<String>,
}

impl InterpretationMetadata {
    pub fn direct(mode: InterpreterMode) -> Self {
        Self {
            mode,
            fallback_used: false,
            fallback_reason: None,
        }
    }

    pub fn fallback(mode: InterpreterMode, reason: impl Into<String>) -> Self {
        Self {
            mode,
            fallback_used: true,
            fallback_reason: Some(reason.into()),
        }
    }
}

/// Intent plus provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interpretation {
    pub intent: IntentResult,
    pub metadata: InterpretationMetadata,
}

/// One row of the rule table: the dominant signal and its canned reading.
struct IntentRule {
    signal: Option<SignalKind>,
    surface_request: &'static str,
    deep_need: &'static str,
    motivation: Motivation,
}

/// Rows in dominance order; the first row whose signal is present wins.
/// The final row has no signal and always matches.
const RULES: &[IntentRule] = &[
    IntentRule {
        signal: Some(SignalKind::ShortcutRequest),
        surface_request: "Request for a finished artifact",
        deep_need: "Understanding the material well enough to produce it independently",
        motivation: Motivation::ConvenienceSeeking,
    },
    IntentRule {
        signal: Some(SignalKind::StruggleEvidence),
        surface_request: "Help past a specific sticking point",
        deep_need: "Confidence to finish the problem on their own",
        motivation: Motivation::Growth,
    },
    IntentRule {
        signal: Some(SignalKind::InquiryDepth),
        surface_request: "Advanced exploration request",
        deep_need: "Deeper mastery of the underlying principles",
        motivation: Motivation::Curiosity,
    },
    IntentRule {
        signal: Some(SignalKind::Verification),
        surface_request: "Verification of own work",
        deep_need: "Confidence in judging their own work",
        motivation: Motivation::Growth,
    },
    IntentRule {
        signal: Some(SignalKind::Collaboration),
        surface_request: "Collaborative learning request",
        deep_need: "Structured guidance while keeping ownership of the work",
        motivation: Motivation::Growth,
    },
    IntentRule {
        signal: Some(SignalKind::Learning),
        surface_request: "Request for understanding",
        deep_need: "A solid conceptual foundation",
        motivation: Motivation::Curiosity,
    },
    IntentRule {
        signal: None,
        surface_request: "General inquiry",
        deep_need: "Knowledge or skill development",
        motivation: Motivation::Growth,
    },
];

/// Deterministic interpreter driven by [`RULES`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleBasedIntentInterpreter;

impl RuleBasedIntentInterpreter {
    pub fn new() -> Self {
        Self
    }

    /// Reads intent from signals alone. Same inputs always give the same
    /// result.
    pub fn interpret_signals(&self, signals: &SignalSet, profile: Option<&UserProfile>) -> IntentResult {
        let rule = RULES
            .iter()
            .find(|rule| rule.signal.map_or(true, |kind| signals.has(kind)))
            .unwrap_or(&RULES[RULES.len() - 1]);

        let motivation = Motivation::from_cues(signals).unwrap_or(rule.motivation);
        let topic = signals.topic_tag().unwrap_or(GENERAL_TOPIC);

        // A returning topic shifts the deep need toward continued mastery,
        // except for finished-artifact requests where the need is unchanged.
        let seen_before = profile.map_or(false, |p| p.topic_count(topic) > 0);
        let deep_need = if seen_before && topic != GENERAL_TOPIC && rule.signal != Some(SignalKind::ShortcutRequest) {
            format!("Continued mastery in {}", topic)
        } else {
            rule.deep_need.to_string()
        };

        IntentResult::new(
            rule.surface_request,
            deep_need,
            motivation.as_str(),
            DETERMINISTIC_CONFIDENCE,
            topic,
        )
    }
}
