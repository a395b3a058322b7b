//! Capability assessment.
//!
//! Starts from the learner's committed score, applies a bounded adjustment
//! from the current turn's signals, and projects the trajectory window and
//! trend that would result. Alongside the score it names the strengths and
//! weaknesses the turn shows and records how the score was reached. The
//! assessor never writes to the profile.

use serde::{Deserialize, Serialize};

use crate::domain::learner::{
    clamp_score, CapabilityLevel, TrajectoryWindow, Trend, UserProfile, DEFAULT_CAPABILITY_SCORE,
    DEFAULT_WINDOW_CAPACITY,
};

use super::intent::{IntentResult, GENERAL_TOPIC};
use super::signals::{SignalKind, SignalSet};

/// Tunables for score adjustment and trend classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessorConfig {
    /// Added per inquiry-depth marker.
    pub inquiry_delta: f64,
    /// Maximum number of inquiry markers that count.
    pub inquiry_marker_cap: u32,
    pub struggle_delta: f64,
    pub reasoning_delta: f64,
    /// Subtracted for a shortcut request that shows no reasoning.
    pub shortcut_penalty: f64,
    /// Bound on the absolute adjustment per turn.
    pub max_delta: f64,
    pub window_capacity: usize,
    pub trend_threshold: f64,
}

impl Default for AssessorConfig {
    fn default() -> Self {
        Self {
            inquiry_delta: 4.0,
            inquiry_marker_cap: 2,
            struggle_delta: 3.0,
            reasoning_delta: 2.0,
            shortcut_penalty: 6.0,
            max_delta: 10.0,
            window_capacity: DEFAULT_WINDOW_CAPACITY,
            trend_threshold: 2.0,
        }
    }
}

/// Competency cue families and the strength each one shows.
const COMPETENCY_STRENGTHS: &[(SignalKind, &str)] = &[
    (SignalKind::Analysis, "Strong analytical thinking"),
    (SignalKind::Synthesis, "Can integrate and synthesize ideas"),
    (SignalKind::Metacognition, "Self-aware learner"),
];

/// Result of assessing one turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapabilityAssessment {
    pub level: CapabilityLevel,
    /// Clamped to `[0, 100]`.
    pub score: f64,
    pub trend: Trend,
    /// Adjustment applied this turn, already bounded.
    pub delta: f64,
    /// True when `level` is the first-time default rather than derived
    /// from `score`.
    pub provisional: bool,
    /// Trajectory window including this turn's score.
    pub window: TrajectoryWindow,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub weaknesses: Vec<String>,
    /// Which cues moved the score, and by how much.
    #[serde(default)]
    pub evidence: String,
}

/// Pure capability scorer.
#[derive(Debug, Clone, Default)]
pub struct CapabilityAssessor {
    config: AssessorConfig,
}

impl CapabilityAssessor {
    pub fn new(config: AssessorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AssessorConfig {
        &self.config
    }

    /// Bounded score adjustment implied by the current turn.
    pub fn delta(&self, signals: &SignalSet) -> f64 {
        self.bounded(&self.contributions(signals))
    }

    /// Unbounded per-cue adjustments, in scoring order.
    fn contributions(&self, signals: &SignalSet) -> Vec<(SignalKind, f64)> {
        let c = &self.config;
        let mut parts = Vec::new();

        let inquiry_markers = signals.strength(SignalKind::InquiryDepth).min(c.inquiry_marker_cap);
        if inquiry_markers > 0 {
            parts.push((SignalKind::InquiryDepth, f64::from(inquiry_markers) * c.inquiry_delta));
        }
        if signals.has(SignalKind::StruggleEvidence) {
            parts.push((SignalKind::StruggleEvidence, c.struggle_delta));
        }
        let reasoning = signals.has(SignalKind::ReasoningShown);
        if reasoning {
            parts.push((SignalKind::ReasoningShown, c.reasoning_delta));
        }
        if signals.has(SignalKind::ShortcutRequest) && !reasoning {
            parts.push((SignalKind::ShortcutRequest, -c.shortcut_penalty));
        }
        parts
    }

    fn bounded(&self, parts: &[(SignalKind, f64)]) -> f64 {
        let bound = self.config.max_delta.abs();
        parts
            .iter()
            .fold(0.0, |acc, (_, value)| acc + value)
            .clamp(-bound, bound)
    }

    /// Assesses one turn against the learner's committed state.
    ///
    /// A missing profile, or one with no interactions yet, yields the
    /// provisional beginner level regardless of the projected score.
    pub fn assess(
        &self,
        signals: &SignalSet,
        intent: &IntentResult,
        profile: Option<&UserProfile>,
    ) -> CapabilityAssessment {
        let base = profile.map_or(DEFAULT_CAPABILITY_SCORE, |p| p.capability_score());
        let parts = self.contributions(signals);
        let delta = self.bounded(&parts);
        let score = clamp_score(base + delta);

        let mut window = profile
            .map(|p| p.trajectory().clone())
            .unwrap_or_else(|| TrajectoryWindow::new(self.config.window_capacity));
        window.resize(self.config.window_capacity);
        window.push(score);

        let trend = window.trend(self.config.trend_threshold);
        let provisional = profile.map_or(true, UserProfile::is_first_time);
        let level = if provisional {
            CapabilityLevel::Beginner
        } else {
            CapabilityLevel::from_score(score)
        };

        let (strengths, weaknesses) = competencies(signals, level, &intent.topic, profile);
        let evidence = evidence(&parts, base, delta, score, provisional);

        tracing::debug!(
            base,
            delta,
            score,
            %level,
            %trend,
            provisional,
            topic = %intent.topic,
            "Capability assessed"
        );

        CapabilityAssessment {
            level,
            score,
            trend,
            delta,
            provisional,
            window,
            strengths,
            weaknesses,
            evidence,
        }
    }
}

/// Strengths and weaknesses from competency cues, topic history and the
/// assessed level, in that order.
fn competencies(
    signals: &SignalSet,
    level: CapabilityLevel,
    topic: &str,
    profile: Option<&UserProfile>,
) -> (Vec<String>, Vec<String>) {
    let mut strengths: Vec<String> = COMPETENCY_STRENGTHS
        .iter()
        .filter(|(kind, _)| signals.has(*kind))
        .map(|(_, strength)| strength.to_string())
        .collect();
    let mut weaknesses = Vec::new();

    let returning = profile.filter(|p| topic != GENERAL_TOPIC && p.topic_count(topic) > 0);
    if let Some(p) = returning {
        if p.trend() == Trend::Improving {
            strengths.push(format!("Making progress in {}", topic));
        } else if p.level() == CapabilityLevel::Beginner {
            weaknesses.push(format!("Building foundational skills in {}", topic));
        }
    }

    match level {
        CapabilityLevel::Beginner => {
            weaknesses.push("Needs foundational knowledge and practice".to_string());
        }
        CapabilityLevel::Intermediate => {
            strengths.push("Has solid foundational knowledge".to_string());
            weaknesses.push("Can deepen understanding of nuanced concepts".to_string());
        }
        CapabilityLevel::Advanced => {
            strengths.push("Demonstrates advanced understanding".to_string());
        }
    }

    (strengths, weaknesses)
}

fn evidence(parts: &[(SignalKind, f64)], base: f64, delta: f64, score: f64, provisional: bool) -> String {
    let basis = if parts.is_empty() {
        "no scoring cues".to_string()
    } else {
        parts
            .iter()
            .map(|(kind, value)| format!("{} ({:+.1})", kind, value))
            .collect::<Vec<_>>()
            .join(", ")
    };
    let mut text = format!(
        "Assessment based on: {}; adjustment {:+.1} from base {:.1}, resulting in capability score {:.0}/100",
        basis, delta, base, score
    );
    if provisional {
        text.push_str("; first interaction, level held at beginner");
    }
    text
}
