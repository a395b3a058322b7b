//! The assembled result of one pipeline run.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{RequestId, Timestamp, UserId};
use crate::domain::learner::ProfileSummary;

use super::brief::ResponseBrief;
use super::capability::CapabilityAssessment;
use super::ethics::{Decision, EthicalDecision};
use super::intent::{IntentResult, InterpretationMetadata};
use super::signals::SignalSet;
use super::strategy::Strategy;

/// Everything the caller needs to drive generation for one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub request_id: RequestId,
    pub user_id: UserId,
    pub intent: IntentResult,
    pub interpretation: InterpretationMetadata,
    pub signals: SignalSet,
    pub capability: CapabilityAssessment,
    pub ethics: EthicalDecision,
    pub strategy: Strategy,
    /// Profile state after this interaction was committed.
    pub profile: ProfileSummary,
    /// Non-fatal problems, such as a failed profile save.
    #[serde(default)]
    pub warnings: Vec<String>,
    /// Step-by-step account of how the decision was reached.
    #[serde(default)]
    pub reasoning_log: String,
    pub processed_at: Timestamp,
}

impl AnalysisResult {
    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Renders the reasoning log for this result and the brief built from it.
    pub fn render_reasoning_log(&self, brief: &ResponseBrief) -> String {
        let intent = &self.intent;
        let capability = &self.capability;
        let level = if capability.provisional {
            format!("{} (provisional)", capability.level)
        } else {
            capability.level.to_string()
        };
        let concerns = if self.ethics.concerns.is_empty() {
            "none".to_string()
        } else {
            self.ethics
                .concerns
                .iter()
                .map(|flag| flag.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        };

        let mut log = String::new();
        log.push_str("STEP 1: INTENT ANALYSIS\n");
        log.push_str(&format!("- Surface request: {}\n", intent.surface_request));
        log.push_str(&format!("- Deep need: {}\n", intent.deep_need));
        log.push_str(&format!("- Motivation: {}\n", intent.motivation));
        log.push_str(&format!("- Topic: {}\n", intent.topic));
        log.push_str(&format!("- Signals: {}\n", self.signals.summary()));
        log.push_str(&format!("- Growth opportunity: {}\n", brief.growth_opportunity));

        log.push_str("\nSTEP 2: CAPABILITY ASSESSMENT\n");
        log.push_str(&format!("- Level: {}\n", level));
        log.push_str(&format!(
            "- Score: {:.1}/100, trend {}\n",
            capability.score, capability.trend
        ));
        log.push_str(&format!("- Strengths: {}\n", list_or_none(&capability.strengths)));
        log.push_str(&format!("- Weaknesses: {}\n", list_or_none(&capability.weaknesses)));
        log.push_str(&format!("- Evidence: {}\n", capability.evidence));

        log.push_str("\nSTEP 3: ETHICAL EVALUATION\n");
        log.push_str(&format!("- Decision: {}\n", self.ethics.decision));
        log.push_str(&format!("- Concerns: {}\n", concerns));
        log.push_str(&format!("- Reasoning: {}\n", self.ethics.reasoning));

        log.push_str("\nSTEP 4: RESPONSE DESIGN\n");
        log.push_str(&format!("- Strategy: {}\n", self.strategy));
        log.push_str(&format!("- Expected outcome: {}\n", brief.expected_outcome));
        log.push_str(&format!("- Independence impact: {}\n", brief.independence_impact));

        log.push_str("\nFINAL REASONING\n");
        log.push_str(&match self.ethics.decision {
            Decision::Proceed => format!(
                "Proceed with {} for a {} learner so the work stays theirs.",
                self.strategy, capability.level
            ),
            Decision::Explore => {
                "Ask clarifying questions before helping, since the request raises concerns worth examining together."
                    .to_string()
            }
            Decision::Redirect => {
                "Decline the request as asked and offer an alternative path the learner can own.".to_string()
            }
        });
        log
    }
}

fn list_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "none".to_string()
    } else {
        items.join("; ")
    }
}
