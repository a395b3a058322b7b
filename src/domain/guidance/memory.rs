//! Longitudinal memory update, the only write path to profile aggregates.

use crate::domain::foundation::Timestamp;
use crate::domain::learner::{InteractionRecord, UserProfile};

use super::capability::CapabilityAssessment;
use super::ethics::{EthicalDecision, EthicalFlag};
use super::intent::IntentResult;
use super::strategy::Strategy;

/// Commits the outcome of one pipeline run to a profile.
#[derive(Debug, Clone)]
pub struct MemoryUpdater {
    retain_query_text: bool,
}

impl Default for MemoryUpdater {
    fn default() -> Self {
        Self::new(true)
    }
}

impl MemoryUpdater {
    pub fn new(retain_query_text: bool) -> Self {
        Self { retain_query_text }
    }

    /// Appends an interaction and recomputes aggregates.
    ///
    /// The assessed score and window are committed as-is. Runs for every
    /// decision, including redirects.
    pub fn update(
        &self,
        profile: &mut UserProfile,
        query: &str,
        intent: &IntentResult,
        assessment: &CapabilityAssessment,
        decision: &EthicalDecision,
        strategy: Strategy,
    ) -> InteractionRecord {
        let record = InteractionRecord {
            timestamp: Timestamp::now(),
            query: if self.retain_query_text {
                query.to_string()
            } else {
                String::new()
            },
            intent: intent.clone(),
            decision: decision.decision,
            concerns: decision.concerns.clone(),
            level: assessment.level,
            score: assessment.score,
            strategy,
            topic: intent.topic.clone(),
        };

        profile.commit_score(assessment.score, assessment.level, assessment.window.clone());
        profile.set_trend(assessment.trend);
        profile.record_topic(&intent.topic);
        for flag in &decision.concerns {
            profile.record_flag(flag.as_str());
        }

        let streak = if decision.has_concern(EthicalFlag::DependencyCreation) {
            profile.dependency_streak().saturating_add(1)
        } else {
            0
        };
        profile.set_dependency_streak(streak);
        profile.append_interaction(record.clone());

        tracing::debug!(
            user_id = %profile.user_id(),
            interaction_count = profile.interaction_count(),
            score = profile.capability_score(),
            dependency_streak = streak,
            "Profile updated"
        );

        record
    }
}
