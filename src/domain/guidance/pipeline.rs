//! The linear decision pipeline.
//!
//! Extractor, interpreter, assessor, guardian, selector, updater, in that
//! order, over an explicitly passed profile.

use std::sync::Arc;

use crate::domain::foundation::{RequestId, Timestamp};
use crate::domain::learner::UserProfile;

use super::analysis::AnalysisResult;
use super::brief::ResponseBrief;
use super::capability::{AssessorConfig, CapabilityAssessor};
use super::ethics::{EthicalGuardian, GuardianConfig};
use super::memory::MemoryUpdater;
use super::services::IntentInterpreter;
use super::signals::SignalExtractor;
use super::strategy::StrategySelector;

/// Wires the pipeline components together.
pub struct GuidancePipeline {
    extractor: SignalExtractor,
    interpreter: Arc<dyn IntentInterpreter>,
    assessor: CapabilityAssessor,
    guardian: EthicalGuardian,
    selector: StrategySelector,
    updater: MemoryUpdater,
}

impl GuidancePipeline {
    pub fn new(
        interpreter: Arc<dyn IntentInterpreter>,
        assessor: AssessorConfig,
        guardian: GuardianConfig,
        retain_query_text: bool,
    ) -> Self {
        Self {
            extractor: SignalExtractor::new(),
            interpreter,
            assessor: CapabilityAssessor::new(assessor),
            guardian: EthicalGuardian::new(guardian),
            selector: StrategySelector::new(),
            updater: MemoryUpdater::new(retain_query_text),
        }
    }

    /// Pipeline with default tunables.
    pub fn with_interpreter(interpreter: Arc<dyn IntentInterpreter>) -> Self {
        Self::new(interpreter, AssessorConfig::default(), GuardianConfig::default(), true)
    }

    pub fn interpreter(&self) -> &Arc<dyn IntentInterpreter> {
        &self.interpreter
    }

    /// Runs every stage and commits the outcome to `profile`.
    ///
    /// Cannot fail. Profile-dependent stages see the profile as it was
    /// before this request; first-time users are treated as having none.
    pub async fn run(
        &self,
        query: &str,
        context: Option<&str>,
        profile: &mut UserProfile,
    ) -> AnalysisResult {
        let signals = self.extractor.extract(query, context);
        tracing::debug!(signals = %signals.summary(), "Signals extracted");

        let prior = if profile.is_first_time() {
            None
        } else {
            Some(&*profile)
        };

        let interpretation = self.interpreter.interpret(query, &signals, prior).await;
        let intent = interpretation.intent;
        let assessment = self.assessor.assess(&signals, &intent, prior);
        let ethics = self.guardian.evaluate(&intent, &signals, &assessment, Some(&*profile));
        let strategy = self.selector.select(ethics.decision, assessment.level);

        self.updater
            .update(profile, query, &intent, &assessment, &ethics, strategy);

        tracing::info!(
            user_id = %profile.user_id(),
            decision = %ethics.decision,
            level = %assessment.level,
            score = assessment.score,
            strategy = %strategy,
            fallback_used = interpretation.metadata.fallback_used,
            "Request processed"
        );

        let mut result = AnalysisResult {
            request_id: RequestId::new(),
            user_id: profile.user_id().clone(),
            intent,
            interpretation: interpretation.metadata,
            signals,
            capability: assessment,
            ethics,
            strategy,
            profile: profile.summary(),
            warnings: Vec::new(),
            reasoning_log: String::new(),
            processed_at: Timestamp::now(),
        };
        let brief = ResponseBrief::from_analysis(&result);
        result.reasoning_log = result.render_reasoning_log(&brief);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::UserId;
    use crate::domain::guidance::ethics::{Decision, EthicalFlag};
    use crate::domain::guidance::intent::RuleBasedIntentInterpreter;
    use crate::domain::guidance::strategy::Strategy;
    use crate::domain::learner::CapabilityLevel;

    fn pipeline() -> GuidancePipeline {
        GuidancePipeline::with_interpreter(Arc::new(RuleBasedIntentInterpreter::new()))
    }

    fn fresh() -> UserProfile {
        UserProfile::new(UserId::new("student").unwrap())
    }

    #[tokio::test]
    async fn essay_request_is_redirected() {
        let mut profile = fresh();
        let result = pipeline().run("Write my essay for me", None, &mut profile).await;

        assert!(result.signals.has(crate::domain::guidance::SignalKind::ShortcutRequest));
        assert_eq!(result.ethics.decision, Decision::Redirect);
        assert!(result.ethics.has_concern(EthicalFlag::DependencyCreation));
        assert_eq!(result.strategy, Strategy::DeclineWithAlternative);
        assert_eq!(result.profile.interaction_count, 1);
    }

    #[tokio::test]
    async fn stuck_beginner_gets_explanation() {
        let mut profile = fresh();
        let result = pipeline()
            .run("I tried steps 1–2 but got stuck at step 3", None, &mut profile)
            .await;

        assert_eq!(result.ethics.decision, Decision::Proceed);
        assert_eq!(result.capability.level, CapabilityLevel::Beginner);
        assert_eq!(result.strategy, Strategy::ExplainExamplePracticeReflect);
        assert_eq!(result.capability.score, 53.0);
        assert_eq!(result.profile.level, result.capability.level);
        assert!(result.reasoning_log.contains("- Score: 53.0/100, trend stable"));
    }

    #[tokio::test]
    async fn second_turn_level_follows_score() {
        let pipeline = pipeline();
        let mut profile = fresh();
        pipeline
            .run("I tried steps 1–2 but got stuck at step 3", None, &mut profile)
            .await;
        let result = pipeline.run("Can you explain loops?", None, &mut profile).await;

        assert!(!result.capability.provisional);
        assert_eq!(result.capability.level, CapabilityLevel::Intermediate);
        assert_eq!(result.profile.level, CapabilityLevel::Intermediate);
    }

    #[tokio::test]
    async fn advanced_learner_explores_edge_cases() {
        let mut profile = UserProfile::seeded(UserId::new("student").unwrap(), 80.0);
        let result = pipeline()
            .run("What edge cases am I missing in this proof?", None, &mut profile)
            .await;

        assert_eq!(result.capability.level, CapabilityLevel::Advanced);
        assert_eq!(result.ethics.decision, Decision::Proceed);
        assert_eq!(result.strategy, Strategy::AssumptionsEdgeCasesProofMastery);
    }

    #[tokio::test]
    async fn identical_inputs_give_identical_decisions() {
        let base = UserProfile::seeded(UserId::new("student").unwrap(), 45.0);
        let mut a = base.clone();
        let mut b = base;
        let first = pipeline().run("Why does my loop never end?", None, &mut a).await;
        let second = pipeline().run("Why does my loop never end?", None, &mut b).await;

        assert_eq!(first.intent, second.intent);
        assert_eq!(first.ethics, second.ethics);
        assert_eq!(first.capability.score, second.capability.score);
    }

    #[tokio::test]
    async fn repeated_dependency_escalates() {
        let pipeline = pipeline();
        let mut profile = fresh();
        for _ in 0..3 {
            pipeline.run("Just give me the answer", None, &mut profile).await;
        }
        let result = pipeline.run("Can you explain loops?", None, &mut profile).await;
        assert!(result.ethics.has_concern(EthicalFlag::RepetitiveDependency));
        assert!(!result.ethics.has_concern(EthicalFlag::DependencyCreation));
        assert_eq!(result.strategy, Strategy::DeclineWithAlternative);
    }
}
