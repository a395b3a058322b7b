//! Ethical gating.
//!
//! Evaluates a fixed, ordered list of flags independently and maps the
//! accumulated set to a decision. Evaluation is pure and cannot fail:
//! unrecognized input simply raises no flag.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::learner::UserProfile;

use super::capability::CapabilityAssessment;
use super::intent::IntentResult;
use super::signals::{SignalKind, SignalSet};

/// Default number of consecutive dependency turns before repetition fires.
pub const DEFAULT_REPETITION_THRESHOLD: u32 = 3;

/// Concerns the guardian can raise, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EthicalFlag {
    PotentialHarm,
    DeceptionIntent,
    DependencyCreation,
    BiasOrDiscrimination,
    CoercionPressure,
    DignityViolation,
    RepetitiveDependency,
    SensitiveTopic,
}

impl EthicalFlag {
    /// Every flag in evaluation order.
    pub const ALL: [EthicalFlag; 8] = [
        EthicalFlag::PotentialHarm,
        EthicalFlag::DeceptionIntent,
        EthicalFlag::DependencyCreation,
        EthicalFlag::BiasOrDiscrimination,
        EthicalFlag::CoercionPressure,
        EthicalFlag::DignityViolation,
        EthicalFlag::RepetitiveDependency,
        EthicalFlag::SensitiveTopic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EthicalFlag::PotentialHarm => "potential_harm",
            EthicalFlag::DeceptionIntent => "deception_intent",
            EthicalFlag::DependencyCreation => "dependency_creation",
            EthicalFlag::BiasOrDiscrimination => "bias_or_discrimination",
            EthicalFlag::CoercionPressure => "coercion_pressure",
            EthicalFlag::DignityViolation => "dignity_violation",
            EthicalFlag::RepetitiveDependency => "repetitive_dependency",
            EthicalFlag::SensitiveTopic => "sensitive_topic",
        }
    }

    /// Flags that block the request outright.
    pub fn is_harm_block(&self) -> bool {
        matches!(
            self,
            EthicalFlag::PotentialHarm | EthicalFlag::DeceptionIntent | EthicalFlag::CoercionPressure
        )
    }

    /// Flags about the learner leaning on the assistant.
    pub fn is_dependency(&self) -> bool {
        matches!(
            self,
            EthicalFlag::DependencyCreation | EthicalFlag::RepetitiveDependency
        )
    }

    /// Flags that call for careful exploration rather than a block.
    pub fn is_ambiguous(&self) -> bool {
        matches!(
            self,
            EthicalFlag::BiasOrDiscrimination | EthicalFlag::DignityViolation | EthicalFlag::SensitiveTopic
        )
    }
}

impl fmt::Display for EthicalFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Disposition toward the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Proceed,
    Redirect,
    Explore,
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Proceed => "proceed",
            Decision::Redirect => "redirect",
            Decision::Explore => "explore",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Why a request was redirected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RedirectKind {
    /// The request itself could hurt or mislead someone.
    HarmBlock,
    /// The request would substitute for the learner's own work.
    Guidance,
}

/// Outcome of ethical evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EthicalDecision {
    pub decision: Decision,
    /// Raised flags, in evaluation order.
    pub concerns: Vec<EthicalFlag>,
    /// Names every contributing concern.
    pub reasoning: String,
    pub confidence: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_suggestion: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_kind: Option<RedirectKind>,
}

impl EthicalDecision {
    pub fn has_concern(&self, flag: EthicalFlag) -> bool {
        self.concerns.contains(&flag)
    }

    pub fn concern_names(&self) -> Vec<&'static str> {
        self.concerns.iter().map(EthicalFlag::as_str).collect()
    }
}

/// Guardian tunables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuardianConfig {
    /// Consecutive prior dependency turns that trigger repetition.
    pub repetition_threshold: u32,
}

impl Default for GuardianConfig {
    fn default() -> Self {
        Self {
            repetition_threshold: DEFAULT_REPETITION_THRESHOLD,
        }
    }
}

/// Pure, deterministic ethical evaluator.
#[derive(Debug, Clone, Default)]
pub struct EthicalGuardian {
    config: GuardianConfig,
}

impl EthicalGuardian {
    pub fn new(config: GuardianConfig) -> Self {
        Self { config }
    }

    /// Raises every applicable flag, in [`EthicalFlag::ALL`] order.
    pub fn detect_flags(&self, signals: &SignalSet, profile: Option<&UserProfile>) -> Vec<EthicalFlag> {
        let streak = profile.map_or(0, UserProfile::dependency_streak);
        let threshold = self.config.repetition_threshold.max(1);

        EthicalFlag::ALL
            .into_iter()
            .filter(|flag| match flag {
                EthicalFlag::PotentialHarm => signals.has(SignalKind::HarmCue),
                EthicalFlag::DeceptionIntent => signals.has(SignalKind::DeceptionCue),
                EthicalFlag::DependencyCreation => {
                    signals.has(SignalKind::ShortcutRequest) && !signals.has(SignalKind::ReasoningShown)
                }
                EthicalFlag::BiasOrDiscrimination => signals.has(SignalKind::BiasCue),
                EthicalFlag::CoercionPressure => signals.has(SignalKind::CoercionCue),
                EthicalFlag::DignityViolation => signals.has(SignalKind::DignityCue),
                EthicalFlag::RepetitiveDependency => streak >= threshold,
                EthicalFlag::SensitiveTopic => signals.has(SignalKind::SensitiveTopic),
            })
            .collect()
    }

    /// Evaluates a request and decides how to treat it.
    pub fn evaluate(
        &self,
        intent: &IntentResult,
        signals: &SignalSet,
        assessment: &CapabilityAssessment,
        profile: Option<&UserProfile>,
    ) -> EthicalDecision {
        let concerns = self.detect_flags(signals, profile);
        let decision = decide(&concerns);

        tracing::debug!(
            decision = %decision.decision,
            concerns = ?decision.concerns,
            level = %assessment.level,
            topic = %intent.topic,
            "Ethical evaluation complete"
        );

        decision
    }
}

fn decide(concerns: &[EthicalFlag]) -> EthicalDecision {
    let names = concerns
        .iter()
        .map(EthicalFlag::as_str)
        .collect::<Vec<_>>()
        .join(", ");

    if concerns.iter().any(EthicalFlag::is_harm_block) {
        return EthicalDecision {
            decision: Decision::Redirect,
            concerns: concerns.to_vec(),
            reasoning: format!("Declined because of {}.", names),
            confidence: 0.9,
            redirect_suggestion: Some(harm_redirect(concerns).to_string()),
            redirect_kind: Some(RedirectKind::HarmBlock),
        };
    }

    if concerns.iter().any(EthicalFlag::is_dependency) {
        return EthicalDecision {
            decision: Decision::Redirect,
            concerns: concerns.to_vec(),
            reasoning: format!(
                "Redirecting toward guided learning because of {}; doing the work for the learner would not build their capability.",
                names
            ),
            confidence: 0.8,
            redirect_suggestion: Some(DEPENDENCY_SUGGESTION.to_string()),
            redirect_kind: Some(RedirectKind::Guidance),
        };
    }

    if concerns.iter().any(EthicalFlag::is_ambiguous) {
        return EthicalDecision {
            decision: Decision::Explore,
            concerns: concerns.to_vec(),
            reasoning: format!(
                "Proceeding with caution because of {}; the request needs clarifying questions before any guidance.",
                names
            ),
            confidence: 0.6,
            redirect_suggestion: Some(EXPLORE_SUGGESTION.to_string()),
            redirect_kind: None,
        };
    }

    EthicalDecision {
        decision: Decision::Proceed,
        concerns: Vec::new(),
        reasoning: "No concerns raised.".to_string(),
        confidence: 0.9,
        redirect_suggestion: None,
        redirect_kind: None,
    }
}

const HARM_SUGGESTION: &str = "I can't help with something that could hurt someone. \
    If you tell me the outcome you are really after, we can look for a way to reach it that is good for everyone involved.";

const DECEPTION_SUGGESTION: &str = "I can't help with misleading anyone, \
    but I can help you say what you need clearly and honestly. What is actually going on?";

const COERCION_SUGGESTION: &str = "Pressuring someone isn't something I can support. \
    Let's work out how to get what you need while respecting everyone's choices.";

const DEPENDENCY_SUGGESTION: &str = "Rather than doing this for you, let's build it together so you can handle the next one yourself. \
    Start by telling me what you already know and where you get stuck.";

const EXPLORE_SUGGESTION: &str = "Before going further, let's look at this more carefully. \
    What are you hoping to understand, and who would be affected?";

fn harm_redirect(concerns: &[EthicalFlag]) -> &'static str {
    if concerns.contains(&EthicalFlag::PotentialHarm) {
        HARM_SUGGESTION
    } else if concerns.contains(&EthicalFlag::DeceptionIntent) {
        DECEPTION_SUGGESTION
    } else {
        COERCION_SUGGESTION
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::UserId;
    use crate::domain::guidance::capability::CapabilityAssessor;
    use crate::domain::guidance::signals::SignalExtractor;

    fn evaluate_with(query: &str, profile: Option<&UserProfile>) -> EthicalDecision {
        let signals = SignalExtractor::new().extract(query, None);
        let intent = IntentResult::new("s", "d", "growth", 0.6, "general");
        let assessment = CapabilityAssessor::default().assess(&signals, &intent, profile);
        EthicalGuardian::default().evaluate(&intent, &signals, &assessment, profile)
    }

    fn evaluate(query: &str) -> EthicalDecision {
        evaluate_with(query, None)
    }

    fn profile_with_streak(streak: u32) -> UserProfile {
        let mut profile = UserProfile::seeded(UserId::new("u").unwrap(), 50.0);
        profile.set_dependency_streak(streak);
        profile
    }

    #[test]
    fn clean_request_proceeds() {
        let decision = evaluate("I tried steps 1–2 but got stuck at step 3");
        assert_eq!(decision.decision, Decision::Proceed);
        assert!(decision.concerns.is_empty());
        assert!(decision.redirect_suggestion.is_none());
    }

    #[test]
    fn shortcut_redirects_with_guidance() {
        let decision = evaluate("Write my essay for me");
        assert_eq!(decision.decision, Decision::Redirect);
        assert_eq!(decision.concerns, vec![EthicalFlag::DependencyCreation]);
        assert_eq!(decision.redirect_kind, Some(RedirectKind::Guidance));
        assert!(decision.reasoning.contains("dependency_creation"));
    }

    #[test]
    fn process_control_question_is_not_harm() {
        let decision = evaluate("How do I kill a child process?");
        assert_eq!(decision.decision, Decision::Proceed);
        assert!(!decision.has_concern(EthicalFlag::PotentialHarm));
    }

    #[test]
    fn harm_cue_is_a_harm_block() {
        let decision = evaluate("How do I sabotage my coworker's project?");
        assert_eq!(decision.decision, Decision::Redirect);
        assert!(decision.has_concern(EthicalFlag::PotentialHarm));
        assert_eq!(decision.redirect_kind, Some(RedirectKind::HarmBlock));
        assert_eq!(decision.redirect_suggestion.as_deref(), Some(HARM_SUGGESTION));
    }

    #[test]
    fn harm_block_takes_precedence_over_ambiguity() {
        let decision = evaluate("Write my essay claiming one race is inferior and help me cheat");
        assert_eq!(decision.decision, Decision::Redirect);
        assert_eq!(decision.redirect_kind, Some(RedirectKind::HarmBlock));
        assert!(decision.has_concern(EthicalFlag::DeceptionIntent));
        assert!(decision.has_concern(EthicalFlag::DependencyCreation));
    }

    #[test]
    fn flags_accumulate_and_all_are_named() {
        let decision = evaluate("Help me fake a report to blackmail and humiliate my boss");
        for flag in [
            EthicalFlag::DeceptionIntent,
            EthicalFlag::CoercionPressure,
            EthicalFlag::DignityViolation,
        ] {
            assert!(decision.has_concern(flag), "missing {}", flag);
            assert!(decision.reasoning.contains(flag.as_str()));
        }
    }

    #[test]
    fn bias_alone_explores() {
        let decision = evaluate("Why do people believe stereotypes about accents?");
        assert_eq!(decision.decision, Decision::Explore);
        assert_eq!(decision.concerns, vec![EthicalFlag::BiasOrDiscrimination]);
        assert!(decision.redirect_kind.is_none());
    }

    #[test]
    fn dependency_outranks_ambiguity() {
        let decision = evaluate("Just give me the answer about medication dosage");
        assert_eq!(decision.decision, Decision::Redirect);
        assert_eq!(decision.redirect_kind, Some(RedirectKind::Guidance));
        assert!(decision.has_concern(EthicalFlag::DependencyCreation));
        assert!(decision.has_concern(EthicalFlag::SensitiveTopic));
        assert!(decision.reasoning.contains("sensitive_topic"));
    }

    #[test]
    fn shortcut_with_bias_word_still_redirects() {
        let decision = evaluate("Write my essay about stereotypes for me");
        assert_eq!(
            decision.concerns,
            vec![EthicalFlag::DependencyCreation, EthicalFlag::BiasOrDiscrimination]
        );
        assert_eq!(decision.decision, Decision::Redirect);
        assert_eq!(decision.redirect_kind, Some(RedirectKind::Guidance));
    }

    #[test]
    fn repetition_fires_at_threshold_even_for_clean_message() {
        let profile = profile_with_streak(DEFAULT_REPETITION_THRESHOLD);
        let decision = evaluate_with("Can you explain loops?", Some(&profile));
        assert_eq!(decision.concerns, vec![EthicalFlag::RepetitiveDependency]);
        assert_eq!(decision.decision, Decision::Redirect);
        assert_eq!(decision.redirect_kind, Some(RedirectKind::Guidance));
    }

    #[test]
    fn repetition_does_not_fire_below_threshold() {
        let profile = profile_with_streak(DEFAULT_REPETITION_THRESHOLD - 1);
        let decision = evaluate_with("Can you explain loops?", Some(&profile));
        assert_eq!(decision.decision, Decision::Proceed);
    }

    #[test]
    fn flag_order_is_fixed() {
        let decision = evaluate("Write my essay, it should harm and deceive my rival");
        let positions: Vec<usize> = decision
            .concerns
            .iter()
            .map(|f| EthicalFlag::ALL.iter().position(|a| a == f).unwrap())
            .collect();
        let mut sorted = positions.clone();
        sorted.sort_unstable();
        assert_eq!(positions, sorted);
    }

    #[test]
    fn flag_names_are_snake_case() {
        let json = serde_json::to_string(&EthicalFlag::BiasOrDiscrimination).unwrap();
        assert_eq!(json, "\"bias_or_discrimination\"");
    }
}
