//! Response briefs handed to text generation.
//!
//! A brief tells the generator how to respond: which phases to walk
//! through, in what tone, and what to suggest next. It never carries a
//! finished artifact. When generation is unavailable the brief renders
//! its own deterministic template text.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::learner::CapabilityLevel;

use super::analysis::AnalysisResult;
use super::ethics::{Decision, EthicalDecision};
use super::intent::IntentResult;
use super::strategy::Strategy;

/// Voice the response should take, derived from the learner's motivation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Fear,
    Laziness,
    Urgency,
    Genuine,
    Neutral,
}

impl Tone {
    /// Maps a free-form motivation label onto a tone by keyword.
    pub fn from_motivation(motivation: &str) -> Self {
        let lower = motivation.to_lowercase();
        let has = |words: &[&str]| words.iter().any(|w| lower.contains(w));

        if has(&["fear", "anxiety", "anxious"]) {
            Tone::Fear
        } else if has(&["lazy", "laziness", "shortcut", "convenience"]) {
            Tone::Laziness
        } else if has(&["pressure", "time", "urgen"]) {
            Tone::Urgency
        } else if has(&["growth", "improvement", "curiosity", "curious", "mastery"]) {
            Tone::Genuine
        } else {
            Tone::Neutral
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Fear => "fear",
            Tone::Laziness => "laziness",
            Tone::Urgency => "urgency",
            Tone::Genuine => "genuine",
            Tone::Neutral => "neutral",
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Instructions for generating one response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseBrief {
    pub strategy: Strategy,
    pub decision: Decision,
    pub level: CapabilityLevel,
    pub tone: Tone,
    pub opening: String,
    pub phases: Vec<String>,
    pub follow_ups: Vec<String>,
    pub expected_outcome: String,
    pub independence_impact: String,
    /// The skill this response should build.
    pub growth_opportunity: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_suggestion: Option<String>,
}

impl ResponseBrief {
    /// Builds a brief from an analysis.
    pub fn from_analysis(analysis: &AnalysisResult) -> Self {
        let tone = Tone::from_motivation(&analysis.intent.motivation);
        let strategy = analysis.strategy;
        let level = analysis.capability.level;

        let opening = match analysis.ethics.redirect_suggestion.as_deref() {
            Some(suggestion) if analysis.ethics.decision == Decision::Redirect => suggestion.to_string(),
            _ => opening_line(strategy, tone, &analysis.intent.surface_request).to_string(),
        };

        let (expected_outcome, independence_impact) = outcome(strategy);

        Self {
            strategy,
            decision: analysis.ethics.decision,
            level,
            tone,
            opening,
            phases: strategy.phases().iter().map(|p| p.to_string()).collect(),
            follow_ups: follow_ups(strategy).iter().map(|f| f.to_string()).collect(),
            expected_outcome: expected_outcome.to_string(),
            independence_impact: independence_impact.to_string(),
            growth_opportunity: growth_opportunity(&analysis.intent, &analysis.ethics).to_string(),
            redirect_suggestion: analysis.ethics.redirect_suggestion.clone(),
        }
    }

    /// Prompt for the text generator.
    pub fn render_prompt(&self, query: &str) -> String {
        let phases = self
            .phases
            .iter()
            .enumerate()
            .map(|(i, p)| format!("{}. {}", i + 1, p))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            r#"A learner wrote: "{}"

Respond as a learning guide using the "{}" strategy.
Decision: {}
Learner level: {}
Tone: {}
Growth opportunity: {}

Open with something close to: {}

Walk through these phases in order:
{}

Never produce the finished work the learner could produce themselves. End by suggesting one of:
{}"#,
            query,
            self.strategy,
            self.decision,
            self.level,
            self.tone,
            self.growth_opportunity,
            self.opening,
            phases,
            self.follow_ups
                .iter()
                .map(|f| format!("- {}", f))
                .collect::<Vec<_>>()
                .join("\n")
        )
    }

    /// Deterministic response text used when generation fails.
    pub fn template_text(&self) -> String {
        let mut text = self.opening.clone();
        text.push_str("\n\n");
        for (i, phase) in self.phases.iter().enumerate() {
            text.push_str(&format!("{}. {}\n", i + 1, phase));
        }
        if let Some(first) = self.follow_ups.first() {
            text.push_str(&format!("\nNext step: {}", first));
        }
        text
    }
}

/// What the learner should come away able to do, given why they asked
/// and how the request was judged.
pub(crate) fn growth_opportunity(intent: &IntentResult, ethics: &EthicalDecision) -> &'static str {
    if ethics.concerns.iter().any(|flag| flag.is_dependency()) {
        "Turn the request for a finished solution into guided learning"
    } else if ethics.decision == Decision::Explore {
        "Encourage self-reflection and insight"
    } else if intent.deep_need.to_lowercase().contains("confidence")
        || Tone::from_motivation(&intent.motivation) == Tone::Fear
    {
        "Build confidence through guided discovery"
    } else {
        "Develop problem-solving capability"
    }
}

fn opening_line(strategy: Strategy, tone: Tone, surface_request: &str) -> &'static str {
    match strategy {
        Strategy::ExplainExamplePracticeReflect => match tone {
            Tone::Fear => "Feeling unsure here is normal. We'll take this in small steps so your confidence grows with each one.",
            Tone::Laziness => "Working through this yourself, even slowly, will leave you better off than a shortcut. Let's make it manageable.",
            Tone::Urgency => "Time is tight, so let's focus on the one idea that unlocks the rest.",
            Tone::Genuine | Tone::Neutral => "Good question. Let's build a solid foundation together.",
        },
        Strategy::ProblemApproachesValidateExcel => match tone {
            Tone::Fear => "You know more than you think. Let's find the answer with your own reasoning.",
            Tone::Laziness => "Let's find an efficient route that still builds your skill.",
            Tone::Urgency => "Let's go straight to the decision that matters most here.",
            Tone::Genuine | Tone::Neutral => "You're ready to go deeper. Let's sharpen your approach.",
        },
        Strategy::AssumptionsEdgeCasesProofMastery => {
            let lower = surface_request.to_lowercase();
            if lower.contains("verif") {
                "Your reasoning looks careful. Let's stress-test it."
            } else if lower.contains("optim") || lower.contains("elegan") {
                "You have the fundamentals. Let's chase a more elegant solution."
            } else {
                "At this level, growth comes from wrestling with the hard parts."
            }
        }
        Strategy::SocraticQuestionSet => "Let's slow down and look at this from a few angles first.",
        Strategy::DeclineWithAlternative => "I can't do this one as asked, but there is a better path.",
    }
}

fn follow_ups(strategy: Strategy) -> &'static [&'static str] {
    match strategy {
        Strategy::ExplainExamplePracticeReflect => &[
            "Show me your attempt after the explanation",
            "Point out the part that still feels confusing",
            "Try a similar problem on your own",
        ],
        Strategy::ProblemApproachesValidateExcel => &[
            "Share your approach and the reasoning behind it",
            "Ask for feedback on one specific step",
            "Compare an alternative solution",
        ],
        Strategy::AssumptionsEdgeCasesProofMastery => &[
            "Find a case that breaks your solution",
            "Name the assumption you are least sure of",
            "Explain the principle to someone outside the field",
        ],
        Strategy::SocraticQuestionSet => &[
            "Tell me more about what you're trying to achieve",
            "Describe who this affects and how",
        ],
        Strategy::DeclineWithAlternative => &[
            "Tell me what you're really trying to achieve",
            "Share what you have so far and where you got stuck",
        ],
    }
}

fn outcome(strategy: Strategy) -> (&'static str, &'static str) {
    match strategy {
        Strategy::ExplainExamplePracticeReflect => (
            "Learner understands the idea well enough to solve similar problems",
            "increases",
        ),
        Strategy::ProblemApproachesValidateExcel => (
            "Learner develops a structured approach and checks it themselves",
            "increases",
        ),
        Strategy::AssumptionsEdgeCasesProofMastery => (
            "Learner deepens insight and tests their own reasoning",
            "increases",
        ),
        Strategy::SocraticQuestionSet => (
            "Learner clarifies their goal and its effect on others",
            "maintains",
        ),
        Strategy::DeclineWithAlternative => (
            "Learner takes an alternative path they can own",
            "maintains",
        ),
    }
}
