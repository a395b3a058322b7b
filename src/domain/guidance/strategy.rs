//! Response strategy selection.
//!
//! A total lookup from (decision, level) to a named strategy. New levels or
//! decisions are supported by adding rows to [`STRATEGY_TABLE`].

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::domain::learner::CapabilityLevel;

use super::ethics::Decision;

/// Named response strategy downstream generation must honor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strategy {
    #[serde(rename = "explain-example-practice-reflect")]
    ExplainExamplePracticeReflect,
    #[serde(rename = "problem-approaches-validate-excel")]
    ProblemApproachesValidateExcel,
    #[serde(rename = "assumptions-edge_cases-proof-mastery")]
    AssumptionsEdgeCasesProofMastery,
    #[serde(rename = "socratic-question-set")]
    SocraticQuestionSet,
    #[serde(rename = "decline-with-alternative")]
    DeclineWithAlternative,
}

impl Strategy {
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::ExplainExamplePracticeReflect => "explain-example-practice-reflect",
            Strategy::ProblemApproachesValidateExcel => "problem-approaches-validate-excel",
            Strategy::AssumptionsEdgeCasesProofMastery => "assumptions-edge_cases-proof-mastery",
            Strategy::SocraticQuestionSet => "socratic-question-set",
            Strategy::DeclineWithAlternative => "decline-with-alternative",
        }
    }

    /// Ordered phases the generated response walks through.
    pub fn phases(&self) -> &'static [&'static str] {
        match self {
            Strategy::ExplainExamplePracticeReflect => &[
                "Explain the key idea in plain terms",
                "Walk through a worked example together",
                "Have the learner try a similar problem",
                "Reflect on what was learned",
            ],
            Strategy::ProblemApproachesValidateExcel => &[
                "Name the real problem behind the question",
                "Compare approaches the learner could take",
                "Validate the chosen approach with the learner's own checks",
                "Refine toward a cleaner solution",
            ],
            Strategy::AssumptionsEdgeCasesProofMastery => &[
                "Surface the assumptions in play",
                "Probe edge cases that could break the reasoning",
                "Argue why the approach holds",
                "Generalize the principle beyond this problem",
            ],
            Strategy::SocraticQuestionSet => &[
                "Ask what outcome the learner is hoping for",
                "Ask who else is affected and how",
                "Ask what the learner already believes and why",
            ],
            Strategy::DeclineWithAlternative => &[
                "Decline the request as asked",
                "Offer an alternative path the learner can own",
            ],
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Row key: a concrete level, or any level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum LevelKey {
    Any,
    Exactly(CapabilityLevel),
}

const STRATEGY_TABLE: &[(Decision, LevelKey, Strategy)] = &[
    (
        Decision::Proceed,
        LevelKey::Exactly(CapabilityLevel::Beginner),
        Strategy::ExplainExamplePracticeReflect,
    ),
    (
        Decision::Proceed,
        LevelKey::Exactly(CapabilityLevel::Intermediate),
        Strategy::ProblemApproachesValidateExcel,
    ),
    (
        Decision::Proceed,
        LevelKey::Exactly(CapabilityLevel::Advanced),
        Strategy::AssumptionsEdgeCasesProofMastery,
    ),
    (Decision::Explore, LevelKey::Any, Strategy::SocraticQuestionSet),
    (Decision::Redirect, LevelKey::Any, Strategy::DeclineWithAlternative),
];

static LOOKUP: Lazy<HashMap<(Decision, LevelKey), Strategy>> = Lazy::new(|| {
    STRATEGY_TABLE
        .iter()
        .map(|(decision, level, strategy)| ((*decision, *level), *strategy))
        .collect()
});

/// Strategy used if the table ever lacks a row for a combination.
const UNMATCHED: Strategy = Strategy::SocraticQuestionSet;

/// Table-driven selector.
#[derive(Debug, Clone, Copy, Default)]
pub struct StrategySelector;

impl StrategySelector {
    pub fn new() -> Self {
        Self
    }

    /// Looks up the strategy for a decision and level. An exact level row
    /// wins over an any-level row.
    pub fn select(&self, decision: Decision, level: CapabilityLevel) -> Strategy {
        LOOKUP
            .get(&(decision, LevelKey::Exactly(level)))
            .or_else(|| LOOKUP.get(&(decision, LevelKey::Any)))
            .copied()
            .unwrap_or(UNMATCHED)
    }
}
