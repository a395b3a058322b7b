//! Guidance module - The per-request decision pipeline.
//!
//! Signal extraction, intent interpretation, capability assessment,
//! ethical gating, strategy selection and the memory update, plus the
//! response brief built from their combined output.

mod analysis;
mod brief;
mod capability;
mod ethics;
mod intent;
mod memory;
mod pipeline;
mod services;
mod signals;
mod strategy;

pub use analysis::AnalysisResult;
pub use brief::{ResponseBrief, Tone};
pub use capability::{AssessorConfig, CapabilityAssessment, CapabilityAssessor};
pub use ethics::{
    Decision, EthicalDecision, EthicalFlag, EthicalGuardian, GuardianConfig, RedirectKind,
    DEFAULT_REPETITION_THRESHOLD,
};
pub use intent::{
    clamp_confidence, IntentResult, Interpretation, InterpretationMetadata, InterpreterMode,
    Motivation, RuleBasedIntentInterpreter, DETERMINISTIC_CONFIDENCE, GENERAL_TOPIC,
};
pub use memory::MemoryUpdater;
pub use pipeline::GuidancePipeline;
pub use services::IntentInterpreter;
pub use signals::{SignalExtractor, SignalKind, SignalMatch, SignalSet};
pub use strategy::{Strategy, StrategySelector};
