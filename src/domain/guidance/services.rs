//! Domain Services for guidance
//!
//! Service traits that define operations needed by the pipeline but implemented
//! by adapters.

use async_trait::async_trait;

use crate::domain::learner::UserProfile;

use super::intent::{
    Interpretation, InterpretationMetadata, InterpreterMode, RuleBasedIntentInterpreter,
};
use super::signals::SignalSet;

/// Turns a request and its signals into an [`Interpretation`].
///
/// Implementations never fail: anything that goes wrong while interpreting
/// is absorbed and reported through the interpretation metadata.
#[async_trait]
pub trait IntentInterpreter: Send + Sync {
    /// Interpret one request
    ///
    /// # Arguments
    /// * `query` - The raw request text
    /// * `signals` - Signals extracted from the query
    /// * `profile` - The learner's profile, absent for first-time users
    async fn interpret(
        &self,
        query: &str,
        signals: &SignalSet,
        profile: Option<&UserProfile>,
    ) -> Interpretation;

    /// Mode this interpreter operates in.
    fn mode(&self) -> InterpreterMode;
}

#[async_trait]
impl IntentInterpreter for RuleBasedIntentInterpreter {
    async fn interpret(
        &self,
        _query: &str,
        signals: &SignalSet,
        profile: Option<&UserProfile>,
    ) -> Interpretation {
        Interpretation {
            intent: self.interpret_signals(signals, profile),
            metadata: InterpretationMetadata::direct(InterpreterMode::Deterministic),
        }
    }

    fn mode(&self) -> InterpreterMode {
        InterpreterMode::Deterministic
    }
}
