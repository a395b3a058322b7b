//! Immutable record of one processed request.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::Timestamp;
use crate::domain::guidance::{Decision, EthicalFlag, IntentResult, Strategy};

use super::capability::CapabilityLevel;

/// A processed request as remembered in the learner's history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionRecord {
    pub timestamp: Timestamp,
    /// Raw query text, empty when query retention is disabled.
    pub query: String,
    pub intent: IntentResult,
    pub decision: Decision,
    pub concerns: Vec<EthicalFlag>,
    pub level: CapabilityLevel,
    pub score: f64,
    pub strategy: Strategy,
    pub topic: String,
}

impl InteractionRecord {
    /// True when the record carries the given concern.
    pub fn has_concern(&self, flag: EthicalFlag) -> bool {
        self.concerns.contains(&flag)
    }

    /// True when the raw query was not retained.
    pub fn is_redacted(&self) -> bool {
        self.query.is_empty()
    }
}
