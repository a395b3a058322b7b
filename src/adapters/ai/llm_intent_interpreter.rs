//! Provider-delegated intent interpreter.
//!
//! Builds a structured prompt from the query, its signals and a short
//! profile summary, asks a [`TextGenerationProvider`] for a JSON reply and
//! maps it onto an [`IntentResult`]. Any provider failure (error, timeout,
//! unparseable reply) falls back to the rule-based interpreter and is
//! recorded in the interpretation metadata.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::foundation::RequestId;
use crate::domain::guidance::{
    IntentInterpreter, IntentResult, Interpretation, InterpretationMetadata, InterpreterMode,
    RuleBasedIntentInterpreter, SignalSet, GENERAL_TOPIC,
};
use crate::domain::learner::UserProfile;
use crate::ports::{CompletionRequest, MessageRole, ProviderError, RequestMetadata, TextGenerationProvider};

/// Default bound on a single provider call.
pub const DEFAULT_PROVIDER_TIMEOUT: Duration = Duration::from_secs(5);

/// Confidence assumed when the reply omits or garbles it.
const UNSTATED_CONFIDENCE: f64 = 0.5;

const SYSTEM_PROMPT: &str = "You analyse what a learner is asking for. \
Reply with a single JSON object and nothing else.";

/// Intent interpreter that delegates to a text generation provider.
pub struct LlmIntentInterpreter {
    provider: Arc<dyn TextGenerationProvider>,
    timeout: Duration,
    fallback: RuleBasedIntentInterpreter,
}

impl LlmIntentInterpreter {
    pub fn new(provider: Arc<dyn TextGenerationProvider>) -> Self {
        Self {
            provider,
            timeout: DEFAULT_PROVIDER_TIMEOUT,
            fallback: RuleBasedIntentInterpreter::new(),
        }
    }

    /// Sets the per-call timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn ask_provider(
        &self,
        query: &str,
        signals: &SignalSet,
        profile: Option<&UserProfile>,
    ) -> Result<IntentResult, ProviderError> {
        let metadata = match profile {
            Some(p) => RequestMetadata::new(p.user_id().clone(), RequestId::new().to_string()),
            None => RequestMetadata::anonymous(RequestId::new().to_string()),
        };

        let request = CompletionRequest::new(metadata)
            .with_system_prompt(SYSTEM_PROMPT)
            .with_message(MessageRole::User, build_prompt(query, signals, profile))
            .with_max_tokens(400)
            .with_temperature(0.0);

        let response = tokio::time::timeout(self.timeout, self.provider.complete(request))
            .await
            .map_err(|_| ProviderError::timeout(self.timeout.as_millis() as u64))??;

        parse_reply(&response.content, signals)
    }
}

#[async_trait]
impl IntentInterpreter for LlmIntentInterpreter {
    async fn interpret(
        &self,
        query: &str,
        signals: &SignalSet,
        profile: Option<&UserProfile>,
    ) -> Interpretation {
        match self.ask_provider(query, signals, profile).await {
            Ok(intent) => Interpretation {
                intent,
                metadata: InterpretationMetadata::direct(InterpreterMode::Delegated),
            },
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    provider = %self.provider.provider_info().name,
                    "Intent provider failed, using rule-based interpretation"
                );
                Interpretation {
                    intent: self.fallback.interpret_signals(signals, profile),
                    metadata: InterpretationMetadata::fallback(InterpreterMode::Delegated, err.kind()),
                }
            }
        }
    }

    fn mode(&self) -> InterpreterMode {
        InterpreterMode::Delegated
    }
}

/// Renders the user prompt sent to the provider.
fn build_prompt(query: &str, signals: &SignalSet, profile: Option<&UserProfile>) -> String {
    let learner = match profile {
        Some(p) => format!(
            "{} learner, score {:.0}, trend {}, {} prior requests",
            p.level(),
            p.capability_score(),
            p.trend().as_str(),
            p.interaction_count()
        ),
        None => "first-time learner".to_string(),
    };

    format!(
        r#"Learner request:
"""
{query}
"""

Detected signals: {signals}
Learner: {learner}

Respond with JSON of this shape:
{{
  "surface_request": "what the learner literally asked for",
  "deep_need": "the learning need behind the request",
  "motivation": "one of time_pressure, fear_of_failure, convenience_seeking, curiosity, growth",
  "confidence": 0.0,
  "topic": "short subject label"
}}"#,
        query = query,
        signals = signals.summary(),
        learner = learner,
    )
}

/// Maps a provider reply onto an intent. Tolerates prose or code fences
/// around the JSON object.
fn parse_reply(content: &str, signals: &SignalSet) -> Result<IntentResult, ProviderError> {
    let json = extract_json_object(content)
        .ok_or_else(|| ProviderError::malformed("reply contains no JSON object"))?;
    let value: Value = serde_json::from_str(json)
        .map_err(|e| ProviderError::malformed(format!("invalid JSON: {}", e)))?;

    let surface_request = string_field(&value, "surface_request");
    let deep_need = string_field(&value, "deep_need");
    if surface_request.trim().is_empty() && deep_need.trim().is_empty() {
        return Err(ProviderError::malformed(
            "reply has neither surface_request nor deep_need",
        ));
    }

    let confidence = match value.get("confidence") {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(UNSTATED_CONFIDENCE),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(UNSTATED_CONFIDENCE),
        _ => UNSTATED_CONFIDENCE,
    };

    let mut topic = string_field(&value, "topic").trim().to_lowercase();
    if topic.is_empty() {
        topic = signals.topic_tag().unwrap_or(GENERAL_TOPIC).to_string();
    }

    Ok(IntentResult::new(
        surface_request,
        deep_need,
        string_field(&value, "motivation"),
        confidence,
        topic,
    ))
}

fn string_field(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_default()
}

fn extract_json_object(content: &str) -> Option<&str> {
    let start = content.find('{')?;
    let end = content.rfind('}')?;
    (end > start).then(|| &content[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockTextProvider;
    use crate::domain::foundation::UserId;
    use crate::domain::guidance::SignalExtractor;

    const VALID_REPLY: &str = r#"{
        "surface_request": "Essay written for them",
        "deep_need": "Learn to structure an argument",
        "motivation": "time_pressure",
        "confidence": 0.82,
        "topic": "Writing"
    }"#;

    fn signals(query: &str) -> SignalSet {
        SignalExtractor::new().extract(query, None)
    }

    fn interpreter(provider: MockTextProvider) -> LlmIntentInterpreter {
        LlmIntentInterpreter::new(Arc::new(provider)).with_timeout(Duration::from_millis(50))
    }

    #[tokio::test]
    async fn valid_reply_is_used_directly() {
        let query = "Write my essay for me";
        let result = interpreter(MockTextProvider::new().with_response(VALID_REPLY))
            .interpret(query, &signals(query), None)
            .await;

        assert_eq!(result.metadata, InterpretationMetadata::direct(InterpreterMode::Delegated));
        assert_eq!(result.intent.surface_request, "Essay written for them");
        assert_eq!(result.intent.motivation, "time_pressure");
        assert_eq!(result.intent.confidence, 0.82);
        assert_eq!(result.intent.topic, "writing");
    }

    #[tokio::test]
    async fn reply_wrapped_in_code_fence_is_parsed() {
        let reply = format!("Sure, here it is:\n```json\n{}\n```", VALID_REPLY);
        let result = interpreter(MockTextProvider::new().with_response(reply))
            .interpret("q", &SignalSet::empty(), None)
            .await;
        assert!(!result.metadata.fallback_used);
        assert_eq!(result.intent.deep_need, "Learn to structure an argument");
    }

    #[tokio::test]
    async fn provider_error_falls_back_to_rules() {
        let query = "Write my essay for me";
        let provider = MockTextProvider::new().with_error(ProviderError::unavailable("down"));
        let result = interpreter(provider).interpret(query, &signals(query), None).await;

        assert!(result.metadata.fallback_used);
        assert_eq!(result.metadata.mode, InterpreterMode::Delegated);
        assert_eq!(result.metadata.fallback_reason.as_deref(), Some("unavailable"));
        assert_eq!(
            result.intent,
            RuleBasedIntentInterpreter::new().interpret_signals(&signals(query), None)
        );
    }

    #[tokio::test]
    async fn slow_provider_times_out_and_falls_back() {
        let provider = MockTextProvider::new()
            .with_response(VALID_REPLY)
            .with_delay(Duration::from_millis(500));
        let result = interpreter(provider)
            .interpret("Explain recursion", &signals("Explain recursion"), None)
            .await;

        assert!(result.metadata.fallback_used);
        assert_eq!(result.metadata.fallback_reason.as_deref(), Some("timeout"));
        assert!(!result.intent.is_blank());
    }

    #[tokio::test]
    async fn reply_without_needs_is_malformed() {
        let provider = MockTextProvider::new().with_response(r#"{"motivation": "growth"}"#);
        let result = interpreter(provider).interpret("hi", &SignalSet::empty(), None).await;

        assert!(result.metadata.fallback_used);
        assert_eq!(result.metadata.fallback_reason.as_deref(), Some("malformed"));
    }

    #[tokio::test]
    async fn non_json_reply_is_malformed() {
        let provider = MockTextProvider::new().with_response("I cannot help with that");
        let result = interpreter(provider).interpret("hi", &SignalSet::empty(), None).await;
        assert_eq!(result.metadata.fallback_reason.as_deref(), Some("malformed"));
    }

    #[test]
    fn missing_fields_become_empty_strings() {
        let intent = parse_reply(
            r#"{"surface_request": "x", "motivation": null, "confidence": 7}"#,
            &SignalSet::empty().with_topic("mathematics"),
        )
        .unwrap();

        assert_eq!(intent.deep_need, "");
        assert_eq!(intent.motivation, "");
        assert_eq!(intent.confidence, 1.0);
        assert_eq!(intent.topic, "mathematics");
    }

    #[test]
    fn string_confidence_is_accepted() {
        let intent = parse_reply(r#"{"deep_need": "y", "confidence": "0.3"}"#, &SignalSet::empty()).unwrap();
        assert_eq!(intent.confidence, 0.3);
        assert_eq!(intent.topic, GENERAL_TOPIC);
    }

    #[tokio::test]
    async fn prompt_carries_query_signals_and_profile() {
        let provider = MockTextProvider::new().with_response(VALID_REPLY);
        let interp = LlmIntentInterpreter::new(Arc::new(provider.clone()));
        let profile = UserProfile::seeded(UserId::new("learner-7").unwrap(), 80.0);
        let query = "What edge cases am I missing in this proof?";

        interp.interpret(query, &signals(query), Some(&profile)).await;

        let calls = provider.get_calls();
        assert_eq!(calls.len(), 1);
        let prompt = calls[0].last_user_content().unwrap();
        assert!(prompt.contains(query));
        assert!(prompt.contains("inquiry_depth"));
        assert!(prompt.contains("advanced learner"));
        assert_eq!(calls[0].metadata.user_id.as_ref().map(|u| u.as_str()), Some("learner-7"));
    }

    #[test]
    fn reports_delegated_mode() {
        assert_eq!(interpreter(MockTextProvider::new()).mode(), InterpreterMode::Delegated);
    }
}
