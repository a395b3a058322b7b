//! GenerateGuidance - Command handler that analyses a request and writes
//! the guidance text for it.
//!
//! The analysis always completes first. Generation then uses the response
//! brief's prompt; if the provider fails or times out, or no provider is
//! configured, the brief's template text is returned instead.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::domain::guidance::{AnalysisResult, ResponseBrief};
use crate::ports::{CompletionRequest, MessageRole, ProviderError, RequestMetadata, TextGenerationProvider};

use super::process_request::{ProcessRequestCommand, ProcessRequestError, ProcessRequestHandler};

const GUIDE_SYSTEM_PROMPT: &str = "You are a learning guide. Help the learner build their own \
capability. Never hand over finished work they could produce themselves.";

/// Where the guidance text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuidanceSource {
    Provider,
    Template,
}

/// Analysis plus the text shown to the learner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuidanceResponse {
    pub analysis: AnalysisResult,
    pub brief: ResponseBrief,
    pub text: String,
    pub source: GuidanceSource,
}

/// Handler for GenerateGuidance commands.
pub struct GenerateGuidanceHandler {
    process: Arc<ProcessRequestHandler>,
    provider: Option<Arc<dyn TextGenerationProvider>>,
    timeout: Duration,
}

impl GenerateGuidanceHandler {
    pub fn new(
        process: Arc<ProcessRequestHandler>,
        provider: Arc<dyn TextGenerationProvider>,
        timeout: Duration,
    ) -> Self {
        Self {
            process,
            provider: Some(provider),
            timeout,
        }
    }

    /// Handler that always answers with the brief's template text.
    pub fn template_only(process: Arc<ProcessRequestHandler>) -> Self {
        Self {
            process,
            provider: None,
            timeout: Duration::ZERO,
        }
    }

    pub async fn handle(&self, cmd: ProcessRequestCommand) -> Result<GuidanceResponse, ProcessRequestError> {
        let query = cmd.query.clone();
        let analysis = self.process.handle(cmd).await?;
        let brief = ResponseBrief::from_analysis(&analysis);

        let Some(provider) = self.provider.as_deref() else {
            let text = brief.template_text();
            return Ok(GuidanceResponse {
                analysis,
                brief,
                text,
                source: GuidanceSource::Template,
            });
        };

        let (text, source) = match self.generate(provider, &analysis, &brief, &query).await {
            Ok(text) => (text, GuidanceSource::Provider),
            Err(err) => {
                tracing::warn!(
                    request_id = %analysis.request_id,
                    error = %err,
                    "Guidance generation failed, using template text"
                );
                (brief.template_text(), GuidanceSource::Template)
            }
        };

        Ok(GuidanceResponse {
            analysis,
            brief,
            text,
            source,
        })
    }

    async fn generate(
        &self,
        provider: &dyn TextGenerationProvider,
        analysis: &AnalysisResult,
        brief: &ResponseBrief,
        query: &str,
    ) -> Result<String, ProviderError> {
        let request = CompletionRequest::new(RequestMetadata::new(
            analysis.user_id.clone(),
            analysis.request_id.to_string(),
        ))
        .with_system_prompt(GUIDE_SYSTEM_PROMPT)
        .with_message(MessageRole::User, brief.render_prompt(query))
        .with_max_tokens(800);

        let response = tokio::time::timeout(self.timeout, provider.complete(request))
            .await
            .map_err(|_| ProviderError::timeout(self.timeout.as_millis() as u64))??;

        if response.content.trim().is_empty() {
            return Err(ProviderError::malformed("empty guidance text"));
        }
        Ok(response.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockTextProvider;
    use crate::adapters::storage::InMemoryProfileStore;
    use crate::domain::foundation::UserId;
    use crate::domain::guidance::{GuidancePipeline, RuleBasedIntentInterpreter, Strategy};

    fn handler(provider: MockTextProvider) -> GenerateGuidanceHandler {
        let pipeline = GuidancePipeline::with_interpreter(Arc::new(RuleBasedIntentInterpreter::new()));
        let process = ProcessRequestHandler::new(Arc::new(pipeline), Arc::new(InMemoryProfileStore::new()));
        GenerateGuidanceHandler::new(Arc::new(process), Arc::new(provider), Duration::from_millis(50))
    }

    fn cmd(query: &str) -> ProcessRequestCommand {
        ProcessRequestCommand::new(UserId::new("learner").unwrap(), query)
    }

    #[tokio::test]
    async fn returns_provider_text_when_available() {
        let provider = MockTextProvider::new().with_response("Let's start with what an essay thesis does.");
        let response = handler(provider.clone())
            .handle(cmd("Write my essay for me"))
            .await
            .unwrap();

        assert_eq!(response.source, GuidanceSource::Provider);
        assert_eq!(response.text, "Let's start with what an essay thesis does.");
        assert_eq!(response.brief.strategy, Strategy::DeclineWithAlternative);

        let prompt = provider.get_calls()[0].last_user_content().unwrap();
        assert!(prompt.contains("Write my essay for me"));
    }

    #[tokio::test]
    async fn provider_error_falls_back_to_template() {
        let provider = MockTextProvider::new().with_error(ProviderError::network("reset"));
        let response = handler(provider).handle(cmd("Explain recursion")).await.unwrap();

        assert_eq!(response.source, GuidanceSource::Template);
        assert_eq!(response.text, response.brief.template_text());
    }

    #[tokio::test]
    async fn slow_provider_falls_back_to_template() {
        let provider = MockTextProvider::new()
            .with_response("late")
            .with_delay(Duration::from_millis(500));
        let response = handler(provider).handle(cmd("Explain recursion")).await.unwrap();

        assert_eq!(response.source, GuidanceSource::Template);
    }

    #[tokio::test]
    async fn blank_provider_text_falls_back_to_template() {
        let provider = MockTextProvider::new().with_response("   ");
        let response = handler(provider).handle(cmd("Explain recursion")).await.unwrap();
        assert_eq!(response.source, GuidanceSource::Template);
    }

    #[tokio::test]
    async fn template_only_handler_skips_generation() {
        let pipeline = GuidancePipeline::with_interpreter(Arc::new(RuleBasedIntentInterpreter::new()));
        let process = ProcessRequestHandler::new(Arc::new(pipeline), Arc::new(InMemoryProfileStore::new()));
        let response = GenerateGuidanceHandler::template_only(Arc::new(process))
            .handle(cmd("Write my essay for me"))
            .await
            .unwrap();

        assert_eq!(response.source, GuidanceSource::Template);
        assert_eq!(response.text, response.brief.template_text());
        assert_ne!(response.text, crate::adapters::ai::DEFAULT_MOCK_CONTENT);
    }

    #[tokio::test]
    async fn validation_errors_skip_generation() {
        let provider = MockTextProvider::new();
        let result = handler(provider.clone()).handle(cmd("")).await;

        assert!(matches!(result, Err(ProcessRequestError::Validation(_))));
        assert_eq!(provider.call_count(), 0);
    }
}
