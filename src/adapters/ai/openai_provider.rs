//! OpenAI Provider - Implementation of TextGenerationProvider for OpenAI's chat API.
//!
//! # Configuration
//!
//! ```ignore
//! let config = OpenAIConfig::new(api_key)
//!     .with_model("gpt-4o-mini")
//!     .with_base_url("https://api.openai.com/v1");
//!
//! let provider = OpenAIProvider::new(config)?;
//! ```

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::sleep;

use crate::ports::{
    CompletionRequest, CompletionResponse, FinishReason, MessageRole, ProviderError,
    ProviderInfo, TextGenerationProvider,
};

/// Configuration for the OpenAI provider.
#[derive(Debug, Clone)]
pub struct OpenAIConfig {
    /// API key for authentication.
    api_key: Secret<String>,
    /// Model to use (e.g., "gpt-4o-mini").
    pub model: String,
    /// Base URL for the API (default: https://api.openai.com/v1).
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Maximum retries on transient failures.
    pub max_retries: u32,
}

impl OpenAIConfig {
    /// Creates a new configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: "gpt-4o-mini".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            timeout: Duration::from_secs(30),
            max_retries: 1,
        }
    }

    /// Sets the model to use.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the maximum retry count.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// OpenAI API provider implementation.
pub struct OpenAIProvider {
    config: OpenAIConfig,
    client: Client,
}

impl OpenAIProvider {
    /// Creates a new OpenAI provider with the given configuration.
    pub fn new(config: OpenAIConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ProviderError::InvalidRequest(format!("HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    /// Converts our request to OpenAI's format.
    fn to_openai_request(&self, request: &CompletionRequest) -> OpenAIRequest {
        let mut messages = Vec::new();

        if let Some(ref prompt) = request.system_prompt {
            messages.push(OpenAIMessage {
                role: "system".to_string(),
                content: prompt.clone(),
            });
        }

        for msg in &request.messages {
            messages.push(OpenAIMessage {
                role: match msg.role {
                    MessageRole::System => "system",
                    MessageRole::User => "user",
                    MessageRole::Assistant => "assistant",
                }
                .to_string(),
                content: msg.content.clone(),
            });
        }

        OpenAIRequest {
            model: self.config.model.clone(),
            messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        }
    }

    async fn send_request(&self, request: &CompletionRequest) -> Result<Response, ProviderError> {
        self.client
            .post(self.completions_url())
            .header("Authorization", format!("Bearer {}", self.config.api_key()))
            .header("Content-Type", "application/json")
            .json(&self.to_openai_request(request))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::timeout(self.config.timeout.as_millis() as u64)
                } else {
                    ProviderError::network(e.to_string())
                }
            })
    }

    async fn parse_response(&self, response: Response) -> Result<CompletionResponse, ProviderError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(map_error_status(status.as_u16(), body));
        }

        let openai_response: OpenAIResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::malformed(format!("Failed to parse response: {}", e)))?;

        openai_response.into_completion()
    }
}

#[async_trait]
impl TextGenerationProvider for OpenAIProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, ProviderError> {
        let mut attempt = 0;
        loop {
            let result = match self.send_request(&request).await {
                Ok(response) => self.parse_response(response).await,
                Err(err) => Err(err),
            };

            match result {
                Ok(completion) => return Ok(completion),
                Err(err) if err.is_retryable() && attempt < self.config.max_retries => {
                    tracing::debug!(error = %err, attempt, "Retrying OpenAI request");
                    sleep(Duration::from_millis(250 << attempt.min(4))).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    fn provider_info(&self) -> ProviderInfo {
        ProviderInfo::new("openai", &self.config.model)
    }
}

fn map_error_status(status: u16, body: String) -> ProviderError {
    match status {
        401 | 403 => ProviderError::AuthenticationFailed,
        429 => ProviderError::rate_limited(parse_retry_after(&body)),
        400 => {
            if body.contains("content_filter") {
                ProviderError::ContentFiltered { reason: body }
            } else {
                ProviderError::InvalidRequest(body)
            }
        }
        500..=599 => ProviderError::unavailable(format!("Server error {}: {}", status, body)),
        _ => ProviderError::network(format!("Unexpected status {}: {}", status, body)),
    }
}

/// Parses retry-after from an OpenAI error message ("... try again in 20s ...").
fn parse_retry_after(error_body: &str) -> u32 {
    serde_json::from_str::<serde_json::Value>(error_body)
        .ok()
        .and_then(|parsed| {
            let msg = parsed.get("error")?.get("message")?.as_str()?.to_string();
            let idx = msg.find("try again in ")?;
            let rest = &msg[idx + "try again in ".len()..];
            let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
            digits.parse::<u32>().ok()
        })
        .unwrap_or(60)
}

// ----- OpenAI API Types -----

#[derive(Debug, Serialize)]
struct OpenAIRequest {
    model: String,
    messages: Vec<OpenAIMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize, Deserialize)]
struct OpenAIMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    model: String,
    choices: Vec<OpenAIChoice>,
}

impl OpenAIResponse {
    fn into_completion(self) -> Result<CompletionResponse, ProviderError> {
        let model = self.model;
        let choice = self
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::malformed("No choices in response"))?;

        let finish_reason = match choice.finish_reason.as_deref() {
            Some("length") => FinishReason::Length,
            Some("content_filter") => FinishReason::ContentFilter,
            _ => FinishReason::Stop,
        };

        Ok(CompletionResponse {
            content: choice.message.content,
            model,
            finish_reason,
        })
    }
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIMessage,
    finish_reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::UserId;
    use crate::ports::RequestMetadata;

    #[test]
    fn config_builder_works() {
        let config = OpenAIConfig::new("test-key")
            .with_model("gpt-4o")
            .with_base_url("https://custom.api.com/v1")
            .with_timeout(Duration::from_secs(10))
            .with_max_retries(0);

        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.base_url, "https://custom.api.com/v1");
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.max_retries, 0);
        assert_eq!(config.api_key(), "test-key");
    }

    #[test]
    fn system_prompt_becomes_first_message() {
        let provider = OpenAIProvider::new(OpenAIConfig::new("k")).unwrap();
        let request = CompletionRequest::new(RequestMetadata::new(UserId::new("u").unwrap(), "t"))
            .with_system_prompt("Guide")
            .with_message(MessageRole::User, "Hi");

        let body = provider.to_openai_request(&request);

        assert_eq!(body.messages.len(), 2);
        assert_eq!(body.messages[0].role, "system");
        assert_eq!(body.messages[1].content, "Hi");
    }

    #[test]
    fn response_uses_first_choice() {
        let raw = r#"{
            "model": "gpt-4o-mini",
            "choices": [{"message": {"role": "assistant", "content": "ok"}, "finish_reason": "length"}]
        }"#;
        let parsed: OpenAIResponse = serde_json::from_str(raw).unwrap();
        let completion = parsed.into_completion().unwrap();
        assert_eq!(completion.content, "ok");
        assert_eq!(completion.finish_reason, FinishReason::Length);
    }

    #[test]
    fn response_without_choices_is_malformed() {
        let parsed: OpenAIResponse = serde_json::from_str(r#"{"model": "m", "choices": []}"#).unwrap();
        assert!(matches!(parsed.into_completion(), Err(ProviderError::Malformed(_))));
    }

    #[test]
    fn content_filter_status_maps_to_filtered() {
        let err = map_error_status(400, r#"{"error":{"code":"content_filter"}}"#.into());
        assert!(matches!(err, ProviderError::ContentFiltered { .. }));
        assert_eq!(map_error_status(429, String::new()), ProviderError::rate_limited(60));
    }

    #[test]
    fn parse_retry_after_from_message() {
        let body = r#"{"error":{"message":"Rate limit reached. Please try again in 20s."}}"#;
        assert_eq!(parse_retry_after(body), 20);
    }

    #[test]
    fn provider_info_reports_model() {
        let provider = OpenAIProvider::new(OpenAIConfig::new("k").with_model("gpt-4o")).unwrap();
        assert_eq!(provider.provider_info(), ProviderInfo::new("openai", "gpt-4o"));
    }
}
