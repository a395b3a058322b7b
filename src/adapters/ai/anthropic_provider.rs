//! Anthropic Provider - Implementation of TextGenerationProvider for Anthropic's Messages API.
//!
//! # Configuration
//!
//! ```ignore
//! let config = AnthropicConfig::new(api_key)
//!     .with_model("claude-sonnet-4-20250514")
//!     .with_base_url("https://api.anthropic.com");
//!
//! let provider = AnthropicProvider::new(config)?;
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

/// Configuration for the Anthropic provider.
#[derive(Debug, Clone)]
pub struct AnthropicConfig {
    /// API key for authentication.
    api_key: Secret<String>,
    /// Model to use.
    pub model: String,
    /// Base URL for the API (default: https://api.anthropic.com).
    pub base_url: String,
    /// HTTP request timeout.
    pub timeout: Duration,
    /// Maximum retries on transient failures.
    pub max_retries: u32,
}

impl AnthropicConfig {
    /// Creates a new configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: "claude-sonnet-4-20250514".to_string(),
            base_url: "https://api.anthropic.com".to_string(),
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

/// Anthropic API version header value.
const ANTHROPIC_API_VERSION: &str = "2023-06-01";

/// Default completion length when the request sets none.
const DEFAULT_MAX_TOKENS: u32 = 1024;

/// Anthropic API provider implementation.
pub struct AnthropicProvider {
    config: AnthropicConfig,
    client: Client,
}

impl AnthropicProvider {
    /// Creates a new Anthropic provider with the given configuration.
    pub fn new(config: AnthropicConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ProviderError::InvalidRequest(format!("HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn messages_url(&self) -> String {
        format!("{}/v1/messages", self.config.base_url.trim_end_matches('/'))
    }

    /// Converts our request to Anthropic's format.
    fn to_anthropic_request(&self, request: &CompletionRequest) -> AnthropicRequest {
        // System messages travel in the top-level `system` field.
        let mut messages: Vec<AnthropicMessage> = request
            .messages
            .iter()
            .filter_map(|msg| {
                let role = match msg.role {
                    MessageRole::System => return None,
                    MessageRole::User => "user",
                    MessageRole::Assistant => "assistant",
                };
                Some(AnthropicMessage {
                    role: role.to_string(),
                    content: msg.content.clone(),
                })
            })
            .collect();

        if messages.is_empty() {
            messages.push(AnthropicMessage {
                role: "user".to_string(),
                content: String::new(),
            });
        }

        AnthropicRequest {
            model: self.config.model.clone(),
            messages,
            system: request.system_prompt.clone(),
            max_tokens: request.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            temperature: request.temperature,
        }
    }

    async fn send_request(&self, request: &CompletionRequest) -> Result<Response, ProviderError> {
        self.client
            .post(self.messages_url())
            .header("x-api-key", self.config.api_key())
            .header("anthropic-version", ANTHROPIC_API_VERSION)
            .header("Content-Type", "application/json")
            .json(&self.to_anthropic_request(request))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::timeout(self.config.timeout.as_millis() as u64)
                } else if e.is_connect() {
                    ProviderError::network(format!("Connection failed: {}", e))
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

        let anthropic_response: AnthropicResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::malformed(format!("Failed to parse response: {}", e)))?;

        Ok(anthropic_response.into_completion())
    }
}

#[async_trait]
impl TextGenerationProvider for AnthropicProvider {
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
                    tracing::debug!(error = %err, attempt, "Retrying Anthropic request");
                    // Backoff: 250ms, 500ms, 1s, ...
                    sleep(Duration::from_millis(250 << attempt.min(4))).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    fn provider_info(&self) -> ProviderInfo {
        ProviderInfo::new("anthropic", &self.config.model)
    }
}

/// Maps a non-success HTTP status to a provider error.
fn map_error_status(status: u16, body: String) -> ProviderError {
    match status {
        401 | 403 => ProviderError::AuthenticationFailed,
        429 => ProviderError::rate_limited(parse_retry_after(&body)),
        400 => ProviderError::InvalidRequest(body),
        500..=599 => ProviderError::unavailable(format!("Server error {}: {}", status, body)),
        _ => ProviderError::network(format!("Unexpected status {}: {}", status, body)),
    }
}

/// Parses retry-after seconds from an error body, defaulting to 60.
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

// ----- Anthropic API Types -----

#[derive(Debug, Serialize)]
struct AnthropicRequest {
    model: String,
    messages: Vec<AnthropicMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize, Deserialize)]
struct AnthropicMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    model: String,
    content: Vec<ContentBlock>,
    stop_reason: Option<String>,
}

impl AnthropicResponse {
    fn into_completion(self) -> CompletionResponse {
        let content = self
            .content
            .into_iter()
            .filter(|block| block.block_type == "text")
            .filter_map(|block| block.text)
            .collect::<Vec<_>>()
            .join("");

        let finish_reason = match self.stop_reason.as_deref() {
            Some("max_tokens") => FinishReason::Length,
            _ => FinishReason::Stop,
        };

        CompletionResponse {
            content,
            model: self.model,
            finish_reason,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::UserId;
    use crate::ports::RequestMetadata;

    fn request() -> CompletionRequest {
        CompletionRequest::new(RequestMetadata::new(UserId::new("u").unwrap(), "t"))
            .with_message(MessageRole::System, "ignored here")
            .with_message(MessageRole::User, "Hello")
            .with_system_prompt("Be a guide")
    }

    #[test]
    fn config_builder_works() {
        let config = AnthropicConfig::new("test-key")
            .with_model("claude-3-haiku-20240307")
            .with_base_url("https://custom.api.com")
            .with_timeout(Duration::from_secs(5))
            .with_max_retries(2);

        assert_eq!(config.model, "claude-3-haiku-20240307");
        assert_eq!(config.base_url, "https://custom.api.com");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.max_retries, 2);
        assert_eq!(config.api_key(), "test-key");
    }

    #[test]
    fn request_moves_system_out_of_messages() {
        let provider = AnthropicProvider::new(AnthropicConfig::new("k")).unwrap();
        let body = provider.to_anthropic_request(&request());

        assert_eq!(body.messages.len(), 1);
        assert_eq!(body.messages[0].role, "user");
        assert_eq!(body.system.as_deref(), Some("Be a guide"));
        assert_eq!(body.max_tokens, DEFAULT_MAX_TOKENS);
    }

    #[test]
    fn messages_url_trims_trailing_slash() {
        let provider =
            AnthropicProvider::new(AnthropicConfig::new("k").with_base_url("http://localhost:9/")).unwrap();
        assert_eq!(provider.messages_url(), "http://localhost:9/v1/messages");
    }

    #[test]
    fn response_joins_text_blocks() {
        let raw = r#"{
            "model": "claude-x",
            "content": [
                {"type": "text", "text": "Hello "},
                {"type": "tool_use"},
                {"type": "text", "text": "there"}
            ],
            "stop_reason": "max_tokens"
        }"#;
        let parsed: AnthropicResponse = serde_json::from_str(raw).unwrap();
        let completion = parsed.into_completion();
        assert_eq!(completion.content, "Hello there");
        assert_eq!(completion.finish_reason, FinishReason::Length);
    }

    #[test]
    fn error_statuses_map_to_provider_errors() {
        assert_eq!(map_error_status(401, String::new()), ProviderError::AuthenticationFailed);
        assert!(matches!(map_error_status(503, "x".into()), ProviderError::Unavailable { .. }));
        assert!(matches!(map_error_status(400, "bad".into()), ProviderError::InvalidRequest(_)));
    }

    #[test]
    fn parse_retry_after_reads_message() {
        let body = r#"{"error":{"message":"Rate limited, try again in 12s"}}"#;
        assert_eq!(parse_retry_after(body), 12);
        assert_eq!(parse_retry_after(r#"{"error":{"message":"slow down"}}"#), 60);
    }

    #[test]
    fn provider_info_reports_model() {
        let provider = AnthropicProvider::new(AnthropicConfig::new("k")).unwrap();
        let info = provider.provider_info();
        assert_eq!(info.name, "anthropic");
        assert_eq!(info.model, "claude-sonnet-4-20250514");
    }
}
