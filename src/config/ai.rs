//! AI provider configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// AI provider configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// Which provider backs generation and delegated interpretation
    #[serde(default)]
    pub provider: AiProvider,

    /// OpenAI API key
    pub openai_api_key: Option<Secret<String>>,

    /// Anthropic API key
    pub anthropic_api_key: Option<Secret<String>>,

    /// Model override for the selected provider
    pub model: Option<String>,

    /// Base URL override for the selected provider
    pub base_url: Option<String>,

    /// HTTP timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Maximum retries on transient failure
    #[serde(default = "default_retries")]
    pub max_retries: u32,
}

/// AI provider type
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AiProvider {
    /// No provider: rule-based interpretation and template guidance only
    #[default]
    Offline,
    OpenAI,
    Anthropic,
}

impl AiConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// True when no text generation provider is configured
    pub fn is_offline(&self) -> bool {
        self.provider == AiProvider::Offline
    }

    /// Check if OpenAI is configured
    pub fn has_openai(&self) -> bool {
        self.openai_api_key
            .as_ref()
            .is_some_and(|k| !k.expose_secret().is_empty())
    }

    /// Check if Anthropic is configured
    pub fn has_anthropic(&self) -> bool {
        self.anthropic_api_key
            .as_ref()
            .is_some_and(|k| !k.expose_secret().is_empty())
    }

    /// Validate AI configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self.provider {
            AiProvider::OpenAI if !self.has_openai() => {
                return Err(ValidationError::MissingRequired("OPENAI_API_KEY"));
            }
            AiProvider::Anthropic if !self.has_anthropic() => {
                return Err(ValidationError::MissingRequired("ANTHROPIC_API_KEY"));
            }
            _ => {}
        }

        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }

        Ok(())
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            provider: AiProvider::default(),
            openai_api_key: None,
            anthropic_api_key: None,
            model: None,
            base_url: None,
            timeout_secs: default_timeout(),
            max_retries: default_retries(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}

fn default_retries() -> u32 {
    1
}
