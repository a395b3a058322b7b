//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `GROWTH_GUIDE` prefix and nested values use double underscores as separators.
//! Every section has defaults, so an empty environment yields a runnable
//! offline configuration (no text provider, in-memory store).
//!
//! # Example
//!
//! ```no_run
//! use growth_guide::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {:?}", config.server.bind_addr());
//! ```

mod ai;
mod error;
mod pipeline;
mod server;
mod storage;

pub use ai::{AiConfig, AiProvider};
pub use error::{ConfigError, ValidationError};
pub use pipeline::PipelineConfig;
pub use server::{Environment, ServerConfig};
pub use storage::{StorageBackend, StorageConfig};

use serde::Deserialize;

use crate::domain::guidance::InterpreterMode;

/// Root application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment, logging)
    #[serde(default)]
    pub server: ServerConfig,

    /// AI provider configuration (offline/OpenAI/Anthropic)
    #[serde(default)]
    pub ai: AiConfig,

    /// Pipeline tunables
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Profile storage
    #[serde(default)]
    pub storage: StorageConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `GROWTH_GUIDE` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `GROWTH_GUIDE__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `GROWTH_GUIDE__PIPELINE__INTENT_MODE=delegated` -> `pipeline.intent_mode`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("GROWTH_GUIDE")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for the first invalid section.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.ai.validate()?;
        self.pipeline.validate()?;
        self.storage.validate()?;

        if self.pipeline.intent_mode == InterpreterMode::Delegated && self.ai.is_offline() {
            return Err(ValidationError::DelegatedWithoutProvider);
        }
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: &[&str] = &[
        "GROWTH_GUIDE__SERVER__PORT",
        "GROWTH_GUIDE__SERVER__ENVIRONMENT",
        "GROWTH_GUIDE__AI__PROVIDER",
        "GROWTH_GUIDE__AI__ANTHROPIC_API_KEY",
        "GROWTH_GUIDE__PIPELINE__INTENT_MODE",
        "GROWTH_GUIDE__PIPELINE__PROVIDER_TIMEOUT_MS",
        "GROWTH_GUIDE__STORAGE__BACKEND",
    ];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_empty_environment_uses_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();
        let config = AppConfig::load().unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.ai.provider, AiProvider::Offline);
        assert_eq!(config.pipeline.intent_mode, InterpreterMode::Deterministic);
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_nested_values_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        env::set_var("GROWTH_GUIDE__SERVER__PORT", "3000");
        env::set_var("GROWTH_GUIDE__PIPELINE__INTENT_MODE", "delegated");
        env::set_var("GROWTH_GUIDE__PIPELINE__PROVIDER_TIMEOUT_MS", "1500");
        env::set_var("GROWTH_GUIDE__STORAGE__BACKEND", "file");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.pipeline.intent_mode, InterpreterMode::Delegated);
        assert_eq!(config.pipeline.provider_timeout_ms, 1500);
        assert_eq!(config.storage.backend, StorageBackend::File);
    }

    #[test]
    fn test_selected_provider_requires_key() {
        let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        env::set_var("GROWTH_GUIDE__AI__PROVIDER", "anthropic");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_delegated_mode_needs_a_provider() {
        let mut config = AppConfig::default();
        config.pipeline.intent_mode = InterpreterMode::Delegated;
        assert_eq!(config.validate(), Err(ValidationError::DelegatedWithoutProvider));

        config.ai.provider = AiProvider::OpenAI;
        config.ai.openai_api_key = Some(secrecy::Secret::new("sk-test".to_string()));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_is_production() {
        let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        env::set_var("GROWTH_GUIDE__SERVER__ENVIRONMENT", "production");
        env::set_var("GROWTH_GUIDE__AI__ANTHROPIC_API_KEY", "sk-ant-xxx");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.is_production());
        assert!(config.ai.has_anthropic());
    }
}
