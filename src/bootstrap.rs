//! Wiring of adapters into application handlers from configuration.

use std::sync::Arc;
use thiserror::Error;

use crate::adapters::ai::{
    AnthropicConfig, AnthropicProvider, LlmIntentInterpreter, OpenAIConfig, OpenAIProvider,
};
use crate::adapters::http::GuideAppState;
use crate::adapters::storage::{FileProfileStore, InMemoryProfileStore};
use crate::application::{
    GenerateGuidanceHandler, GetProfileSummaryHandler, ProcessRequestHandler, UserLocks,
};
use crate::config::{AiConfig, AiProvider, AppConfig, StorageBackend, StorageConfig, ValidationError};
use crate::domain::guidance::{GuidancePipeline, IntentInterpreter, InterpreterMode, RuleBasedIntentInterpreter};
use crate::ports::{ProfileStore, ProviderError, TextGenerationProvider};

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ValidationError),

    #[error("Provider setup failed: {0}")]
    Provider(#[from] ProviderError),
}

/// Builds the configured text generation provider, or `None` when offline.
pub fn build_provider(config: &AiConfig) -> Result<Option<Arc<dyn TextGenerationProvider>>, BootstrapError> {
    use secrecy::ExposeSecret;

    let provider: Arc<dyn TextGenerationProvider> = match config.provider {
        AiProvider::Offline => {
            tracing::info!("No text provider configured, guidance uses template text");
            return Ok(None);
        }
        AiProvider::Anthropic => {
            let key = config
                .anthropic_api_key
                .as_ref()
                .ok_or(ValidationError::MissingRequired("ANTHROPIC_API_KEY"))?;
            let mut provider_config = AnthropicConfig::new(key.expose_secret().clone())
                .with_timeout(config.timeout())
                .with_max_retries(config.max_retries);
            if let Some(model) = &config.model {
                provider_config = provider_config.with_model(model);
            }
            if let Some(url) = &config.base_url {
                provider_config = provider_config.with_base_url(url);
            }
            Arc::new(AnthropicProvider::new(provider_config)?)
        }
        AiProvider::OpenAI => {
            let key = config
                .openai_api_key
                .as_ref()
                .ok_or(ValidationError::MissingRequired("OPENAI_API_KEY"))?;
            let mut provider_config = OpenAIConfig::new(key.expose_secret().clone())
                .with_timeout(config.timeout())
                .with_max_retries(config.max_retries);
            if let Some(model) = &config.model {
                provider_config = provider_config.with_model(model);
            }
            if let Some(url) = &config.base_url {
                provider_config = provider_config.with_base_url(url);
            }
            Arc::new(OpenAIProvider::new(provider_config)?)
        }
    };

    let info = provider.provider_info();
    tracing::info!(provider = %info.name, model = %info.model, "Text provider ready");
    Ok(Some(provider))
}

/// Builds the configured profile store.
pub fn build_store(config: &StorageConfig) -> Arc<dyn ProfileStore> {
    match config.backend {
        StorageBackend::Memory => Arc::new(InMemoryProfileStore::new()),
        StorageBackend::File => Arc::new(FileProfileStore::new(&config.data_dir)),
    }
}

/// Assembles the HTTP state from configuration.
pub fn build_app_state(config: &AppConfig) -> Result<GuideAppState, BootstrapError> {
    let provider = build_provider(&config.ai)?;
    let store = build_store(&config.storage);
    Ok(app_state_with(config, provider, store))
}

/// Assembles the HTTP state around an existing provider and store.
///
/// Without a provider, delegated interpretation degrades to the rule-based
/// interpreter and guidance is answered from templates.
pub fn app_state_with(
    config: &AppConfig,
    provider: Option<Arc<dyn TextGenerationProvider>>,
    store: Arc<dyn ProfileStore>,
) -> GuideAppState {
    let pipeline_config = &config.pipeline;

    let interpreter: Arc<dyn IntentInterpreter> = match (pipeline_config.intent_mode, &provider) {
        (InterpreterMode::Delegated, Some(provider)) => Arc::new(
            LlmIntentInterpreter::new(Arc::clone(provider))
                .with_timeout(pipeline_config.provider_timeout()),
        ),
        (InterpreterMode::Delegated, None) => {
            tracing::warn!("Delegated intent mode without a provider, using rule-based interpretation");
            Arc::new(RuleBasedIntentInterpreter::new())
        }
        (InterpreterMode::Deterministic, _) => Arc::new(RuleBasedIntentInterpreter::new()),
    };

    let pipeline = GuidancePipeline::new(
        interpreter,
        pipeline_config.assessor(),
        pipeline_config.guardian(),
        pipeline_config.retain_query_text,
    );

    let process_handler = Arc::new(
        ProcessRequestHandler::new(Arc::new(pipeline), Arc::clone(&store))
            .with_max_query_len(pipeline_config.max_query_len)
            .with_locks(UserLocks::new()),
    );
    let guidance_handler = Arc::new(match provider {
        Some(provider) => GenerateGuidanceHandler::new(
            Arc::clone(&process_handler),
            provider,
            pipeline_config.provider_timeout(),
        ),
        None => GenerateGuidanceHandler::template_only(Arc::clone(&process_handler)),
    });
    let profile_handler = Arc::new(GetProfileSummaryHandler::new(store));

    GuideAppState::new(process_handler, guidance_handler, profile_handler)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockTextProvider;
    use secrecy::Secret;

    #[test]
    fn offline_is_default_and_builds_no_provider() {
        assert!(build_provider(&AiConfig::default()).unwrap().is_none());
    }

    #[test]
    fn missing_key_is_a_config_error() {
        let config = AiConfig {
            provider: AiProvider::OpenAI,
            ..Default::default()
        };
        assert!(matches!(build_provider(&config), Err(BootstrapError::Config(_))));
    }

    #[test]
    fn anthropic_provider_uses_model_override() {
        let config = AiConfig {
            provider: AiProvider::Anthropic,
            anthropic_api_key: Some(Secret::new("sk-ant-test".to_string())),
            model: Some("claude-3-haiku-20240307".to_string()),
            ..Default::default()
        };
        let provider = build_provider(&config).unwrap().unwrap();
        assert_eq!(provider.provider_info().model, "claude-3-haiku-20240307");
    }

    #[test]
    fn delegated_mode_wires_provider_interpreter() {
        let mut config = AppConfig::default();
        config.pipeline.intent_mode = InterpreterMode::Delegated;
        let state = app_state_with(
            &config,
            Some(Arc::new(MockTextProvider::new())),
            Arc::new(InMemoryProfileStore::new()),
        );
        assert_eq!(
            state.process_handler.pipeline().interpreter().mode(),
            InterpreterMode::Delegated
        );
    }

    #[test]
    fn delegated_mode_without_provider_uses_rules() {
        let mut config = AppConfig::default();
        config.pipeline.intent_mode = InterpreterMode::Delegated;
        let state = app_state_with(&config, None, Arc::new(InMemoryProfileStore::new()));
        assert_eq!(
            state.process_handler.pipeline().interpreter().mode(),
            InterpreterMode::Deterministic
        );
    }
}
