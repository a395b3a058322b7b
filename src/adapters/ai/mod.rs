//! AI Provider Adapters.
//!
//! Implementations of the `TextGenerationProvider` port, plus the
//! provider-delegated intent interpreter built on top of it.
//!
//! ## Available Adapters
//!
//! - `MockTextProvider` - Configurable mock for testing
//! - `OpenAIProvider` - OpenAI chat models
//! - `AnthropicProvider` - Anthropic Claude models
//! - `LlmIntentInterpreter` - Delegated `IntentInterpreter` with rule-based fallback

mod anthropic_provider;
mod llm_intent_interpreter;
mod mock_provider;
mod openai_provider;

pub use anthropic_provider::{AnthropicConfig, AnthropicProvider};
pub use llm_intent_interpreter::{LlmIntentInterpreter, DEFAULT_PROVIDER_TIMEOUT};
pub use mock_provider::{MockResponse, MockTextProvider, DEFAULT_MOCK_CONTENT, MAX_RECORDED_CALLS};
pub use openai_provider::{OpenAIConfig, OpenAIProvider};
