//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - Text generation providers and the delegated intent interpreter
//! - `storage` - Profile stores (in-memory, YAML files)
//! - `http` - axum REST surface

pub mod ai;
pub mod http;
pub mod storage;

pub use ai::{
    AnthropicConfig, AnthropicProvider, LlmIntentInterpreter, MockTextProvider, OpenAIConfig,
    OpenAIProvider,
};
pub use http::{guide_router, GuideAppState};
pub use storage::{FileProfileStore, InMemoryProfileStore};
