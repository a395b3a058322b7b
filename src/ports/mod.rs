//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `TextGenerationProvider` - LLM completions for delegated interpretation
//!   and response prose
//! - `ProfileStore` - Learner profile persistence

mod ai_provider;
mod profile_store;

pub use ai_provider::{
    CompletionRequest, CompletionResponse, FinishReason, Message, MessageRole, ProviderError,
    ProviderInfo, RequestMetadata, TextGenerationProvider,
};
pub use profile_store::{ProfileStore, StoreError};
