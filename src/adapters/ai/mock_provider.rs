//! Mock text generation provider.
//!
//! Provides a configurable implementation of the `TextGenerationProvider`
//! port for tests. Configuration never selects it at runtime.
//!
//! # Features
//!
//! - Pre-configured responses, consumed in order
//! - Simulated delays for timeout testing
//! - Error injection for fallback testing
//! - Call tracking for verification (the most recent
//!   [`MAX_RECORDED_CALLS`] requests are retained)
//!
//! # Example
//!
//! ```ignore
//! let provider = MockTextProvider::new()
//!     .with_response(r#"{"surface_request": "...", "deep_need": "..."}"#)
//!     .with_delay(Duration::from_millis(100));
//!
//! let response = provider.complete(request).await?;
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::sleep;

use crate::ports::{
    CompletionRequest, CompletionResponse, FinishReason, ProviderError, ProviderInfo,
    TextGenerationProvider,
};

/// Content returned once the configured queue is exhausted.
pub const DEFAULT_MOCK_CONTENT: &str = "Mock response";

/// Number of most recent requests kept for inspection.
pub const MAX_RECORDED_CALLS: usize = 64;

/// Mock provider for testing.
#[derive(Debug, Clone)]
pub struct MockTextProvider {
    responses: Arc<Mutex<VecDeque<MockResponse>>>,
    info: ProviderInfo,
    delay: Duration,
    calls: Arc<Mutex<VecDeque<CompletionRequest>>>,
    call_count: Arc<AtomicUsize>,
}

/// A configured mock response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Return a successful completion.
    Success {
        content: String,
        finish_reason: FinishReason,
    },
    /// Return an error.
    Error(ProviderError),
}

impl Default for MockTextProvider {
    fn default() -> Self {
        Self::new()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockTextProvider {
    /// Creates a new mock provider with default settings.
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            info: ProviderInfo::new("mock", "mock-model-1"),
            delay: Duration::ZERO,
            calls: Arc::new(Mutex::new(VecDeque::new())),
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Adds a successful response to the queue.
    pub fn with_response(self, content: impl Into<String>) -> Self {
        lock(&self.responses).push_back(MockResponse::Success {
            content: content.into(),
            finish_reason: FinishReason::Stop,
        });
        self
    }

    /// Adds an error response to the queue.
    pub fn with_error(self, error: ProviderError) -> Self {
        lock(&self.responses).push_back(MockResponse::Error(error));
        self
    }

    /// Sets simulated latency per request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Sets the provider info.
    pub fn with_provider_info(mut self, info: ProviderInfo) -> Self {
        self.info = info;
        self
    }

    /// Returns the number of calls made to this provider.
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Returns the retained calls, oldest first.
    pub fn get_calls(&self) -> Vec<CompletionRequest> {
        lock(&self.calls).iter().cloned().collect()
    }

    fn record(&self, request: CompletionRequest) {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        let mut calls = lock(&self.calls);
        if calls.len() == MAX_RECORDED_CALLS {
            calls.pop_front();
        }
        calls.push_back(request);
    }

    fn next_response(&self) -> MockResponse {
        lock(&self.responses)
            .pop_front()
            .unwrap_or_else(|| MockResponse::Success {
                content: DEFAULT_MOCK_CONTENT.to_string(),
                finish_reason: FinishReason::Stop,
            })
    }
}

#[async_trait]
impl TextGenerationProvider for MockTextProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, ProviderError> {
        self.record(request);

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        match self.next_response() {
            MockResponse::Success {
                content,
                finish_reason,
            } => Ok(CompletionResponse {
                content,
                model: self.info.model.clone(),
                finish_reason,
            }),
            MockResponse::Error(err) => Err(err),
        }
    }

    fn provider_info(&self) -> ProviderInfo {
        self.info.clone()
    }
}
