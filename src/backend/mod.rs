//! Backend trait and normalized request/response types.
//!
//! The [`Backend`] trait abstracts the one HTTP call the planner makes,
//! translating a normalized [`LlmRequest`] into the provider's wire format
//! and the reply back into an [`LlmResponse`].
//!
//! ```text
//! ModelGateway ──► LlmRequest ──► Backend::complete() ──► LlmResponse
//!                                        │
//!                             ┌──────────┴──────────┐
//!                      AnthropicBackend        MockBackend
//!                        /v1/messages        scripted replies
//! ```

pub mod anthropic;
pub mod backoff;
pub mod mock;

pub use anthropic::AnthropicBackend;
pub use backoff::{BackoffConfig, JitterStrategy};
pub use mock::{MockBackend, MockReply};

use crate::config::LlmConfig;
use crate::error::Result;
use async_trait::async_trait;
use reqwest::Client;

/// A normalized model request: one system instruction plus one user message.
#[derive(Debug, Clone)]
pub struct LlmRequest {
    /// System instruction.
    pub system_prompt: String,

    /// The user message.
    pub prompt: String,

    /// Model identifier, temperature and token budget.
    pub config: LlmConfig,
}

/// A normalized model response.
#[derive(Debug)]
pub struct LlmResponse {
    /// The generated text content.
    pub text: String,

    /// HTTP status code (for diagnostics/logging).
    pub status: u16,

    /// Provider-specific metadata (token usage, model, stop reason).
    pub metadata: Option<serde_json::Value>,
}

/// Abstraction over the generative-text service.
///
/// Implementations perform exactly one request per call and never retry
/// on their own; retry policy lives in [`crate::gateway`].
///
/// This trait is object-safe and designed to be used as `Arc<dyn Backend>`.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Execute one non-streaming call.
    async fn complete(
        &self,
        client: &Client,
        base_url: &str,
        request: &LlmRequest,
    ) -> Result<LlmResponse>;

    /// Human-readable name for logging and diagnostics.
    fn name(&self) -> &'static str;
}
