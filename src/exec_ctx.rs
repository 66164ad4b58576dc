//! Execution context shared across planner requests.
//!
//! [`ExecCtx`] carries the HTTP client, model backend, endpoint, retry delays,
//! per-call deadline, cancellation handle, and optional event handler. Build
//! it once and share it across requests; it holds no per-request state.

use crate::backend::{AnthropicBackend, Backend, BackoffConfig};
use crate::config::{PlannerConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
use crate::events::EventHandler;
use reqwest::Client;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;
use tracing::warn;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Shared execution context for planner requests.
///
/// # Example
///
/// ```
/// use trip_planner::ExecCtx;
/// use std::time::Duration;
///
/// let ctx = ExecCtx::builder("https://api.anthropic.com")
///     .anthropic_with_key("sk-ant-...")
///     .call_timeout(Duration::from_secs(60))
///     .build();
/// assert_eq!(ctx.call_timeout, Duration::from_secs(60));
/// ```
pub struct ExecCtx {
    /// HTTP client (cheap to clone -- uses `Arc` internally).
    pub client: Client,
    /// Service root URL (e.g. `https://api.anthropic.com`).
    pub base_url: String,
    /// Model backend. Default: [`AnthropicBackend`] without a key.
    pub backend: Arc<dyn Backend>,
    /// Delay schedule between transport retries.
    pub backoff: BackoffConfig,
    /// Deadline for each individual backend call.
    pub call_timeout: Duration,
    /// Optional cancellation flag, checked before every model call.
    pub cancellation: Option<Arc<AtomicBool>>,
    /// Optional event handler for state transitions and retries.
    pub event_handler: Option<Arc<dyn EventHandler>>,
}

impl ExecCtx {
    /// Create a new builder.
    pub fn builder(base_url: impl Into<String>) -> ExecCtxBuilder {
        ExecCtxBuilder {
            client: None,
            base_url: base_url.into(),
            backend: None,
            backoff: None,
            call_timeout: None,
            cancellation: None,
            event_handler: None,
        }
    }

    /// Context for the Anthropic API as described by `config`.
    pub fn from_config(config: &PlannerConfig) -> crate::error::Result<Self> {
        Self::builder(config.base_url.clone())
            .backend(Arc::new(
                AnthropicBackend::new().with_optional_api_key(config.api_key.clone()),
            ))
            .call_timeout(config.timeout)
            .try_build()
    }

    /// Check whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .is_some_and(|c| c.load(Ordering::Relaxed))
    }

    /// Return an error if cancellation has been requested.
    pub fn check_cancelled(&self) -> crate::error::Result<()> {
        if self.is_cancelled() {
            return Err(crate::PlannerError::Cancelled);
        }
        Ok(())
    }
}

impl std::fmt::Debug for ExecCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecCtx")
            .field("base_url", &self.base_url)
            .field("backend", &self.backend.name())
            .field("backoff", &self.backoff)
            .field("call_timeout", &self.call_timeout)
            .field("has_cancellation", &self.cancellation.is_some())
            .field("has_event_handler", &self.event_handler.is_some())
            .finish()
    }
}

/// Builder for [`ExecCtx`].
pub struct ExecCtxBuilder {
    client: Option<Client>,
    base_url: String,
    backend: Option<Arc<dyn Backend>>,
    backoff: Option<BackoffConfig>,
    call_timeout: Option<Duration>,
    cancellation: Option<Arc<AtomicBool>>,
    event_handler: Option<Arc<dyn EventHandler>>,
}

impl ExecCtxBuilder {
    /// Set the HTTP client. If not set, a default client is created.
    pub fn client(mut self, client: Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Set the model backend.
    pub fn backend(mut self, backend: Arc<dyn Backend>) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Use the Anthropic backend with the given API key.
    pub fn anthropic_with_key(mut self, api_key: impl Into<String>) -> Self {
        self.backend = Some(Arc::new(AnthropicBackend::new().with_api_key(api_key)));
        self
    }

    /// Set the retry delay schedule. Default: [`BackoffConfig::standard()`].
    pub fn backoff(mut self, config: BackoffConfig) -> Self {
        self.backoff = Some(config);
        self
    }

    /// Set the per-call deadline. Default: 120 seconds.
    pub fn call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = Some(timeout);
        self
    }

    /// Set the cancellation flag.
    pub fn cancellation(mut self, cancel: Option<Arc<AtomicBool>>) -> Self {
        self.cancellation = cancel;
        self
    }

    /// Set the event handler.
    pub fn event_handler(mut self, handler: Arc<dyn EventHandler>) -> Self {
        self.event_handler = Some(handler);
        self
    }

    /// Build the execution context.
    ///
    /// If the default HTTP client cannot be built, a warning is logged and
    /// reqwest's stock client (no connect timeout) is used instead. Use
    /// [`try_build`](Self::try_build) to get the error.
    pub fn build(mut self) -> ExecCtx {
        let client = match self.client.take() {
            Some(c) => c,
            None => default_client().unwrap_or_else(|e| {
                warn!(error = %e, "failed to build HTTP client, falling back to defaults without connect timeout");
                Client::new()
            }),
        };
        self.assemble(client)
    }

    /// Build the execution context, failing if the HTTP client cannot be built.
    pub fn try_build(mut self) -> crate::error::Result<ExecCtx> {
        let client = match self.client.take() {
            Some(c) => c,
            None => default_client()?,
        };
        Ok(self.assemble(client))
    }

    fn assemble(self, client: Client) -> ExecCtx {
        let base_url = if self.base_url.trim().is_empty() {
            DEFAULT_BASE_URL.to_string()
        } else {
            normalize_base_url(&self.base_url)
        };
        ExecCtx {
            client,
            base_url,
            backend: self
                .backend
                .unwrap_or_else(|| Arc::new(AnthropicBackend::new())),
            backoff: self.backoff.unwrap_or_default(),
            call_timeout: self.call_timeout.unwrap_or(DEFAULT_TIMEOUT),
            cancellation: self.cancellation,
            event_handler: self.event_handler,
        }
    }
}

fn default_client() -> reqwest::Result<Client> {
    Client::builder().connect_timeout(CONNECT_TIMEOUT).build()
}

/// Strip known endpoint suffixes from a base URL so the backend can append
/// its own path without doubling it.
/// e.g., "https://api.anthropic.com/v1/messages" -> "https://api.anthropic.com"
fn normalize_base_url(url: &str) -> String {
    let trimmed = url.trim_end_matches('/');
    for suffix in ["/v1/messages", "/v1"] {
        if let Some(stripped) = trimmed.strip_suffix(suffix) {
            return stripped.to_string();
        }
    }
    trimmed.to_string()
}
