//! Backend for the Anthropic Messages API.
//!
//! Endpoint: `POST {base_url}/v1/messages`. The reply's first `text` content
//! block is the model output.

use super::{Backend, LlmRequest, LlmResponse};
use crate::error::Result;
use crate::PlannerError;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

pub const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Backend for the Anthropic Messages API.
///
/// # Example
///
/// ```
/// use trip_planner::backend::AnthropicBackend;
///
/// let backend = AnthropicBackend::new().with_api_key("sk-ant-...");
/// assert!(backend.has_api_key());
/// ```
#[derive(Clone, Default)]
pub struct AnthropicBackend {
    /// Sent as `x-api-key`. Calls fail fast when unset.
    api_key: Option<String>,
}

impl std::fmt::Debug for AnthropicBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnthropicBackend")
            .field(
                "api_key",
                &self.api_key.as_ref().map(|k| {
                    if k.chars().count() > 6 {
                        format!("{}***", k.chars().take(6).collect::<String>())
                    } else {
                        "***".to_string()
                    }
                }),
            )
            .finish()
    }
}

impl AnthropicBackend {
    /// Create a backend without a credential.
    pub fn new() -> Self {
        Self { api_key: None }
    }

    /// Set the API key.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set or clear the API key.
    pub fn with_optional_api_key(mut self, key: Option<String>) -> Self {
        self.api_key = key;
        self
    }

    /// Returns `true` if an API key has been configured.
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Build the request body for `/v1/messages`.
    fn build_body(request: &LlmRequest) -> Value {
        json!({
            "model": request.config.model,
            "max_tokens": request.config.max_tokens,
            "temperature": request.config.temperature,
            "system": request.system_prompt,
            "messages": [
                {"role": "user", "content": request.prompt},
            ],
        })
    }

    /// Parse a `Retry-After` header value as seconds.
    fn parse_retry_after(value: &str) -> Option<Duration> {
        value.trim().parse::<u64>().ok().map(Duration::from_secs)
    }

    /// Text of the first `text` content block, if any.
    fn extract_text(json_resp: &Value) -> Option<&str> {
        json_resp
            .get("content")?
            .as_array()?
            .iter()
            .find(|block| block.get("type").and_then(|t| t.as_str()) == Some("text"))
            .and_then(|block| block.get("text"))
            .and_then(|t| t.as_str())
    }

    /// Extract usage and identification metadata.
    fn extract_metadata(json_resp: &Value) -> Option<Value> {
        let mut meta = serde_json::Map::new();
        for key in ["id", "model", "stop_reason", "usage"] {
            if let Some(v) = json_resp.get(key) {
                meta.insert(key.into(), v.clone());
            }
        }
        if meta.is_empty() {
            None
        } else {
            Some(Value::Object(meta))
        }
    }
}

#[async_trait]
impl Backend for AnthropicBackend {
    async fn complete(
        &self,
        client: &Client,
        base_url: &str,
        request: &LlmRequest,
    ) -> Result<LlmResponse> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| PlannerError::Config("ANTHROPIC_API_KEY is not configured".into()))?;

        let url = format!("{}/v1/messages", base_url.trim_end_matches('/'));
        let body = Self::build_body(request);
        debug!(%url, model = %request.config.model, "anthropic: sending request");

        let resp = client
            .post(&url)
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = resp.status().as_u16();

        if !resp.status().is_success() {
            let retry_after = resp
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(Self::parse_retry_after);
            let text = resp.text().await.unwrap_or_default();
            debug!(status, "anthropic: non-success status");
            return Err(PlannerError::HttpError {
                status,
                body: text,
                retry_after,
            });
        }

        let json_resp: Value = resp.json().await?;
        let text = match Self::extract_text(&json_resp) {
            Some(t) if !t.trim().is_empty() => t.to_string(),
            _ => return Err(PlannerError::EmptyContent),
        };

        Ok(LlmResponse {
            text,
            status,
            metadata: Self::extract_metadata(&json_resp),
        })
    }

    fn name(&self) -> &'static str {
        "anthropic"
    }
}
