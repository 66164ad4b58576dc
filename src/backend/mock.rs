//! Scripted backend for testing without a live model.
//!
//! [`MockBackend`] plays back [`MockReply`] values in order and records
//! every request it receives, so tests can assert both on outcomes and on
//! the prompts the planner sent.
//!
//! # Example
//!
//! ```
//! use trip_planner::backend::{MockBackend, MockReply};
//!
//! let mock = MockBackend::new(vec![
//!     MockReply::status(503, "overloaded"),
//!     MockReply::text("{\"ok\": true}"),
//! ]);
//! assert_eq!(mock.call_count(), 0);
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use super::{Backend, LlmRequest, LlmResponse};
use crate::error::Result;
use crate::PlannerError;

/// One scripted reply.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Successful response carrying this text.
    Text(String),
    /// Non-success HTTP status with a body.
    Status(u16, String),
    /// Successful response with no text content.
    Empty,
    /// Wait, then answer with this text. Used to exercise deadlines.
    Delayed(Duration, String),
    /// HTTP 429 carrying a `Retry-After` hint.
    Throttled(Duration),
}

impl MockReply {
    pub fn text(s: impl Into<String>) -> Self {
        MockReply::Text(s.into())
    }

    pub fn json(v: &serde_json::Value) -> Self {
        MockReply::Text(v.to_string())
    }

    pub fn status(code: u16, body: impl Into<String>) -> Self {
        MockReply::Status(code, body.into())
    }
}

/// A test backend that returns scripted replies in order.
///
/// Cycles back to the beginning when all replies have been consumed.
#[derive(Debug)]
pub struct MockBackend {
    replies: Vec<MockReply>,
    index: AtomicUsize,
    requests: Mutex<Vec<LlmRequest>>,
}

impl MockBackend {
    /// Create a mock backend with the given scripted replies.
    pub fn new(replies: Vec<MockReply>) -> Self {
        assert!(!replies.is_empty(), "MockBackend requires at least one reply");
        Self {
            replies,
            index: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Create a mock that always returns the same text.
    pub fn fixed(response: impl Into<String>) -> Self {
        Self::new(vec![MockReply::Text(response.into())])
    }

    /// Number of calls received so far.
    pub fn call_count(&self) -> usize {
        self.index.load(Ordering::Relaxed)
    }

    /// User prompts received so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.requests
            .lock()
            .map(|r| r.iter().map(|req| req.prompt.clone()).collect())
            .unwrap_or_default()
    }

    fn next_reply(&self, request: &LlmRequest) -> MockReply {
        if let Ok(mut log) = self.requests.lock() {
            log.push(request.clone());
        }
        let idx = self.index.fetch_add(1, Ordering::Relaxed) % self.replies.len();
        self.replies[idx].clone()
    }
}

#[async_trait]
impl Backend for MockBackend {
    async fn complete(
        &self,
        _client: &Client,
        _base_url: &str,
        request: &LlmRequest,
    ) -> Result<LlmResponse> {
        let text = match self.next_reply(request) {
            MockReply::Text(text) => text,
            MockReply::Status(status, body) => {
                return Err(PlannerError::HttpError {
                    status,
                    body,
                    retry_after: None,
                })
            }
            MockReply::Empty => return Err(PlannerError::EmptyContent),
            MockReply::Throttled(retry_after) => {
                return Err(PlannerError::HttpError {
                    status: 429,
                    body: "rate limited".into(),
                    retry_after: Some(retry_after),
                })
            }
            MockReply::Delayed(delay, text) => {
                tokio::time::sleep(delay).await;
                text
            }
        };
        Ok(LlmResponse {
            text,
            status: 200,
            metadata: None,
        })
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
