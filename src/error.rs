use std::time::Duration;
use thiserror::Error;

/// Errors produced by the planner and its components.
#[derive(Error, Debug)]
pub enum PlannerError {
    /// Low-level HTTP transport failure (connection refused, reset, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// JSON (de)serialization failed at the serde level.
    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP error with status code, response body, and optional Retry-After hint.
    ///
    /// Returned by [`Backend`](crate::backend::Backend) implementations when
    /// the service answers with a non-success status code.
    #[error("Model API error {status}: {body}")]
    HttpError {
        /// HTTP status code (e.g. 429, 500, 529).
        status: u16,
        /// Response body text.
        body: String,
        /// Parsed `Retry-After` header value, if present.
        retry_after: Option<Duration>,
    },

    /// The service answered successfully but carried no text content.
    #[error("No content in model response")]
    EmptyContent,

    /// The model call did not complete within the configured deadline.
    #[error("Model call timed out after {0:?}")]
    Timeout(Duration),

    /// The response text contained no decodable JSON.
    #[error("Model response was not valid JSON: {0}")]
    Decode(String),

    /// Decoded JSON failed schema validation. The message is the flat
    /// violation description produced by [`crate::schema`].
    #[error("{0}")]
    Schema(String),

    /// Missing credential or endpoint, detected before any network attempt.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The caller supplied a request the planner cannot act on.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The request was cancelled via the cancellation flag.
    #[error("Request was cancelled")]
    Cancelled,
}

impl PlannerError {
    /// Whether this failure came from decoding the model's text.
    pub fn is_decode(&self) -> bool {
        matches!(self, PlannerError::Decode(_))
    }

    /// Whether this failure is a transport-level problem worth retrying
    /// with the identical prompt.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            PlannerError::Request(_)
                | PlannerError::HttpError { .. }
                | PlannerError::EmptyContent
                | PlannerError::Timeout(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, PlannerError>;
