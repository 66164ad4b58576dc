//! What happened during one model call.

use crate::parsing::DecodeStrategy;
use serde_json::Value;

/// Records how a [`ModelReply`](crate::gateway::ModelReply) was obtained:
/// which decode strategy succeeded, how many attempts it took, and whether
/// the corrective prompt was needed.
///
/// # Example
///
/// ```
/// use trip_planner::diagnostics::CallDiagnostics;
///
/// let diag = CallDiagnostics::default();
/// assert_eq!(diag.retries(), 0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CallDiagnostics {
    /// Decode strategy that produced the value.
    pub strategy: Option<DecodeStrategy>,

    /// Backend calls made, including the successful one.
    pub attempts: u32,

    /// Retries caused by transport failures (identical prompt).
    pub transport_retries: u32,

    /// Whether the prompt was rewritten after an undecodable response.
    pub corrected: bool,

    /// Total time spent in backoff delays (milliseconds).
    pub backoff_total_ms: u64,

    /// HTTP status of the successful response.
    pub http_status: Option<u16>,

    /// Why the model stopped generating (`end_turn`, `max_tokens`, ...).
    pub stop_reason: Option<String>,

    pub input_tokens: Option<u64>,
    pub output_tokens: Option<u64>,
}

impl CallDiagnostics {
    /// Retries of any kind.
    pub fn retries(&self) -> u32 {
        self.attempts.saturating_sub(1)
    }

    /// Record status, stop reason and token usage from a backend response.
    ///
    /// `metadata` is the provider object carrying `stop_reason` and
    /// `usage.{input,output}_tokens`; missing keys leave fields unset.
    pub fn record_response(&mut self, status: u16, metadata: Option<&Value>) {
        self.http_status = Some(status);
        let Some(meta) = metadata else {
            return;
        };
        self.stop_reason = meta
            .get("stop_reason")
            .and_then(Value::as_str)
            .map(String::from);
        if let Some(usage) = meta.get("usage") {
            self.input_tokens = usage.get("input_tokens").and_then(Value::as_u64);
            self.output_tokens = usage.get("output_tokens").and_then(Value::as_u64);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_response_reads_usage() {
        let mut diag = CallDiagnostics::default();
        diag.record_response(
            200,
            Some(&json!({
                "stop_reason": "max_tokens",
                "usage": {"input_tokens": 812, "output_tokens": 4000}
            })),
        );
        assert_eq!(diag.http_status, Some(200));
        assert_eq!(diag.stop_reason.as_deref(), Some("max_tokens"));
        assert_eq!(diag.input_tokens, Some(812));
        assert_eq!(diag.output_tokens, Some(4000));
    }

    #[test]
    fn test_record_response_without_metadata() {
        let mut diag = CallDiagnostics::default();
        diag.record_response(200, None);
        assert_eq!(diag.http_status, Some(200));
        assert!(diag.stop_reason.is_none());
        assert!(diag.input_tokens.is_none());
    }
}
