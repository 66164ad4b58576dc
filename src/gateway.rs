//! The single point of external I/O: one logical model call.
//!
//! [`call_model`] sends a prompt through the context's backend, decodes the
//! reply with [`parsing::decode_json`](crate::parsing::decode_json), and
//! applies a bounded retry policy:
//!
//! - undecodable text: the prompt is rewritten once with a corrective
//!   instruction and re-sent;
//! - transport failure (connection error, non-success status, empty
//!   content, deadline exceeded): the identical prompt is re-sent after a
//!   backoff delay;
//! - anything else (missing configuration, cancellation): returned at once.
//!
//! At most `max_retries` retries happen in total; the last error surfaces.

use crate::backend::{LlmRequest, LlmResponse};
use crate::config::LlmConfig;
use crate::diagnostics::CallDiagnostics;
use crate::error::Result;
use crate::events::{emit, Event};
use crate::exec_ctx::ExecCtx;
use crate::parsing::{self, DecodeStrategy};
use crate::prompt::{build_decode_correction_prompt, SYSTEM_PROMPT};
use crate::PlannerError;
use serde_json::Value;
use tracing::{debug, warn};

/// Retries allowed by default for one logical call.
pub const DEFAULT_MAX_RETRIES: u32 = 1;

/// A decoded model reply.
#[derive(Debug, Clone)]
pub struct ModelReply {
    /// Decoded JSON. Not yet validated against any shape.
    pub value: Value,
    /// Text exactly as the model returned it.
    pub raw_text: String,
    pub diagnostics: CallDiagnostics,
}

/// Call the model with `prompt` and decode its reply as JSON.
pub async fn call_model(
    ctx: &ExecCtx,
    llm: &LlmConfig,
    prompt: &str,
    max_retries: u32,
) -> Result<ModelReply> {
    let mut diag = CallDiagnostics::default();
    let mut current = prompt.to_string();
    let mut retries: u32 = 0;

    loop {
        ctx.check_cancelled()?;
        diag.attempts += 1;

        let request = LlmRequest {
            system_prompt: SYSTEM_PROMPT.to_string(),
            prompt: current.clone(),
            config: llm.clone(),
        };

        let err = match call_once(ctx, &request).await {
            Ok((value, strategy, response)) => {
                diag.strategy = Some(strategy);
                diag.record_response(response.status, response.metadata.as_ref());
                debug!(
                    strategy = strategy.as_str(),
                    attempts = diag.attempts,
                    status = response.status,
                    stop_reason = diag.stop_reason.as_deref().unwrap_or("-"),
                    input_tokens = diag.input_tokens,
                    output_tokens = diag.output_tokens,
                    "gateway: decoded model reply"
                );
                return Ok(ModelReply {
                    value,
                    raw_text: response.text,
                    diagnostics: diag,
                });
            }
            Err(e) => e,
        };

        let retryable = err.is_decode() || err.is_transport();
        if !retryable || retries >= max_retries {
            warn!(error = %err, attempts = diag.attempts, "gateway: giving up");
            return Err(err);
        }
        retries += 1;

        if err.is_decode() {
            if !diag.corrected {
                current = build_decode_correction_prompt(prompt);
                diag.corrected = true;
            }
            debug!(attempt = retries, "gateway: retrying with corrective prompt");
            emit(
                &ctx.event_handler,
                Event::CorrectiveRetry {
                    attempt: retries,
                    reason: err.to_string(),
                },
            );
        } else {
            let retry_after = match &err {
                PlannerError::HttpError { retry_after, .. } => *retry_after,
                _ => None,
            };
            let delay = ctx.backoff.delay_with_hint(diag.transport_retries, retry_after);
            diag.transport_retries += 1;
            diag.backoff_total_ms += delay.as_millis() as u64;
            warn!(
                attempt = retries,
                delay_ms = delay.as_millis() as u64,
                error = %err,
                "gateway: transport failure, retrying"
            );
            emit(
                &ctx.event_handler,
                Event::TransportRetry {
                    attempt: retries,
                    delay_ms: delay.as_millis() as u64,
                    reason: err.to_string(),
                },
            );
            tokio::time::sleep(delay).await;
        }
    }
}

/// One backend call bounded by the context deadline, then decode.
async fn call_once(
    ctx: &ExecCtx,
    request: &LlmRequest,
) -> Result<(Value, DecodeStrategy, LlmResponse)> {
    let response = tokio::time::timeout(
        ctx.call_timeout,
        ctx.backend.complete(&ctx.client, &ctx.base_url, request),
    )
    .await
    .map_err(|_| PlannerError::Timeout(ctx.call_timeout))??;

    let (value, strategy) = parsing::decode_json(&response.text)?;
    Ok((value, strategy, response))
}
