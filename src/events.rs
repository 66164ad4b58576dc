//! Event system for planner lifecycle hooks.
//!
//! Provides an optional, non-intrusive way to observe a request as it moves
//! through its states, retries, and batches. Implement [`EventHandler`] to
//! drive progress bars or collect telemetry; everything works without one.

use std::fmt;
use std::sync::Arc;

/// Orchestrator state for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanState {
    Idle,
    Prompting,
    AwaitingModel,
    Validating,
    Repairing,
    Done,
    Failed,
}

impl fmt::Display for PlanState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PlanState::Idle => "idle",
            PlanState::Prompting => "prompting",
            PlanState::AwaitingModel => "awaiting_model",
            PlanState::Validating => "validating",
            PlanState::Repairing => "repairing",
            PlanState::Done => "done",
            PlanState::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Events emitted while serving a request.
#[derive(Debug, Clone)]
pub enum Event {
    /// The request entered a new state.
    Transition {
        /// Wire name of the request mode (e.g. `"parse_trip"`).
        mode: &'static str,
        state: PlanState,
    },
    /// A transport-level retry with the identical prompt.
    TransportRetry {
        /// The retry attempt number (1-indexed).
        attempt: u32,
        /// Delay before this retry attempt in milliseconds.
        delay_ms: u64,
        /// Error that triggered the retry.
        reason: String,
    },
    /// The prompt was rewritten after an undecodable response.
    CorrectiveRetry {
        /// The retry attempt number (1-indexed).
        attempt: u32,
        reason: String,
    },
    /// A batch of `generate_all_days` is starting.
    BatchStart {
        /// 0-based batch index.
        index: usize,
        /// Total number of batches.
        total: usize,
        /// Days in this batch.
        size: usize,
    },
    /// A batch finished.
    BatchEnd {
        index: usize,
        ok: bool,
    },
}

/// Handler for planner lifecycle events.
///
/// # Example
///
/// ```
/// use trip_planner::events::{Event, EventHandler};
///
/// struct PrintHandler;
///
/// impl EventHandler for PrintHandler {
///     fn on_event(&self, event: Event) {
///         if let Event::BatchStart { index, total, .. } = event {
///             println!("batch {}/{}", index + 1, total);
///         }
///     }
/// }
/// ```
pub trait EventHandler: Send + Sync {
    /// Called when the planner emits an event.
    fn on_event(&self, event: Event);
}

/// Emit an event if a handler is present. No-op otherwise.
pub(crate) fn emit(handler: &Option<Arc<dyn EventHandler>>, event: Event) {
    if let Some(ref h) = handler {
        h.on_event(event);
    }
}

/// An [`EventHandler`] backed by a closure.
///
/// # Example
///
/// ```
/// use trip_planner::events::{Event, FnEventHandler};
/// use std::sync::Arc;
///
/// let handler = Arc::new(FnEventHandler(|event: Event| {
///     if let Event::Transition { mode, state } = event {
///         println!("{mode}: {state}");
///     }
/// }));
/// ```
pub struct FnEventHandler<F: Fn(Event) + Send + Sync>(pub F);

impl<F: Fn(Event) + Send + Sync> EventHandler for FnEventHandler<F> {
    fn on_event(&self, event: Event) {
        (self.0)(event);
    }
}
