//! # Trip Planner
//!
//! Road-trip content calendar planning over a large language model.
//!
//! The crate turns free-text itineraries into structured day plans and
//! plans per-day social content, treating every model reply as untrusted
//! input: replies are decoded defensively, validated against a fixed shape,
//! and repaired or rejected. Nothing is coerced.
//!
//! ## Core Concepts
//!
//! - **[`ExecCtx`]** — shared execution context (HTTP client, backend,
//!   endpoint, retry delays, per-call deadline, cancellation, optional
//!   event handler).
//! - **[`TripPlanner`]** — the orchestrator: `parse_trip` (with one repair
//!   round-trip), `generate_day`, and `generate_all_days` (sequential
//!   batches of five, all-or-nothing).
//! - **[`gateway::call_model`]** — one logical model call with decode
//!   fallbacks and a bounded retry policy.
//! - **[`schema`]** — shape validation producing flat, path-qualified
//!   error text.
//! - **[`prompt`]** — deterministic prompt builders.
//!
//! ## Quick Start
//!
//! ```no_run
//! use trip_planner::{ExecCtx, PlannerConfig, TripPlanner};
//!
//! #[tokio::main]
//! async fn main() -> trip_planner::Result<()> {
//!     let config = PlannerConfig::from_env();
//!     let ctx = ExecCtx::from_config(&config)?;
//!     let planner = TripPlanner::new().with_config(config.llm.clone());
//!
//!     let body = r#"{
//!         "mode": "parse_trip",
//!         "payload": {
//!             "itineraryText": "Denver to Moab, two nights camping, then Santa Fe",
//!             "startDate": "2024-06-01",
//!             "endDate": "2024-06-04"
//!         }
//!     }"#;
//!     let response = planner.handle_json(&ctx, body).await;
//!     println!("{}", serde_json::to_string_pretty(&response)?);
//!     Ok(())
//! }
//! ```
//!
//! ## Testing without a model
//!
//! [`MockBackend`] plays back scripted replies and records prompts:
//!
//! ```
//! use std::sync::Arc;
//! use trip_planner::{ExecCtx, MockBackend};
//!
//! let ctx = ExecCtx::builder("http://unused")
//!     .backend(Arc::new(MockBackend::fixed(r#"{"days": []}"#)))
//!     .build();
//! assert_eq!(ctx.backend.name(), "mock");
//! ```

pub mod backend;
pub mod config;
pub mod dates;
pub mod diagnostics;
pub mod error;
pub mod events;
pub mod exec_ctx;
pub mod gateway;
pub mod parsing;
pub mod planner;
pub mod prompt;
pub mod schema;
pub mod types;

pub use backend::{AnthropicBackend, Backend, BackoffConfig, MockBackend, MockReply};
pub use config::{LlmConfig, PlannerConfig};
pub use diagnostics::CallDiagnostics;
pub use error::{PlannerError, Result};
pub use events::{Event, EventHandler, FnEventHandler, PlanState};
pub use exec_ctx::{ExecCtx, ExecCtxBuilder};
pub use gateway::{call_model, ModelReply};
pub use planner::{TripPlanner, BATCH_SIZE};
pub use schema::{validate, SchemaViolations, Violation};
pub use types::{PlanRequest, PlanResponse};
