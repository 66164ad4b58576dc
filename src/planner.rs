//! Request orchestration: prompt, call, validate, and repair.
//!
//! [`TripPlanner`] drives each request mode through its states
//! (`Idle → Prompting → AwaitingModel → Validating → Done | Failed`, with a
//! single `Repairing` detour for `parse_trip`) and reports them through the
//! context's event handler and `tracing`.

use crate::config::LlmConfig;
use crate::dates;
use crate::error::Result;
use crate::events::{emit, Event, PlanState};
use crate::exec_ctx::ExecCtx;
use crate::gateway::{call_model, DEFAULT_MAX_RETRIES};
use crate::prompt::{
    build_generate_all_days_prompt, build_generate_day_prompt, build_parse_trip_prompt,
    build_trip_repair_prompt,
};
use crate::schema::{validate, BatchShape, DayShape, TripShape};
use crate::types::{
    DayDescriptor, GeneratedDay, GeneratedDays, ParsedTrip, PlanData, PlanRequest, PlanResponse,
    ProjectSettings,
};
use crate::PlannerError;
use tracing::{debug, info, warn};

/// Maximum days sent to the model in one `generate_all_days` call.
pub const BATCH_SIZE: usize = 5;

const PARSE_TRIP: &str = "parse_trip";
const GENERATE_DAY: &str = "generate_day";
const GENERATE_ALL_DAYS: &str = "generate_all_days";

/// Orchestrates the three planner modes on top of an [`ExecCtx`].
///
/// # Example
///
/// ```no_run
/// use trip_planner::{ExecCtx, TripPlanner};
/// use trip_planner::types::ProjectSettings;
///
/// # async fn run() -> trip_planner::Result<()> {
/// let ctx = ExecCtx::builder("https://api.anthropic.com")
///     .anthropic_with_key("sk-ant-...")
///     .build();
/// let planner = TripPlanner::new();
/// let trip = planner
///     .parse_trip(
///         &ctx,
///         "Denver, then Moab for two nights",
///         "2024-06-01",
///         "2024-06-03",
///         &ProjectSettings::default(),
///         None,
///     )
///     .await?;
/// assert_eq!(trip.days.len(), 3);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct TripPlanner {
    llm: LlmConfig,
    max_retries: u32,
}

impl Default for TripPlanner {
    fn default() -> Self {
        Self::new()
    }
}

impl TripPlanner {
    pub fn new() -> Self {
        Self {
            llm: LlmConfig::default(),
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    /// Set the model parameters used for every call.
    pub fn with_config(mut self, config: LlmConfig) -> Self {
        self.llm = config;
        self
    }

    /// Set the gateway retry budget for first-pass calls.
    ///
    /// Repair calls always use zero retries.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn config(&self) -> &LlmConfig {
        &self.llm
    }

    /// Turn free-text itinerary into one entry per calendar day.
    ///
    /// A response that decodes but fails validation gets exactly one repair
    /// round-trip; if that also fails, its error is the one reported.
    pub async fn parse_trip(
        &self,
        ctx: &ExecCtx,
        itinerary_text: &str,
        start_date: &str,
        end_date: &str,
        settings: &ProjectSettings,
        route_hints: Option<&str>,
    ) -> Result<ParsedTrip> {
        let result = self
            .parse_trip_inner(ctx, itinerary_text, start_date, end_date, settings, route_hints)
            .await;
        self.finish(ctx, PARSE_TRIP, result)
    }

    async fn parse_trip_inner(
        &self,
        ctx: &ExecCtx,
        itinerary_text: &str,
        start_date: &str,
        end_date: &str,
        settings: &ProjectSettings,
        route_hints: Option<&str>,
    ) -> Result<ParsedTrip> {
        transition(ctx, PARSE_TRIP, PlanState::Idle);
        let expected = dates::enumerate_days(start_date, end_date)?;
        let day_count = expected.len();
        let shape = TripShape::with_dates(expected);

        transition(ctx, PARSE_TRIP, PlanState::Prompting);
        let prompt = build_parse_trip_prompt(
            itinerary_text,
            start_date,
            end_date,
            day_count,
            settings,
            route_hints,
        );

        transition(ctx, PARSE_TRIP, PlanState::AwaitingModel);
        let reply = call_model(ctx, &self.llm, &prompt, self.max_retries).await?;

        transition(ctx, PARSE_TRIP, PlanState::Validating);
        let violations = match validate(&shape, &reply.value) {
            Ok(trip) => return Ok(trip),
            Err(v) => v,
        };

        let first_error = violations.to_string();
        warn!(error = %first_error, "parse_trip: validation failed, repairing");
        transition(ctx, PARSE_TRIP, PlanState::Repairing);
        let repair_prompt = build_trip_repair_prompt(&first_error, &reply.value.to_string());

        transition(ctx, PARSE_TRIP, PlanState::AwaitingModel);
        let repaired = call_model(ctx, &self.llm, &repair_prompt, 0).await?;

        transition(ctx, PARSE_TRIP, PlanState::Validating);
        Ok(validate(&shape, &repaired.value)?)
    }

    /// Plan content for a single day. No repair pass.
    pub async fn generate_day(
        &self,
        ctx: &ExecCtx,
        day: &DayDescriptor,
        settings: &ProjectSettings,
        itinerary_context: &str,
    ) -> Result<GeneratedDay> {
        let result = self
            .generate_day_inner(ctx, day, settings, itinerary_context)
            .await;
        self.finish(ctx, GENERATE_DAY, result)
    }

    async fn generate_day_inner(
        &self,
        ctx: &ExecCtx,
        day: &DayDescriptor,
        settings: &ProjectSettings,
        itinerary_context: &str,
    ) -> Result<GeneratedDay> {
        transition(ctx, GENERATE_DAY, PlanState::Idle);
        transition(ctx, GENERATE_DAY, PlanState::Prompting);
        let prompt = build_generate_day_prompt(day, settings, itinerary_context);

        transition(ctx, GENERATE_DAY, PlanState::AwaitingModel);
        let reply = call_model(ctx, &self.llm, &prompt, self.max_retries).await?;

        transition(ctx, GENERATE_DAY, PlanState::Validating);
        Ok(validate(&DayShape, &reply.value)?)
    }

    /// Plan content for every day, [`BATCH_SIZE`] days per model call.
    ///
    /// Batches run one after another in input order. The first failing
    /// batch aborts the whole request and nothing from earlier batches is
    /// returned.
    pub async fn generate_all_days(
        &self,
        ctx: &ExecCtx,
        days: &[DayDescriptor],
        settings: &ProjectSettings,
        itinerary_context: &str,
    ) -> Result<GeneratedDays> {
        let result = self
            .generate_all_days_inner(ctx, days, settings, itinerary_context)
            .await;
        self.finish(ctx, GENERATE_ALL_DAYS, result)
    }

    async fn generate_all_days_inner(
        &self,
        ctx: &ExecCtx,
        days: &[DayDescriptor],
        settings: &ProjectSettings,
        itinerary_context: &str,
    ) -> Result<GeneratedDays> {
        transition(ctx, GENERATE_ALL_DAYS, PlanState::Idle);
        let total = days.len().div_ceil(BATCH_SIZE);
        let mut out = Vec::with_capacity(days.len());

        for (index, batch) in days.chunks(BATCH_SIZE).enumerate() {
            ctx.check_cancelled()?;
            debug!(batch = index + 1, total, size = batch.len(), "generate_all_days: batch");
            emit(
                &ctx.event_handler,
                Event::BatchStart {
                    index,
                    total,
                    size: batch.len(),
                },
            );

            let outcome = self.run_batch(ctx, batch, settings, itinerary_context).await;
            emit(
                &ctx.event_handler,
                Event::BatchEnd {
                    index,
                    ok: outcome.is_ok(),
                },
            );
            out.extend(outcome?.days);
        }

        Ok(GeneratedDays { days: out })
    }

    async fn run_batch(
        &self,
        ctx: &ExecCtx,
        batch: &[DayDescriptor],
        settings: &ProjectSettings,
        itinerary_context: &str,
    ) -> Result<GeneratedDays> {
        transition(ctx, GENERATE_ALL_DAYS, PlanState::Prompting);
        let prompt = build_generate_all_days_prompt(batch, settings, itinerary_context);

        transition(ctx, GENERATE_ALL_DAYS, PlanState::AwaitingModel);
        let reply = call_model(ctx, &self.llm, &prompt, self.max_retries).await?;

        transition(ctx, GENERATE_ALL_DAYS, PlanState::Validating);
        Ok(validate(&BatchShape { days: batch }, &reply.value)?)
    }

    /// Serve one typed request, folding any error into the response.
    pub async fn handle(&self, ctx: &ExecCtx, request: PlanRequest) -> PlanResponse {
        let mode = request.mode();
        info!(mode, "handling request");
        let result = match request {
            PlanRequest::ParseTrip(p) => self
                .parse_trip(
                    ctx,
                    &p.itinerary_text,
                    &p.start_date,
                    &p.end_date,
                    &p.settings,
                    p.route_hints.as_deref(),
                )
                .await
                .map(PlanData::Trip),
            PlanRequest::GenerateDay(p) => self
                .generate_day(ctx, &p.day, &p.settings, &p.itinerary_context)
                .await
                .map(PlanData::Day),
            PlanRequest::GenerateAllDays(p) => self
                .generate_all_days(ctx, &p.days, &p.settings, &p.itinerary_context)
                .await
                .map(PlanData::Days),
        };
        match result {
            Ok(data) => PlanResponse::ok(data),
            Err(e) => PlanResponse::err(e.to_string()),
        }
    }

    /// Serve a raw JSON request body (`{"mode": ..., "payload": ...}`).
    pub async fn handle_json(&self, ctx: &ExecCtx, body: &str) -> PlanResponse {
        match serde_json::from_str::<PlanRequest>(body) {
            Ok(request) => self.handle(ctx, request).await,
            Err(e) => {
                warn!(error = %e, "rejecting malformed request");
                PlanResponse::err(PlannerError::InvalidRequest(e.to_string()).to_string())
            }
        }
    }

    fn finish<T>(&self, ctx: &ExecCtx, mode: &'static str, result: Result<T>) -> Result<T> {
        match &result {
            Ok(_) => {
                info!(mode, "request complete");
                transition(ctx, mode, PlanState::Done);
            }
            Err(e) => {
                warn!(mode, error = %e, "request failed");
                transition(ctx, mode, PlanState::Failed);
            }
        }
        result
    }
}

fn transition(ctx: &ExecCtx, mode: &'static str, state: PlanState) {
    debug!(mode, %state, "state");
    emit(&ctx.event_handler, Event::Transition { mode, state });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{BackoffConfig, MockBackend, MockReply};
    use crate::events::FnEventHandler;
    use crate::types::{Pillar, Vibe};
    use serde_json::{json, Value};
    use std::sync::atomic::AtomicBool;
    use std::sync::{Arc, Mutex};

    fn ctx_with(mock: Arc<MockBackend>) -> ExecCtx {
        ExecCtx::builder("http://unused")
            .backend(mock)
            .backoff(BackoffConfig::immediate())
            .build()
    }

    fn recording_ctx(mock: Arc<MockBackend>) -> (ExecCtx, Arc<Mutex<Vec<Event>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let ctx = ExecCtx::builder("http://unused")
            .backend(mock)
            .backoff(BackoffConfig::immediate())
            .event_handler(Arc::new(FnEventHandler(move |e: Event| {
                sink.lock().unwrap().push(e);
            })))
            .build();
        (ctx, seen)
    }

    fn trip_json(n: u32) -> Value {
        let days: Vec<Value> = (1..=n)
            .map(|i| {
                json!({
                    "dayIndex": i,
                    "date": format!("2024-06-{:02}", i),
                    "location": "Moab",
                    "vibe": "camp"
                })
            })
            .collect();
        json!({ "titleSuggested": "Desert Loop", "days": days })
    }

    fn generated_day(tag: &str) -> Value {
        json!({
            "pillar": "dog",
            "hook": format!("Hook {}", tag),
            "shots": ["a", "b", "c", "d", "e"],
            "broll": ["x"],
            "captionSeed": format!("caption {}", tag),
            "postingTime": "18:30"
        })
    }

    fn descriptors(n: u32) -> Vec<DayDescriptor> {
        (1..=n)
            .map(|i| DayDescriptor {
                date: format!("2024-06-{:02}", i),
                day_index: i,
                location: None,
                vibe: Vibe::Travel,
            })
            .collect()
    }

    fn batch_reply(range: std::ops::RangeInclusive<u32>) -> MockReply {
        let days: Vec<Value> = range.map(|i| generated_day(&i.to_string())).collect();
        MockReply::json(&json!({ "days": days }))
    }

    #[tokio::test]
    async fn test_parse_trip_returns_every_day() {
        let mock = Arc::new(MockBackend::new(vec![MockReply::json(&trip_json(3))]));
        let trip = TripPlanner::new()
            .parse_trip(
                &ctx_with(mock.clone()),
                "Moab",
                "2024-06-01",
                "2024-06-03",
                &ProjectSettings::default(),
                None,
            )
            .await
            .unwrap();

        assert_eq!(trip.title_suggested.as_deref(), Some("Desert Loop"));
        let indices: Vec<u32> = trip.days.iter().map(|d| d.day_index).collect();
        assert_eq!(indices, vec![1, 2, 3]);
        assert_eq!(mock.call_count(), 1);
        assert!(mock.prompts()[0].contains("EXACTLY 3 days"));
    }

    #[tokio::test]
    async fn test_parse_trip_rejects_inverted_range_without_calling() {
        let mock = Arc::new(MockBackend::fixed("{}"));
        let err = TripPlanner::new()
            .parse_trip(
                &ctx_with(mock.clone()),
                "x",
                "2024-06-05",
                "2024-06-01",
                &ProjectSettings::default(),
                None,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, PlannerError::InvalidRequest(_)));
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_parse_trip_repairs_once() {
        let mut broken = trip_json(2);
        broken["days"][1].as_object_mut().unwrap().remove("vibe");
        let mock = Arc::new(MockBackend::new(vec![
            MockReply::json(&broken),
            MockReply::json(&trip_json(2)),
        ]));
        let (ctx, events) = recording_ctx(mock.clone());

        let trip = TripPlanner::new()
            .parse_trip(&ctx, "x", "2024-06-01", "2024-06-02", &ProjectSettings::default(), None)
            .await
            .unwrap();
        assert_eq!(trip.days.len(), 2);
        assert_eq!(mock.call_count(), 2);

        let repair = &mock.prompts()[1];
        assert!(repair.starts_with("Fix this JSON"));
        assert!(repair.contains("days.1.vibe: Required"));
        assert!(repair.contains(&broken.to_string()));

        let repairing = events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| matches!(e, Event::Transition { state: PlanState::Repairing, .. }))
            .count();
        assert_eq!(repairing, 1);
    }

    #[tokio::test]
    async fn test_parse_trip_reports_second_failure() {
        let mut first = trip_json(2);
        first["days"][0]["vibe"] = json!("party");
        let mut second = trip_json(2);
        second["days"][1]["date"] = json!("June 2");
        let mock = Arc::new(MockBackend::new(vec![
            MockReply::json(&first),
            MockReply::json(&second),
            MockReply::json(&trip_json(2)),
        ]));

        let err = TripPlanner::new()
            .parse_trip(
                &ctx_with(mock.clone()),
                "x",
                "2024-06-01",
                "2024-06-02",
                &ProjectSettings::default(),
                None,
            )
            .await
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.starts_with("Validation failed: "));
        assert!(msg.contains("days.1.date"));
        assert!(!msg.contains("days.0.vibe"));
        assert_eq!(mock.call_count(), 2);
    }

    #[tokio::test]
    async fn test_parse_trip_wrong_day_count_triggers_repair() {
        let mock = Arc::new(MockBackend::new(vec![
            MockReply::json(&trip_json(2)),
            MockReply::json(&trip_json(3)),
        ]));
        let trip = TripPlanner::new()
            .parse_trip(
                &ctx_with(mock.clone()),
                "x",
                "2024-06-01",
                "2024-06-03",
                &ProjectSettings::default(),
                None,
            )
            .await
            .unwrap();
        assert_eq!(trip.days.len(), 3);
        assert!(mock.prompts()[1].contains("expected exactly 3 days, received 2"));
    }

    #[tokio::test]
    async fn test_generate_day_has_no_repair_pass() {
        let mut bad = generated_day("1");
        bad["shots"] = json!(["only", "three", "shots"]);
        let mock = Arc::new(MockBackend::new(vec![
            MockReply::json(&bad),
            MockReply::json(&generated_day("2")),
        ]));
        let err = TripPlanner::new()
            .generate_day(
                &ctx_with(mock.clone()),
                &descriptors(1)[0],
                &ProjectSettings::default(),
                "",
            )
            .await
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.starts_with("Validation failed: shots: "));
        assert!(msg.contains("only"));
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn test_parse_trip_repair_call_is_not_retried() {
        let mut broken = trip_json(2);
        broken["days"][0]["vibe"] = json!("party");
        let mock = Arc::new(MockBackend::new(vec![
            MockReply::json(&broken),
            MockReply::text("Sorry, I cannot fix that."),
            MockReply::json(&trip_json(2)),
        ]));
        let err = TripPlanner::new()
            .with_max_retries(3)
            .parse_trip(
                &ctx_with(mock.clone()),
                "x",
                "2024-06-01",
                "2024-06-02",
                &ProjectSettings::default(),
                None,
            )
            .await
            .unwrap_err();
        assert!(err.is_decode(), "unexpected error: {}", err);
        assert_eq!(mock.call_count(), 2);
    }

    #[tokio::test]
    async fn test_parse_trip_dates_must_match_range() {
        let mut shifted = trip_json(2);
        shifted["days"][1]["date"] = json!("2024-06-05");
        let mock = Arc::new(MockBackend::new(vec![
            MockReply::json(&shifted),
            MockReply::json(&trip_json(2)),
        ]));
        let trip = TripPlanner::new()
            .parse_trip(
                &ctx_with(mock.clone()),
                "x",
                "2024-06-01",
                "2024-06-02",
                &ProjectSettings::default(),
                None,
            )
            .await
            .unwrap();
        assert_eq!(trip.days[1].date, "2024-06-02");
        assert!(mock.prompts()[1].contains("days.1.date: expected 2024-06-02, received 2024-06-05"));
    }

    #[tokio::test]
    async fn test_generate_day_success() {
        let mock = Arc::new(MockBackend::fixed(format!(
            "Here you go:\n```json\n{}\n```",
            generated_day("solo")
        )));
        let day = TripPlanner::new()
            .generate_day(&ctx_with(mock), &descriptors(1)[0], &ProjectSettings::default(), "")
            .await
            .unwrap();
        assert_eq!(day.pillar, Pillar::Dog);
        assert_eq!(day.posting_time.as_deref(), Some("18:30"));
    }

    #[tokio::test]
    async fn test_generate_all_days_batches_of_five_in_order() {
        let mock = Arc::new(MockBackend::new(vec![
            batch_reply(1..=5),
            batch_reply(6..=10),
            batch_reply(11..=12),
        ]));
        let (ctx, events) = recording_ctx(mock.clone());

        let out = TripPlanner::new()
            .generate_all_days(&ctx, &descriptors(12), &ProjectSettings::default(), "ctx")
            .await
            .unwrap();

        assert_eq!(out.days.len(), 12);
        let hooks: Vec<String> = out.days.iter().map(|d| d.hook.clone()).collect();
        let expected: Vec<String> = (1..=12).map(|i| format!("Hook {}", i)).collect();
        assert_eq!(hooks, expected);

        let sizes: Vec<usize> = events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|e| match e {
                Event::BatchStart { size, total, .. } => {
                    assert_eq!(*total, 3);
                    Some(*size)
                }
                _ => None,
            })
            .collect();
        assert_eq!(sizes, vec![5, 5, 2]);
        assert_eq!(mock.call_count(), 3);
        assert!(mock.prompts()[2].contains("EXACTLY 2 entries"));
    }

    #[tokio::test]
    async fn test_generate_all_days_aborts_on_failed_batch() {
        let mock = Arc::new(MockBackend::new(vec![
            batch_reply(1..=5),
            batch_reply(6..=8), // two short
            batch_reply(11..=12),
        ]));
        let err = TripPlanner::new()
            .generate_all_days(
                &ctx_with(mock.clone()),
                &descriptors(12),
                &ProjectSettings::default(),
                "",
            )
            .await
            .unwrap_err();
        assert!(err.to_string().contains("days: expected 5 entries, received 3"));
        assert_eq!(mock.call_count(), 2);
    }

    #[tokio::test]
    async fn test_generate_all_days_rejects_mismatched_echo() {
        let mut reply = json!({ "days": [generated_day("a"), generated_day("b")] });
        reply["days"][0]["dayIndex"] = json!(2);
        reply["days"][1]["dayIndex"] = json!(1);
        let mock = Arc::new(MockBackend::new(vec![MockReply::json(&reply)]));
        let err = TripPlanner::new()
            .generate_all_days(&ctx_with(mock), &descriptors(2), &ProjectSettings::default(), "")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("days.0.dayIndex: expected 1, received 2"));
    }

    #[tokio::test]
    async fn test_generate_all_days_empty_makes_no_call() {
        let mock = Arc::new(MockBackend::fixed("{}"));
        let out = TripPlanner::new()
            .generate_all_days(&ctx_with(mock.clone()), &[], &ProjectSettings::default(), "")
            .await
            .unwrap();
        assert!(out.days.is_empty());
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_generate_all_days_stops_when_cancelled() {
        let flag = Arc::new(AtomicBool::new(true));
        let mock = Arc::new(MockBackend::new(vec![batch_reply(1..=5)]));
        let ctx = ExecCtx::builder("http://unused")
            .backend(mock.clone())
            .cancellation(Some(flag))
            .build();
        let err = TripPlanner::new()
            .generate_all_days(&ctx, &descriptors(7), &ProjectSettings::default(), "")
            .await
            .unwrap_err();
        assert!(matches!(err, PlannerError::Cancelled));
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_handle_json_parse_trip() {
        let mock = Arc::new(MockBackend::new(vec![MockReply::json(&trip_json(2))]));
        let body = json!({
            "mode": "parse_trip",
            "payload": {
                "itineraryText": "Moab",
                "startDate": "2024-06-01",
                "endDate": "2024-06-02",
                "settings": { "tone": "poetic" }
            }
        })
        .to_string();

        let resp = TripPlanner::new().handle_json(&ctx_with(mock), &body).await;
        assert!(resp.success);
        let wire = serde_json::to_value(&resp).unwrap();
        assert_eq!(wire["data"]["days"][1]["dayIndex"], 2);
        assert!(wire.get("error").is_none());
    }

    #[tokio::test]
    async fn test_handle_json_unknown_mode() {
        let mock = Arc::new(MockBackend::fixed("{}"));
        let resp = TripPlanner::new()
            .handle_json(&ctx_with(mock.clone()), r#"{"mode":"summarize","payload":{}}"#)
            .await;
        assert!(!resp.success);
        assert!(resp.error.unwrap().starts_with("Invalid request:"));
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_handle_generate_day_validation_failure() {
        let mut bad = generated_day("1");
        bad["pillar"] = json!("gear");
        let mock = Arc::new(MockBackend::new(vec![MockReply::json(&bad)]));
        let request = PlanRequest::GenerateDay(crate::types::GenerateDayPayload {
            day: descriptors(1).remove(0),
            settings: ProjectSettings::default(),
            itinerary_context: String::new(),
        });
        let resp = TripPlanner::new().handle(&ctx_with(mock), request).await;
        assert!(!resp.success);
        assert!(resp.data.is_none());
        let error = resp.error.unwrap();
        assert!(error.starts_with("Validation failed: pillar: "));
        assert!(error.contains("gear"));
    }

    #[tokio::test]
    async fn test_handle_json_generate_all_days_validation_failure() {
        let mock = Arc::new(MockBackend::new(vec![batch_reply(1..=1)]));
        let body = json!({
            "mode": "generate_all_days",
            "payload": {
                "days": [
                    {"date": "2024-06-01", "dayIndex": 1, "vibe": "travel"},
                    {"date": "2024-06-02", "dayIndex": 2, "vibe": "camp"}
                ]
            }
        })
        .to_string();
        let resp = TripPlanner::new().handle_json(&ctx_with(mock), &body).await;
        assert!(!resp.success);
        assert_eq!(
            resp.error.as_deref(),
            Some("Validation failed: days: expected 2 entries, received 1")
        );
        let wire = serde_json::to_value(&resp).unwrap();
        assert!(wire.get("data").is_none());
    }

    #[tokio::test]
    async fn test_handle_reports_missing_key() {
        let ctx = ExecCtx::builder("http://127.0.0.1:9").build();
        let request = PlanRequest::GenerateDay(crate::types::GenerateDayPayload {
            day: descriptors(1).remove(0),
            settings: ProjectSettings::default(),
            itinerary_context: String::new(),
        });
        let resp = TripPlanner::new().handle(&ctx, request).await;
        assert!(!resp.success);
        assert!(resp.error.unwrap().starts_with("Configuration error"));
    }
}
