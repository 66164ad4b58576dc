//! Structural and semantic validation of decoded model output.
//!
//! Each [`Shape`] pairs a JSON Schema (draft 7, checked with `jsonschema`)
//! with the cross-field checks a schema cannot express: exact day counts,
//! index sequences, calendar validity, and agreement with the request.
//! A value is deserialized into its typed output only when nothing was
//! recorded. Nothing is coerced or repaired here.
//!
//! The display form of [`SchemaViolations`] is a single flat line
//! (`Validation failed: days.2.vibe: ..., days.3.date: ...`). The planner
//! embeds it verbatim in repair prompts, so it must stay plain text.

use crate::dates::{self, DATE_FORMAT, DATE_PATTERN};
use crate::types::{DayDescriptor, GeneratedDay, GeneratedDays, ParsedTrip, Pillar, Vibe};
use chrono::NaiveDate;
use jsonschema::error::ValidationErrorKind;
use jsonschema::{Draft, JSONSchema, ValidationError};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::fmt;
use std::sync::LazyLock;

pub const MAX_HOOK_CHARS: usize = 120;
pub const MIN_SHOTS: usize = 5;
pub const MAX_SHOTS: usize = 8;

const POSTING_TIME_PATTERN: &str = r"^([01][0-9]|2[0-3]):[0-5][0-9]$";

static TRIP_SCHEMA: LazyLock<JSONSchema> = LazyLock::new(|| compile(&parsed_trip_schema()));
static DAY_SCHEMA: LazyLock<JSONSchema> = LazyLock::new(|| compile(&generated_day_schema()));
static BATCH_SCHEMA: LazyLock<JSONSchema> = LazyLock::new(|| compile(&generated_days_schema()));

/// One broken constraint at a dotted path (`days.2.vibe`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub path: String,
    pub message: String,
}

impl Violation {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = if self.path.is_empty() { "<root>" } else { &self.path };
        write!(f, "{}: {}", path, self.message)
    }
}

/// All violations found in one value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaViolations(pub Vec<Violation>);

impl SchemaViolations {
    pub fn violations(&self) -> &[Violation] {
        &self.0
    }
}

impl fmt::Display for SchemaViolations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .0
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "Validation failed: {}", joined)
    }
}

impl std::error::Error for SchemaViolations {}

impl From<SchemaViolations> for crate::PlannerError {
    fn from(v: SchemaViolations) -> Self {
        crate::PlannerError::Schema(v.to_string())
    }
}

pub type ValidationOutcome<T> = std::result::Result<T, SchemaViolations>;

/// A known response shape.
pub trait Shape {
    type Output: DeserializeOwned;

    /// Compiled schema for the structural checks.
    fn schema(&self) -> &'static JSONSchema;

    /// Cross-field checks. Runs after the schema, whatever its outcome, and
    /// only inspects values of the expected type.
    fn check(&self, _value: &Value, _out: &mut Vec<Violation>) {}
}

/// Validate `value` against `shape`.
pub fn validate<S: Shape>(shape: &S, value: &Value) -> ValidationOutcome<S::Output> {
    let mut violations = match shape.schema().validate(value) {
        Ok(()) => Vec::new(),
        Err(errors) => errors.map(|e| from_schema_error(&e)).collect(),
    };
    shape.check(value, &mut violations);
    if !violations.is_empty() {
        return Err(SchemaViolations(violations));
    }
    serde_json::from_value(value.clone())
        .map_err(|e| SchemaViolations(vec![Violation::new("", e.to_string())]))
}

/// `{ titleSuggested?, days: [ParsedDay] }`, optionally pinned to a date range.
#[derive(Debug, Clone, Default)]
pub struct TripShape {
    /// Requested dates in order. `None` accepts any count and any dates.
    expected_dates: Option<Vec<NaiveDate>>,
}

impl TripShape {
    /// Require exactly these dates, one day per entry, in order.
    pub fn with_dates(dates: Vec<NaiveDate>) -> Self {
        Self {
            expected_dates: Some(dates),
        }
    }

    pub fn expected_days(&self) -> Option<usize> {
        self.expected_dates.as_ref().map(Vec::len)
    }
}

/// A single [`GeneratedDay`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DayShape;

/// `{ days: [GeneratedDay] }` answering one batch of requested days.
#[derive(Debug, Clone, Copy)]
pub struct BatchShape<'a> {
    pub days: &'a [DayDescriptor],
}

impl Shape for TripShape {
    type Output = ParsedTrip;

    fn schema(&self) -> &'static JSONSchema {
        &TRIP_SCHEMA
    }

    fn check(&self, value: &Value, out: &mut Vec<Violation>) {
        let Some(days) = value.get("days").and_then(Value::as_array) else {
            return;
        };

        if let Some(expected) = self.expected_days() {
            if days.len() != expected {
                out.push(Violation::new(
                    "days",
                    format!("expected exactly {} days, received {}", expected, days.len()),
                ));
            }
        }

        for (i, day) in days.iter().enumerate() {
            let path = format!("days.{}", i);

            // Zero and non-integers are reported by the schema.
            if let Some(n) = day.get("dayIndex").and_then(Value::as_u64).filter(|n| *n >= 1) {
                if n != i as u64 + 1 {
                    out.push(Violation::new(
                        format!("{}.dayIndex", path),
                        format!("expected {}, received {}", i + 1, n),
                    ));
                }
            }

            let Some(raw) = day
                .get("date")
                .and_then(Value::as_str)
                .filter(|s| dates::is_iso_date_shape(s))
            else {
                continue;
            };
            let date_path = format!("{}.date", path);
            match NaiveDate::parse_from_str(raw, DATE_FORMAT) {
                Err(_) => out.push(Violation::new(
                    date_path,
                    format!("invalid calendar date '{}'", raw),
                )),
                Ok(date) => {
                    let wanted = self.expected_dates.as_ref().and_then(|d| d.get(i));
                    if let Some(wanted) = wanted.filter(|w| **w != date) {
                        out.push(Violation::new(
                            date_path,
                            format!("expected {}, received {}", wanted.format(DATE_FORMAT), raw),
                        ));
                    }
                }
            }
        }
    }
}

impl Shape for DayShape {
    type Output = GeneratedDay;

    fn schema(&self) -> &'static JSONSchema {
        &DAY_SCHEMA
    }
}

impl Shape for BatchShape<'_> {
    type Output = GeneratedDays;

    fn schema(&self) -> &'static JSONSchema {
        &BATCH_SCHEMA
    }

    fn check(&self, value: &Value, out: &mut Vec<Violation>) {
        let Some(items) = value.get("days").and_then(Value::as_array) else {
            return;
        };

        if items.len() != self.days.len() {
            out.push(Violation::new(
                "days",
                format!("expected {} entries, received {}", self.days.len(), items.len()),
            ));
        }

        // Positional matching: an echoed dayIndex must agree with the request.
        for (i, (item, requested)) in items.iter().zip(self.days).enumerate() {
            let Some(echoed) = item.get("dayIndex").and_then(Value::as_u64) else {
                continue;
            };
            if echoed != u64::from(requested.day_index) {
                out.push(Violation::new(
                    format!("days.{}.dayIndex", i),
                    format!("expected {}, received {}", requested.day_index, echoed),
                ));
            }
        }
    }
}

fn vibe_names() -> Vec<&'static str> {
    Vibe::ALL.iter().map(|v| v.as_str()).collect()
}

fn pillar_names() -> Vec<&'static str> {
    Pillar::ALL.iter().map(|p| p.as_str()).collect()
}

fn parsed_day_schema() -> Value {
    json!({
        "type": "object",
        "required": ["dayIndex", "date", "vibe"],
        "properties": {
            "dayIndex": {"type": "integer", "minimum": 1, "maximum": u32::MAX},
            "date": {"type": "string", "pattern": DATE_PATTERN},
            "location": {"type": ["string", "null"]},
            "vibe": {"enum": vibe_names()},
            "notes": {"type": ["string", "null"]}
        }
    })
}

/// Schema for a parsed trip.
pub fn parsed_trip_schema() -> Value {
    json!({
        "type": "object",
        "required": ["days"],
        "properties": {
            "titleSuggested": {"type": ["string", "null"]},
            "days": {"type": "array", "items": parsed_day_schema()}
        }
    })
}

/// Schema for one generated day. An echoed `dayIndex` is allowed.
pub fn generated_day_schema() -> Value {
    let strings = json!({"type": "array", "items": {"type": "string"}});
    json!({
        "type": "object",
        "required": ["pillar", "hook", "shots", "broll", "captionSeed"],
        "properties": {
            "dayIndex": {"type": ["integer", "null"], "minimum": 1, "maximum": u32::MAX},
            "pillar": {"enum": pillar_names()},
            "hook": {"type": "string", "maxLength": MAX_HOOK_CHARS},
            "shots": {
                "type": "array",
                "items": {"type": "string"},
                "minItems": MIN_SHOTS,
                "maxItems": MAX_SHOTS
            },
            "broll": strings,
            "captionSeed": {"type": "string"},
            "storyBeats": {"type": ["array", "null"], "items": {"type": "string"}},
            "postingTime": {"type": ["string", "null"], "pattern": POSTING_TIME_PATTERN}
        }
    })
}

/// Schema for a batch response.
pub fn generated_days_schema() -> Value {
    json!({
        "type": "object",
        "required": ["days"],
        "properties": {
            "days": {"type": "array", "items": generated_day_schema()}
        }
    })
}

fn compile(schema: &Value) -> JSONSchema {
    JSONSchema::options()
        .with_draft(Draft::Draft7)
        .compile(schema)
        .expect("static schema")
}

fn from_schema_error(error: &ValidationError<'_>) -> Violation {
    let path = dotted(&error.instance_path.to_string());
    match &error.kind {
        ValidationErrorKind::Required { property } => {
            let key = property
                .as_str()
                .map(String::from)
                .unwrap_or_else(|| property.to_string());
            let path = if path.is_empty() { key } else { format!("{}.{}", path, key) };
            Violation::new(path, "Required")
        }
        _ => Violation::new(path, error.to_string()),
    }
}

/// `/days/2/vibe` -> `days.2.vibe`
fn dotted(pointer: &str) -> String {
    pointer
        .split('/')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(".")
}
