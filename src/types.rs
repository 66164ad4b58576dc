//! Domain and wire types.
//!
//! Every type here maps one-to-one onto the camelCase JSON exchanged with
//! callers and with the model. Enumerated fields are real enums so that
//! out-of-domain values are rejected at deserialization time.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Day-type classification for one day of the trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vibe {
    /// Long driving days between destinations.
    Travel,
    /// National parks, campgrounds, outdoor spots.
    Camp,
    /// Urban areas and towns.
    City,
    /// Buffer days, maintenance, resupply.
    Rest,
}

impl Vibe {
    pub const ALL: [Vibe; 4] = [Vibe::Travel, Vibe::Camp, Vibe::City, Vibe::Rest];

    pub fn as_str(&self) -> &'static str {
        match self {
            Vibe::Travel => "travel",
            Vibe::Camp => "camp",
            Vibe::City => "city",
            Vibe::Rest => "rest",
        }
    }

    /// One-line definition used when asking the model to classify days.
    pub fn definition(&self) -> &'static str {
        match self {
            Vibe::Travel => "long driving days between destinations",
            Vibe::Camp => "national parks, campgrounds, outdoor spots",
            Vibe::City => "urban areas, towns",
            Vibe::Rest => "buffer days, maintenance, resupply",
        }
    }
}

impl fmt::Display for Vibe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Content category tag for a day's planned theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pillar {
    Rig,
    Life,
    Dog,
    Journey,
}

impl Pillar {
    pub const ALL: [Pillar; 4] = [Pillar::Rig, Pillar::Life, Pillar::Dog, Pillar::Journey];

    pub fn as_str(&self) -> &'static str {
        match self {
            Pillar::Rig => "rig",
            Pillar::Life => "life",
            Pillar::Dog => "dog",
            Pillar::Journey => "journey",
        }
    }
}

impl fmt::Display for Pillar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Voice of the generated captions and hooks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    #[default]
    Raw,
    Poetic,
    Funny,
    Minimal,
}

impl Tone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Raw => "raw",
            Tone::Poetic => "poetic",
            Tone::Funny => "funny",
            Tone::Minimal => "minimal",
        }
    }
}

/// How prominently the dog features in planned shots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DogEmphasis {
    Low,
    #[default]
    Medium,
    High,
}

impl DogEmphasis {
    pub fn as_str(&self) -> &'static str {
        match self {
            DogEmphasis::Low => "low",
            DogEmphasis::Medium => "medium",
            DogEmphasis::High => "high",
        }
    }
}

/// Posts per day. Only 0, 1 and 2 are accepted on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Cadence {
    None,
    #[default]
    One,
    Two,
}

impl TryFrom<u8> for Cadence {
    type Error = String;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        match value {
            0 => Ok(Cadence::None),
            1 => Ok(Cadence::One),
            2 => Ok(Cadence::Two),
            other => Err(format!("cadencePerDay must be 0, 1 or 2, got {}", other)),
        }
    }
}

impl From<Cadence> for u8 {
    fn from(c: Cadence) -> u8 {
        match c {
            Cadence::None => 0,
            Cadence::One => 1,
            Cadence::Two => 2,
        }
    }
}

/// Relative pillar weights, each in `[0, 1]`. Carried through untouched;
/// prompts do not use them yet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPillarWeights")]
pub struct PillarWeights {
    pub rig: f64,
    pub life: f64,
    pub dog: f64,
    pub journey: f64,
}

#[derive(Deserialize)]
struct RawPillarWeights {
    rig: f64,
    life: f64,
    dog: f64,
    journey: f64,
}

impl TryFrom<RawPillarWeights> for PillarWeights {
    type Error = String;

    fn try_from(raw: RawPillarWeights) -> std::result::Result<Self, Self::Error> {
        for (name, value) in [
            ("rig", raw.rig),
            ("life", raw.life),
            ("dog", raw.dog),
            ("journey", raw.journey),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(format!(
                    "pillarWeights.{} must be between 0 and 1, got {}",
                    name, value
                ));
            }
        }
        Ok(Self {
            rig: raw.rig,
            life: raw.life,
            dog: raw.dog,
            journey: raw.journey,
        })
    }
}

impl Default for PillarWeights {
    fn default() -> Self {
        Self {
            rig: 0.25,
            life: 0.25,
            dog: 0.25,
            journey: 0.25,
        }
    }
}

/// Per-project content settings supplied by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectSettings {
    pub tone: Tone,
    pub cadence_per_day: Cadence,
    pub pillar_weights: PillarWeights,
    pub include_route_hints: bool,
    pub dog_emphasis: DogEmphasis,
}

impl Default for ProjectSettings {
    fn default() -> Self {
        Self {
            tone: Tone::default(),
            cadence_per_day: Cadence::default(),
            pillar_weights: PillarWeights::default(),
            include_route_hints: true,
            dog_emphasis: DogEmphasis::default(),
        }
    }
}

/// The slice of a day that content generation needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayDescriptor {
    pub date: String,
    pub day_index: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub vibe: Vibe,
}

/// One day produced by the itinerary parse step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedDay {
    pub day_index: u32,
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub vibe: Vibe,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl From<&ParsedDay> for DayDescriptor {
    fn from(day: &ParsedDay) -> Self {
        Self {
            date: day.date.clone(),
            day_index: day.day_index,
            location: day.location.clone(),
            vibe: day.vibe,
        }
    }
}

/// Result of `parse_trip`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedTrip {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_suggested: Option<String>,
    pub days: Vec<ParsedDay>,
}

/// Planned content for one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedDay {
    pub pillar: Pillar,
    pub hook: String,
    pub shots: Vec<String>,
    pub broll: Vec<String>,
    pub caption_seed: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub story_beats: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub posting_time: Option<String>,
}

/// Batch response shape, and the result of `generate_all_days`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedDays {
    pub days: Vec<GeneratedDay>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseTripPayload {
    pub itinerary_text: String,
    pub start_date: String,
    pub end_date: String,
    #[serde(default)]
    pub settings: ProjectSettings,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route_hints: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateDayPayload {
    pub day: DayDescriptor,
    #[serde(default)]
    pub settings: ProjectSettings,
    #[serde(default)]
    pub itinerary_context: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateAllDaysPayload {
    pub days: Vec<DayDescriptor>,
    #[serde(default)]
    pub settings: ProjectSettings,
    #[serde(default)]
    pub itinerary_context: String,
}

/// One request to the planner, tagged by `mode`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "payload", rename_all = "snake_case")]
pub enum PlanRequest {
    ParseTrip(ParseTripPayload),
    GenerateDay(GenerateDayPayload),
    GenerateAllDays(GenerateAllDaysPayload),
}

impl PlanRequest {
    /// Wire name of the mode, for logs and events.
    pub fn mode(&self) -> &'static str {
        match self {
            PlanRequest::ParseTrip(_) => "parse_trip",
            PlanRequest::GenerateDay(_) => "generate_day",
            PlanRequest::GenerateAllDays(_) => "generate_all_days",
        }
    }
}

/// Mode-specific success payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PlanData {
    Trip(ParsedTrip),
    Day(GeneratedDay),
    Days(GeneratedDays),
}

/// `{ success: true, data }` or `{ success: false, error }`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<PlanData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PlanResponse {
    pub fn ok(data: PlanData) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }
}
