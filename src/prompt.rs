//! Prompt rendering.
//!
//! Pure functions from trip data to instruction text. Output depends only on
//! the arguments: no clocks, no randomness, no I/O.

use crate::types::{DayDescriptor, DogEmphasis, ProjectSettings, Tone, Vibe};

/// System instruction sent with every model call.
pub const SYSTEM_PROMPT: &str = "You are a content planning assistant for a road trip content creator.
Always respond with valid JSON only. No markdown, no code blocks, no explanations.
Just pure JSON that can be parsed by a strict JSON parser.";

const EN_ROUTE: &str = "En route";

const PARSED_TRIP_STRUCTURE: &str = r#"{
  "titleSuggested": "optional suggested project title",
  "days": [
    {
      "dayIndex": 1,
      "date": "YYYY-MM-DD",
      "location": "string or null",
      "vibe": "travel|camp|city|rest",
      "notes": "optional notes"
    }
  ]
}"#;

const GENERATED_DAY_STRUCTURE: &str = r#"{
  "pillar": "rig|life|dog|journey",
  "hook": "string under 120 chars",
  "shots": ["shot1", "shot2", "..."],
  "broll": ["broll1", "broll2", "..."],
  "captionSeed": "1-3 sentence caption",
  "storyBeats": ["beat1", "beat2"],
  "postingTime": "HH:MM"
}"#;

const GENERATED_DAYS_STRUCTURE: &str = r#"{
  "days": [
    {
      "dayIndex": 1,
      "pillar": "rig|life|dog|journey",
      "hook": "string",
      "shots": ["..."],
      "broll": ["..."],
      "captionSeed": "string",
      "storyBeats": ["..."],
      "postingTime": "HH:MM"
    }
  ]
}"#;

fn tone_guidance(tone: Tone) -> &'static str {
    match tone {
        Tone::Raw => "authentic, unfiltered, real moments as they happen",
        Tone::Poetic => "reflective, thoughtful, finding meaning in the journey",
        Tone::Funny => "lighthearted, self-aware, finding humor in overlanding life",
        Tone::Minimal => "concise, essential details only, let visuals speak",
    }
}

fn tone_guidance_short(tone: Tone) -> &'static str {
    match tone {
        Tone::Raw => "authentic, unfiltered, real moments",
        Tone::Poetic => "reflective, finding meaning in the journey",
        Tone::Funny => "lighthearted, self-aware humor",
        Tone::Minimal => "concise, let visuals speak",
    }
}

fn dog_guidance(emphasis: DogEmphasis) -> &'static str {
    match emphasis {
        DogEmphasis::Low => "Shelby appears occasionally, natural presence",
        DogEmphasis::Medium => "Include Shelby in at least 1-2 shots, part of the journey",
        DogEmphasis::High => "Shelby is a main character, feature in 2-3+ shots",
    }
}

fn dog_guidance_short(emphasis: DogEmphasis) -> &'static str {
    match emphasis {
        DogEmphasis::Low => "Shelby appears occasionally",
        DogEmphasis::Medium => "Include Shelby in 1-2 shots per day",
        DogEmphasis::High => "Shelby featured in 2-3+ shots per day",
    }
}

/// Wrap text in a labeled section.
pub fn section(label: &str, content: &str) -> String {
    format!("{}:\n{}", label, content)
}

/// One summary line per day: `Day {index} ({date}): {location} - {vibe}`.
pub fn day_summary_lines(days: &[DayDescriptor]) -> String {
    days.iter()
        .map(|d| {
            format!(
                "Day {} ({}): {} - {}",
                d.day_index,
                d.date,
                location_label(d),
                d.vibe
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Day location, or "En route" when missing or blank.
fn location_label(day: &DayDescriptor) -> &str {
    day.location
        .as_deref()
        .filter(|l| !l.trim().is_empty())
        .unwrap_or(EN_ROUTE)
}

/// Prompt for turning free-text itinerary into a day list.
///
/// `day_count` is the inclusive number of calendar days between the dates;
/// the model is told to produce exactly that many entries. Route hints are
/// only included when present and enabled in `settings`.
pub fn build_parse_trip_prompt(
    itinerary_text: &str,
    start_date: &str,
    end_date: &str,
    day_count: usize,
    settings: &ProjectSettings,
    route_hints: Option<&str>,
) -> String {
    let mut out = String::from(
        "You are parsing a road trip itinerary into a structured day-by-day plan for content creation.\n\n",
    );
    out.push_str(&section("ITINERARY TEXT", itinerary_text));
    out.push_str("\n\n");

    if let Some(hints) = route_hints.filter(|h| settings.include_route_hints && !h.trim().is_empty()) {
        out.push_str(&section("ROUTE HINTS/STOPS", hints));
        out.push_str("\n\n");
    }

    out.push_str(&format!("START DATE: {}\nEND DATE: {}\n\n", start_date, end_date));
    out.push_str("Generate a JSON response with a suggested title and a day-by-day breakdown.\n");
    out.push_str(&format!(
        "You MUST generate EXACTLY {} days: one for every date between {} and {} (inclusive).\n\n",
        day_count, start_date, end_date
    ));

    out.push_str("For each day, determine:\n");
    out.push_str("- dayIndex: sequential number starting from 1\n");
    out.push_str("- date: in YYYY-MM-DD format\n");
    out.push_str("- location: the main location/stop for that day (null if unclear)\n");
    out.push_str("- vibe: categorize as one of:\n");
    for vibe in Vibe::ALL {
        out.push_str(&format!("  - \"{}\": {}\n", vibe, vibe.definition()));
    }
    out.push_str("- notes: any relevant context from the itinerary\n\n");

    out.push_str("If the itinerary has fewer stops than days, spread them logically.\n");
    out.push_str("If it has more stops than days, group nearby locations.\n\n");
    out.push_str("Respond ONLY with a single valid JSON object matching this structure:\n");
    out.push_str(PARSED_TRIP_STRUCTURE);
    out
}

/// Prompt for planning content for one day.
pub fn build_generate_day_prompt(
    day: &DayDescriptor,
    settings: &ProjectSettings,
    itinerary_context: &str,
) -> String {
    let mut out = format!(
        "You are creating a content plan for day {} of a road trip.\n\n",
        day.day_index
    );
    out.push_str(&section(
        "DAY DETAILS",
        &format!(
            "- Date: {}\n- Location: {}\n- Vibe: {}",
            day.date,
            location_label(day),
            day.vibe
        ),
    ));
    out.push_str("\n\n");
    out.push_str(&section("FULL TRIP CONTEXT", itinerary_context));
    out.push_str("\n\n");
    out.push_str(&section(
        "CONTENT SETTINGS",
        &format!(
            "- Tone: {} ({})\n- Dog emphasis: {} ({})\n- Posting cadence: {} post(s) per day",
            settings.tone.as_str(),
            tone_guidance(settings.tone),
            settings.dog_emphasis.as_str(),
            dog_guidance(settings.dog_emphasis),
            u8::from(settings.cadence_per_day)
        ),
    ));
    out.push_str("\n\n");

    out.push_str("Create a content plan for this day. Guidelines:\n");
    out.push_str("- Pillar: Choose from \"rig\" (4Runner/gear), \"life\" (lifestyle/camping), \"dog\" (Shelby content), or \"journey\" (travel/exploration)\n");
    out.push_str("- Hook: Under 120 chars, authentic not influencer-y, avoid buzzwords\n");
    out.push_str("- Shots: 5-8 specific, practical phone shots (e.g., \"Tailgate coffee pour with steam\", \"POV loading RTT ladder\", \"Shelby watching sunset from camp chair\")\n");
    out.push_str("- B-roll: Supporting footage to fill transitions\n");
    out.push_str("- Caption seed: 1-3 sentences matching the tone setting\n");
    out.push_str("- Story beats: Optional narrative moments\n");
    out.push_str("- Posting time: Optimal time in 24hr format (e.g., \"18:30\")\n\n");

    if settings.dog_emphasis != DogEmphasis::Low {
        out.push_str("Remember to include Shelby in shots as specified.\n\n");
    }

    out.push_str("Respond ONLY with valid JSON:\n");
    out.push_str(GENERATED_DAY_STRUCTURE);
    out
}

/// Prompt for planning content for a batch of days in one call.
///
/// The caller matches results back to `days` by position, so the prompt
/// insists on one entry per day in the given order.
pub fn build_generate_all_days_prompt(
    days: &[DayDescriptor],
    settings: &ProjectSettings,
    itinerary_context: &str,
) -> String {
    let mut out = format!("Create content plans for {} days of a road trip.\n\n", days.len());
    out.push_str(&section("TRIP OVERVIEW", itinerary_context));
    out.push_str("\n\n");
    out.push_str(&section("DAYS TO PLAN", &day_summary_lines(days)));
    out.push_str("\n\n");
    out.push_str(&section(
        "SETTINGS",
        &format!(
            "- Tone: {} ({})\n- Dog: {} ({})\n- Cadence: {} post(s) per day",
            settings.tone.as_str(),
            tone_guidance_short(settings.tone),
            settings.dog_emphasis.as_str(),
            dog_guidance_short(settings.dog_emphasis),
            u8::from(settings.cadence_per_day)
        ),
    ));
    out.push_str("\n\n");

    out.push_str("For EACH day, create:\n");
    out.push_str("- dayIndex: the day number from the list above\n");
    out.push_str("- pillar: \"rig\", \"life\", \"dog\", or \"journey\"\n");
    out.push_str("- hook: Under 120 chars, authentic\n");
    out.push_str("- shots: 5-8 specific phone shots\n");
    out.push_str("- broll: Supporting footage\n");
    out.push_str("- captionSeed: 1-3 sentences\n");
    out.push_str("- storyBeats: Optional narrative moments\n");
    out.push_str("- postingTime: HH:MM format\n\n");

    out.push_str("Vary pillars across days. Make shots specific and practical.\n");
    out.push_str(&format!(
        "Return EXACTLY {} entries in \"days\", in the same order as the list above.\n\n",
        days.len()
    ));
    out.push_str("Respond ONLY with valid JSON:\n");
    out.push_str(GENERATED_DAYS_STRUCTURE);
    out
}

/// Rewrite a prompt after the model answered with something that was not JSON.
pub fn build_decode_correction_prompt(original: &str) -> String {
    format!(
        "The previous response was not valid JSON. Please fix it and respond with ONLY valid JSON.\n\
         Previous attempt may have had markdown or explanations. Remove all of that.\n\
         Here's the original request again: {}",
        original
    )
}

/// Ask the model to fix a parsed trip that failed validation.
///
/// `error` is embedded verbatim; `invalid_json` is the previously decoded
/// response, re-serialized.
pub fn build_trip_repair_prompt(error: &str, invalid_json: &str) -> String {
    format!(
        "Fix this JSON to match the required schema. The error was: {}\n\n\
         JSON to fix: {}\n\n\
         Required structure:\n{}\n\n\
         Respond with ONLY the fixed JSON.",
        error, invalid_json, PARSED_TRIP_STRUCTURE
    )
}
