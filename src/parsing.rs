//! Defensive JSON extraction from model text.
//!
//! Models asked for "JSON only" still wrap answers in markdown fences or
//! prose. [`decode_json`] tries three strategies in a fixed order and
//! reports which one succeeded.

use crate::error::Result;
use crate::PlannerError;
use serde_json::Value;

/// Which extraction strategy produced the decoded value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeStrategy {
    /// The whole (trimmed) text was valid JSON.
    Direct,
    /// The interior of a ```json fenced block.
    FencedBlock,
    /// The span from the first `{` to the last `}` inclusive.
    BraceSpan,
}

impl DecodeStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecodeStrategy::Direct => "direct",
            DecodeStrategy::FencedBlock => "fenced_block",
            DecodeStrategy::BraceSpan => "brace_span",
        }
    }
}

/// Extract the interior of a markdown block labelled `json`.
///
/// Recognizes `` ```json `` and `` ```JSON ``. Unlabelled fences are ignored.
pub fn extract_json_block(text: &str) -> Option<&str> {
    for marker in ["```json", "```JSON"] {
        if let Some(start) = text.find(marker) {
            let content_start = start + marker.len();
            if let Some(end) = text[content_start..].find("```") {
                return Some(text[content_start..content_start + end].trim());
            }
        }
    }
    None
}

/// The substring from the first `{` to the last `}` inclusive.
pub fn extract_brace_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

/// Decode model text into JSON, trying direct parse, fenced block, then
/// brace span. The first strategy that parses wins.
pub fn decode_json(text: &str) -> Result<(Value, DecodeStrategy)> {
    let trimmed = text.trim();

    let direct_err = match serde_json::from_str::<Value>(trimmed) {
        Ok(val) => return Ok((val, DecodeStrategy::Direct)),
        Err(e) => e,
    };

    if let Some(block) = extract_json_block(trimmed) {
        if let Ok(val) = serde_json::from_str::<Value>(block) {
            return Ok((val, DecodeStrategy::FencedBlock));
        }
    }

    if let Some(span) = extract_brace_span(trimmed) {
        if let Ok(val) = serde_json::from_str::<Value>(span) {
            return Ok((val, DecodeStrategy::BraceSpan));
        }
    }

    Err(PlannerError::Decode(format!(
        "{}. Raw text (truncated): {}",
        direct_err,
        truncate(trimmed, 200)
    )))
}

/// Truncate to at most `max_chars` characters, appending "..." if cut.
pub(crate) fn truncate(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_direct() {
        let (val, strategy) = decode_json("  {\"a\": 1}\n").unwrap();
        assert_eq!(val, json!({"a": 1}));
        assert_eq!(strategy, DecodeStrategy::Direct);
    }

    #[test]
    fn test_decode_direct_array() {
        let (val, strategy) = decode_json("[1, 2]").unwrap();
        assert_eq!(val, json!([1, 2]));
        assert_eq!(strategy, DecodeStrategy::Direct);
    }

    #[test]
    fn test_decode_fenced_block() {
        let (val, strategy) = decode_json("```json\n{\"a\":1}\n```").unwrap();
        assert_eq!(val, json!({"a": 1}));
        assert_eq!(strategy, DecodeStrategy::FencedBlock);
    }

    #[test]
    fn test_decode_fenced_block_with_prose() {
        let text = "Here is your plan:\n```json\n{\"days\": []}\n```\nEnjoy!";
        let (val, strategy) = decode_json(text).unwrap();
        assert_eq!(val, json!({"days": []}));
        assert_eq!(strategy, DecodeStrategy::FencedBlock);
    }

    #[test]
    fn test_decode_brace_span() {
        let (val, strategy) = decode_json("prefix {\"a\":1} suffix").unwrap();
        assert_eq!(val, json!({"a": 1}));
        assert_eq!(strategy, DecodeStrategy::BraceSpan);
    }

    #[test]
    fn test_decode_brace_span_after_broken_fence() {
        // Fence interior is invalid, but the outer braces still parse.
        let text = "```json\nnot json\n``` but {\"ok\": true}";
        let (val, strategy) = decode_json(text).unwrap();
        assert_eq!(val, json!({"ok": true}));
        assert_eq!(strategy, DecodeStrategy::BraceSpan);
    }

    #[test]
    fn test_decode_failure() {
        let err = decode_json("I cannot help with that.").unwrap_err();
        assert!(err.is_decode());
    }

    #[test]
    fn test_decode_reversed_braces_fail() {
        assert!(decode_json("} nope {").is_err());
        assert_eq!(extract_brace_span("} nope {"), None);
    }

    #[test]
    fn test_unlabelled_fence_ignored() {
        assert_eq!(extract_json_block("```\n{}\n```"), None);
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("héllo", 2), "hé...");
        assert_eq!(truncate("hi", 5), "hi");
    }
}
