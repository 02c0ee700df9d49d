//! Sanitizing and parsing of raw model output.
//!
//! Model replies are untrusted text. They go through three separate stages
//! before anything trusts them: [`strip_code_fence`] removes a markdown
//! wrapper, [`parse_json`] turns the text into a JSON value, and the
//! [`crate::schema`] validators check shape and constraints.

use crate::error::{Result, VidlearnError};
use regex::Regex;
use std::sync::OnceLock;

/// Maximum number of characters of bad payload carried in a parse error.
pub const SNIPPET_LEN: usize = 200;

fn wrapping_fence_regex() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    FENCE.get_or_init(|| {
        Regex::new(r"(?s)\A\s*```(?:json|JSON)?[ \t]*\r?\n?(.*?)\s*```\s*\z").expect("Invalid regex")
    })
}

fn embedded_fence_regex() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    FENCE.get_or_init(|| {
        Regex::new(r"(?s)```(?:json|JSON)?[ \t]*\r?\n?(.*?)\s*```").expect("Invalid regex")
    })
}

/// Return the payload of the fence wrapping the reply, or the input unchanged.
///
/// A reply that already starts as a JSON document is returned as is, so code
/// blocks inside its string values are left alone. Otherwise a fenced block
/// surrounded by prose is unwrapped.
///
/// Never fails: text that is still not JSON after stripping is reported by
/// [`parse_json`].
pub fn strip_code_fence(text: &str) -> &str {
    if let Some(inner) = wrapping_fence_regex().captures(text).and_then(|caps| caps.get(1)) {
        return inner.as_str();
    }
    if text.trim_start().starts_with(['{', '[']) {
        return text;
    }
    match embedded_fence_regex().captures(text).and_then(|caps| caps.get(1)) {
        Some(inner) => inner.as_str(),
        None => text,
    }
}

/// Parse sanitized text into a JSON value.
pub fn parse_json(text: &str) -> Result<serde_json::Value> {
    serde_json::from_str(text.trim()).map_err(|e| VidlearnError::Parse {
        message: e.to_string(),
        snippet: snippet(text, SNIPPET_LEN),
    })
}

/// Truncate text to at most `max_chars` characters, appending an ellipsis when cut.
pub fn snippet(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fenced_json_is_unwrapped() {
        let raw = "```json\n{\"a\":1}\n```";
        assert_eq!(strip_code_fence(raw), "{\"a\":1}");
        assert_eq!(parse_json(strip_code_fence(raw)).unwrap(), json!({"a": 1}));
    }

    #[test]
    fn test_unfenced_is_identity() {
        let raw = "{\"a\":1}";
        assert_eq!(strip_code_fence(raw), raw);
        assert_eq!(parse_json(strip_code_fence(raw)).unwrap(), json!({"a": 1}));
    }

    #[test]
    fn test_untagged_fence_with_surrounding_prose() {
        let raw = "Here you go:\n```\n[1, 2, 3]\n```\nEnjoy.";
        assert_eq!(strip_code_fence(raw), "[1, 2, 3]");
    }

    #[test]
    fn test_code_block_inside_unfenced_json_is_kept() {
        let raw = json!({
            "content": "Run it like this:\n```python\nprint(2 + 2)\n```\nIt prints 4."
        })
        .to_string();
        assert_eq!(strip_code_fence(&raw), raw);
        assert_eq!(
            parse_json(strip_code_fence(&raw)).unwrap()["content"],
            "Run it like this:\n```python\nprint(2 + 2)\n```\nIt prints 4."
        );
    }

    #[test]
    fn test_wrapping_fence_keeps_inner_code_block() {
        let raw = "```json\n{\"content\": \"```python\\nprint(1)\\n```\"}\n```\n";
        assert_eq!(
            strip_code_fence(raw),
            "{\"content\": \"```python\\nprint(1)\\n```\"}"
        );
        assert!(parse_json(strip_code_fence(raw)).is_ok());
    }

    #[test]
    fn test_unterminated_fence_left_alone() {
        let raw = "```json\n{\"a\":1}";
        assert_eq!(strip_code_fence(raw), raw);
    }

    #[test]
    fn test_parse_error_carries_snippet() {
        match parse_json("not json") {
            Err(VidlearnError::Parse { snippet, .. }) => assert_eq!(snippet, "not json"),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_snippet_truncates_on_char_boundary() {
        let text = "é".repeat(300);
        let cut = snippet(&text, SNIPPET_LEN);
        assert_eq!(cut.chars().count(), SNIPPET_LEN + 3);
        assert!(cut.ends_with("..."));
        assert_eq!(snippet("short", SNIPPET_LEN), "short");
    }
}
