//! # Extract Module
//!
//! Recovers the verdict JSON object from reviewer output.
//!
//! The reviewer CLI runs with `--output-format json`, so stdout is normally an
//! envelope whose `result` field holds the model's text. The model is asked
//! for bare JSON but sometimes wraps it in prose or a markdown fence; the
//! outermost brace pair is tried as a fallback.

use crate::error::{Error, Result};
use serde_json::{Map, Value};

/// Maximum number of characters of unparsable text kept in the error.
pub const ERROR_SNIPPET_CHARS: usize = 500;

/// Pull the model's answer text out of the CLI stdout.
///
/// - `{"result": ...}` envelope: the `result` value (strings as-is, other
///   JSON serialized).
/// - A bare JSON string: that string.
/// - Anything else: the trimmed stdout.
#[must_use]
pub fn extract_response_text(stdout: &str) -> String {
    let trimmed = stdout.trim();

    match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::Object(mut envelope)) => match envelope.remove("result") {
            Some(Value::String(text)) => text,
            Some(other) => other.to_string(),
            None => trimmed.to_string(),
        },
        Ok(Value::String(text)) => text,
        _ => trimmed.to_string(),
    }
}

/// Parse the model's answer into a JSON object.
pub fn parse_review_json(text: &str) -> Result<Map<String, Value>> {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(text) {
        return Ok(map);
    }

    if let (Some(start), Some(end)) = (text.find('{'), text.rfind('}')) {
        if end > start {
            if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(&text[start..=end]) {
                return Ok(map);
            }
        }
    }

    Err(Error::UnparsableResponse(snippet(text)))
}

/// Extract the verdict object straight from CLI stdout.
pub fn extract_review(stdout: &str) -> Result<Map<String, Value>> {
    let text = extract_response_text(stdout);
    parse_review_json(&text)
}

fn snippet(text: &str) -> String {
    text.chars().take(ERROR_SNIPPET_CHARS).collect()
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn envelope_result_string() {
        let stdout = r#"{"type":"result","result":"{\"score\": 72}"}"#;
        assert_eq!(extract_response_text(stdout), r#"{"score": 72}"#);
    }

    #[test]
    fn envelope_result_object_is_serialized() {
        let stdout = r#"{"result": {"score": 10}}"#;
        assert_eq!(extract_response_text(stdout), r#"{"score":10}"#);
    }

    #[test]
    fn envelope_without_result_is_kept() {
        let stdout = "  {\"score\": 5}\n";
        assert_eq!(extract_response_text(stdout), "{\"score\": 5}");
    }

    #[test]
    fn bare_json_string() {
        assert_eq!(extract_response_text(r#""hello""#), "hello");
    }

    #[test]
    fn plain_text_is_trimmed() {
        assert_eq!(extract_response_text("  not json \n"), "not json");
    }

    #[test]
    fn parse_direct_object() {
        let map = parse_review_json(r#"{"score": 80, "recommendation": "pass"}"#).unwrap();
        assert_eq!(map.get("score"), Some(&Value::from(80)));
    }

    #[test]
    fn parse_fenced_object() {
        let text = "Here is my verdict:\n```json\n{\"score\": 41}\n```\nThanks.";
        let map = parse_review_json(text).unwrap();
        assert_eq!(map.get("score"), Some(&Value::from(41)));
    }

    #[test]
    fn parse_nested_braces_uses_outermost_pair() {
        let text = "prefix {\"score\": 1, \"breakdown\": {\"tests\": 2}} suffix";
        let map = parse_review_json(text).unwrap();
        assert!(map.contains_key("breakdown"));
    }

    #[test]
    fn parse_rejects_array() {
        assert!(matches!(
            parse_review_json("[1, 2, 3]"),
            Err(Error::UnparsableResponse(_))
        ));
    }

    #[test]
    fn parse_rejects_text_without_braces() {
        let err = parse_review_json("I cannot grade this").unwrap_err();
        assert!(err.to_string().contains("I cannot grade this"));
    }

    #[test]
    fn error_snippet_is_truncated_on_char_boundary() {
        let text = "ж".repeat(ERROR_SNIPPET_CHARS + 100);
        match parse_review_json(&text) {
            Err(Error::UnparsableResponse(snippet)) => {
                assert_eq!(snippet.chars().count(), ERROR_SNIPPET_CHARS);
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn extract_review_end_to_end() {
        let stdout = r#"{"result": "Sure! {\"score\": 65, \"recommendation\": \"pass\"}"}"#;
        let map = extract_review(stdout).unwrap();
        assert_eq!(map.get("recommendation"), Some(&Value::from("pass")));
    }
}
