// src/services/payload.rs

//! Extraction of the posts payload embedded in a Markdown document.
//!
//! The content source is a Markdown file that carries a JSON document,
//! usually inside a fenced code block. Extraction is deliberately lenient:
//!
//! 1. If a fenced block (optionally tagged `json`) exists, only its body is
//!    considered.
//! 2. The JSON text is the span from the first `{` or `[` to the last `}`
//!    or `]`.
//! 3. The span is decoded as JSON and flattened into a list of raw posts.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

use crate::error::Result;

fn fence_regex() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    FENCE.get_or_init(|| {
        Regex::new(r"(?is)```[ \t]*(?:json)?[ \t]*\r?\n?(.*?)```").expect("fence regex is valid")
    })
}

/// Body of the first fenced code block, or the whole text if there is none.
pub fn strip_code_fence(text: &str) -> &str {
    fence_regex()
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map_or(text, |m| m.as_str())
}

/// Substring from the first opening bracket to the last closing bracket.
pub fn json_span(text: &str) -> Option<&str> {
    let start = text.find(['{', '['])?;
    let end = text.rfind(['}', ']'])?;
    (end > start).then(|| &text[start..=end])
}

/// Parse the posts payload embedded in `text`.
///
/// Returns `Ok(None)` when no bracket span exists (nothing to update) and
/// an error when the span is not valid JSON.
pub fn parse_embedded_payload(text: &str) -> Result<Option<Vec<Value>>> {
    let Some(span) = json_span(strip_code_fence(text)) else {
        return Ok(None);
    };
    let value: Value = serde_json::from_str(span)?;
    Ok(Some(into_post_list(value)))
}

/// Flatten the accepted payload shapes into a list of raw post objects.
///
/// Accepts an array of posts, an object with a `posts` array, or a single
/// post object. Entries that are not JSON objects are dropped.
pub fn into_post_list(value: Value) -> Vec<Value> {
    let list = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("posts") {
            Some(Value::Array(items)) => items,
            Some(other) => {
                map.insert("posts".to_string(), other);
                vec![Value::Object(map)]
            }
            None => vec![Value::Object(map)],
        },
        _ => Vec::new(),
    };

    let total = list.len();
    let objects: Vec<Value> = list.into_iter().filter(Value::is_object).collect();
    if objects.len() != total {
        log::debug!(
            "Dropped {} non-object payload entries",
            total - objects.len()
        );
    }
    objects
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fenced_json_block() {
        let text = "# Posts\n\nSome intro.\n\n```json\n[{\"id\": \"a\"}, {\"id\": \"b\"}]\n```\n\nTrailer";
        let posts = parse_embedded_payload(text).unwrap().unwrap();
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[1]["id"], "b");
    }

    #[test]
    fn test_untagged_fence() {
        let text = "```\n{\"posts\": [{\"id\": \"x\"}]}\n```";
        let posts = parse_embedded_payload(text).unwrap().unwrap();
        assert_eq!(posts, vec![json!({"id": "x"})]);
    }

    #[test]
    fn test_uppercase_tag_and_crlf() {
        let text = "```JSON\r\n[{\"id\": \"x\"}]\r\n```\r\n";
        let posts = parse_embedded_payload(text).unwrap().unwrap();
        assert_eq!(posts.len(), 1);
    }

    #[test]
    fn test_bare_json_without_fence() {
        let text = "[{\"id\": \"1\"}]";
        assert_eq!(parse_embedded_payload(text).unwrap().unwrap().len(), 1);
    }

    #[test]
    fn test_json_surrounded_by_prose() {
        let text = "Here you go: {\"id\": \"solo\", \"title\": \"One\"} -- enjoy";
        let posts = parse_embedded_payload(text).unwrap().unwrap();
        assert_eq!(posts, vec![json!({"id": "solo", "title": "One"})]);
    }

    #[test]
    fn test_single_post_object() {
        let posts = into_post_list(json!({"id": "only"}));
        assert_eq!(posts, vec![json!({"id": "only"})]);
    }

    #[test]
    fn test_posts_field_not_an_array_is_a_single_post() {
        let posts = into_post_list(json!({"id": "p", "posts": 3}));
        assert_eq!(posts, vec![json!({"id": "p", "posts": 3})]);
    }

    #[test]
    fn test_non_object_entries_dropped() {
        let posts = into_post_list(json!([1, {"id": "a"}, "x", null]));
        assert_eq!(posts, vec![json!({"id": "a"})]);
    }

    #[test]
    fn test_scalar_payload_is_empty() {
        assert!(into_post_list(json!(42)).is_empty());
    }

    #[test]
    fn test_no_brackets_is_noop() {
        assert!(parse_embedded_payload("").unwrap().is_none());
        assert!(parse_embedded_payload("just prose").unwrap().is_none());
        assert!(parse_embedded_payload("```json\n```").unwrap().is_none());
    }

    #[test]
    fn test_closing_before_opening_is_noop() {
        assert!(parse_embedded_payload("} nothing here {").unwrap().is_none());
        assert!(json_span("]x[").is_none());
    }

    #[test]
    fn test_only_opening_bracket_is_noop() {
        assert!(parse_embedded_payload("[ unterminated").unwrap().is_none());
    }

    #[test]
    fn test_malformed_json_is_error() {
        assert!(parse_embedded_payload("```json\n[{\"id\": }]\n```").is_err());
        assert!(parse_embedded_payload("{\"id\": \"a\",}").is_err());
    }

    #[test]
    fn test_trailing_bracket_in_prose_breaks_span() {
        // The last closing bracket wins, even when it belongs to prose.
        let text = "{\"id\": \"a\"} see [1]";
        assert!(parse_embedded_payload(text).is_err());
    }

    #[test]
    fn test_unclosed_fence_falls_back_to_whole_text() {
        let text = "```json\n[{\"id\": \"a\"}]";
        let posts = parse_embedded_payload(text).unwrap().unwrap();
        assert_eq!(posts.len(), 1);
    }

    #[test]
    fn test_first_fence_wins() {
        let text = "```json\n[{\"id\": \"first\"}]\n```\n```json\n[{\"id\": \"second\"}]\n```";
        let posts = parse_embedded_payload(text).unwrap().unwrap();
        assert_eq!(posts, vec![json!({"id": "first"})]);
    }

    #[test]
    fn test_brackets_inside_strings_are_kept() {
        let text = "```json\n[{\"id\": \"a\", \"content\": \"use [links] and {braces}\"}]\n```";
        let posts = parse_embedded_payload(text).unwrap().unwrap();
        assert_eq!(posts[0]["content"], "use [links] and {braces}");
    }
}
