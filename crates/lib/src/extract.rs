//! # JSON Extraction
//!
//! Text-generation providers are asked for "ONLY valid JSON" but routinely wrap
//! it in Markdown code fences, prefix it with a prose header ("Here is the
//! analysis:") or append a closing remark. This module isolates the JSON
//! object from such a reply so every endpoint shares one implementation.

use serde_json::{Map, Value};

/// Removes a surrounding Markdown code fence, including an optional language
/// tag such as ```` ```json ````.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let without_open = match trimmed.strip_prefix("```") {
        Some(rest) => {
            let tag_len = rest
                .find(|c: char| !c.is_ascii_alphanumeric())
                .unwrap_or(rest.len());
            &rest[tag_len..]
        }
        None => trimmed,
    };
    without_open
        .trim_end()
        .strip_suffix("```")
        .unwrap_or(without_open)
        .trim()
}

/// Returns the first balanced `{ ... }` span, ignoring braces inside strings.
fn first_balanced_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }
    None
}

fn parse_object(text: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Value>(text).ok()? {
        Value::Object(map) => Some(map),
        _ => None,
    }
}

/// Extracts the JSON object carried by a free-text model reply.
///
/// Tries, in order: the whole reply once code fences are removed, the first
/// balanced object, and finally the span from the first `{` to the last `}`.
/// Returns `None` for an empty reply or when no candidate parses as an object.
pub fn extract_json_object(reply: &str) -> Option<Map<String, Value>> {
    let text = strip_code_fence(reply);
    if text.is_empty() {
        return None;
    }

    if let Some(object) = parse_object(text) {
        return Some(object);
    }

    if let Some(object) = first_balanced_object(text).and_then(parse_object) {
        return Some(object);
    }

    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end <= start {
        return None;
    }
    parse_object(&text[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const BODY: &str = r#"{"risk_level": "low", "questions_to_ask": ["Is WiFi free?"]}"#;

    #[test]
    fn fenced_and_plain_replies_parse_identically() {
        let plain = extract_json_object(BODY).unwrap();
        for fenced in [
            format!("```json\n{BODY}\n```"),
            format!("```\n{BODY}\n```"),
            format!("```{BODY}```"),
            format!("  ```JSON\n{BODY}\n```  \n"),
        ] {
            assert_eq!(extract_json_object(&fenced).unwrap(), plain, "{fenced}");
        }
    }

    #[test]
    fn strips_leading_prose_and_trailing_remarks() {
        let reply = format!("Here's the analysis:\n{BODY}\nLet me know if you need more.");
        let object = extract_json_object(&reply).unwrap();
        assert_eq!(object["risk_level"], json!("low"));
    }

    #[test]
    fn prose_around_a_fence_is_ignored() {
        let reply = format!("Based on the listing:\n```json\n{BODY}\n```\nHope this helps!");
        assert!(extract_json_object(&reply).is_some());
    }

    #[test]
    fn braces_inside_strings_do_not_end_the_object() {
        let reply = r#"Result: {"response": "Use {curly} braces \"}\" freely", "suggested_actions": []} trailing }"#;
        let object = extract_json_object(reply).unwrap();
        assert_eq!(object["response"], json!("Use {curly} braces \"}\" freely"));
    }

    #[test]
    fn nested_objects_survive() {
        let reply = r#"{"keywords": {"positive": ["clean"], "negative": []}, "positive_count": 1}"#;
        let object = extract_json_object(reply).unwrap();
        assert_eq!(object["keywords"]["positive"], json!(["clean"]));
    }

    #[test]
    fn empty_or_non_json_replies_yield_none() {
        assert!(extract_json_object("").is_none());
        assert!(extract_json_object("   \n ").is_none());
        assert!(extract_json_object("```json\n```").is_none());
        assert!(extract_json_object("I cannot help with that.").is_none());
        assert!(extract_json_object("[1, 2, 3]").is_none());
    }

    #[test]
    fn truncated_object_yields_none() {
        assert!(extract_json_object(r#"{"recommendations": [{"pg_id": "1", "#).is_none());
    }

    #[test]
    fn strip_code_fence_leaves_plain_text_alone() {
        assert_eq!(strip_code_fence("  A cosy room.  "), "A cosy room.");
        assert_eq!(strip_code_fence("```text\nA cosy room.\n```"), "A cosy room.");
    }
}
