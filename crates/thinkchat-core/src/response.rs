//! Decoded shapes of the `result` payload returned by `/api/reason`.

use serde_json::Value;

/// One step of a structured chain-of-thought answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReasoningStep {
    pub title: String,
    pub content: String,
}

/// The response kind, decided once when the payload is decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReasoningResult {
    /// `{"structured": false, "content": ...}`
    Unstructured { content: String },
    /// `{"reasoning_steps": [...], "final_answer": ...}`
    Steps {
        steps: Vec<ReasoningStep>,
        final_answer: Option<String>,
    },
    /// Bare `{"content": ...}` without a `structured` flag.
    Fallback { content: String },
    /// Anything else, including `{"error": ...}` payloads.
    Unknown,
}

impl ReasoningResult {
    /// Classify a decoded payload.
    ///
    /// The discriminators are tested in a fixed priority order: an explicit
    /// `structured: false`, then a `reasoning_steps` array, then a non-empty
    /// `content` string.
    pub fn from_value(value: &Value) -> Self {
        let Some(fields) = value.as_object() else {
            return ReasoningResult::Unknown;
        };

        if fields.get("structured") == Some(&Value::Bool(false)) {
            return ReasoningResult::Unstructured {
                content: string_field(value, "content").unwrap_or_default(),
            };
        }

        if let Some(Value::Array(raw_steps)) = fields.get("reasoning_steps") {
            let steps = raw_steps.iter().map(decode_step).collect();
            let final_answer = string_field(value, "final_answer").filter(|s| !s.is_empty());
            return ReasoningResult::Steps { steps, final_answer };
        }

        match string_field(value, "content") {
            Some(content) if !content.is_empty() => ReasoningResult::Fallback { content },
            _ => ReasoningResult::Unknown,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ReasoningResult::Unstructured { .. } => "unstructured",
            ReasoningResult::Steps { .. } => "steps",
            ReasoningResult::Fallback { .. } => "fallback",
            ReasoningResult::Unknown => "unknown",
        }
    }
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_string)
}

fn decode_step(raw: &Value) -> ReasoningStep {
    ReasoningStep {
        title: string_field(raw, "title").unwrap_or_default(),
        content: string_field(raw, "content").unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unstructured() {
        let result = ReasoningResult::from_value(&json!({"structured": false, "content": "hi"}));
        assert_eq!(result, ReasoningResult::Unstructured { content: "hi".to_string() });
    }

    #[test]
    fn test_structured_false_wins_over_steps() {
        let result = ReasoningResult::from_value(&json!({
            "structured": false,
            "content": "plain",
            "reasoning_steps": [{"title": "T", "content": "C"}]
        }));
        assert_eq!(result.kind(), "unstructured");
    }

    #[test]
    fn test_steps_with_final_answer() {
        let result = ReasoningResult::from_value(&json!({
            "reasoning_steps": [
                {"title": "T1", "content": "C1", "next_action": "continue"},
                {"title": "T2", "content": "C2", "next_action": "final_answer"}
            ],
            "final_answer": "F",
            "structured": true
        }));
        match result {
            ReasoningResult::Steps { steps, final_answer } => {
                assert_eq!(steps.len(), 2);
                assert_eq!(steps[0].title, "T1");
                assert_eq!(steps[1].content, "C2");
                assert_eq!(final_answer.as_deref(), Some("F"));
            }
            other => panic!("expected steps, got {:?}", other),
        }
    }

    #[test]
    fn test_steps_with_missing_fields() {
        let result = ReasoningResult::from_value(&json!({
            "reasoning_steps": [{"content": "only content"}, "not an object"],
            "final_answer": ""
        }));
        match result {
            ReasoningResult::Steps { steps, final_answer } => {
                assert_eq!(steps[0].title, "");
                assert_eq!(steps[0].content, "only content");
                assert_eq!(steps[1], ReasoningStep { title: String::new(), content: String::new() });
                assert!(final_answer.is_none());
            }
            other => panic!("expected steps, got {:?}", other),
        }
    }

    #[test]
    fn test_non_array_steps_fall_through_to_content() {
        let result = ReasoningResult::from_value(&json!({
            "reasoning_steps": "nope",
            "content": "fallback text"
        }));
        assert_eq!(result, ReasoningResult::Fallback { content: "fallback text".to_string() });
    }

    #[test]
    fn test_structured_true_with_content_is_fallback() {
        let result = ReasoningResult::from_value(&json!({"structured": true, "content": "x"}));
        assert_eq!(result.kind(), "fallback");
    }

    #[test]
    fn test_unknown_shapes() {
        assert_eq!(ReasoningResult::from_value(&json!({})), ReasoningResult::Unknown);
        assert_eq!(ReasoningResult::from_value(&json!({"content": ""})), ReasoningResult::Unknown);
        assert_eq!(
            ReasoningResult::from_value(&json!({"error": "Both failed"})),
            ReasoningResult::Unknown
        );
        assert_eq!(ReasoningResult::from_value(&Value::Null), ReasoningResult::Unknown);
        assert_eq!(ReasoningResult::from_value(&json!([1, 2])), ReasoningResult::Unknown);
    }
}
