//! Extraction of JSON payloads from model responses

use serde::Deserialize;
use serde_json::Value;

use crate::RecoveryError;

/// Strip markdown code fences and keep the text between the first `{` and
/// the last `}`
pub fn extract_json(text: &str) -> Result<&str, RecoveryError> {
    let text = text.trim();
    let text = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
        .unwrap_or(text);
    let text = text.strip_suffix("```").unwrap_or(text);

    match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if start < end => Ok(&text[start..=end]),
        _ => Err(RecoveryError::Transient("response contains no JSON object".to_owned())),
    }
}

fn parse_value(text: &str) -> Result<Value, RecoveryError> {
    serde_json::from_str(extract_json(text)?)
        .map_err(|e| RecoveryError::Transient(format!("response is not valid JSON: {e}")))
}

/// Raw options and steps from a batch response
#[derive(Debug, Deserialize)]
pub struct BatchPayload {
    pub options: Vec<Value>,
    pub steps: Vec<Value>,
}

/// Parse a batch response; both arrays must be present
pub fn parse_batch(text: &str) -> Result<BatchPayload, RecoveryError> {
    serde_json::from_value(parse_value(text)?)
        .map_err(|e| RecoveryError::Transient(format!("response lacks options and steps arrays: {e}")))
}

/// Raw option and steps from a single-option response
#[derive(Debug, PartialEq)]
pub struct SinglePayload {
    pub option: Value,
    pub steps: Vec<Value>,
}

#[derive(Deserialize)]
struct Wrapped {
    option: Value,
    #[serde(default)]
    steps: Vec<Value>,
}

/// Parse a single-option response
///
/// The `{option, steps}` envelope is tried first; otherwise an object with a
/// `title` is taken as a bare option with no steps.
pub fn parse_single(text: &str) -> Result<SinglePayload, RecoveryError> {
    let value = parse_value(text)?;

    if let Ok(Wrapped { option, steps }) = serde_json::from_value::<Wrapped>(value.clone())
        && option.is_object()
    {
        return Ok(SinglePayload { option, steps });
    }

    if value.get("title").is_some_and(Value::is_string) {
        return Ok(SinglePayload {
            option: value,
            steps: Vec::new(),
        });
    }

    Err(RecoveryError::Transient(
        "response is neither an option envelope nor an option".to_owned(),
    ))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn strips_fences_and_surrounding_prose() {
        let text = "```json\nHere you go: {\"options\": [], \"steps\": []} hope it helps\n```";
        assert_eq!(extract_json(text).unwrap(), r#"{"options": [], "steps": []}"#);
    }

    #[test]
    fn text_without_object_is_rejected() {
        assert!(extract_json("I cannot help with that").is_err());
        assert!(extract_json("} backwards {").is_err());
    }

    #[test]
    fn batch_requires_both_arrays() {
        let payload = parse_batch(r#"{"options": [{"title": "Swap"}], "steps": [{"step": 1}]}"#).unwrap();
        assert_eq!(payload.options.len(), 1);
        assert_eq!(payload.steps.len(), 1);

        assert!(parse_batch(r#"{"options": [{"title": "Swap"}]}"#).is_err());
        assert!(parse_batch(r#"{"options": "none", "steps": []}"#).is_err());
    }

    #[test]
    fn malformed_json_is_transient() {
        let err = parse_batch(r#"{"options": [}"#).unwrap_err();
        assert!(err.is_retryable());
    }

    #[test]
    fn single_accepts_envelope() {
        let payload = parse_single(r#"{"option": {"title": "Delay"}, "steps": [{"step": 2}]}"#).unwrap();
        assert_eq!(payload.option, json!({ "title": "Delay" }));
        assert_eq!(payload.steps, vec![json!({ "step": 2 })]);
    }

    #[test]
    fn single_falls_back_to_bare_option() {
        let payload = parse_single("```\n{\"title\": \"Cancel\", \"confidence\": 60}\n```").unwrap();
        assert_eq!(payload.option["title"], "Cancel");
        assert!(payload.steps.is_empty());
    }

    #[test]
    fn single_rejects_unrelated_objects() {
        assert!(parse_single(r#"{"answer": 42}"#).is_err());
        assert!(parse_single(r#"{"option": "none"}"#).is_err());
    }
}
