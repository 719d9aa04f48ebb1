//! Defaults and range checks applied to model output before it is typed

use aeron_core::{
    CostBreakdown, OptionMetrics, OptionSource, OptionStatus, RecoveryOption, RecoveryStep, ResourceRequirement,
    RiskAssessment, RotationPlan, StepStatus, TimelineDetail, now_rfc3339,
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::RecoveryError;

const DEFAULT_CONFIDENCE: u8 = 80;

/// Turn one raw model option into a [`RecoveryOption`]
///
/// `position` is the 1-based slot the option will occupy and supplies the
/// default priority and title. A missing status, or one outside the known
/// set, becomes `recommended`. Rich sections that do
/// not match their expected shape are dropped rather than failing the option.
pub fn normalize_option(raw: Value, position: usize) -> Result<RecoveryOption, RecoveryError> {
    let Value::Object(mut map) = raw else {
        return Err(RecoveryError::Transient("option is not a JSON object".to_owned()));
    };

    set_text_default(&mut map, "title", || format!("Recovery Option {position}"));
    set_text_default(&mut map, "description", || "Generated recovery option".to_owned());
    set_text_default(&mut map, "cost", || "TBD".to_owned());
    set_text_default(&mut map, "timeline", || "TBD".to_owned());
    set_text_default(&mut map, "impact", || "Medium".to_owned());

    let confidence = map
        .get("confidence")
        .and_then(as_number)
        .map_or(DEFAULT_CONFIDENCE, clamp_confidence);
    map.insert("confidence".to_owned(), Value::from(confidence));

    let status = map
        .get("status")
        .and_then(Value::as_str)
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(OptionStatus::Recommended);
    map.insert("status".to_owned(), Value::from(status.as_ref()));

    let priority = map
        .get("priority")
        .and_then(as_number)
        .filter(|p| *p >= 1.0)
        .map_or_else(|| position_u32(position), saturating_u32);
    map.insert("priority".to_owned(), Value::from(priority));
    map.remove("source");
    map.remove("id");

    keep_if_valid::<Vec<String>>(&mut map, &["advantages"]);
    keep_if_valid::<Vec<String>>(&mut map, &["considerations"]);
    keep_if_valid::<Vec<String>>(&mut map, &["impact_area", "impactArea"]);
    keep_if_valid::<String>(&mut map, &["impact_summary", "impactSummary"]);
    keep_if_valid::<Vec<ResourceRequirement>>(&mut map, &["resource_requirements", "resourceRequirements"]);
    keep_if_valid::<CostBreakdown>(&mut map, &["cost_breakdown", "costBreakdown"]);
    keep_if_valid::<Vec<TimelineDetail>>(&mut map, &["timeline_details", "timelineDetails"]);
    keep_if_valid::<Vec<RiskAssessment>>(&mut map, &["risk_assessment", "riskAssessment"]);
    keep_if_valid::<Map<String, Value>>(&mut map, &["technical_specs", "technicalSpecs"]);
    keep_if_valid::<OptionMetrics>(&mut map, &["metrics"]);
    keep_if_valid::<RotationPlan>(&mut map, &["rotation_plan", "rotationPlan"]);
    map.remove("disruption_context");

    let mut option: RecoveryOption = serde_json::from_value(Value::Object(map))
        .map_err(|e| RecoveryError::Transient(format!("option does not match the expected shape: {e}")))?;
    option.source = OptionSource::Model;
    Ok(option)
}

/// Turn one raw model step into a [`RecoveryStep`]
///
/// Returns `None` for entries that are not JSON objects.
pub fn normalize_step(raw: Value, position: usize) -> Option<RecoveryStep> {
    let Value::Object(map) = raw else {
        tracing::debug!(position, "dropping step that is not an object");
        return None;
    };

    let text = |key: &str| {
        map.get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
    };

    let step = map
        .get("step")
        .and_then(as_number)
        .filter(|n| *n >= 1.0)
        .map_or_else(|| position_u32(position), saturating_u32);

    let status = text("status")
        .and_then(|s| s.parse().ok())
        .unwrap_or(StepStatus::Pending);

    Some(RecoveryStep {
        step,
        title: text("title").unwrap_or_else(|| format!("Step {position}")),
        status,
        timestamp: text("timestamp").unwrap_or_else(now_rfc3339),
        system: text("system").unwrap_or_else(|| "LLM Generator".to_owned()),
        details: text("details").unwrap_or_else(|| "Recovery step details".to_owned()),
        data: map.get("data").cloned().unwrap_or(Value::Null),
    })
}

/// Normalize a list of raw steps, numbering from 1
pub fn normalize_steps(raw: Vec<Value>) -> Vec<RecoveryStep> {
    raw.into_iter()
        .enumerate()
        .filter_map(|(index, step)| normalize_step(step, index + 1))
        .collect()
}

fn position_u32(position: usize) -> u32 {
    u32::try_from(position.max(1)).unwrap_or(u32::MAX)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn clamp_confidence(value: f64) -> u8 {
    value.clamp(0.0, 100.0).round() as u8
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn saturating_u32(value: f64) -> u32 {
    value.clamp(0.0, f64::from(u32::MAX)) as u32
}

/// Numbers, and strings holding numbers such as `"85"` or `"85%"`
fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse().ok(),
        _ => None,
    }
}

fn set_text_default(map: &mut Map<String, Value>, key: &str, default: impl FnOnce() -> String) {
    let present = map
        .get(key)
        .and_then(Value::as_str)
        .is_some_and(|s| !s.trim().is_empty());
    if !present {
        map.insert(key.to_owned(), Value::String(default()));
    }
}

/// Drop `keys` from `map` when their value does not deserialize as `T`
fn keep_if_valid<T: DeserializeOwned>(map: &mut Map<String, Value>, keys: &[&str]) {
    for key in keys {
        let Some(value) = map.get(*key) else { continue };
        if value.is_null() || serde_json::from_value::<T>(value.clone()).is_err() {
            tracing::debug!(section = *key, "dropping malformed option section");
            map.remove(*key);
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn fills_missing_fields() {
        let option = normalize_option(json!({}), 2).unwrap();

        assert_eq!(option.title, "Recovery Option 2");
        assert_eq!(option.description, "Generated recovery option");
        assert_eq!(option.cost, "TBD");
        assert_eq!(option.confidence, 80);
        assert_eq!(option.impact, "Medium");
        assert_eq!(option.priority, 2);
        assert_eq!(option.status, OptionStatus::Recommended);
        assert_eq!(option.source, OptionSource::Model);
    }

    #[test]
    fn clamps_confidence_and_reads_numeric_strings() {
        assert_eq!(normalize_option(json!({ "confidence": 140 }), 1).unwrap().confidence, 100);
        assert_eq!(normalize_option(json!({ "confidence": -5 }), 1).unwrap().confidence, 0);
        assert_eq!(normalize_option(json!({ "confidence": "85%" }), 1).unwrap().confidence, 85);
        assert_eq!(normalize_option(json!({ "confidence": 72.6 }), 1).unwrap().confidence, 73);
    }

    #[test]
    fn unknown_status_becomes_recommended() {
        let caution = normalize_option(json!({ "status": "Caution" }), 1).unwrap();
        assert_eq!(caution.status, OptionStatus::Caution);

        let odd = normalize_option(json!({ "status": "alternative" }), 1).unwrap();
        assert_eq!(odd.status, OptionStatus::Recommended);
    }

    #[test]
    fn invalid_priority_falls_back_to_position() {
        let option = normalize_option(json!({ "priority": 0, "title": "Swap" }), 3).unwrap();
        assert_eq!(option.priority, 3);

        let ranked = normalize_option(json!({ "priority": 2, "title": "Delay" }), 1).unwrap();
        assert_eq!(ranked.priority, 2);
    }

    #[test]
    fn malformed_sections_are_dropped() {
        let option = normalize_option(
            json!({
                "title": "Swap",
                "resourceRequirements": { "aircraft": "A6-FED" },
                "advantages": "fast",
                "metrics": { "costEfficiency": 85 },
            }),
            1,
        )
        .unwrap();

        assert!(option.resource_requirements.is_empty());
        assert!(option.advantages.is_empty());
        assert_eq!(option.metrics.unwrap().cost_efficiency, Some(85.0));
    }

    #[test]
    fn non_object_option_is_rejected() {
        assert!(normalize_option(json!("Swap aircraft"), 1).is_err());
    }

    #[test]
    fn steps_take_defaults() {
        let steps = normalize_steps(vec![
            json!({ "title": "Notify AMOS", "status": "in_progress" }),
            json!("junk"),
            json!({ "step": 7, "status": "unheard-of" }),
        ]);

        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].step, 1);
        assert_eq!(steps[0].status, StepStatus::InProgress);
        assert_eq!(steps[0].system, "LLM Generator");
        assert!(!steps[0].timestamp.is_empty());

        assert_eq!(steps[1].step, 7);
        assert_eq!(steps[1].status, StepStatus::Pending);
        assert_eq!(steps[1].title, "Step 3");
        assert_eq!(steps[1].details, "Recovery step details");
    }
}
