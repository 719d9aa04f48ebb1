use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::{AsRefStr, Display, EnumString};

use crate::DisruptionContext;

/// Recommendation strength attached to an option
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum OptionStatus {
    /// Preferred course of action
    #[default]
    Recommended,
    /// Viable with notable trade-offs
    Caution,
    /// Last resort
    Warning,
    /// Filled in from the template catalog after model generation fell short
    Fallback,
    /// Produced by a model that did not state a recommendation strength
    Generated,
}

/// Where an option came from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum OptionSource {
    /// Returned by a language model
    #[default]
    Model,
    /// Taken from the deterministic template catalog
    Template,
}

/// A single recovery course of action
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecoveryOption {
    /// Stable catalog identifier (template options only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Short title
    pub title: String,
    /// One-line description
    #[serde(default)]
    pub description: String,
    /// Estimated cost as a currency string
    #[serde(default)]
    pub cost: String,
    /// Estimated time to execute
    #[serde(default)]
    pub timeline: String,
    /// Confidence between 0 and 100
    #[serde(default = "default_confidence")]
    pub confidence: u8,
    /// Passenger/operational impact summary
    #[serde(default = "default_impact")]
    pub impact: String,
    /// Recommendation strength
    #[serde(default)]
    pub status: OptionStatus,
    /// Rank within the result, starting at 1
    #[serde(default = "default_priority")]
    pub priority: u32,
    #[serde(default)]
    pub advantages: Vec<String>,
    #[serde(default)]
    pub considerations: Vec<String>,
    /// Operational areas touched, e.g. `crew`, `passenger`
    #[serde(default, alias = "impactArea")]
    pub impact_area: Vec<String>,
    #[serde(default, alias = "impactSummary")]
    pub impact_summary: String,
    #[serde(default, alias = "resourceRequirements")]
    pub resource_requirements: Vec<ResourceRequirement>,
    #[serde(default, alias = "costBreakdown", skip_serializing_if = "Option::is_none")]
    pub cost_breakdown: Option<CostBreakdown>,
    #[serde(default, alias = "timelineDetails")]
    pub timeline_details: Vec<TimelineDetail>,
    #[serde(default, alias = "riskAssessment")]
    pub risk_assessment: Vec<RiskAssessment>,
    /// Freeform technical sections keyed by name
    #[serde(default, alias = "technicalSpecs")]
    pub technical_specs: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<OptionMetrics>,
    #[serde(default, alias = "rotationPlan", skip_serializing_if = "Option::is_none")]
    pub rotation_plan: Option<RotationPlan>,
    /// Flight details the option was tailored to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disruption_context: Option<DisruptionContext>,
    /// Provenance marker
    #[serde(default)]
    pub source: OptionSource,
    /// Fields not modelled above, kept verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_confidence() -> u8 {
    80
}

fn default_impact() -> String {
    "Medium".to_owned()
}

#[allow(clippy::missing_const_for_fn)]
fn default_priority() -> u32 {
    1
}

/// Resource that must be mobilized for an option
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceRequirement {
    pub title: String,
    pub subtitle: String,
    pub availability: String,
    pub status: String,
    pub location: String,
    pub eta: String,
    pub details: String,
}

/// Itemized cost with a total line
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostBreakdown {
    pub breakdown: Vec<CostItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<CostTotal>,
}

/// Single cost line
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostItem {
    pub amount: String,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percentage: Option<f64>,
    pub description: String,
}

/// Total line of a cost breakdown
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostTotal {
    pub amount: String,
    pub title: String,
    pub description: String,
}

/// One phase of an option's execution timeline
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineDetail {
    pub step: String,
    pub status: String,
    pub details: String,
    #[serde(rename = "startTime", alias = "start_time")]
    pub start_time: String,
    #[serde(rename = "endTime", alias = "end_time")]
    pub end_time: String,
    pub duration: String,
}

/// Risk and its mitigation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskAssessment {
    pub risk: String,
    #[serde(alias = "riskImpact")]
    pub risk_impact: String,
    #[serde(alias = "mitigationImpact")]
    pub mitigation_impact: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    pub mitigation: String,
}

/// Scores used to compare options side by side
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OptionMetrics {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_efficiency: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_efficiency: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub passenger_satisfaction: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crew_violations: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aircraft_swaps: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_impact: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_cost: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub otp_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pax_accommodated: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regulatory_risk: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay_minutes: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence_score: Option<f64>,
    /// Unrecognized metric keys
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// -- Rotation plan --

/// Tail and crew reassignment plan for aircraft-swap style options
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RotationPlan {
    pub aircraft_options: Vec<AircraftOption>,
    pub crew_data: Vec<CrewAssignment>,
    pub next_sectors: Vec<NextSector>,
    pub operational_constraints: Map<String, Value>,
    pub cost_breakdown: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<RotationRecommendation>,
}

/// Candidate replacement aircraft
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AircraftOption {
    pub reg: String,
    #[serde(rename = "type")]
    pub aircraft_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub etops: Option<StatusValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cabin_match: Option<StatusValue>,
    pub availability: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned: Option<StatusValue>,
    pub turnaround: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maintenance: Option<StatusValue>,
    pub recommended: bool,
    /// Per-dimension scores for this tail
    #[serde(rename = "option_score", alias = "optionScore", skip_serializing_if = "Option::is_none")]
    pub option_score: Option<Map<String, Value>>,
}

/// Status label paired with a display value
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusValue {
    pub status: String,
    pub value: String,
}

/// Crew member considered for the plan
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrewAssignment {
    pub name: String,
    pub role: String,
    #[serde(rename = "type")]
    pub qualification: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue: Option<String>,
}

/// Downstream sector affected by the plan
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NextSector {
    pub flight: String,
    pub departure: String,
    pub impact: String,
    pub reason: String,
}

/// Aircraft the plan settles on
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RotationRecommendation {
    pub aircraft: String,
    pub reason: String,
}
