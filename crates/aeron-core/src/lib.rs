//! Shared domain types for AERON recovery generation
//!
//! Disruption records come in from upstream operations systems; recovery
//! options and steps flow back out. Every crate in the workspace speaks
//! these types so that the model-backed path and the template catalog
//! produce interchangeable results.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod category;
mod context;
mod disruption;
mod option;
mod plan;
mod step;

pub use category::{CategoryCode, CategoryInfo};
pub use context::GenerationContext;
pub use disruption::{Disruption, DisruptionContext};
pub use option::{
    AircraftOption, CostBreakdown, CostItem, CostTotal, CrewAssignment, NextSector, OptionMetrics, OptionSource,
    OptionStatus, RecoveryOption, ResourceRequirement, RiskAssessment, RotationPlan, RotationRecommendation,
    StatusValue, TimelineDetail,
};
pub use plan::{GeneratorKind, PlanMetadata, RecoveryPlan};
pub use step::{RecoveryStep, StepStatus};

/// Current wall-clock time as an RFC 3339 string
pub fn now_rfc3339() -> String {
    jiff::Timestamp::now().to_string()
}
