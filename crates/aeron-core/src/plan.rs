use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};

use crate::{OptionSource, RecoveryOption, RecoveryStep};

/// Strategy that produced a plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, AsRefStr)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum GeneratorKind {
    /// One model call for all options
    LlmBatch,
    /// One model call per option
    LlmIncremental,
    /// Deterministic template catalog only
    Template,
}

/// Provenance attached to a generated plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanMetadata {
    pub category_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disruption_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flight_number: Option<String>,
    /// RFC 3339 generation time
    pub generation_time: String,
    pub generator: GeneratorKind,
    /// Provider used for model calls, when any were attempted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    /// Options returned by the model
    pub model_options: usize,
    /// Options filled from the template catalog
    pub fallback_options: usize,
}

/// Recovery options and process steps for one disruption
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecoveryPlan {
    pub options: Vec<RecoveryOption>,
    pub steps: Vec<RecoveryStep>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<PlanMetadata>,
}

impl RecoveryPlan {
    /// Plan with no options or steps
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty() && self.steps.is_empty()
    }

    /// Count options by provenance as `(model, template)`
    pub fn provenance_counts(&self) -> (usize, usize) {
        self.options.iter().fold((0, 0), |(model, template), option| match option.source {
            OptionSource::Model => (model + 1, template),
            OptionSource::Template => (model, template + 1),
        })
    }
}
