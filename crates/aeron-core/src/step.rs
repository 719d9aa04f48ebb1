use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{AsRefStr, Display, EnumString};

/// Progress of a recovery step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum StepStatus {
    #[default]
    Pending,
    #[serde(alias = "in_progress")]
    #[strum(serialize = "in-progress", serialize = "in_progress")]
    InProgress,
    Completed,
    Failed,
}

/// One entry of the recovery process log
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecoveryStep {
    /// Step number, unique within a result
    pub step: u32,
    pub title: String,
    #[serde(default)]
    pub status: StepStatus,
    /// When the step happened or was planned
    #[serde(default)]
    pub timestamp: String,
    /// Owning operational system, e.g. `AMOS`
    #[serde(default)]
    pub system: String,
    #[serde(default)]
    pub details: String,
    /// Structured payload specific to the step
    #[serde(default)]
    pub data: Value,
}
