use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};

/// Known disruption categories
///
/// Every category maps to one section of the template catalog and to a
/// human-readable name used in prompts and logs.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr, IntoStaticStr, EnumIter,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum CategoryCode {
    /// Technical fault, AOG, bird strike, engine problem
    AircraftIssue,
    /// Sick report or duty time breach
    CrewIssue,
    /// ATC restriction or adverse weather
    AtcWeather,
    /// Airport curfew or ramp/runway congestion
    CurfewCongestion,
    /// Rotation misalignment or maintenance hold
    RotationMaintenance,
}

impl CategoryCode {
    /// Human-readable category name
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::AircraftIssue => "Aircraft issue (e.g., AOG)",
            Self::CrewIssue => "Crew issue (e.g., sick report, duty time breach)",
            Self::AtcWeather => "ATC/weather delay",
            Self::CurfewCongestion => "Airport curfew/ramp congestion",
            Self::RotationMaintenance => "Rotation misalignment or maintenance hold",
        }
    }

    /// Build the matching [`CategoryInfo`]
    pub fn info(self) -> CategoryInfo {
        CategoryInfo {
            category_code: self.to_string(),
            category_name: self.display_name().to_owned(),
        }
    }
}

/// Category attached to a generation request
///
/// The code travels as a plain string because callers may hand in codes
/// this build does not know about; those resolve to the generic template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryInfo {
    /// Category code such as `AIRCRAFT_ISSUE`
    #[serde(alias = "categoryCode")]
    pub category_code: String,
    /// Human-readable name
    #[serde(default, alias = "categoryName")]
    pub category_name: String,
}

impl CategoryInfo {
    /// Resolve the code to a known category, if any
    pub fn code(&self) -> Option<CategoryCode> {
        self.category_code.trim().parse().ok()
    }
}

impl From<CategoryCode> for CategoryInfo {
    fn from(code: CategoryCode) -> Self {
        code.info()
    }
}
