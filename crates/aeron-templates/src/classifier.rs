//! Keyword classification of free-text disruption descriptions

use aeron_core::{CategoryCode, CategoryInfo, Disruption};

/// Keyword groups checked in order; the first group with any hit wins
const KEYWORD_GROUPS: [(CategoryCode, &[&str]); 5] = [
    (
        CategoryCode::AircraftIssue,
        &["technical", "maintenance", "aog", "engine", "bird strike"],
    ),
    (CategoryCode::CrewIssue, &["crew", "duty time", "sick"]),
    (CategoryCode::AtcWeather, &["weather", "atc", "fog", "storm"]),
    (
        CategoryCode::CurfewCongestion,
        &["curfew", "congestion", "airport", "runway"],
    ),
    (
        CategoryCode::RotationMaintenance,
        &["rotation", "misalignment", "schedule"],
    ),
];

/// Category used when no keyword matches
pub const DEFAULT_CATEGORY: CategoryCode = CategoryCode::AircraftIssue;

/// Map a disruption type and reason to a category
///
/// Both strings are lowercased and searched together. Defined for every
/// input, including empty strings.
pub fn map_disruption_type_to_category(disruption_type: &str, reason: &str) -> CategoryCode {
    let haystack = format!("{disruption_type} {reason}").to_lowercase();

    KEYWORD_GROUPS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|keyword| haystack.contains(keyword)))
        .map_or(DEFAULT_CATEGORY, |(code, _)| *code)
}

/// Resolve a category label assigned upstream
///
/// Accepts either a code (`CREW_ISSUE`) or one of the display names.
pub fn category_from_label(label: &str) -> Option<CategoryCode> {
    let label = label.trim();
    if let Ok(code) = label.parse() {
        return Some(code);
    }

    <CategoryCode as strum::IntoEnumIterator>::iter().find(|code| code.display_name().eq_ignore_ascii_case(label))
}

/// Category for `disruption`, preferring an upstream categorization label
pub fn categorize(disruption: &Disruption) -> CategoryInfo {
    disruption
        .categorization
        .as_deref()
        .and_then(category_from_label)
        .unwrap_or_else(|| {
            map_disruption_type_to_category(
                disruption.disruption_type.as_deref().unwrap_or_default(),
                disruption.disruption_reason.as_deref().unwrap_or_default(),
            )
        })
        .info()
}
