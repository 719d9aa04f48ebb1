//! Embedded recovery catalog, one JSON section per category

use std::collections::HashMap;

use aeron_core::{CategoryCode, Disruption, RecoveryOption, RecoveryStep};
use serde::Deserialize;
use serde_json::Value;
use strum::IntoEnumIterator;

use crate::CatalogError;
use crate::render::FlightVars;

/// Fewest options a section must hold
const MIN_OPTIONS: usize = 2;

const fn section_json(category: CategoryCode) -> &'static str {
    match category {
        CategoryCode::AircraftIssue => include_str!("../catalog/aircraft_issue.json"),
        CategoryCode::CrewIssue => include_str!("../catalog/crew_issue.json"),
        CategoryCode::AtcWeather => include_str!("../catalog/atc_weather.json"),
        CategoryCode::CurfewCongestion => include_str!("../catalog/curfew_congestion.json"),
        CategoryCode::RotationMaintenance => include_str!("../catalog/rotation_maintenance.json"),
    }
}

/// Unrendered options and steps for one category
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogSection {
    options: Vec<Value>,
    steps: Vec<Value>,
}

impl CatalogSection {
    /// Render placeholders against `disruption` and deserialize
    pub fn render(&self, disruption: &Disruption) -> Result<(Vec<RecoveryOption>, Vec<RecoveryStep>), serde_json::Error> {
        let vars = FlightVars::new(disruption);

        let options = self
            .options
            .iter()
            .map(|option| serde_json::from_value(vars.render(option)))
            .collect::<Result<_, _>>()?;
        let steps = self
            .steps
            .iter()
            .map(|step| serde_json::from_value(vars.render(step)))
            .collect::<Result<_, _>>()?;

        Ok((options, steps))
    }
}

/// Every category's section, parsed and checked once
#[derive(Debug, Clone)]
pub struct Catalog {
    sections: HashMap<CategoryCode, CatalogSection>,
}

impl Catalog {
    /// Parse the embedded sections
    ///
    /// Each section is test-rendered against an empty disruption so that a
    /// shape mismatch surfaces here rather than during generation.
    pub fn embedded() -> Result<Self, CatalogError> {
        let probe = Disruption::default();
        let mut sections = HashMap::new();

        for category in CategoryCode::iter() {
            let section: CatalogSection = serde_json::from_str(section_json(category))
                .map_err(|source| CatalogError::Invalid { category, source })?;

            let (options, steps) = section
                .render(&probe)
                .map_err(|source| CatalogError::Invalid { category, source })?;

            if options.len() < MIN_OPTIONS {
                return Err(CatalogError::Incomplete {
                    category,
                    reason: format!("{} options, at least {MIN_OPTIONS} required", options.len()),
                });
            }
            if steps.is_empty() {
                return Err(CatalogError::Incomplete {
                    category,
                    reason: "no steps".to_owned(),
                });
            }

            sections.insert(category, section);
        }

        Ok(Self { sections })
    }

    pub fn section(&self, category: CategoryCode) -> Option<&CatalogSection> {
        self.sections.get(&category)
    }
}
