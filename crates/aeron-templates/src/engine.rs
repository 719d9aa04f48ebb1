use aeron_core::{
    CategoryInfo, Disruption, GeneratorKind, OptionSource, OptionStatus, PlanMetadata, RecoveryOption, RecoveryPlan,
    RecoveryStep, now_rfc3339,
};

use crate::catalog::Catalog;
use crate::{CatalogError, classifier, generic};

/// Deterministic recovery generation from the embedded catalog
///
/// Never calls out to a model. For any disruption with a flight number the
/// result holds at least two options and one step.
#[derive(Debug, Clone)]
pub struct TemplateRecoveryEngine {
    catalog: Catalog,
}

impl TemplateRecoveryEngine {
    /// Engine over the embedded catalog
    pub fn new() -> Result<Self, CatalogError> {
        Ok(Self {
            catalog: Catalog::embedded()?,
        })
    }

    /// Catalog result for `disruption`
    ///
    /// `category` is derived from the disruption when absent. Codes this
    /// build does not know produce the generic result. A disruption without
    /// a flight number produces an empty plan.
    pub fn generate(&self, disruption: &Disruption, category: Option<&CategoryInfo>) -> RecoveryPlan {
        self.generate_with_count(disruption, category, 0)
    }

    /// Like [`generate`](Self::generate), padded to at least `min_options`
    pub fn generate_with_count(
        &self,
        disruption: &Disruption,
        category: Option<&CategoryInfo>,
        min_options: usize,
    ) -> RecoveryPlan {
        if !disruption.is_well_formed() {
            tracing::warn!(disruption_id = ?disruption.id, "disruption has no flight number, returning empty plan");
            return RecoveryPlan::empty();
        }

        let disruption = disruption.normalized();
        let category = category.cloned().unwrap_or_else(|| classifier::categorize(&disruption));

        let (mut options, steps) = self.base(&disruption, &category);
        extend_to(&mut options, &disruption, min_options);

        let critical = is_critical(&disruption);
        for (index, option) in options.iter_mut().enumerate() {
            finish_option(option, &disruption, index);
            if critical && index == 0 {
                option.status = OptionStatus::Recommended;
            }
        }

        tracing::debug!(
            flight_number = disruption.flight_number(),
            category = %category.category_code,
            options = options.len(),
            "generated template recovery plan"
        );

        let fallback_options = options.len();
        RecoveryPlan {
            options,
            steps,
            metadata: Some(PlanMetadata {
                category_code: category.category_code.clone(),
                disruption_id: disruption.id.clone(),
                flight_number: disruption.flight_number().map(str::to_owned),
                generation_time: now_rfc3339(),
                generator: GeneratorKind::Template,
                provider: None,
                model_options: 0,
                fallback_options,
            }),
        }
    }

    /// `needed` template options to top up a short model result
    ///
    /// Options are marked `fallback` and numbered from `first_priority`.
    pub fn fill(
        &self,
        disruption: &Disruption,
        category: &CategoryInfo,
        needed: usize,
        first_priority: u32,
    ) -> Vec<RecoveryOption> {
        if needed == 0 {
            return Vec::new();
        }

        let disruption = disruption.normalized();
        let (mut options, _) = self.base(&disruption, category);
        extend_to(&mut options, &disruption, needed);
        options.truncate(needed);

        let offset = usize::try_from(first_priority.saturating_sub(1)).unwrap_or_default();
        for (index, option) in options.iter_mut().enumerate() {
            finish_option(option, &disruption, offset + index);
            option.status = OptionStatus::Fallback;
        }
        options
    }

    /// Four-step process log shared by incremental generation
    pub fn process_skeleton(&self, disruption: &Disruption) -> Vec<RecoveryStep> {
        generic::process_skeleton(&disruption.normalized())
    }

    /// Catalog options and steps, or the generic result
    fn base(&self, disruption: &Disruption, category: &CategoryInfo) -> (Vec<RecoveryOption>, Vec<RecoveryStep>) {
        let Some(section) = category.code().and_then(|code| self.catalog.section(code)) else {
            tracing::debug!(category = %category.category_code, "no catalog section, using generic recovery");
            return (generic::options(disruption), generic::steps(disruption));
        };

        section.render(disruption).unwrap_or_else(|e| {
            tracing::error!(category = %category.category_code, error = %e, "catalog section failed to render");
            (generic::options(disruption), generic::steps(disruption))
        })
    }
}

fn is_critical(disruption: &Disruption) -> bool {
    disruption
        .severity
        .as_deref()
        .is_some_and(|s| s.trim().eq_ignore_ascii_case("critical"))
}

fn finish_option(option: &mut RecoveryOption, disruption: &Disruption, index: usize) {
    option.priority = u32::try_from(index + 1).unwrap_or(u32::MAX);
    option.source = OptionSource::Template;
    option.disruption_context = Some(disruption.context());
}

/// Grow `options` to `count`, first with generic options whose titles are not
/// already present, then with numbered variants of what is there
fn extend_to(options: &mut Vec<RecoveryOption>, disruption: &Disruption, count: usize) {
    for candidate in generic::options(disruption) {
        if options.len() >= count {
            return;
        }
        if options.iter().all(|o| o.title != candidate.title) {
            options.push(candidate);
        }
    }

    let base_len = options.len();
    if base_len == 0 {
        return;
    }
    let mut variant = 0;
    while options.len() < count {
        let source = &options[variant % base_len];
        let mut option = source.clone();
        option.title = format!("{} (variant {})", source.title, variant / base_len + 2);
        option.id = source.id.as_ref().map(|id| format!("{id}_V{}", variant / base_len + 2));
        options.push(option);
        variant += 1;
    }
}

#[cfg(test)]
mod tests {
    use aeron_core::CategoryCode;

    use super::*;

    fn engine() -> TemplateRecoveryEngine {
        TemplateRecoveryEngine::new().unwrap()
    }

    fn fz181() -> Disruption {
        Disruption {
            id: Some("1".to_owned()),
            flight_number: Some("FZ181".to_owned()),
            route: Some("DXB → COK".to_owned()),
            aircraft: Some("A6-FDB".to_owned()),
            passengers: Some(175),
            delay_minutes: Some(120),
            disruption_type: Some("Technical".to_owned()),
            disruption_reason: Some("Engine overheat warning - AOG".to_owned()),
            severity: Some("High".to_owned()),
            ..Disruption::default()
        }
    }

    #[test]
    fn aircraft_issue_yields_ranked_template_options() {
        let plan = engine().generate(&fz181(), None);

        assert_eq!(plan.options.len(), 3);
        assert_eq!(plan.options.iter().map(|o| o.priority).collect::<Vec<_>>(), [1, 2, 3]);
        assert!(plan.options.iter().all(|o| o.source == OptionSource::Template));
        assert!(!plan.steps.is_empty());

        let metadata = plan.metadata.unwrap();
        assert_eq!(metadata.category_code, CategoryCode::AircraftIssue.to_string());
        assert_eq!(metadata.generator, GeneratorKind::Template);
        assert_eq!(metadata.fallback_options, 3);

        let context = plan.options[0].disruption_context.as_ref().unwrap();
        assert_eq!(context.flight_number, "FZ181");
        assert_eq!(context.passengers, 175);
    }

    #[test]
    fn crew_issue_options_touch_crew() {
        let disruption = Disruption {
            flight_number: Some("FZ210".to_owned()),
            disruption_type: Some("Crew".to_owned()),
            disruption_reason: Some("Crew duty time breach".to_owned()),
            ..Disruption::default()
        };

        let plan = engine().generate(&disruption, None);

        assert!(plan.options.len() >= 2);
        assert!(plan.options.iter().all(|o| o.impact_area.iter().any(|a| a == "crew")));
        assert_eq!(plan.metadata.unwrap().category_code, "CREW_ISSUE");
    }

    #[test]
    fn generation_is_deterministic() {
        let engine = engine();
        let a = engine.generate(&fz181(), None);
        let b = engine.generate(&fz181(), None);

        assert_eq!(a.options, b.options);
        assert_eq!(a.steps, b.steps);
    }

    #[test]
    fn missing_flight_number_yields_empty_plan() {
        let disruption = Disruption {
            disruption_type: Some("Technical".to_owned()),
            ..Disruption::default()
        };
        let plan = engine().generate(&disruption, None);
        assert!(plan.is_empty());
        assert!(plan.metadata.is_none());
    }

    #[test]
    fn unknown_category_uses_generic_result() {
        let category = CategoryInfo {
            category_code: "VOLCANIC_ASH".to_owned(),
            category_name: "Volcanic ash".to_owned(),
        };

        let plan = engine().generate(&fz181(), Some(&category));

        assert_eq!(plan.options.len(), 3);
        assert_eq!(plan.steps.len(), 5);
        assert_eq!(plan.options[0].id.as_deref(), Some("GENERIC_DELAY"));
        assert_eq!(plan.metadata.unwrap().category_code, "VOLCANIC_ASH");
    }

    #[test]
    fn critical_severity_recommends_the_first_option() {
        let engine = engine();
        let disruption = Disruption {
            flight_number: Some("FZ330".to_owned()),
            disruption_type: Some("Weather".to_owned()),
            severity: Some("Critical".to_owned()),
            ..Disruption::default()
        };

        let plan = engine.generate(&disruption, None);
        assert_eq!(plan.options[0].status, OptionStatus::Recommended);
    }

    #[test]
    fn padded_generation_reaches_requested_count() {
        let plan = engine().generate_with_count(&fz181(), None, 8);

        assert_eq!(plan.options.len(), 8);
        assert_eq!(plan.options.iter().map(|o| o.priority).collect::<Vec<_>>(), (1..=8).collect::<Vec<_>>());

        let mut titles: Vec<_> = plan.options.iter().map(|o| o.title.as_str()).collect();
        titles.sort_unstable();
        titles.dedup();
        assert_eq!(titles.len(), 8);
    }

    #[test]
    fn fill_continues_priorities_as_fallback() {
        let options = engine().fill(&fz181(), &CategoryCode::AircraftIssue.info(), 3, 3);

        assert_eq!(options.len(), 3);
        assert_eq!(options.iter().map(|o| o.priority).collect::<Vec<_>>(), [3, 4, 5]);
        assert!(options.iter().all(|o| o.status == OptionStatus::Fallback));
        assert!(options.iter().all(|o| o.source == OptionSource::Template));
    }

    #[test]
    fn fill_of_zero_is_empty() {
        assert!(engine().fill(&fz181(), &CategoryCode::CrewIssue.info(), 0, 1).is_empty());
    }
}
