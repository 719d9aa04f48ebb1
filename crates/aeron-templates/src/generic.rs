//! Recovery content synthesized from disruption fields alone
//!
//! Used for categories the catalog does not cover and to pad results that
//! need more options than a catalog section holds.

use aeron_core::{Disruption, OptionStatus, RecoveryOption, RecoveryStep, StepStatus, now_rfc3339};
use serde_json::json;

fn flight(disruption: &Disruption) -> &str {
    disruption.flight_number().unwrap_or("Unknown")
}

/// Three category-agnostic options
pub fn options(disruption: &Disruption) -> Vec<RecoveryOption> {
    let flight = flight(disruption);
    let passengers = disruption.passengers.unwrap_or_default();
    let delay = disruption.delay_minutes.unwrap_or_default();
    let aircraft = disruption.aircraft.as_deref().unwrap_or("Unknown");

    vec![
        RecoveryOption {
            id: Some("GENERIC_DELAY".to_owned()),
            title: "Delay for Resolution".to_owned(),
            description: format!("Hold {flight} until the disruption is resolved and operate as planned"),
            cost: "AED 15,000".to_owned(),
            timeline: format!("{} minutes", delay.max(60)),
            confidence: 75,
            impact: format!("{passengers} passengers delayed"),
            status: OptionStatus::Generated,
            advantages: vec![
                "Keeps the original aircraft and crew".to_owned(),
                "No rebooking required".to_owned(),
            ],
            considerations: vec![
                "Delay may grow if the cause persists".to_owned(),
                "Crew duty time must be monitored".to_owned(),
            ],
            impact_area: vec!["passenger".to_owned()],
            impact_summary: format!("Holding {flight} keeps the operation intact at the cost of a longer delay."),
            ..RecoveryOption::default()
        },
        RecoveryOption {
            id: Some("GENERIC_SUBSTITUTE".to_owned()),
            title: "Aircraft Substitution".to_owned(),
            description: format!("Replace {aircraft} with an available spare to operate {flight}"),
            cost: "AED 45,000".to_owned(),
            timeline: "90 minutes".to_owned(),
            confidence: 70,
            impact: format!("{passengers} passengers transferred to the replacement aircraft"),
            status: OptionStatus::Generated,
            advantages: vec!["Limits passenger delay".to_owned(), "Protects onward rotation".to_owned()],
            considerations: vec![
                "Depends on spare aircraft availability".to_owned(),
                "Gate and crew reassignment required".to_owned(),
            ],
            impact_area: vec!["aircraft".to_owned(), "crew".to_owned()],
            impact_summary: format!("Substituting the aircraft for {flight} trades swap cost for schedule integrity."),
            ..RecoveryOption::default()
        },
        RecoveryOption {
            id: Some("GENERIC_CANCEL".to_owned()),
            title: "Cancel and Rebook".to_owned(),
            description: format!("Cancel {flight} and rebook passengers on the next available services"),
            cost: "AED 120,000".to_owned(),
            timeline: "4-6 hours".to_owned(),
            confidence: 60,
            impact: format!("{passengers} passengers rebooked"),
            status: OptionStatus::Generated,
            advantages: vec!["Frees the aircraft and crew immediately".to_owned()],
            considerations: vec![
                "High passenger compensation".to_owned(),
                "Reputational impact".to_owned(),
            ],
            impact_area: vec!["passenger".to_owned(), "network".to_owned()],
            impact_summary: format!("Cancelling {flight} ends the disruption at the highest passenger cost."),
            ..RecoveryOption::default()
        },
    ]
}

/// Five-step process log for a generic result
pub fn steps(disruption: &Disruption) -> Vec<RecoveryStep> {
    let flight = flight(disruption);
    let timestamp = now_rfc3339();
    let disruption_type = disruption.disruption_type.as_deref().unwrap_or("Unknown");

    let step = |step, title: &str, status, system: &str, details: String, data| RecoveryStep {
        step,
        title: title.to_owned(),
        status,
        timestamp: timestamp.clone(),
        system: system.to_owned(),
        details,
        data,
    };

    vec![
        step(
            1,
            "Disruption Analysis",
            StepStatus::Completed,
            "AERON Recovery Engine",
            format!("Analyzed {disruption_type} disruption for flight {flight}"),
            json!({
                "disruptionType": disruption_type,
                "severity": disruption.severity,
                "delay": disruption.delay_minutes,
            }),
        ),
        step(
            2,
            "Resource Assessment",
            StepStatus::Completed,
            "Resource Management",
            "Checked available aircraft, crew and slots".to_owned(),
            json!({ "aircraft": disruption.aircraft, "passengers": disruption.passengers }),
        ),
        step(
            3,
            "Option Generation",
            StepStatus::Completed,
            "AERON Recovery Engine",
            "Generated recovery options from disruption details".to_owned(),
            json!({ "optionsGenerated": 3 }),
        ),
        step(
            4,
            "Option Evaluation",
            StepStatus::InProgress,
            "Operations Control",
            "Comparing cost, delay and passenger impact of each option".to_owned(),
            json!({}),
        ),
        step(
            5,
            "Recovery Implementation",
            StepStatus::Pending,
            "Operations Control",
            format!("Execute the selected recovery option for {flight}"),
            json!({ "monitoringFrequency": "15 minutes" }),
        ),
    ]
}

/// Shared four-step process log used while options are produced one at a time
pub fn process_skeleton(disruption: &Disruption) -> Vec<RecoveryStep> {
    let flight = flight(disruption);
    let timestamp = now_rfc3339();

    vec![
        RecoveryStep {
            step: 1,
            title: "Disruption Notification".to_owned(),
            status: StepStatus::Completed,
            timestamp: timestamp.clone(),
            system: "AMOS".to_owned(),
            details: format!("Disruption detected for flight {flight}. Recovery options analysis initiated."),
            data: json!({
                "flight_number": flight,
                "disruption_type": disruption.disruption_type.as_deref().unwrap_or("Unknown"),
            }),
        },
        RecoveryStep {
            step: 2,
            title: "Impact Assessment".to_owned(),
            status: StepStatus::Completed,
            timestamp: timestamp.clone(),
            system: "AERON Analytics".to_owned(),
            details: format!(
                "{} passengers and {} onward connections assessed",
                disruption.passengers.unwrap_or_default(),
                disruption.connection_flights.unwrap_or_default()
            ),
            data: json!({
                "passengers": disruption.passengers.unwrap_or_default(),
                "delay_minutes": disruption.delay_minutes.unwrap_or_default(),
            }),
        },
        RecoveryStep {
            step: 3,
            title: "Resource Assessment".to_owned(),
            status: StepStatus::InProgress,
            timestamp: timestamp.clone(),
            system: "Resource Management".to_owned(),
            details: "Evaluating available resources including crew, aircraft and ground services.".to_owned(),
            data: json!({ "aircraft": disruption.aircraft.as_deref().unwrap_or("Unknown") }),
        },
        RecoveryStep {
            step: 4,
            title: "Recovery Implementation".to_owned(),
            status: StepStatus::Pending,
            timestamp,
            system: "Operations Control".to_owned(),
            details: format!("Execute selected recovery option for {flight}."),
            data: json!({ "monitoring_frequency": "15 minutes" }),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generic_result_has_three_options_and_five_steps() {
        let disruption = Disruption {
            flight_number: Some("FZ999".to_owned()),
            passengers: Some(120),
            ..Disruption::default()
        };

        let options = options(&disruption);
        let steps = steps(&disruption);

        assert_eq!(options.len(), 3);
        assert_eq!(steps.len(), 5);
        assert!(options[0].description.contains("FZ999"));
        assert_eq!(options[2].impact, "120 passengers rebooked");
        assert_eq!(steps.iter().map(|s| s.step).collect::<Vec<_>>(), [1, 2, 3, 4, 5]);
    }

    #[test]
    fn skeleton_numbers_four_steps() {
        let steps = process_skeleton(&Disruption::default());
        assert_eq!(steps.len(), 4);
        assert_eq!(steps[0].title, "Disruption Notification");
        assert_eq!(steps[2].status, StepStatus::InProgress);
        assert_eq!(steps[3].status, StepStatus::Pending);
    }
}
