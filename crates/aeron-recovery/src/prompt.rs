//! Prompt construction for batch and single-option generation

use aeron_core::{CategoryInfo, Disruption};
use indoc::formatdoc;

/// Disruption details substituted into every prompt, with defaults applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptVars {
    pub flight_number: String,
    pub route: String,
    pub aircraft: String,
    pub scheduled_departure: String,
    pub estimated_departure: String,
    pub delay_minutes: u32,
    pub passengers: u32,
    pub crew: u32,
    pub disruption_type: String,
    pub disruption_reason: String,
    pub severity: String,
    pub category_name: String,
}

impl PromptVars {
    pub fn new(disruption: &Disruption, category: &CategoryInfo) -> Self {
        let text = |value: &Option<String>, default: &str| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .unwrap_or(default)
                .to_owned()
        };

        let category_name = Some(category.category_name.as_str())
            .filter(|name| !name.trim().is_empty())
            .or(disruption.categorization.as_deref())
            .unwrap_or("General")
            .to_owned();

        Self {
            flight_number: disruption.flight_number().unwrap_or("Unknown").to_owned(),
            route: disruption.route_label(),
            aircraft: text(&disruption.aircraft, "Unknown"),
            scheduled_departure: text(&disruption.scheduled_departure, "Unknown"),
            estimated_departure: text(&disruption.estimated_departure, "Unknown"),
            delay_minutes: disruption.delay_minutes.unwrap_or_default(),
            passengers: disruption.passengers.unwrap_or_default(),
            crew: disruption.crew.unwrap_or_default(),
            disruption_type: text(&disruption.disruption_type, "Unknown"),
            disruption_reason: text(&disruption.disruption_reason, "Unknown"),
            severity: text(&disruption.severity, "Medium"),
            category_name,
        }
    }
}

/// Prompt asking for `count` options plus steps in one response
pub fn batch_prompt(vars: &PromptVars, count: usize) -> String {
    formatdoc! {r#"
        You are an expert flight operations recovery specialist. Given the following flight disruption details, generate comprehensive recovery options.

        Flight Disruption Information:
        - Flight Number: {flight_number}
        - Route: {route}
        - Aircraft: {aircraft}
        - Scheduled Departure: {scheduled_departure}
        - Estimated Departure: {estimated_departure}
        - Delay: {delay_minutes} minutes
        - Passengers: {passengers}
        - Crew: {crew}
        - Disruption Type: {disruption_type}
        - Disruption Reason: {disruption_reason}
        - Severity: {severity}
        - Category: {category_name}

        Please generate {count} recovery options in JSON format with the following structure for each option:
        {{
          "title": "Brief descriptive title",
          "description": "Detailed description of the recovery approach",
          "cost": "Estimated cost (e.g., 'AED 25,000')",
          "timeline": "Time to implement (e.g., '2-3 hours')",
          "confidence": number (1-100),
          "impact": "Low/Medium/High",
          "status": "recommended/caution/warning",
          "priority": number (1-{count}),
          "advantages": ["advantage 1", "advantage 2", "advantage 3"],
          "considerations": ["consideration 1", "consideration 2", "consideration 3"],
          "impact_area": ["crew", "passenger", "aircraft"],
          "impact_summary": "Brief summary of the recovery approach and its impact",
          "resource_requirements": [
            {{
              "title": "Resource Name",
              "subtitle": "Resource Description",
              "availability": "Status",
              "status": "Current State",
              "location": "Where it's located",
              "eta": "Time to availability",
              "details": "Additional details"
            }}
          ],
          "cost_breakdown": {{
            "breakdown": [
              {{
                "amount": "AED X,XXX",
                "category": "Category Name",
                "percentage": number,
                "description": "Description of cost component"
              }}
            ],
            "total": {{
              "amount": "AED X,XXX",
              "title": "Total Estimated Cost",
              "description": "Brief cost description"
            }}
          }},
          "timeline_details": [
            {{
              "step": "Step Name",
              "status": "completed/in-progress/pending",
              "details": "Step description",
              "startTime": "HH:MM",
              "endTime": "HH:MM",
              "duration": "X min"
            }}
          ],
          "risk_assessment": [
            {{
              "risk": "Risk description",
              "risk_impact": "Low/Medium/High",
              "mitigation_impact": "Low/Medium/High",
              "score": number (1-9),
              "mitigation": "Mitigation strategy"
            }}
          ],
          "technical_specs": {{
            "implementation": {{ "title": "Implementation", "details": "Implementation details" }},
            "systems_required": {{ "title": "Systems required", "details": ["System 1", "System 2"] }},
            "certifications": {{ "title": "Certifications", "details": ["Cert 1", "Cert 2"] }}
          }},
          "metrics": {{
            "costEfficiency": number (1-100),
            "timeEfficiency": number (1-100),
            "passengerSatisfaction": number (1-100),
            "crewViolations": number,
            "aircraftSwaps": number,
            "networkImpact": "None/Low/Medium/High"
          }}
        }}

        Also generate recovery steps in this format:
        {{
          "steps": [
            {{
              "step": number,
              "title": "Step title",
              "status": "completed/in-progress/pending",
              "timestamp": "ISO timestamp",
              "system": "System name",
              "details": "Step details"
            }}
          ]
        }}

        Return only valid JSON with both "options" and "steps" arrays.
        "#,
        flight_number = vars.flight_number,
        route = vars.route,
        aircraft = vars.aircraft,
        scheduled_departure = vars.scheduled_departure,
        estimated_departure = vars.estimated_departure,
        delay_minutes = vars.delay_minutes,
        passengers = vars.passengers,
        crew = vars.crew,
        disruption_type = vars.disruption_type,
        disruption_reason = vars.disruption_reason,
        severity = vars.severity,
        category_name = vars.category_name,
        count = count,
    }
}

/// Prompt asking for option number `option_number` of a plan
///
/// `previous_count` tells the model how many options already exist so it
/// can propose something different.
pub fn single_option_prompt(vars: &PromptVars, option_number: usize, previous_count: usize, timestamp: &str) -> String {
    formatdoc! {r#"
        You are an expert flight operations recovery specialist. Generate ONE comprehensive recovery option with associated implementation steps for the following disruption, following industry best practices and regulatory compliance.

        Flight Information:
        - Flight: {flight_number} ({route})
        - Aircraft: {aircraft}
        - Scheduled: {scheduled_departure}
        - Current Status: {estimated_departure}
        - Delay: {delay_minutes} minutes
        - Passengers: {passengers}
        - Crew: {crew}
        - Issue: {disruption_type} - {disruption_reason}
        - Severity: {severity}
        - Category: {category_name}

        Option Priority: {option_number} (Generate option #{option_number} of recovery plan)
        Previous Options Generated: {previous_count}

        Based on the disruption category, focus on this recovery strategy:
        - Aircraft Issues: Aircraft swap, delay for repair, cancellation with rebooking
        - Crew Issues: Standby crew assignment, crew positioning, delay for rest completion
        - Weather Issues: Delay for clearance, rerouting, cancellation
        - Curfew/Congestion: Aircraft swap for earlier slot, overnight delay, alternative routing
        - Rotation/Maintenance: Alternative aircraft assignment, schedule adjustments

        Generate exactly ONE recovery option with realistic costs, timelines, operational details, and implementation steps:

        {{
          "option": {{
            "title": "Specific recovery action title",
            "description": "Detailed operational description with specific actions and procedures",
            "cost": "AED X,XXX",
            "timeline": "X hours/minutes",
            "confidence": 85,
            "impact": "Low/Medium/High passenger/operational impact",
            "status": "recommended/caution/warning",
            "priority": {option_number},
            "advantages": ["Specific operational advantage", "Cost/time efficiency benefit", "Passenger satisfaction benefit"],
            "considerations": ["Specific operational constraint", "Resource requirement", "Potential risk factor"],
            "impact_area": ["crew", "passenger", "aircraft", "operations"],
            "impact_summary": "Comprehensive impact analysis for {flight_number}: Brief summary of how this recovery affects operations, passengers, crew, and network.",
            "metrics": {{
              "costEfficiency": 85,
              "timeEfficiency": 90,
              "passengerSatisfaction": 80,
              "crewViolations": 0,
              "aircraftSwaps": 1,
              "networkImpact": "Low/Medium/High"
            }}
          }},
          "steps": [
            {{
              "step": 1,
              "title": "System notification",
              "status": "completed/in-progress/pending",
              "timestamp": "{timestamp}",
              "system": "AMOS/AIMS/OCC/Recovery Engine",
              "details": "Detailed step description with specific actions taken or required for {flight_number}",
              "data": {{
                "flight_number": "{flight_number}",
                "disruption_type": "{disruption_type}",
                "priority": "High/Medium/Low",
                "resources_allocated": ["Resource 1", "Resource 2"],
                "estimated_resolution": "XX minutes"
              }}
            }}
          ]
        }}

        Important Guidelines:
        1. Use realistic costs based on operation type and complexity
        2. Provide specific, actionable timeline steps with realistic durations
        3. Include proper system names (AMOS, AIMS, OCC, Recovery Engine)
        4. Consider regulatory compliance (EU261, GCAA, crew duty time limits)
        5. Ensure confidence scores reflect actual feasibility
        6. Use appropriate status indicators (recommended/caution/warning)
        7. Include network impact considerations for downstream flights

        Return only valid JSON. No markdown formatting or extra text.
        "#,
        flight_number = vars.flight_number,
        route = vars.route,
        aircraft = vars.aircraft,
        scheduled_departure = vars.scheduled_departure,
        estimated_departure = vars.estimated_departure,
        delay_minutes = vars.delay_minutes,
        passengers = vars.passengers,
        crew = vars.crew,
        disruption_type = vars.disruption_type,
        disruption_reason = vars.disruption_reason,
        severity = vars.severity,
        category_name = vars.category_name,
        option_number = option_number,
        previous_count = previous_count,
        timestamp = timestamp,
    }
}

#[cfg(test)]
mod tests {
    use aeron_core::CategoryCode;

    use super::*;

    fn vars() -> PromptVars {
        let disruption = Disruption {
            flight_number: Some("FZ181".to_owned()),
            origin: Some("DXB".to_owned()),
            destination: Some("COK".to_owned()),
            passengers: Some(175),
            disruption_type: Some("Technical".to_owned()),
            ..Disruption::default()
        };
        PromptVars::new(&disruption, &CategoryCode::AircraftIssue.info())
    }

    #[test]
    fn missing_fields_take_defaults() {
        let vars = PromptVars::new(
            &Disruption::default(),
            &CategoryInfo {
                category_code: "X".to_owned(),
                category_name: String::new(),
            },
        );

        assert_eq!(vars.flight_number, "Unknown");
        assert_eq!(vars.route, "UNK → UNK");
        assert_eq!(vars.delay_minutes, 0);
        assert_eq!(vars.severity, "Medium");
        assert_eq!(vars.category_name, "General");
    }

    #[test]
    fn batch_prompt_carries_count_and_context() {
        let prompt = batch_prompt(&vars(), 2);

        assert!(prompt.starts_with("You are an expert flight operations recovery specialist."));
        assert!(prompt.contains("- Flight Number: FZ181"));
        assert!(prompt.contains("- Route: DXB → COK"));
        assert!(prompt.contains("Please generate 2 recovery options"));
        assert!(prompt.contains("- Category: Aircraft issue (e.g., AOG)"));
        assert!(prompt.trim_end().ends_with(r#"both "options" and "steps" arrays."#));
    }

    #[test]
    fn single_option_prompt_numbers_the_option() {
        let prompt = single_option_prompt(&vars(), 3, 2, "2025-09-10T10:00:00Z");

        assert!(prompt.contains("Option Priority: 3 (Generate option #3 of recovery plan)"));
        assert!(prompt.contains("Previous Options Generated: 2"));
        assert!(prompt.contains(r#""priority": 3,"#));
        assert!(prompt.contains(r#""timestamp": "2025-09-10T10:00:00Z""#));
        assert!(prompt.contains("- Flight: FZ181 (DXB → COK)"));
    }
}
