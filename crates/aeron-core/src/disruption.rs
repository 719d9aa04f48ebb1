use serde::{Deserialize, Deserializer, Serialize};

/// Placeholder used when an airport code is missing from a route
const UNKNOWN_AIRPORT: &str = "UNK";

/// A disrupted flight as reported by the upstream operations system
///
/// Field names follow the upstream snake_case layout; the camelCase variants
/// emitted by older producers are accepted as aliases.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Disruption {
    /// Upstream record identifier (numeric or string)
    #[serde(default, deserialize_with = "string_or_number", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Flight identifier, e.g. `FZ181`
    #[serde(default, alias = "flightNumber")]
    pub flight_number: Option<String>,
    /// Route label, e.g. `DXB → COK`
    #[serde(default)]
    pub route: Option<String>,
    /// Origin airport code
    #[serde(default)]
    pub origin: Option<String>,
    /// Destination airport code
    #[serde(default)]
    pub destination: Option<String>,
    /// Aircraft registration or type
    #[serde(default)]
    pub aircraft: Option<String>,
    /// Scheduled departure time
    #[serde(default, alias = "scheduledDeparture")]
    pub scheduled_departure: Option<String>,
    /// Estimated departure time
    #[serde(default, alias = "estimatedDeparture")]
    pub estimated_departure: Option<String>,
    /// Current delay in minutes
    #[serde(default, alias = "delayMinutes", alias = "delay")]
    pub delay_minutes: Option<u32>,
    /// Passengers on board
    #[serde(default)]
    pub passengers: Option<u32>,
    /// Crew members assigned
    #[serde(default)]
    pub crew: Option<u32>,
    /// Disruption type, e.g. `Technical`
    #[serde(default, alias = "disruptionType", alias = "type")]
    pub disruption_type: Option<String>,
    /// Free-text reason from the reporting system
    #[serde(default, alias = "disruptionReason", alias = "reason")]
    pub disruption_reason: Option<String>,
    /// Severity label (`Low`, `Medium`, `High`, `Critical`)
    #[serde(default)]
    pub severity: Option<String>,
    /// Upstream categorization label, if already assigned
    #[serde(default)]
    pub categorization: Option<String>,
    /// Number of onward connections affected
    #[serde(default, alias = "connectionFlights")]
    pub connection_flights: Option<u32>,
}

impl Disruption {
    /// The trimmed flight identifier, if present and non-empty
    pub fn flight_number(&self) -> Option<&str> {
        self.flight_number.as_deref().map(str::trim).filter(|f| !f.is_empty())
    }

    /// Whether the record carries enough identity to generate recovery for
    pub fn is_well_formed(&self) -> bool {
        self.flight_number().is_some()
    }

    /// Route label, derived from origin/destination when not supplied
    pub fn route_label(&self) -> String {
        if let Some(route) = self.route.as_deref().map(str::trim).filter(|r| !r.is_empty()) {
            return route.to_owned();
        }
        let origin = self.origin.as_deref().filter(|o| !o.is_empty()).unwrap_or(UNKNOWN_AIRPORT);
        let destination = self
            .destination
            .as_deref()
            .filter(|d| !d.is_empty())
            .unwrap_or(UNKNOWN_AIRPORT);
        format!("{origin} → {destination}")
    }

    /// Copy with safe defaults filled in
    ///
    /// Missing aircraft becomes `Unknown`, missing severity becomes `Medium`
    /// and the route label is always populated.
    #[must_use]
    pub fn normalized(&self) -> Self {
        let mut normalized = self.clone();
        normalized.flight_number = self.flight_number().map(str::to_owned);
        normalized.route = Some(self.route_label());
        if normalized.aircraft.as_deref().is_none_or(|a| a.trim().is_empty()) {
            normalized.aircraft = Some("Unknown".to_owned());
        }
        if normalized.severity.as_deref().is_none_or(|s| s.trim().is_empty()) {
            normalized.severity = Some("Medium".to_owned());
        }
        normalized
    }

    /// Summary attached to template options
    pub fn context(&self) -> DisruptionContext {
        DisruptionContext {
            flight_number: self.flight_number().unwrap_or("Unknown").to_owned(),
            aircraft: self.aircraft.clone().unwrap_or_else(|| "Unknown".to_owned()),
            route: self.route_label(),
            passengers: self.passengers.unwrap_or_default(),
            delay_minutes: self.delay_minutes.unwrap_or_default(),
        }
    }
}

/// Flight details echoed on template options so downstream consumers can
/// tell which disruption an option was built for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisruptionContext {
    /// Flight identifier
    pub flight_number: String,
    /// Aircraft registration or type
    pub aircraft: String,
    /// Route label
    pub route: String,
    /// Passengers on board
    pub passengers: u32,
    /// Delay in minutes
    pub delay_minutes: u32,
}

/// Accept either a JSON string or number for identifier fields
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Text(text) => text,
        Raw::Number(number) => number.to_string(),
    }))
}
