//! `{{ flight.<field> }}` placeholder substitution over catalog JSON

use std::sync::LazyLock;

use aeron_core::Disruption;
use regex::{Captures, Regex};
use serde_json::Value;

/// `{{ flight.field }}` with an optional `| default(...)` filter; the default
/// may be quoted or a bare token
static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\{\{\s*flight\.([a-z_]+)\s*(?:\|\s*default\(\s*(?:"([^"]*)"|([^)\s]*))\s*\)\s*)?\}\}"#)
        .expect("must be valid regex")
});

/// Flight fields available to catalog placeholders
pub struct FlightVars<'a> {
    disruption: &'a Disruption,
}

impl<'a> FlightVars<'a> {
    pub const fn new(disruption: &'a Disruption) -> Self {
        Self { disruption }
    }

    fn lookup(&self, field: &str) -> Option<Value> {
        let d = self.disruption;
        let text = |v: &Option<String>| {
            v.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| Value::String(s.to_owned()))
        };
        let number = |v: Option<u32>| v.map(Value::from);

        match field {
            "id" => text(&d.id),
            "flight_number" => text(&d.flight_number),
            "route" => Some(Value::String(d.route_label())),
            "origin" => text(&d.origin),
            "destination" => text(&d.destination),
            "aircraft" => text(&d.aircraft),
            "scheduled_departure" => text(&d.scheduled_departure),
            "estimated_departure" => text(&d.estimated_departure),
            "disruption_type" => text(&d.disruption_type),
            "disruption_reason" => text(&d.disruption_reason),
            "severity" => text(&d.severity),
            "delay_minutes" => number(d.delay_minutes),
            "passengers" => number(d.passengers),
            "crew" => number(d.crew),
            "connection_flights" => number(d.connection_flights),
            _ => None,
        }
    }

    /// Value for one placeholder, with the default applied
    ///
    /// Numeric defaults stay numeric so whole-string placeholders keep their type.
    fn resolve(&self, captures: &Captures<'_>) -> Value {
        if let Some(value) = self.lookup(&captures[1]) {
            return value;
        }
        if let Some(quoted) = captures.get(2) {
            return Value::String(quoted.as_str().to_owned());
        }
        match captures.get(3).map(|m| m.as_str()).filter(|s| !s.is_empty()) {
            Some(bare) => bare
                .parse::<u64>()
                .map_or_else(|_| Value::String(bare.to_owned()), Value::from),
            None => Value::String("Unknown".to_owned()),
        }
    }

    fn render_str(&self, input: &str) -> Value {
        let Some(captures) = PLACEHOLDER.captures(input) else {
            return Value::String(input.to_owned());
        };
        if captures.get(0).is_some_and(|m| m.start() == 0 && m.end() == input.len()) {
            return self.resolve(&captures);
        }

        let rendered = PLACEHOLDER.replace_all(input, |captures: &Captures<'_>| match self.resolve(captures) {
            Value::String(s) => s,
            other => other.to_string(),
        });
        Value::String(rendered.into_owned())
    }

    /// Render every placeholder inside `value`, recursively
    pub fn render(&self, value: &Value) -> Value {
        match value {
            Value::String(s) => self.render_str(s),
            Value::Array(items) => Value::Array(items.iter().map(|item| self.render(item)).collect()),
            Value::Object(map) => Value::Object(map.iter().map(|(k, v)| (k.clone(), self.render(v))).collect()),
            other => other.clone(),
        }
    }
}
