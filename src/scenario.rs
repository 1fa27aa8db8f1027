//! Scenarios and the payloads that select them

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ApiError;

/// Fixed operational scenarios
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scenario {
    /// Hold the current temperature
    Keep,
    /// Heat up, tapering off
    Heat,
}

impl Scenario {
    pub fn sequence(self) -> &'static [u8] {
        match self {
            Scenario::Keep => &[2, 0, 2, 0, 2, 0],
            Scenario::Heat => &[8, 8, 8, 5, 3, 1],
        }
    }

    /// Sequence as a JSON array string, e.g. `"[2, 0, 2, 0, 2, 0]"`
    pub fn encoded(self) -> String {
        let items: Vec<String> = self.sequence().iter().map(u8::to_string).collect();
        format!("[{}]", items.join(", "))
    }
}

impl std::fmt::Display for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scenario::Keep => write!(f, "keep"),
            Scenario::Heat => write!(f, "heat"),
        }
    }
}

/// Success envelope: the encoded scenario and when it was produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioResponse {
    pub scenario: String,
    pub tstamp: f64,
}

impl ScenarioResponse {
    pub fn new(scenario: Scenario) -> Self {
        Self::at(scenario, Utc::now())
    }

    pub fn at(scenario: Scenario, time: DateTime<Utc>) -> Self {
        Self {
            scenario: scenario.encoded(),
            tstamp: unix_timestamp(time),
        }
    }
}

/// Seconds since the Unix epoch with microsecond precision
pub fn unix_timestamp(time: DateTime<Utc>) -> f64 {
    time.timestamp() as f64 + f64::from(time.timestamp_subsec_micros()) / 1_000_000.0
}

/// Thermostat readings posted to the echo route.
///
/// Only presence of each key is checked; values are kept as raw JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct Readings {
    pub outside_temp: Value,
    pub inside_temp: Value,
    pub set_temp: Value,
    pub test_value: Value,
}

impl Readings {
    pub fn from_payload(payload: &Value) -> Result<Self, ApiError> {
        let field = |key: &str| {
            payload
                .get(key)
                .cloned()
                .ok_or_else(|| ApiError::internal(format!("missing field `{}`", key)))
        };

        Ok(Self {
            outside_temp: field("outside_temp")?,
            inside_temp: field("inside_temp")?,
            set_temp: field("set_temp")?,
            test_value: field("test_value")?,
        })
    }

    pub fn scenario(&self) -> Scenario {
        if is_truthy(&self.test_value) {
            Scenario::Keep
        } else {
            Scenario::Heat
        }
    }
}

/// `false`, `null`, zero, and empty strings, arrays or objects are falsy
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}
