use chrono::{DateTime, Utc};
use serde::Serialize;

/// how often a statistic changes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Cadence {
    Live,
    Daily,
    Constant,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum StatValue {
    Count(u128),
    /// integer amount in a token's base units
    Amount { base_units: u128, decimals: u8 },
    Percent(f64),
    Usd(f64),
    Duration { secs: i64 },
    Timestamp(DateTime<Utc>),
}

/// the final output unit: one labeled value of a stats card
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedStatistic {
    pub id: String,
    pub label: String,
    pub value: StatValue,
    pub unit: Option<String>,
    pub description: Option<String>,
    pub cadence: Option<Cadence>,
    /// display marker for approximate values
    pub approximate: bool,
}

impl DerivedStatistic {
    pub fn new(label: &str, value: StatValue) -> Self {
        DerivedStatistic {
            id: label.to_string(),
            label: label.to_string(),
            value,
            unit: None,
            description: None,
            cadence: None,
            approximate: false,
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn cadence(mut self, cadence: Cadence) -> Self {
        self.cadence = Some(cadence);
        self
    }

    pub fn approximate(mut self) -> Self {
        self.approximate = true;
        self
    }
}
