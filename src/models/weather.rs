//! Current observation model

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// A single measured quantity with its WMO unit code
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Measurement {
    /// Unit code, e.g. `wmoUnit:degC`
    #[serde(default)]
    pub unit_code: String,
    /// Measured value; upstream reports `null` when a sensor has no reading
    #[serde(default)]
    pub value: Option<f64>,
}

/// Latest observation at a station
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Observation {
    #[serde(default)]
    pub timestamp: Option<DateTime<FixedOffset>>,
    /// Human-readable description of conditions
    #[serde(default)]
    pub text_description: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub temperature: Measurement,
    #[serde(default)]
    pub dewpoint: Measurement,
    #[serde(default)]
    pub wind_direction: Measurement,
    #[serde(default)]
    pub wind_speed: Measurement,
    #[serde(default)]
    pub wind_gust: Measurement,
    #[serde(default)]
    pub visibility: Measurement,
    #[serde(default)]
    pub relative_humidity: Measurement,
    #[serde(default)]
    pub wind_chill: Measurement,
    #[serde(default)]
    pub heat_index: Measurement,
}
