//! Forecast models: periods, merged daily records and hourly rain chances

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Number of hourly slots in a precipitation day
pub const HOURS_PER_DAY: usize = 24;

/// Default unit for the probability-of-precipitation layer
pub const PERCENT_UNIT: &str = "wmoUnit:percent";

/// One forecast slot (an hour, or a 12-hour day/night half)
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Period {
    #[serde(default)]
    pub number: u32,
    #[serde(default)]
    pub name: String,
    pub start_time: DateTime<FixedOffset>,
    pub end_time: DateTime<FixedOffset>,
    #[serde(default)]
    pub is_daytime: bool,
    #[serde(default)]
    pub temperature: i32,
    #[serde(default)]
    pub temperature_unit: String,
    #[serde(default)]
    pub temperature_trend: Option<String>,
    #[serde(default)]
    pub wind_speed: String,
    #[serde(default)]
    pub wind_direction: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub short_forecast: String,
    #[serde(default)]
    pub detailed_forecast: String,
}

/// Day and night halves of one calendar day.
///
/// Serialized with PascalCase keys (`Date`, `DayTemp`, ...), the shape
/// existing report consumers read.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct DailyForecast {
    pub date: DateTime<FixedOffset>,
    pub temperature_unit: String,
    pub day_temp: i32,
    pub day_icon: String,
    pub night_temp: i32,
    pub night_icon: String,
}

/// A value held constant over an ISO-8601 `start/duration` interval
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IntervalValue {
    #[serde(default)]
    pub unit_code: String,
    /// Interval such as `2024-03-01T06:00:00+00:00/PT6H`
    pub valid_time: String,
    #[serde(default)]
    pub value: Option<f64>,
}

/// Hourly precipitation chances keyed by `YYYY-MM-DD`
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PrecipitationSeries {
    pub unit_code: String,
    pub values: BTreeMap<String, [i32; HOURS_PER_DAY]>,
}

impl Default for PrecipitationSeries {
    fn default() -> Self {
        Self {
            unit_code: PERCENT_UNIT.to_string(),
            values: BTreeMap::new(),
        }
    }
}
