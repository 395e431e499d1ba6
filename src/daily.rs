//! Day/night period merging
//!
//! The 7-day forecast arrives as alternating 12-hour day and night periods.
//! [`merge_daily`] folds them into one [`DailyForecast`] per day of the month.

use std::collections::BTreeMap;

use chrono::Datelike;
use tracing::debug;

use crate::models::{DailyForecast, Period};

const DEFAULT_TEMPERATURE_UNIT: &str = "F";

/// Merge day and night periods into one record per day of the month.
///
/// Periods are grouped by the day-of-month of their start time, so the
/// output is ordered 1..=31 and a forecast spanning a month boundary puts
/// the early days of the next month first.
#[must_use]
pub fn merge_daily(periods: &[Period]) -> Vec<DailyForecast> {
    let mut days: BTreeMap<u32, DailyForecast> = BTreeMap::new();

    for period in periods {
        let day = days
            .entry(period.start_time.day())
            .or_insert_with(|| DailyForecast {
                date: period.start_time,
                temperature_unit: DEFAULT_TEMPERATURE_UNIT.to_string(),
                day_temp: 0,
                day_icon: String::new(),
                night_temp: 0,
                night_icon: String::new(),
            });

        if period.is_daytime {
            day.day_temp = period.temperature;
            day.day_icon = period.icon.clone();
            if !period.temperature_unit.is_empty() {
                day.temperature_unit = period.temperature_unit.clone();
            }
        } else {
            day.night_temp = period.temperature;
            day.night_icon = period.icon.clone();
        }
    }

    debug!("Merged {} periods into {} days", periods.len(), days.len());

    days.into_values().collect()
}
