//! Composite weather report

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{AlertSet, DailyForecast, LocationInfo, Observation, Period, PrecipitationSeries, Product};

/// Everything known about the weather at one location, assembled per request
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WeatherResponse {
    /// When this report was assembled
    pub updated: DateTime<Utc>,
    #[serde(flatten)]
    pub location: LocationInfo,
    pub alerts: AlertSet,
    pub latest_observations: Observation,
    /// Next 24 hourly periods
    pub hourly: Vec<Period>,
    pub daily: Vec<DailyForecast>,
    pub rain_chances: PrecipitationSeries,
    pub area_forecast_discussion: Product,
}
