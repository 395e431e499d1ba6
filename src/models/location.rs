//! Location models: geocoded coordinates and the resolved forecast point

use serde::{Deserialize, Serialize};

/// Location coordinates
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Coordinates {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

impl Coordinates {
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Format as the `lat,lon` path segment used by the points endpoint
    #[must_use]
    pub fn to_point(&self) -> String {
        format!("{:.4},{:.4}", self.latitude, self.longitude)
    }
}

/// Forecast point metadata for a location, as resolved from the points service
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct LocationInfo {
    pub id: String,
    pub city: String,
    pub state: String,
    /// Coordinates of the relative location reported by the points service
    pub coordinates: Vec<f64>,
    #[serde(rename = "cwa")]
    pub county_warning_area: String,
    #[serde(rename = "gridId")]
    pub grid_id: String,
    #[serde(rename = "gridX")]
    pub grid_x: i64,
    #[serde(rename = "gridY")]
    pub grid_y: i64,
    #[serde(rename = "observationStations")]
    pub observation_stations_url: String,
    #[serde(rename = "forecastGridData")]
    pub forecast_grid_data_url: String,
    #[serde(rename = "forecast")]
    pub forecast_url: String,
    #[serde(rename = "forecastHourly")]
    pub hourly_forecast_url: String,
    #[serde(rename = "timeZone")]
    pub time_zone: String,
    pub county: String,
    #[serde(rename = "forecastZone")]
    pub forecast_zone: String,
    #[serde(rename = "fireWeatherZone")]
    pub fire_weather_zone: String,
    #[serde(rename = "radarStation")]
    pub radar_station: String,
    /// Identifier of the nearest observation station; empty until resolved
    #[serde(rename = "observationStation")]
    pub observation_station: String,
}

impl LocationInfo {
    /// Return this location with its observation station set
    #[must_use]
    pub fn with_observation_station(self, station: impl Into<String>) -> Self {
        Self {
            observation_station: station.into(),
            ..self
        }
    }

    #[must_use]
    pub fn has_observation_station(&self) -> bool {
        !self.observation_station.is_empty()
    }
}
