//! In-process upstream used by the integration tests

#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration, FixedOffset};

use wxreport::models::{
    Alert, AlertSet, Coordinates, IntervalValue, LocationInfo, Measurement, Observation, Period, Product,
};
use wxreport::{Result, Upstream, WxError};

pub const BASE: &str = "https://api.weather.gov";

/// Upstream serving a fixed Houston forecast, with switches for each failure path
pub struct FakeUpstream {
    pub candidates: Vec<Coordinates>,
    pub fail_location: bool,
    pub fail_station: bool,
    pub alerts_status: Option<u16>,
    pub hang_observation: bool,
    pub fail_grid: bool,
    pub calls: Mutex<Vec<String>>,
}

impl Default for FakeUpstream {
    fn default() -> Self {
        Self {
            candidates: vec![Coordinates::new(29.7604, -95.3698)],
            fail_location: false,
            fail_station: false,
            alerts_status: None,
            hang_observation: false,
            fail_grid: false,
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl FakeUpstream {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }
}

fn ts(text: &str) -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339(text).unwrap()
}

fn period(number: u32, start: DateTime<FixedOffset>, hours: i64, is_daytime: bool, temperature: i32) -> Period {
    Period {
        number,
        name: String::new(),
        start_time: start,
        end_time: start + Duration::hours(hours),
        is_daytime,
        temperature,
        temperature_unit: "F".to_string(),
        temperature_trend: None,
        wind_speed: "10 mph".to_string(),
        wind_direction: "SE".to_string(),
        icon: format!("{BASE}/icons/land/{}/few", if is_daytime { "day" } else { "night" }),
        short_forecast: "Mostly Sunny".to_string(),
        detailed_forecast: String::new(),
    }
}

/// 48 hourly periods starting at midnight
pub fn hourly_periods() -> Vec<Period> {
    let start = ts("2024-03-01T00:00:00-06:00");
    (0..48)
        .map(|i| {
            let begin = start + Duration::hours(i);
            period(i as u32 + 1, begin, 1, (6..18).contains(&(i % 24)), 60 + (i % 24) as i32)
        })
        .collect()
}

/// 14 alternating day and night periods for March 1st to 7th
pub fn week_periods() -> Vec<Period> {
    let start = ts("2024-03-01T06:00:00-06:00");
    (0..14)
        .map(|i| {
            let begin = start + Duration::hours(12 * i);
            let is_daytime = i % 2 == 0;
            period(i as u32 + 1, begin, 12, is_daytime, if is_daytime { 78 } else { 58 })
        })
        .collect()
}

#[async_trait]
impl Upstream for FakeUpstream {
    async fn fetch_coordinates(&self, query: &str) -> Result<Coordinates> {
        self.record("coordinates");
        self.candidates
            .first()
            .copied()
            .ok_or_else(|| WxError::missing(format!("geocoder candidates for '{query}'")))
    }

    async fn fetch_location(&self, coords: Coordinates) -> Result<LocationInfo> {
        self.record("location");
        let url = format!("{BASE}/points/{}", coords.to_point());
        if self.fail_location {
            return Err(WxError::upstream(url, Some(404), "HTTP 404 Not Found"));
        }

        let grid = format!("{BASE}/gridpoints/HGX/63,95");
        Ok(LocationInfo {
            id: url,
            city: "Houston".to_string(),
            state: "TX".to_string(),
            coordinates: vec![-95.3698, 29.7604],
            county_warning_area: "HGX".to_string(),
            grid_id: "HGX".to_string(),
            grid_x: 63,
            grid_y: 95,
            observation_stations_url: format!("{grid}/stations"),
            forecast_grid_data_url: grid.clone(),
            forecast_url: format!("{grid}/forecast"),
            hourly_forecast_url: format!("{grid}/forecast/hourly"),
            time_zone: "America/Chicago".to_string(),
            ..LocationInfo::default()
        })
    }

    async fn fetch_observation_station(&self, stations_url: &str) -> Result<String> {
        self.record("station");
        if self.fail_station {
            return Err(WxError::upstream(stations_url, Some(500), "HTTP 500"));
        }
        Ok("KMCJ".to_string())
    }

    async fn fetch_alerts(&self, state: &str) -> Result<AlertSet> {
        self.record(format!("alerts:{state}"));
        let url = format!("{BASE}/alerts/active/area/{state}");
        if let Some(status) = self.alerts_status {
            return Err(WxError::upstream(url, Some(status), format!("HTTP {status}")));
        }

        Ok(AlertSet::new(
            Some(ts("2024-03-01T15:00:00+00:00")),
            vec![Alert {
                id: "urn:oid:2.49.0.1.840.0.1".to_string(),
                event: "Coastal Flood Advisory".to_string(),
                status: "Actual".to_string(),
                severity: "Minor".to_string(),
                headline: "Coastal Flood Advisory issued March 1".to_string(),
                affected_areas: "Galveston Island".to_string(),
                ..Alert::default()
            }],
        ))
    }

    async fn fetch_observation(&self, station_id: &str) -> Result<Observation> {
        self.record(format!("observation:{station_id}"));
        if self.hang_observation {
            std::future::pending::<()>().await;
        }
        Ok(Observation {
            text_description: "Partly Cloudy".to_string(),
            temperature: Measurement {
                unit_code: "wmoUnit:degC".to_string(),
                value: Some(21.1),
            },
            ..Observation::default()
        })
    }

    async fn fetch_periods(&self, url: &str, limit: Option<usize>) -> Result<Vec<Period>> {
        self.record("periods");
        let mut periods = if url.ends_with("/hourly") {
            hourly_periods()
        } else {
            week_periods()
        };
        if let Some(limit) = limit {
            periods.truncate(limit);
        }
        Ok(periods)
    }

    async fn fetch_precipitation_series(&self, url: &str) -> Result<Vec<IntervalValue>> {
        self.record("grid");
        if self.fail_grid {
            return Err(WxError::upstream(url, Some(500), "HTTP 500"));
        }
        Ok(vec![
            IntervalValue {
                unit_code: "wmoUnit:percent".to_string(),
                valid_time: "2024-03-01T18:00:00-06:00/PT8H".to_string(),
                value: Some(30.0),
            },
            IntervalValue {
                unit_code: "wmoUnit:percent".to_string(),
                valid_time: "2024-03-02T02:00:00-06:00/PT4H".to_string(),
                value: Some(55.0),
            },
        ])
    }

    async fn fetch_discussion_ids(&self, cwa: &str) -> Result<Vec<String>> {
        self.record(format!("discussions:{cwa}"));
        Ok(vec![
            format!("{BASE}/products/0f0e1d2c"),
            format!("{BASE}/products/aa11bb22"),
        ])
    }

    async fn fetch_product(&self, product_id: &str) -> Result<Product> {
        self.record("product");
        Ok(Product {
            id: product_id.to_string(),
            issuance_time: "2024-03-01T14:41:00+00:00".to_string(),
            text: "AREA FORECAST DISCUSSION\nNATIONAL WEATHER SERVICE HOUSTON/GALVESTON TX"
                .to_string(),
        })
    }
}
