//! HTTP client for the ArcGIS geocoder and api.weather.gov
//!
//! Responses are decoded in two steps: first into the wire envelope that
//! mirrors the upstream JSON, then lifted into the crate's models.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::ACCEPT;
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument, warn};

use super::Upstream;
use crate::Result;
use crate::config::UpstreamConfig;
use crate::error::WxError;
use crate::models::{
    AlertSet, Coordinates, IntervalValue, LocationInfo, Observation, Period, Product,
};

const ACCEPT_GEOJSON: &str = "application/geo+json, application/json";
const MAX_ERROR_BODY: usize = 500;

/// Client for the geocoder and weather.gov endpoints
#[derive(Debug, Clone)]
pub struct NwsClient {
    client: Client,
    geocode_url: String,
    api_key: Option<String>,
    base_url: String,
}

impl NwsClient {
    /// Create a new client from upstream configuration
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        let mut builder = Client::builder().user_agent(config.user_agent.clone());
        if let Some(seconds) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(seconds));
        }
        let client = builder
            .build()
            .map_err(|e| WxError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            geocode_url: config.geocode_url.clone(),
            api_key: config.api_key.clone(),
            base_url: config.nws_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET a URL and decode its JSON body
    async fn get_json<T: DeserializeOwned>(&self, url: &str, what: &str) -> Result<T> {
        let start = Instant::now();
        let shown = redact_url(url);
        debug!("GET {}", shown);

        let response = self
            .client
            .get(url)
            .header(ACCEPT, ACCEPT_GEOJSON)
            .send()
            .await
            .map_err(|e| WxError::upstream(&shown, None, e.without_url().to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| {
                WxError::upstream(&shown, Some(status.as_u16()), e.without_url().to_string())
            })?;

        if !status.is_success() {
            let text = String::from_utf8_lossy(&body);
            let excerpt: String = text.chars().take(MAX_ERROR_BODY).collect();
            warn!("{} returned {}", shown, status);
            return Err(WxError::upstream(
                shown,
                Some(status.as_u16()),
                format!("HTTP {status}: {excerpt}"),
            ));
        }

        let decoded = serde_json::from_slice(&body).map_err(|e| WxError::decode(what, e))?;

        let elapsed = start.elapsed();
        debug!("Fetched {} in {:.3}s", what, elapsed.as_secs_f64());
        if elapsed.as_secs() > 5 {
            warn!("Slow upstream response for {}: {:.3}s", what, elapsed.as_secs_f64());
        }

        Ok(decoded)
    }
}

/// Mask the geocoder token so URLs can be logged and reported
fn redact_url(url: &str) -> String {
    let Some((base, query)) = url.split_once('?') else {
        return url.to_string();
    };
    let params: Vec<String> = query
        .split('&')
        .map(|param| match param.split_once('=') {
            Some(("token", _)) => "token=***".to_string(),
            _ => param.to_string(),
        })
        .collect();
    format!("{base}?{}", params.join("&"))
}

#[async_trait]
impl Upstream for NwsClient {
    #[instrument(skip(self))]
    async fn fetch_coordinates(&self, query: &str) -> Result<Coordinates> {
        let key = self
            .api_key
            .as_deref()
            .ok_or_else(|| WxError::config("API key for the geocoder not found"))?;

        let url = format!(
            "{}?f=pjson&singleLine={}&token={}",
            self.geocode_url,
            urlencoding::encode(query),
            urlencoding::encode(key)
        );

        let response: wire::GeocodeResponse = self.get_json(&url, "geocoder candidates").await?;
        let coords = response.best_match(query)?;

        info!(
            "Geocoded '{}' to ({:.4}, {:.4})",
            query, coords.latitude, coords.longitude
        );
        Ok(coords)
    }

    #[instrument(skip(self))]
    async fn fetch_location(&self, coords: Coordinates) -> Result<LocationInfo> {
        let url = self.url(&format!("/points/{}", coords.to_point()));
        let point: wire::PointResponse = self.get_json(&url, "point metadata").await?;
        Ok(point.into_location())
    }

    #[instrument(skip(self))]
    async fn fetch_observation_station(&self, stations_url: &str) -> Result<String> {
        let stations: wire::StationCollection =
            self.get_json(stations_url, "observation stations").await?;
        stations.first_station()
    }

    #[instrument(skip(self))]
    async fn fetch_alerts(&self, state: &str) -> Result<AlertSet> {
        let url = self.url(&format!("/alerts/active/area/{state}"));
        let alerts: wire::AlertCollection = self.get_json(&url, "alerts").await?;
        Ok(alerts.into_alert_set())
    }

    #[instrument(skip(self))]
    async fn fetch_observation(&self, station_id: &str) -> Result<Observation> {
        let url = self.url(&format!(
            "/stations/{station_id}/observations/latest?require_qc=true"
        ));
        let envelope: wire::Envelope<Observation> = self.get_json(&url, "observation").await?;
        Ok(envelope.properties)
    }

    #[instrument(skip(self))]
    async fn fetch_periods(&self, url: &str, limit: Option<usize>) -> Result<Vec<Period>> {
        let envelope: wire::Envelope<wire::PeriodList> =
            self.get_json(url, "forecast periods").await?;
        let mut periods = envelope.properties.periods;
        if let Some(limit) = limit {
            periods.truncate(limit);
        }
        Ok(periods)
    }

    #[instrument(skip(self))]
    async fn fetch_precipitation_series(&self, url: &str) -> Result<Vec<IntervalValue>> {
        let envelope: wire::Envelope<wire::GridProperties> =
            self.get_json(url, "gridpoint data").await?;
        Ok(envelope.properties.probability_of_precipitation.into_values())
    }

    #[instrument(skip(self))]
    async fn fetch_discussion_ids(&self, cwa: &str) -> Result<Vec<String>> {
        let url = self.url(&format!("/products/types/AFD/locations/{cwa}"));
        let list: wire::ProductList = self.get_json(&url, "forecast discussion list").await?;
        Ok(list.graph.into_iter().map(|entry| entry.id).collect())
    }

    #[instrument(skip(self))]
    async fn fetch_product(&self, product_id: &str) -> Result<Product> {
        let url = if product_id.starts_with("http://") || product_id.starts_with("https://") {
            product_id.to_string()
        } else {
            self.url(&format!("/products/{product_id}"))
        };
        self.get_json(&url, "forecast discussion").await
    }
}

/// weather.gov and ArcGIS response structures
mod wire {
    use chrono::{DateTime, FixedOffset};
    use serde::Deserialize;

    use crate::Result;
    use crate::error::WxError;
    use crate::models::{
        Alert, AlertSet, Coordinates, IntervalValue, LocationInfo, PERCENT_UNIT, Period,
    };

    /// GeoJSON feature wrapper; the payload lives under `properties`
    #[derive(Debug, Deserialize)]
    pub struct Envelope<T> {
        pub properties: T,
    }

    #[derive(Debug, Deserialize)]
    pub struct GeocodeResponse {
        #[serde(default)]
        pub candidates: Vec<GeocodeCandidate>,
    }

    #[derive(Debug, Deserialize)]
    pub struct GeocodeCandidate {
        pub location: GeocodePoint,
    }

    /// ArcGIS reports `x` as longitude and `y` as latitude
    #[derive(Debug, Deserialize)]
    pub struct GeocodePoint {
        pub x: f64,
        pub y: f64,
    }

    impl GeocodeResponse {
        pub fn best_match(self, query: &str) -> Result<Coordinates> {
            self.candidates
                .into_iter()
                .next()
                .map(|c| Coordinates::new(c.location.y, c.location.x))
                .ok_or_else(|| WxError::missing(format!("geocoder candidates for '{query}'")))
        }
    }

    #[derive(Debug, Deserialize)]
    pub struct PointResponse {
        #[serde(default)]
        pub id: String,
        pub properties: PointProperties,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct PointProperties {
        pub cwa: String,
        #[serde(default)]
        pub grid_id: String,
        #[serde(default)]
        pub grid_x: i64,
        #[serde(default)]
        pub grid_y: i64,
        pub observation_stations: String,
        pub forecast: String,
        pub forecast_hourly: String,
        pub forecast_grid_data: String,
        #[serde(default)]
        pub relative_location: Option<RelativeLocation>,
        #[serde(default)]
        pub time_zone: String,
        #[serde(default)]
        pub county: String,
        #[serde(default)]
        pub forecast_zone: String,
        #[serde(default)]
        pub fire_weather_zone: String,
        #[serde(default)]
        pub radar_station: String,
    }

    #[derive(Debug, Deserialize)]
    pub struct RelativeLocation {
        #[serde(default)]
        pub geometry: Option<Geometry>,
        pub properties: RelativeLocationProperties,
    }

    #[derive(Debug, Deserialize)]
    pub struct Geometry {
        #[serde(default)]
        pub coordinates: Vec<f64>,
    }

    #[derive(Debug, Deserialize)]
    pub struct RelativeLocationProperties {
        #[serde(default)]
        pub city: String,
        #[serde(default)]
        pub state: String,
    }

    impl PointResponse {
        pub fn into_location(self) -> LocationInfo {
            let p = self.properties;
            let (city, state, coordinates) = match p.relative_location {
                Some(rel) => (
                    rel.properties.city,
                    rel.properties.state,
                    rel.geometry.map(|g| g.coordinates).unwrap_or_default(),
                ),
                None => (String::new(), String::new(), Vec::new()),
            };

            LocationInfo {
                id: self.id,
                city,
                state,
                coordinates,
                county_warning_area: p.cwa,
                grid_id: p.grid_id,
                grid_x: p.grid_x,
                grid_y: p.grid_y,
                observation_stations_url: p.observation_stations,
                forecast_grid_data_url: p.forecast_grid_data,
                forecast_url: p.forecast,
                hourly_forecast_url: p.forecast_hourly,
                time_zone: p.time_zone,
                county: p.county,
                forecast_zone: p.forecast_zone,
                fire_weather_zone: p.fire_weather_zone,
                radar_station: p.radar_station,
                observation_station: String::new(),
            }
        }
    }

    #[derive(Debug, Deserialize)]
    pub struct StationCollection {
        #[serde(default)]
        pub features: Vec<Envelope<StationProperties>>,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct StationProperties {
        pub station_identifier: String,
    }

    impl StationCollection {
        pub fn first_station(self) -> Result<String> {
            self.features
                .into_iter()
                .next()
                .map(|f| f.properties.station_identifier)
                .ok_or_else(|| WxError::missing("observation stations"))
        }
    }

    #[derive(Debug, Deserialize)]
    pub struct AlertCollection {
        #[serde(default)]
        pub updated: Option<DateTime<FixedOffset>>,
        #[serde(default)]
        pub features: Vec<AlertFeature>,
    }

    #[derive(Debug, Deserialize)]
    pub struct AlertFeature {
        #[serde(default)]
        pub id: String,
        pub properties: AlertProperties,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct AlertProperties {
        #[serde(default)]
        pub event: String,
        #[serde(default)]
        pub status: String,
        #[serde(default)]
        pub effective: Option<DateTime<FixedOffset>>,
        #[serde(default)]
        pub expires: Option<DateTime<FixedOffset>>,
        #[serde(default)]
        pub severity: String,
        #[serde(default)]
        pub headline: Option<String>,
        #[serde(default)]
        pub area_desc: String,
    }

    impl AlertCollection {
        pub fn into_alert_set(self) -> AlertSet {
            let alerts = self
                .features
                .into_iter()
                .map(|f| Alert {
                    id: f.id,
                    event: f.properties.event,
                    status: f.properties.status,
                    effective: f.properties.effective,
                    expires: f.properties.expires,
                    severity: f.properties.severity,
                    headline: f.properties.headline.unwrap_or_default(),
                    affected_areas: f.properties.area_desc,
                })
                .collect();
            AlertSet::new(self.updated, alerts)
        }
    }

    #[derive(Debug, Deserialize)]
    pub struct PeriodList {
        #[serde(default)]
        pub periods: Vec<Period>,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct GridProperties {
        pub probability_of_precipitation: GridLayer,
    }

    #[derive(Debug, Deserialize)]
    pub struct GridLayer {
        #[serde(default)]
        pub uom: String,
        #[serde(default)]
        pub values: Vec<GridValue>,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct GridValue {
        pub valid_time: String,
        #[serde(default)]
        pub value: Option<f64>,
    }

    impl GridLayer {
        pub fn into_values(self) -> Vec<IntervalValue> {
            let unit_code = if self.uom.is_empty() {
                PERCENT_UNIT.to_string()
            } else {
                self.uom
            };
            self.values
                .into_iter()
                .map(|v| IntervalValue {
                    unit_code: unit_code.clone(),
                    valid_time: v.valid_time,
                    value: v.value,
                })
                .collect()
        }
    }

    #[derive(Debug, Deserialize)]
    pub struct ProductList {
        #[serde(rename = "@graph", default)]
        pub graph: Vec<ProductRef>,
    }

    #[derive(Debug, Deserialize)]
    pub struct ProductRef {
        #[serde(rename = "@id")]
        pub id: String,
    }
}
