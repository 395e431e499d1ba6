//! Upstream data sources
//!
//! [`Upstream`] is the seam between the report orchestration and the remote
//! services it reads from. [`NwsClient`] talks to the ArcGIS geocoder and
//! api.weather.gov over HTTP.

use async_trait::async_trait;

use crate::Result;
use crate::models::{AlertSet, Coordinates, IntervalValue, LocationInfo, Observation, Period, Product};

pub mod nws;

pub use nws::NwsClient;

/// Typed fetches against the geocoder and the weather service.
///
/// Every method performs the remote call(s) for one payload and decodes it;
/// none of them retries or caches.
#[async_trait]
pub trait Upstream: Send + Sync {
    /// Geocode a free-text "City, ST" query to its best candidate
    async fn fetch_coordinates(&self, query: &str) -> Result<Coordinates>;

    /// Point metadata for a coordinate; the observation station is left empty
    async fn fetch_location(&self, coords: Coordinates) -> Result<LocationInfo>;

    /// First station listed by an observation-stations URL
    async fn fetch_observation_station(&self, stations_url: &str) -> Result<String>;

    /// Active alerts for a two-letter state code
    async fn fetch_alerts(&self, state: &str) -> Result<AlertSet>;

    /// Latest quality-controlled observation at a station
    async fn fetch_observation(&self, station_id: &str) -> Result<Observation>;

    /// Forecast periods from a forecast URL, at most `limit` when given
    async fn fetch_periods(&self, url: &str, limit: Option<usize>) -> Result<Vec<Period>>;

    /// Probability-of-precipitation layer of a gridpoint URL
    async fn fetch_precipitation_series(&self, url: &str) -> Result<Vec<IntervalValue>>;

    /// Ids of the forecast discussions issued by an office, newest first
    async fn fetch_discussion_ids(&self, cwa: &str) -> Result<Vec<String>>;

    /// Full text of one product
    async fn fetch_product(&self, product_id: &str) -> Result<Product>;
}
