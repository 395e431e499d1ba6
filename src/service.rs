//! Weather report orchestration
//!
//! [`WeatherService::get_weather`] resolves a city query to a forecast point,
//! then fans out six independent fetches and assembles their results into a
//! single [`WeatherResponse`]. The first failing fetch decides the error.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use crate::Result;
use crate::bucketize::bucketize;
use crate::daily::merge_daily;
use crate::error::{Stage, WxError};
use crate::models::{
    AlertSet, Coordinates, DailyForecast, LocationInfo, Observation, Period, PrecipitationSeries, Product,
    WeatherResponse,
};
use crate::upstream::Upstream;

/// Number of concurrent fetches per report
const REPORT_UNITS: usize = 6;

/// Hourly periods kept in a report
const HOURLY_PERIODS: usize = 24;

/// One finished piece of a report
#[derive(Debug)]
enum Fragment {
    Alerts(AlertSet),
    Observation(Observation),
    Hourly(Vec<Period>),
    Daily(Vec<DailyForecast>),
    RainChances(PrecipitationSeries),
    Discussion(Product),
}

#[derive(Debug, Default)]
struct Fragments {
    alerts: Option<AlertSet>,
    observation: Option<Observation>,
    hourly: Option<Vec<Period>>,
    daily: Option<Vec<DailyForecast>>,
    rain_chances: Option<PrecipitationSeries>,
    discussion: Option<Product>,
}

impl Fragments {
    fn insert(&mut self, fragment: Fragment) {
        match fragment {
            Fragment::Alerts(v) => self.alerts = Some(v),
            Fragment::Observation(v) => self.observation = Some(v),
            Fragment::Hourly(v) => self.hourly = Some(v),
            Fragment::Daily(v) => self.daily = Some(v),
            Fragment::RainChances(v) => self.rain_chances = Some(v),
            Fragment::Discussion(v) => self.discussion = Some(v),
        }
    }

    fn into_response(self, location: LocationInfo) -> Result<WeatherResponse> {
        let missing = |stage: Stage| WxError::join(format!("no result for {stage}"));

        Ok(WeatherResponse {
            updated: Utc::now(),
            location,
            alerts: self.alerts.ok_or_else(|| missing(Stage::Alerts))?,
            latest_observations: self
                .observation
                .ok_or_else(|| missing(Stage::Observation))?,
            hourly: self.hourly.ok_or_else(|| missing(Stage::Hourly))?,
            daily: self.daily.ok_or_else(|| missing(Stage::Daily))?,
            rain_chances: self
                .rain_chances
                .ok_or_else(|| missing(Stage::RainChances))?,
            area_forecast_discussion: self
                .discussion
                .ok_or_else(|| missing(Stage::Discussion))?,
        })
    }
}

/// Assembles weather reports from an [`Upstream`]
#[derive(Clone)]
pub struct WeatherService {
    upstream: Arc<dyn Upstream>,
}

impl WeatherService {
    pub fn new(upstream: Arc<dyn Upstream>) -> Self {
        Self { upstream }
    }

    /// Build the full report for a "City, ST" query.
    ///
    /// Coordinates and location are resolved first and are fatal on failure.
    /// Only then are the six report fetches started; the first one to fail
    /// is returned and the rest are left to finish in the background.
    #[instrument(skip(self))]
    pub async fn get_weather(&self, query: &str) -> Result<WeatherResponse> {
        let start_time = Instant::now();

        let coords = self
            .upstream
            .fetch_coordinates(query)
            .await
            .map_err(|e| e.at_stage(Stage::Coordinates, format!("could not find city {query}")))?;

        let location = self.resolve_location(coords).await?;
        debug!(
            "Resolved '{}' to {}, {} ({})",
            query, location.city, location.state, location.county_warning_area
        );

        let response = self.fan_out(location).await?;

        info!(
            "Assembled weather report for '{}' in {:.3}s",
            query,
            start_time.elapsed().as_secs_f64()
        );
        Ok(response)
    }

    /// Active alerts for a state code, in any letter case
    #[instrument(skip(self))]
    pub async fn get_alerts(&self, state: &str) -> Result<AlertSet> {
        let state = state.trim().to_uppercase();
        let alerts = self
            .upstream
            .fetch_alerts(&state)
            .await
            .map_err(|e| e.at_stage(Stage::Alerts, format!("failed to get alerts for {state}")))?;

        info!("Found {} active alerts for {}", alerts.count, state);
        Ok(alerts)
    }

    /// Point metadata plus the nearest observation station.
    ///
    /// A failed station lookup is not fatal: the station stays empty and the
    /// observation fetch reports it later.
    async fn resolve_location(&self, coords: Coordinates) -> Result<LocationInfo> {
        let location = self.upstream.fetch_location(coords).await.map_err(|e| {
            e.at_stage(
                Stage::Location,
                format!("could not find location {}", coords.to_point()),
            )
        })?;

        if location.observation_stations_url.is_empty() {
            warn!("No observation stations listed for {}", coords.to_point());
            return Ok(location);
        }

        match self
            .upstream
            .fetch_observation_station(&location.observation_stations_url)
            .await
        {
            Ok(station) => Ok(location.with_observation_station(station)),
            Err(e) => {
                warn!("Observation station lookup failed: {}", e);
                Ok(location)
            }
        }
    }

    async fn fan_out(&self, location: LocationInfo) -> Result<WeatherResponse> {
        let (tx, mut rx) = mpsc::channel::<Result<Fragment>>(REPORT_UNITS);
        let mut handles: Vec<JoinHandle<()>> = Vec::with_capacity(REPORT_UNITS);

        let upstream = Arc::clone(&self.upstream);
        let state = location.state.clone();
        handles.push(spawn_unit(&tx, async move {
            upstream
                .fetch_alerts(&state)
                .await
                .map(Fragment::Alerts)
                .map_err(|e| e.at_stage(Stage::Alerts, format!("could not pull alerts for {state}")))
        }));

        let upstream = Arc::clone(&self.upstream);
        let station = location
            .has_observation_station()
            .then(|| location.observation_station.clone());
        handles.push(spawn_unit(&tx, async move {
            let observation = match station {
                Some(station) => upstream.fetch_observation(&station).await,
                None => Err(WxError::missing("observation station")),
            };
            observation.map(Fragment::Observation).map_err(|e| {
                e.at_stage(Stage::Observation, "could not get latest conditions")
            })
        }));

        let upstream = Arc::clone(&self.upstream);
        let url = location.hourly_forecast_url.clone();
        handles.push(spawn_unit(&tx, async move {
            upstream
                .fetch_periods(&url, Some(HOURLY_PERIODS))
                .await
                .map(Fragment::Hourly)
                .map_err(|e| e.at_stage(Stage::Hourly, "could not get hourly conditions"))
        }));

        let upstream = Arc::clone(&self.upstream);
        let url = location.forecast_url.clone();
        handles.push(spawn_unit(&tx, async move {
            upstream
                .fetch_periods(&url, None)
                .await
                .map(|periods| Fragment::Daily(merge_daily(&periods)))
                .map_err(|e| e.at_stage(Stage::Daily, "could not get weekly conditions"))
        }));

        let upstream = Arc::clone(&self.upstream);
        let url = location.forecast_grid_data_url.clone();
        handles.push(spawn_unit(&tx, async move {
            let values = upstream.fetch_precipitation_series(&url).await;
            values
                .and_then(|values| bucketize(&values))
                .map(Fragment::RainChances)
                .map_err(|e| e.at_stage(Stage::RainChances, "could not get rain chances"))
        }));

        let upstream = Arc::clone(&self.upstream);
        let cwa = location.county_warning_area.clone();
        handles.push(spawn_unit(&tx, async move {
            latest_discussion(upstream.as_ref(), &cwa)
                .await
                .map(Fragment::Discussion)
                .map_err(|e| {
                    e.at_stage(
                        Stage::Discussion,
                        format!("could not get forecast discussion for {cwa}"),
                    )
                })
        }));

        // Only the workers hold senders now, so the channel closes once they are all gone
        drop(tx);

        let mut fragments = Fragments::default();
        for received in 0..REPORT_UNITS {
            match rx.recv().await {
                Some(Ok(fragment)) => fragments.insert(fragment),
                Some(Err(e)) => {
                    warn!("Weather report for {} failed: {}", location.city, e);
                    return Err(e);
                }
                None => {
                    let mut reason = format!("{} of {} report units finished", received, REPORT_UNITS);
                    for handle in handles {
                        if let Err(e) = handle.await {
                            reason = format!("report unit failed: {e}");
                        }
                    }
                    return Err(WxError::join(reason));
                }
            }
        }

        fragments.into_response(location)
    }
}

/// Text of the newest forecast discussion issued by an office
async fn latest_discussion(upstream: &dyn Upstream, cwa: &str) -> Result<Product> {
    let ids = upstream.fetch_discussion_ids(cwa).await?;
    let latest = ids
        .first()
        .ok_or_else(|| WxError::missing(format!("forecast discussion products for {cwa}")))?;
    upstream.fetch_product(latest).await
}

/// Run one report unit on its own task and report its outcome without blocking
fn spawn_unit<F>(tx: &mpsc::Sender<Result<Fragment>>, unit: F) -> JoinHandle<()>
where
    F: Future<Output = Result<Fragment>> + Send + 'static,
{
    let tx = tx.clone();
    tokio::spawn(async move {
        let outcome = unit.await;
        if tx.try_send(outcome).is_err() {
            debug!("Report already finished, discarding unit result");
        }
    })
}
