//! `wxreport` - Weather report aggregation over the National Weather Service API
//!
//! This library geocodes a city query, resolves its forecast point and
//! assembles alerts, observations, forecasts, rain chances and the forecast
//! discussion into a single report.

pub mod api;
pub mod bucketize;
pub mod config;
pub mod daily;
pub mod error;
pub mod logging;
pub mod models;
pub mod service;
pub mod upstream;
pub mod web;

// Re-export core types for public API
pub use bucketize::bucketize;
pub use config::WxConfig;
pub use daily::merge_daily;
pub use error::{Stage, WxError};
pub use models::{AlertSet, LocationInfo, PrecipitationSeries, WeatherResponse};
pub use service::WeatherService;
pub use upstream::{NwsClient, Upstream};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, WxError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
