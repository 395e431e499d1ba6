//! Data models for wxreport
//!
//! This module contains the core domain models organized by concern:
//! - Location: geocoded coordinates and forecast-point metadata
//! - Weather: current observations
//! - Forecast: periods, daily records and precipitation series
//! - Alerts, products and the composite report

pub mod alerts;
pub mod forecast;
pub mod location;
pub mod product;
pub mod report;
pub mod weather;

// Re-export all public types for convenient access
pub use alerts::{Alert, AlertSet};
pub use forecast::{
    DailyForecast, HOURS_PER_DAY, IntervalValue, PERCENT_UNIT, Period, PrecipitationSeries,
};
pub use location::{Coordinates, LocationInfo};
pub use product::Product;
pub use report::WeatherResponse;
pub use weather::{Measurement, Observation};
