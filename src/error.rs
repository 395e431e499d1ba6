//! Error types and handling for `wxreport`

use std::fmt;

use thiserror::Error;

/// The step of a weather report that produced an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Coordinates,
    Location,
    Alerts,
    Observation,
    Hourly,
    Daily,
    RainChances,
    Discussion,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Coordinates => "coordinates",
            Stage::Location => "location",
            Stage::Alerts => "alerts",
            Stage::Observation => "observation",
            Stage::Hourly => "hourly forecast",
            Stage::Daily => "daily forecast",
            Stage::RainChances => "rain chances",
            Stage::Discussion => "forecast discussion",
        };
        f.write_str(name)
    }
}

/// Main error type for `wxreport`
#[derive(Error, Debug)]
pub enum WxError {
    /// Upstream could not be reached or answered with a non-2xx status
    #[error("Upstream error for {url}: {message}")]
    Upstream {
        url: String,
        status: Option<u16>,
        message: String,
    },

    /// Upstream payload could not be decoded
    #[error("Decode error in {what}: {message}")]
    Decode { what: String, message: String },

    /// A required field was absent after decoding
    #[error("Missing data: {what}")]
    Missing { what: String },

    /// A `start/duration` interval could not be parsed
    #[error("Invalid interval '{input}': {message}")]
    IntervalParse { input: String, message: String },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// A fan-out worker ended without reporting
    #[error("Worker error: {message}")]
    Join { message: String },

    /// A failure attributed to one step of the report
    #[error("{message}: {source}")]
    Stage {
        stage: Stage,
        message: String,
        #[source]
        source: Box<WxError>,
    },
}

impl WxError {
    /// Create a new upstream error
    pub fn upstream<U: Into<String>, S: Into<String>>(
        url: U,
        status: Option<u16>,
        message: S,
    ) -> Self {
        Self::Upstream {
            url: url.into(),
            status,
            message: message.into(),
        }
    }

    /// Create a new decode error
    pub fn decode<W: Into<String>, S: fmt::Display>(what: W, err: S) -> Self {
        Self::Decode {
            what: what.into(),
            message: err.to_string(),
        }
    }

    /// Create a new missing-data error
    pub fn missing<S: Into<String>>(what: S) -> Self {
        Self::Missing { what: what.into() }
    }

    /// Create a new interval parse error
    pub fn interval<I: Into<String>, S: Into<String>>(input: I, message: S) -> Self {
        Self::IntervalParse {
            input: input.into(),
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn join<S: Into<String>>(message: S) -> Self {
        Self::Join {
            message: message.into(),
        }
    }

    /// Attribute this error to a report stage
    #[must_use]
    pub fn at_stage<S: Into<String>>(self, stage: Stage, message: S) -> Self {
        Self::Stage {
            stage,
            message: message.into(),
            source: Box::new(self),
        }
    }

    /// The stage this error was attributed to, if any
    #[must_use]
    pub fn stage(&self) -> Option<Stage> {
        match self {
            WxError::Stage { stage, .. } => Some(*stage),
            _ => None,
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            WxError::Upstream { .. } => {
                "Unable to reach the weather service. Please try again later.".to_string()
            }
            WxError::Decode { .. } => {
                "The weather service returned data that could not be read.".to_string()
            }
            WxError::Missing { what } => format!("No data available: {what}"),
            WxError::IntervalParse { .. } => {
                "The weather service returned an invalid time range.".to_string()
            }
            WxError::Config { .. } => {
                "Configuration error. Please check your config file and API keys.".to_string()
            }
            WxError::Join { .. } => "The weather report could not be completed.".to_string(),
            WxError::Stage { message, .. } => message.clone(),
        }
    }
}
