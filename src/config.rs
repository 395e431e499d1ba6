//! Configuration management for wxreport
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::WxError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for wxreport
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WxConfig {
    /// Upstream service configuration
    #[serde(default)]
    pub upstream: UpstreamConfig,
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Upstream service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// ArcGIS geocoder `findAddressCandidates` endpoint
    #[serde(default = "default_geocode_url")]
    pub geocode_url: String,
    /// ArcGIS token for the geocoder
    pub api_key: Option<String>,
    /// Base URL of the weather.gov API
    #[serde(default = "default_nws_base_url")]
    pub nws_base_url: String,
    /// User-Agent sent with every request (weather.gov rejects anonymous clients)
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Request timeout in seconds; unset means requests may wait indefinitely
    pub timeout_seconds: Option<u64>,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_geocode_url() -> String {
    "https://geocode-api.arcgis.com/arcgis/rest/services/World/GeocodeServer/findAddressCandidates"
        .to_string()
}

fn default_nws_base_url() -> String {
    "https://api.weather.gov".to_string()
}

fn default_user_agent() -> String {
    format!("wxreport/{}", crate::VERSION)
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            geocode_url: default_geocode_url(),
            api_key: None,
            nws_base_url: default_nws_base_url(),
            user_agent: default_user_agent(),
            timeout_seconds: None,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl WxConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // WXREPORT_UPSTREAM__API_KEY, WXREPORT_SERVER__PORT, ...
        builder = builder.add_source(
            Environment::with_prefix("WXREPORT")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: WxConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_legacy_env(|key| std::env::var(key).ok());
        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("wxreport").join("config.toml"))
    }

    /// Honour the variables the service has always been deployed with:
    /// `API_KEY` for the geocoder and `FUNCTIONS_CUSTOMHANDLER_PORT` for the
    /// listening port. Explicit configuration takes precedence over `API_KEY`;
    /// the port variable always wins because the hosting platform assigns it.
    pub fn apply_legacy_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if self.upstream.api_key.is_none() {
            self.upstream.api_key = lookup("API_KEY");
        }
        if let Some(port) = lookup("FUNCTIONS_CUSTOMHANDLER_PORT").and_then(|p| p.parse().ok()) {
            self.server.port = port;
        }
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.upstream.geocode_url.is_empty() {
            self.upstream.geocode_url = default_geocode_url();
        }
        if self.upstream.nws_base_url.is_empty() {
            self.upstream.nws_base_url = default_nws_base_url();
        }
        if self.upstream.user_agent.is_empty() {
            self.upstream.user_agent = default_user_agent();
        }
        if self.server.host.is_empty() {
            self.server.host = default_host();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_urls()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    fn validate_urls(&self) -> Result<()> {
        for (name, url) in [
            ("Geocoder URL", &self.upstream.geocode_url),
            ("Weather API base URL", &self.upstream.nws_base_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(WxError::config(format!(
                    "{name} must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }
        Ok(())
    }

    fn validate_numeric_ranges(&self) -> Result<()> {
        if let Some(timeout) = self.upstream.timeout_seconds {
            if timeout == 0 || timeout > 300 {
                return Err(
                    WxError::config("Upstream timeout must be between 1 and 300 seconds").into(),
                );
            }
        }

        if self.server.port == 0 {
            return Err(WxError::config("Server port cannot be 0").into());
        }

        Ok(())
    }

    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(WxError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(WxError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        if let Some(api_key) = &self.upstream.api_key {
            if api_key.trim().is_empty() {
                return Err(WxError::config(
                    "Geocoder API key cannot be empty if provided. Either remove it or provide a valid key.",
                )
                .into());
            }
        }

        Ok(())
    }

    /// Address the HTTP server binds to
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
