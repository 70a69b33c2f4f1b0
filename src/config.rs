// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Configuration loaded once from environment variables at startup.
//!
//! A `.env` file in the working directory is honored for local runs.

use chrono::{Datelike, Utc};
use std::env;

pub const DEFAULT_STRAVA_API_URL: &str = "https://www.strava.com/api/v3";
pub const DEFAULT_STRAVA_TOKEN_URL: &str = "https://www.strava.com/oauth/token";

/// InfluxDB connection settings.
#[derive(Debug, Clone)]
pub struct InfluxConfig {
    /// Base URL, e.g. `http://localhost:8086`
    pub url: String,
    /// API token with read/write access to the bucket
    pub token: String,
    pub org: String,
    pub bucket: String,
}

/// Strava OAuth application and athlete credentials.
#[derive(Debug, Clone)]
pub struct StravaConfig {
    pub client_id: String,
    pub client_secret: String,
    /// Long-lived refresh token of the athlete being synced
    pub refresh_token: String,
    pub api_url: String,
    pub token_url: String,
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Full configuration of a sync run.
#[derive(Debug, Clone)]
pub struct Config {
    pub influx: InfluxConfig,
    pub strava: StravaConfig,
    /// Calendar year to seed and sync
    pub year: i32,
    pub log_format: LogFormat,
}

impl Default for InfluxConfig {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            url: "http://localhost:8086".to_string(),
            token: "test_influx_token".to_string(),
            org: "test-org".to_string(),
            bucket: "strava".to_string(),
        }
    }
}

impl Default for StravaConfig {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            client_id: "test_client_id".to_string(),
            client_secret: "test_secret".to_string(),
            refresh_token: "test_refresh_token".to_string(),
            api_url: DEFAULT_STRAVA_API_URL.to_string(),
            token_url: DEFAULT_STRAVA_TOKEN_URL.to_string(),
        }
    }
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            influx: InfluxConfig::default(),
            strava: StravaConfig::default(),
            year: 2025,
            log_format: LogFormat::Text,
        }
    }
}

impl InfluxConfig {
    /// Load InfluxDB settings from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(&|key: &str| env::var(key).ok())
    }

    /// Load InfluxDB settings through an arbitrary variable lookup.
    pub fn from_lookup(lookup: &dyn Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            url: required(lookup, "INFLUXDB_URL")?
                .trim_end_matches('/')
                .to_string(),
            token: required(lookup, "INFLUXDB_TOKEN")?,
            org: required(lookup, "INFLUXDB_ORG")?,
            bucket: required(lookup, "INFLUXDB_BUCKET")?,
        })
    }
}

impl StravaConfig {
    /// Load Strava settings through an arbitrary variable lookup.
    pub fn from_lookup(lookup: &dyn Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            client_id: required(lookup, "STRAVA_CLIENT_ID")?,
            client_secret: required(lookup, "STRAVA_CLIENT_SECRET")?,
            refresh_token: required(lookup, "STRAVA_REFRESH_TOKEN")?,
            api_url: optional(lookup, "STRAVA_API_URL")
                .unwrap_or_else(|| DEFAULT_STRAVA_API_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            token_url: optional(lookup, "STRAVA_TOKEN_URL")
                .unwrap_or_else(|| DEFAULT_STRAVA_TOKEN_URL.to_string()),
        })
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Every required variable must be present and non-empty; nothing
    /// touches the network until this succeeds.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present
        Self::from_lookup(&|key: &str| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: &dyn Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let influx = InfluxConfig::from_lookup(lookup)?;
        let strava = StravaConfig::from_lookup(lookup)?;

        Ok(Self {
            influx,
            strava,
            year: sync_year(lookup)?,
            log_format: log_format(lookup),
        })
    }
}

/// Read `SYNC_YEAR`, defaulting to the current UTC year.
pub fn sync_year(lookup: &dyn Fn(&str) -> Option<String>) -> Result<i32, ConfigError> {
    match optional(lookup, "SYNC_YEAR") {
        Some(raw) => raw
            .parse::<i32>()
            .ok()
            .filter(|y| (1970..=9999).contains(y))
            .ok_or(ConfigError::Invalid {
                name: "SYNC_YEAR",
                value: raw,
            }),
        None => Ok(Utc::now().year()),
    }
}

/// Read the requested log format; also used by binaries before config loads.
pub fn log_format(lookup: &dyn Fn(&str) -> Option<String>) -> LogFormat {
    match optional(lookup, "LOG_FORMAT").as_deref() {
        Some(f) if f.eq_ignore_ascii_case("json") => LogFormat::Json,
        _ => LogFormat::Text,
    }
}

fn required(
    lookup: &dyn Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<String, ConfigError> {
    optional(lookup, name).ok_or(ConfigError::Missing(name))
}

fn optional(lookup: &dyn Fn(&str) -> Option<String>, name: &str) -> Option<String> {
    lookup(name)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}
