// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types.

/// Application error type shared by the Strava client, the store client
/// and the sync services.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    #[error("Strava API error: {0}")]
    StravaApi(String),

    #[error("InfluxDB error: {0}")]
    Store(String),

    #[error("Bucket '{bucket}' not found. Available buckets: {available:?}")]
    BucketNotFound {
        bucket: String,
        available: Vec<String>,
    },

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Message used when Strava rejects the access or refresh token.
    pub const STRAVA_TOKEN_ERROR: &'static str = "Strava token invalid or expired";

    /// Message used when Strava answers 429.
    pub const STRAVA_RATE_LIMIT: &'static str = "Strava rate limit exceeded";

    /// Check whether this is an authentication failure against Strava.
    pub fn is_strava_token_error(&self) -> bool {
        match self {
            AppError::StravaApi(msg) => {
                msg == Self::STRAVA_TOKEN_ERROR || msg.contains("invalid_grant")
            }
            _ => false,
        }
    }

    /// Check whether Strava rate-limited the request.
    pub fn is_strava_rate_limit(&self) -> bool {
        matches!(self, AppError::StravaApi(msg) if msg == Self::STRAVA_RATE_LIMIT)
    }
}

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, AppError>;
