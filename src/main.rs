// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava to InfluxDB sync
//!
//! Checks the InfluxDB connection, seeds day numbers for the configured
//! year if needed, then reconciles that year's Strava activities.

use std::env;
use strava_influx_sync::config::{self, Config};
use strava_influx_sync::logging::init_logging;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    init_logging(config::log_format(&|key: &str| env::var(key).ok()));

    // Load configuration from environment
    let config = Config::from_env()
        .inspect_err(|e| tracing::error!(error = %e, "Failed to load configuration"))?;
    tracing::info!(year = config.year, bucket = %config.influx.bucket, "Starting Strava sync");

    let report = strava_influx_sync::run(&config).await.inspect_err(|e| {
        if e.is_strava_token_error() {
            tracing::error!(
                error = %e,
                "Strava rejected the refresh token; re-authorize and update STRAVA_REFRESH_TOKEN"
            );
        } else {
            tracing::error!(error = %e, "Sync run failed");
        }
    })?;

    if report.rate_limited {
        tracing::warn!(
            pages = report.pages,
            "Strava rate limit reached; rerun later to pick up remaining activities"
        );
    } else if !report.fetch_complete {
        tracing::warn!(
            pages = report.pages,
            "Activity listing stopped early; reconciled against a partial list"
        );
    }
    Ok(())
}
