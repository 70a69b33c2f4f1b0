// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! One-shot day-number seeding.
//!
//! Writes every day of `SYNC_YEAR` (default: current year) to the
//! `day_numbers` measurement without checking for existing points. Only the
//! InfluxDB variables are required.

use std::env;
use strava_influx_sync::config::{self, InfluxConfig};
use strava_influx_sync::db::InfluxDb;
use strava_influx_sync::logging::init_logging;
use strava_influx_sync::services::{calendar, preflight};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let lookup = |key: &str| env::var(key).ok();
    init_logging(config::log_format(&lookup));

    let influx = InfluxConfig::from_env()
        .inspect_err(|e| tracing::error!(error = %e, "Failed to load configuration"))?;
    let year = config::sync_year(&lookup)
        .inspect_err(|e| tracing::error!(error = %e, "Failed to load configuration"))?;

    let db = InfluxDb::new(&influx)?;
    preflight::check_connection(&db).await?;

    let count = calendar::write_day_numbers(&db, year).await?;
    tracing::info!(year, count, "All day numbers inserted with success");
    Ok(())
}
