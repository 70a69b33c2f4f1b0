// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Strava-Influx: mirror Strava activities into InfluxDB
//!
//! This crate reconciles a year of Strava activities with an InfluxDB v2
//! bucket and seeds a `day_numbers` measurement used to plot
//! year-over-year progress.

pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod models;
pub mod services;
pub mod time_utils;

use config::Config;
use db::InfluxDb;
use services::{calendar, preflight, ActivitySync, StravaClient, SyncReport};

/// Run one full pass: preflight, day-number seeding, then activity sync.
///
/// The store client lives for the duration of this call only.
pub async fn run(config: &Config) -> error::Result<SyncReport> {
    let db = InfluxDb::new(&config.influx)?;

    tracing::info!(url = %config.influx.url, "Checking InfluxDB connection");
    let preflight = preflight::check_connection(&db).await?;
    tracing::info!(
        status = %preflight.status,
        version = preflight.version.as_deref().unwrap_or("unknown"),
        bucket = %preflight.bucket,
        "Connection successful"
    );

    calendar::seed_year_if_missing(&db, config.year).await?;

    let strava = StravaClient::new(&config.strava)?;
    ActivitySync::new(&strava, &db).run(config.year).await
}
