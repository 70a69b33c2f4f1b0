// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Strava activity model as returned by the activity list endpoint.

use serde::{Deserialize, Serialize};

/// Summary activity from `GET /athlete/activities`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StravaActivity {
    /// Strava activity ID (unique per athlete)
    pub id: u64,
    /// Activity type (Ride, Run, Hike, etc.)
    #[serde(rename = "type")]
    pub activity_type: String,
    /// Distance in meters
    pub distance: f64,
    /// Moving time in seconds
    pub moving_time: i64,
    /// Elapsed time in seconds
    pub elapsed_time: i64,
    /// Elevation gain in meters
    pub total_elevation_gain: f64,
    /// Average speed in meters per second
    pub average_speed: f64,
    /// Max speed in meters per second
    pub max_speed: f64,
    /// Start coordinates, empty for indoor activities
    #[serde(default)]
    pub start_latlng: Option<Vec<f64>>,
    #[serde(default)]
    pub end_latlng: Option<Vec<f64>>,
    /// Start date/time in UTC (ISO 8601, `Z` suffix)
    pub start_date: String,
    /// Start date/time in the athlete's local timezone
    pub start_date_local: String,
    #[serde(default)]
    pub commute: bool,
}
