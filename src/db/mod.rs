// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Time-series store layer (InfluxDB v2).

pub mod flux;
pub mod influx;

pub use influx::InfluxDb;

use crate::error::Result;
use crate::models::Point;
use crate::time_utils::YearWindow;
use std::collections::BTreeSet;

/// Measurement names as constants.
pub mod measurements {
    pub const ACTIVITIES: &str = "activities";
    pub const DAY_NUMBERS: &str = "day_numbers";
}

/// Time range used for delete-by-ID.
///
/// Deliberately much wider than any activity's timestamp so a delete is
/// never missed because of clock drift or a fallback timestamp.
pub const DELETE_RANGE_START: &str = "2010-01-01T00:00:00Z";
pub const DELETE_RANGE_STOP: &str = "2040-01-01T00:00:00Z";

/// Operations the sync services need from the store.
///
/// Implemented by [`InfluxDb`]; tests provide an in-memory implementation.
#[allow(async_fn_in_trait)]
pub trait TimeSeriesStore {
    /// Whether any point for this activity ID exists in the bucket.
    async fn activity_exists(&self, activity_id: u64) -> Result<bool>;

    /// Whether any day-number point exists for `year`.
    async fn day_numbers_exist(&self, year: i32) -> Result<bool>;

    /// Write points synchronously; returns once the store accepted them.
    async fn write_points(&self, points: &[Point]) -> Result<()>;

    /// Distinct activity IDs whose timestamp falls inside `window`.
    async fn stored_activity_ids(&self, window: &YearWindow) -> Result<BTreeSet<u64>>;

    /// Delete every point tagged with this activity ID.
    async fn delete_activity(&self, activity_id: u64) -> Result<()>;
}
