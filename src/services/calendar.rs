// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Day-of-year seeding.
//!
//! Writes one `day_numbers` point per calendar date, stamped at midnight,
//! carrying the 1-based ordinal of the date within its year.

use crate::db::{measurements, TimeSeriesStore};
use crate::error::{AppError, Result};
use crate::models::Point;
use crate::time_utils::days_of_year;
use chrono::{Datelike, NaiveDate};

/// Outcome of a seeding request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    /// Points for the year were already present; nothing was written.
    AlreadySeeded,
    /// This many points were written.
    Seeded(usize),
}

/// 1-based position of `date` within its year.
pub fn day_number(date: NaiveDate) -> u32 {
    date.ordinal()
}

/// The day-number point for one date.
pub fn day_number_point(date: NaiveDate) -> Point {
    let midnight = date.and_time(chrono::NaiveTime::MIN).and_utc();
    Point::new(measurements::DAY_NUMBERS, midnight)
        .tag("year", date.year().to_string())
        .field("day_number", i64::from(day_number(date)))
}

/// All day-number points of `year`, January 1 through December 31.
pub fn day_number_points(year: i32) -> Vec<Point> {
    days_of_year(year).map(day_number_point).collect()
}

/// Write the day numbers of `year` unconditionally.
pub async fn write_day_numbers<S: TimeSeriesStore>(store: &S, year: i32) -> Result<usize> {
    let points = day_number_points(year);
    if points.is_empty() {
        return Err(AppError::BadRequest(format!("Unsupported year {}", year)));
    }

    store.write_points(&points).await?;
    tracing::info!(year, count = points.len(), "Day numbers inserted");
    Ok(points.len())
}

/// Seed `year` unless any day-number point for it already exists.
///
/// All-or-nothing per year: a partially seeded year is left as is.
pub async fn seed_year_if_missing<S: TimeSeriesStore>(store: &S, year: i32) -> Result<SeedOutcome> {
    if store.day_numbers_exist(year).await? {
        tracing::info!(year, "Day numbers already present, skipping seed");
        return Ok(SeedOutcome::AlreadySeeded);
    }

    tracing::info!(year, "Seeding day numbers");
    let count = write_day_numbers(store, year).await?;
    Ok(SeedOutcome::Seeded(count))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FieldValue;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_day_number_non_leap_year() {
        assert_eq!(day_number(date(2025, 1, 1)), 1);
        assert_eq!(day_number(date(2025, 3, 1)), 60);
        assert_eq!(day_number(date(2025, 12, 31)), 365);
    }

    #[test]
    fn test_day_number_leap_year() {
        assert_eq!(day_number(date(2024, 2, 29)), 60);
        assert_eq!(day_number(date(2024, 3, 1)), 61);
        assert_eq!(day_number(date(2024, 12, 31)), 366);
    }

    #[test]
    fn test_day_number_points_cover_year() {
        let points = day_number_points(2024);
        assert_eq!(points.len(), 366);

        let first = &points[0];
        assert_eq!(first.measurement, "day_numbers");
        assert_eq!(first.tags["year"], "2024");
        assert_eq!(first.get_field("day_number"), Some(&FieldValue::Integer(1)));
        assert_eq!(
            first.to_line().unwrap(),
            "day_numbers,year=2024 day_number=1i 1704067200000000000"
        );

        let last = points.last().unwrap();
        assert_eq!(last.get_field("day_number"), Some(&FieldValue::Integer(366)));
    }

    #[test]
    fn test_day_number_points_are_consecutive_midnights() {
        let points = day_number_points(2025);
        for pair in points.windows(2) {
            assert_eq!(
                (pair[1].timestamp - pair[0].timestamp).num_hours(),
                24,
                "points must be one day apart"
            );
        }
    }
}
