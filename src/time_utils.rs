// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time formatting and year windows.

use chrono::{DateTime, NaiveDate, SecondsFormat, TimeZone, Utc};

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// UTC window covering one calendar year, from Jan 1 00:00:00 to
/// Dec 31 23:59:59.
///
/// `end` is exclusive everywhere it is used: Strava's `before` and Flux's
/// `range(stop:)` both drop points stamped exactly at the bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearWindow {
    pub year: i32,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl YearWindow {
    /// Window for `year`, or `None` if the year is outside chrono's range.
    pub fn new(year: i32) -> Option<Self> {
        let start = Utc.with_ymd_and_hms(year, 1, 1, 0, 0, 0).single()?;
        let end = Utc.with_ymd_and_hms(year, 12, 31, 23, 59, 59).single()?;
        Some(Self { year, start, end })
    }

    /// `after` bound for the Strava activity list (epoch seconds).
    pub fn after_epoch(&self) -> i64 {
        self.start.timestamp()
    }

    /// `before` bound for the Strava activity list (epoch seconds).
    pub fn before_epoch(&self) -> i64 {
        self.end.timestamp()
    }

    /// Half-open membership test, `start <= ts < end`.
    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        self.start <= ts && ts < self.end
    }
}

/// Every calendar date of `year`, January 1 through December 31.
pub fn days_of_year(year: i32) -> impl Iterator<Item = NaiveDate> {
    NaiveDate::from_ymd_opt(year, 1, 1)
        .into_iter()
        .flat_map(|first| first.iter_days())
        .take_while(move |d| chrono::Datelike::year(d) == year)
}
