// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Flux queries and delete predicates issued by the store client.

use crate::db::measurements;
use crate::time_utils::{format_utc_rfc3339, YearWindow};

/// Existence of one activity, keyed on its integer `id` field.
pub fn activity_exists(bucket: &str, activity_id: u64) -> String {
    format!(
        r#"from(bucket: "{bucket}")
  |> range(start: 0)
  |> filter(fn: (r) => r._measurement == "{measurement}" and r._field == "id" and r._value == {activity_id})
  |> limit(n: 1)"#,
        bucket = escape_string(bucket),
        measurement = measurements::ACTIVITIES,
    )
}

/// Existence of any day-number point for one year.
pub fn day_numbers_exist(bucket: &str, year: i32) -> String {
    format!(
        r#"from(bucket: "{bucket}")
  |> range(start: 0)
  |> filter(fn: (r) => r._measurement == "{measurement}" and r._field == "day_number" and r.year == "{year}")
  |> limit(n: 1)"#,
        bucket = escape_string(bucket),
        measurement = measurements::DAY_NUMBERS,
    )
}

/// Distinct stored activity IDs inside a year window.
pub fn stored_activity_ids(bucket: &str, window: &YearWindow) -> String {
    format!(
        r#"from(bucket: "{bucket}")
  |> range(start: {start}, stop: {stop})
  |> filter(fn: (r) => r._measurement == "{measurement}" and r._field == "id")
  |> group()
  |> distinct(column: "_value")"#,
        bucket = escape_string(bucket),
        start = format_utc_rfc3339(window.start),
        stop = format_utc_rfc3339(window.end),
        measurement = measurements::ACTIVITIES,
    )
}

/// Delete predicate matching every point of one activity.
pub fn delete_activity_predicate(activity_id: u64) -> String {
    format!(
        r#"_measurement="{}" AND id="{}""#,
        measurements::ACTIVITIES,
        activity_id
    )
}

fn escape_string(raw: &str) -> String {
    raw.replace('\\', "\\\\").replace('"', "\\\"")
}
