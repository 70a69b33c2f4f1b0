// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Conversion of Strava activities into `activities` points.

use crate::db::measurements;
use crate::models::{Point, StravaActivity};
use chrono::{DateTime, NaiveDateTime, Utc};

/// Accepted `start_date` formats, tried in order.
const START_DATE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%SZ", "%Y-%m-%dT%H:%M:%S%.fZ"];

/// Parse a Strava `start_date` (UTC, `Z` suffix, optional fractional seconds).
pub fn parse_start_date(raw: &str) -> Option<DateTime<Utc>> {
    START_DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Build the stored point for one activity.
///
/// An unparsable start date does not drop the record: the point is stamped
/// with the current time instead and a warning is logged.
pub fn activity_point(activity: &StravaActivity) -> Point {
    let timestamp = parse_start_date(&activity.start_date).unwrap_or_else(|| {
        tracing::warn!(
            activity_id = activity.id,
            start_date = %activity.start_date,
            "Could not parse start date, using current time"
        );
        Utc::now()
    });

    Point::new(measurements::ACTIVITIES, timestamp)
        .tag("type", activity.activity_type.as_str())
        .tag("id", activity.id.to_string())
        .tag("commute", if activity.commute { "1" } else { "0" })
        .field("id", activity.id as i64)
        .field("distance", activity.distance)
        .field("moving_time", activity.moving_time)
        .field("elapsed_time", activity.elapsed_time)
        .field("total_elevation_gain", activity.total_elevation_gain)
        .field("average_speed", activity.average_speed)
        .field("max_speed", activity.max_speed)
        .field("start_latlng", format_latlng(activity.start_latlng.as_deref()))
        .field("end_latlng", format_latlng(activity.end_latlng.as_deref()))
        .field("start_date", activity.start_date.as_str())
        .field("start_date_local", activity.start_date_local.as_str())
        .field("commute", activity.commute)
}

/// Render coordinates as a bracketed list, `[]` when absent.
fn format_latlng(latlng: Option<&[f64]>) -> String {
    format!("{:?}", latlng.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FieldValue;
    use chrono::TimeZone;

    fn activity(start_date: &str) -> StravaActivity {
        StravaActivity {
            id: 13_406_822_212,
            activity_type: "Run".to_string(),
            distance: 10_012.3,
            moving_time: 3_125,
            elapsed_time: 3_300,
            total_elevation_gain: 41.0,
            average_speed: 3.204,
            max_speed: 5.1,
            start_latlng: Some(vec![48.85, 2.35]),
            end_latlng: Some(vec![]),
            start_date: start_date.to_string(),
            start_date_local: "2025-01-12T09:14:03Z".to_string(),
            commute: true,
        }
    }

    #[test]
    fn test_parse_start_date_seconds() {
        assert_eq!(
            parse_start_date("2025-01-12T08:14:03Z"),
            Some(Utc.with_ymd_and_hms(2025, 1, 12, 8, 14, 3).unwrap())
        );
    }

    #[test]
    fn test_parse_start_date_fractional() {
        let parsed = parse_start_date("2025-01-12T08:14:03.250Z").unwrap();
        assert_eq!(parsed.timestamp_subsec_millis(), 250);
    }

    #[test]
    fn test_parse_start_date_rejects_garbage() {
        assert_eq!(parse_start_date("yesterday"), None);
        assert_eq!(parse_start_date("2025-01-12 08:14:03"), None);
    }

    #[test]
    fn test_activity_point_tags_and_fields() {
        let point = activity_point(&activity("2025-01-12T08:14:03Z"));

        assert_eq!(point.measurement, "activities");
        assert_eq!(point.tags["type"], "Run");
        assert_eq!(point.tags["id"], "13406822212");
        assert_eq!(point.tags["commute"], "1");
        assert_eq!(
            point.get_field("id"),
            Some(&FieldValue::Integer(13_406_822_212))
        );
        assert_eq!(point.get_field("moving_time"), Some(&FieldValue::Integer(3_125)));
        assert_eq!(point.get_field("distance"), Some(&FieldValue::Float(10_012.3)));
        assert_eq!(
            point.get_field("start_latlng"),
            Some(&FieldValue::String("[48.85, 2.35]".to_string()))
        );
        assert_eq!(
            point.get_field("end_latlng"),
            Some(&FieldValue::String("[]".to_string()))
        );
        assert_eq!(point.get_field("commute"), Some(&FieldValue::Bool(true)));
        assert_eq!(
            point.timestamp,
            Utc.with_ymd_and_hms(2025, 1, 12, 8, 14, 3).unwrap()
        );
    }

    #[test]
    fn test_unparsable_start_date_falls_back_to_now() {
        let before = Utc::now();
        let point = activity_point(&activity("not a date"));
        let after = Utc::now();

        assert!(point.timestamp >= before && point.timestamp <= after);
        assert_eq!(
            point.get_field("start_date"),
            Some(&FieldValue::String("not a date".to_string()))
        );
    }

    #[test]
    fn test_missing_coordinates_render_empty_list() {
        let mut a = activity("2025-01-12T08:14:03Z");
        a.start_latlng = None;
        a.commute = false;
        let point = activity_point(&a);
        assert_eq!(
            point.get_field("start_latlng"),
            Some(&FieldValue::String("[]".to_string()))
        );
        assert_eq!(point.tags["commute"], "0");
    }
}
