// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use strava_influx_sync::config::ConfigError;
use strava_influx_sync::error::AppError;

#[test]
fn test_is_strava_token_error_matches() {
    let err = AppError::StravaApi(AppError::STRAVA_TOKEN_ERROR.to_string());
    assert!(err.is_strava_token_error());

    let err = AppError::StravaApi("HTTP 400 Bad Request: invalid_grant".to_string());
    assert!(err.is_strava_token_error());

}

#[test]
fn test_is_strava_token_error_no_match() {
    let err = AppError::StravaApi(AppError::STRAVA_RATE_LIMIT.to_string());
    assert!(!err.is_strava_token_error());
    assert!(err.is_strava_rate_limit());

    let err = AppError::StravaApi("HTTP 500 Internal Server Error".to_string());
    assert!(!err.is_strava_token_error());

    let err = AppError::Store("token rejected".to_string());
    assert!(!err.is_strava_token_error());

    let err = AppError::StravaApi(
        "JSON parse error: missing field `access_token` at line 1 column 2".to_string(),
    );
    assert!(!err.is_strava_token_error());
}

#[test]
fn test_internal_error_from_anyhow() {
    let err: AppError = anyhow::anyhow!("failed building InfluxDB HTTP client").into();
    assert!(matches!(err, AppError::Internal(_)));
    assert_eq!(
        err.to_string(),
        "Internal error: failed building InfluxDB HTTP client"
    );
}

#[test]
fn test_error_messages() {
    let err = AppError::BucketNotFound {
        bucket: "strava".to_string(),
        available: vec!["_tasks".to_string()],
    };
    assert_eq!(
        err.to_string(),
        "Bucket 'strava' not found. Available buckets: [\"_tasks\"]"
    );

    let err: AppError = ConfigError::Missing("INFLUXDB_URL").into();
    assert_eq!(
        err.to_string(),
        "Configuration error: Missing required environment variable: INFLUXDB_URL"
    );
}
