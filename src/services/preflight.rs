// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Connectivity check run before any sync work.

use crate::db::InfluxDb;
use crate::error::{AppError, Result};

/// What the preflight check learned about the store.
#[derive(Debug, Clone)]
pub struct PreflightReport {
    pub status: String,
    pub version: Option<String>,
    pub bucket: String,
}

/// Verify the store answers healthy and the configured bucket exists.
///
/// This is a diagnostic gate only; the store can still fail later in the run.
pub async fn check_connection(db: &InfluxDb) -> Result<PreflightReport> {
    let health = db.health().await?;
    tracing::info!(status = %health.status, version = ?health.version, "InfluxDB connection");

    if !health.is_pass() {
        return Err(AppError::Store(format!(
            "InfluxDB reports status '{}': {}",
            health.status,
            health.message.unwrap_or_default()
        )));
    }

    let available = db.list_buckets().await?;
    if !available.iter().any(|name| name == db.bucket()) {
        return Err(AppError::BucketNotFound {
            bucket: db.bucket().to_string(),
            available,
        });
    }
    tracing::info!(bucket = %db.bucket(), "Bucket exists");

    Ok(PreflightReport {
        status: health.status,
        version: health.version,
        bucket: db.bucket().to_string(),
    })
}
