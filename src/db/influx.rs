// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! InfluxDB v2 HTTP client with typed operations.
//!
//! Provides:
//! - Health and bucket listing (preflight)
//! - Line-protocol writes at nanosecond precision
//! - Flux queries, reading the `_value` column of the CSV response
//! - Predicate deletes over a time range

use crate::config::InfluxConfig;
use crate::db::{flux, TimeSeriesStore, DELETE_RANGE_START, DELETE_RANGE_STOP};
use crate::error::{AppError, Result};
use crate::models::point::{to_line_protocol, Point};
use crate::time_utils::YearWindow;
use anyhow::Context;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::time::Duration;

/// Per-request timeout for all InfluxDB calls.
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// InfluxDB client bound to one organization and bucket.
#[derive(Clone)]
pub struct InfluxDb {
    http: reqwest::Client,
    url: String,
    token: String,
    org: String,
    bucket: String,
}

/// Response of `GET /health`.
#[derive(Debug, Clone, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
}

impl HealthStatus {
    pub fn is_pass(&self) -> bool {
        self.status == "pass"
    }
}

#[derive(Debug, Deserialize)]
struct BucketList {
    #[serde(default)]
    buckets: Vec<BucketEntry>,
}

#[derive(Debug, Deserialize)]
struct BucketEntry {
    name: String,
}

#[derive(Serialize)]
struct QueryRequest<'a> {
    query: &'a str,
    #[serde(rename = "type")]
    kind: &'static str,
    dialect: Dialect,
}

#[derive(Serialize)]
struct Dialect {
    header: bool,
    annotations: Vec<String>,
    delimiter: &'static str,
}

#[derive(Serialize)]
struct DeleteRequest<'a> {
    start: &'a str,
    stop: &'a str,
    predicate: &'a str,
}

impl InfluxDb {
    /// Create a client from connection settings. No request is made.
    pub fn new(config: &InfluxConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .context("failed building InfluxDB HTTP client")?;

        Ok(Self {
            http,
            url: config.url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
            org: config.org.clone(),
            bucket: config.bucket.clone(),
        })
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    // ─── Preflight ───────────────────────────────────────────────

    /// Query the server health endpoint.
    pub async fn health(&self) -> Result<HealthStatus> {
        let response = self
            .http
            .get(format!("{}/health", self.url))
            .send()
            .await
            .map_err(|e| AppError::Store(format!("Health check failed: {}", e)))?;

        // An unhealthy server answers 503 with the same JSON body.
        if response.status().as_u16() == 503 {
            return response
                .json()
                .await
                .map_err(|e| AppError::Store(format!("Invalid health response: {}", e)));
        }

        self.check_response_json(response).await
    }

    /// Names of the buckets visible to this token in the organization.
    pub async fn list_buckets(&self) -> Result<Vec<String>> {
        let response = self
            .http
            .get(format!("{}/api/v2/buckets", self.url))
            .header(AUTHORIZATION, self.auth_header())
            .query(&[("org", self.org.as_str()), ("limit", "100")])
            .send()
            .await
            .map_err(|e| AppError::Store(e.to_string()))?;

        let list: BucketList = self.check_response_json(response).await?;
        Ok(list.buckets.into_iter().map(|b| b.name).collect())
    }

    // ─── Write / Query / Delete ──────────────────────────────────

    /// Run a Flux query and return the `_value` column of every row.
    pub async fn query_values(&self, query: &str) -> Result<Vec<String>> {
        let body = QueryRequest {
            query,
            kind: "flux",
            dialect: Dialect {
                header: true,
                annotations: Vec::new(),
                delimiter: ",",
            },
        };

        let response = self
            .http
            .post(format!("{}/api/v2/query", self.url))
            .header(AUTHORIZATION, self.auth_header())
            .header(ACCEPT, "application/csv")
            .query(&[("org", self.org.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Store(e.to_string()))?;

        let text = self
            .check_response(response)
            .await?
            .text()
            .await
            .map_err(|e| AppError::Store(format!("Failed to read query response: {}", e)))?;

        parse_value_column(&text)
    }

    /// Delete points matching `predicate` between `start` and `stop`.
    pub async fn delete(&self, start: &str, stop: &str, predicate: &str) -> Result<()> {
        let response = self
            .http
            .post(format!("{}/api/v2/delete", self.url))
            .header(AUTHORIZATION, self.auth_header())
            .query(&[("org", self.org.as_str()), ("bucket", self.bucket.as_str())])
            .json(&DeleteRequest {
                start,
                stop,
                predicate,
            })
            .send()
            .await
            .map_err(|e| AppError::Store(e.to_string()))?;

        self.check_response(response).await?;
        Ok(())
    }

    fn auth_header(&self) -> String {
        format!("Token {}", self.token)
    }

    /// Check response status and return error if not successful.
    async fn check_response(&self, response: reqwest::Response) -> Result<reqwest::Response> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        // Error bodies look like {"code":"not found","message":"bucket \"x\" not found"}
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from))
            .unwrap_or(body);

        if status.as_u16() == 401 {
            return Err(AppError::Store(format!("Unauthorized: {}", message)));
        }

        Err(AppError::Store(format!("HTTP {}: {}", status, message)))
    }

    /// Check response and parse JSON body.
    async fn check_response_json<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> Result<T> {
        self.check_response(response)
            .await?
            .json()
            .await
            .map_err(|e| AppError::Store(format!("JSON parse error: {}", e)))
    }
}

impl TimeSeriesStore for InfluxDb {
    async fn activity_exists(&self, activity_id: u64) -> Result<bool> {
        let rows = self
            .query_values(&flux::activity_exists(&self.bucket, activity_id))
            .await?;
        Ok(!rows.is_empty())
    }

    async fn day_numbers_exist(&self, year: i32) -> Result<bool> {
        let rows = self
            .query_values(&flux::day_numbers_exist(&self.bucket, year))
            .await?;
        Ok(!rows.is_empty())
    }

    async fn write_points(&self, points: &[Point]) -> Result<()> {
        if points.is_empty() {
            return Ok(());
        }
        let body = to_line_protocol(points)?;

        let response = self
            .http
            .post(format!("{}/api/v2/write", self.url))
            .header(AUTHORIZATION, self.auth_header())
            .header(CONTENT_TYPE, "text/plain; charset=utf-8")
            .query(&[
                ("org", self.org.as_str()),
                ("bucket", self.bucket.as_str()),
                ("precision", "ns"),
            ])
            .body(body)
            .send()
            .await
            .map_err(|e| AppError::Store(e.to_string()))?;

        self.check_response(response).await?;
        tracing::debug!(count = points.len(), bucket = %self.bucket, "Points written");
        Ok(())
    }

    async fn stored_activity_ids(&self, window: &YearWindow) -> Result<BTreeSet<u64>> {
        let rows = self
            .query_values(&flux::stored_activity_ids(&self.bucket, window))
            .await?;

        let mut ids = BTreeSet::new();
        for raw in rows {
            match raw.parse::<u64>() {
                Ok(id) => {
                    ids.insert(id);
                }
                Err(_) => tracing::warn!(value = %raw, "Ignoring non-numeric stored activity id"),
            }
        }
        Ok(ids)
    }

    async fn delete_activity(&self, activity_id: u64) -> Result<()> {
        self.delete(
            DELETE_RANGE_START,
            DELETE_RANGE_STOP,
            &flux::delete_activity_predicate(activity_id),
        )
        .await
    }
}

/// Extract the `_value` column from a Flux CSV response.
///
/// Each result table starts with its own header row (`,result,table,...`)
/// and column positions can differ between tables, so they are re-read at
/// every header. A query that fails after the server has started streaming
/// is reported in-band as a table headed `,error,reference`; that becomes an
/// error here rather than an empty result.
pub fn parse_value_column(body: &str) -> Result<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(body.as_bytes());

    let mut value_idx = None;
    let mut error_idx = None;
    let mut values = Vec::new();

    for record in reader.records() {
        let record =
            record.map_err(|e| AppError::Store(format!("Invalid CSV in query response: {}", e)))?;

        if record.iter().all(str::is_empty) {
            continue;
        }
        if matches!(record.get(1), Some("result") | Some("error")) {
            value_idx = record.iter().position(|f| f == "_value");
            error_idx = record.iter().position(|f| f == "error");
            continue;
        }
        if let Some(message) = error_idx.and_then(|idx| record.get(idx)) {
            return Err(AppError::Store(format!("Query failed: {}", message)));
        }
        if let Some(value) = value_idx.and_then(|idx| record.get(idx)) {
            values.push(value.to_string());
        }
    }

    Ok(values)
}
