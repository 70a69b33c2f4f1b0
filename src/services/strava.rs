// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava API client for token refresh and activity listing.
//!
//! Handles:
//! - Exchanging the athlete's refresh token for an access token
//! - Paginated activity listing bounded by an `after`/`before` window
//! - Rate limit and token error detection

use crate::config::StravaConfig;
use crate::error::{AppError, Result};
use crate::models::StravaActivity;
use crate::time_utils::YearWindow;
use anyhow::Context;
use serde::Deserialize;
use std::time::Duration;

/// Page size used for activity listing (Strava's maximum).
pub const PER_PAGE: u32 = 200;

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Remote source of truth for activities.
///
/// Implemented by [`StravaClient`]; tests provide scripted sources.
#[allow(async_fn_in_trait)]
pub trait ActivitySource {
    /// Obtain a short-lived access token for this run.
    async fn refresh_access_token(&self) -> Result<String>;

    /// One page of activities started inside `window`. Pages are 1-based;
    /// an empty page means there are no more.
    async fn list_activities(
        &self,
        access_token: &str,
        window: &YearWindow,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<StravaActivity>>;
}

/// Strava API client.
#[derive(Clone)]
pub struct StravaClient {
    http: reqwest::Client,
    base_url: String,
    token_url: String,
    client_id: String,
    client_secret: String,
    refresh_token: String,
}

impl StravaClient {
    /// Create a new Strava client with OAuth credentials.
    pub fn new(config: &StravaConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .context("failed building Strava HTTP client")?;

        Ok(Self {
            http,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            token_url: config.token_url.clone(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            refresh_token: config.refresh_token.clone(),
        })
    }

    /// Check response and parse JSON body.
    async fn check_response_json<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> Result<T> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();

            if status.as_u16() == 429 {
                tracing::warn!("Strava rate limit hit (429)");
                return Err(AppError::StravaApi(AppError::STRAVA_RATE_LIMIT.to_string()));
            }

            if status.as_u16() == 401 {
                return Err(AppError::StravaApi(
                    AppError::STRAVA_TOKEN_ERROR.to_string(),
                ));
            }

            return Err(AppError::StravaApi(format!("HTTP {}: {}", status, body)));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::StravaApi(format!("JSON parse error: {}", e)))
    }
}

impl ActivitySource for StravaClient {
    async fn refresh_access_token(&self) -> Result<String> {
        let response = self
            .http
            .post(&self.token_url)
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("refresh_token", self.refresh_token.as_str()),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await
            .map_err(|e| AppError::StravaApi(format!("Token refresh request failed: {}", e)))?;

        let tokens: TokenRefreshResponse = self.check_response_json(response).await?;
        tracing::debug!(expires_at = tokens.expires_at, "Strava access token refreshed");
        if tokens.rotates(&self.refresh_token) {
            tracing::warn!("Strava issued a new refresh token; update STRAVA_REFRESH_TOKEN");
        }
        Ok(tokens.access_token)
    }

    async fn list_activities(
        &self,
        access_token: &str,
        window: &YearWindow,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<StravaActivity>> {
        let url = format!("{}/athlete/activities", self.base_url);

        let response = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .query(&[
                ("page", page.to_string()),
                ("per_page", per_page.to_string()),
                ("after", window.after_epoch().to_string()),
                ("before", window.before_epoch().to_string()),
            ])
            .send()
            .await
            .map_err(|e| AppError::StravaApi(e.to_string()))?;

        self.check_response_json(response).await
    }
}

/// Token refresh response from Strava.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenRefreshResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_at: i64,
}

impl TokenRefreshResponse {
    /// True when Strava replaced the refresh token we sent.
    pub fn rotates(&self, current: &str) -> bool {
        self.refresh_token
            .as_deref()
            .is_some_and(|token| !token.is_empty() && token != current)
    }
}
