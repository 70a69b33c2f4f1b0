// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity reconciliation between Strava and the time-series store.
//!
//! Handles the core workflow for one calendar year:
//! 1. Refresh the Strava access token
//! 2. Page through the year's activities, writing any not yet stored
//! 3. Read back the distinct activity IDs stored for the year
//! 4. Delete stored activities that Strava no longer returns
//!
//! Every step is keyed on the immutable activity ID, so re-running with
//! unchanged remote state writes and deletes nothing.

use crate::db::TimeSeriesStore;
use crate::error::{AppError, Result};
use crate::services::mapper::activity_point;
use crate::services::strava::{ActivitySource, PER_PAGE};
use crate::time_utils::YearWindow;
use std::collections::BTreeSet;

/// ID sets smaller than this are logged in full.
const DEBUG_ID_LIST_LIMIT: usize = 10;

/// Counts reported at the end of a sync run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Activities returned by Strava (duplicates across pages counted once)
    pub fetched: usize,
    /// Activities written to the store
    pub inserted: usize,
    /// Orphaned activities deleted from the store
    pub deleted: usize,
    /// Orphaned activities whose delete failed
    pub delete_failures: usize,
    /// Non-empty pages received
    pub pages: u32,
    /// False when pagination stopped on an error rather than an empty page
    pub fetch_complete: bool,
    /// Pagination stopped because Strava answered 429
    pub rate_limited: bool,
}

/// Reconciliation engine over a remote activity source and a store.
pub struct ActivitySync<'a, A, S> {
    source: &'a A,
    store: &'a S,
    per_page: u32,
}

impl<'a, A: ActivitySource, S: TimeSeriesStore> ActivitySync<'a, A, S> {
    pub fn new(source: &'a A, store: &'a S) -> Self {
        Self {
            source,
            store,
            per_page: PER_PAGE,
        }
    }

    /// Override the page size requested from the source.
    pub fn with_page_size(mut self, per_page: u32) -> Self {
        self.per_page = per_page.max(1);
        self
    }

    /// Reconcile the store with Strava for `year`.
    ///
    /// Fails only on setup errors (token) or store errors while inserting or
    /// listing; a failed page stops pagination and the run carries on with
    /// the IDs gathered so far.
    pub async fn run(&self, year: i32) -> Result<SyncReport> {
        let window = YearWindow::new(year)
            .ok_or_else(|| AppError::BadRequest(format!("Unsupported year {}", year)))?;

        let access_token = self.source.refresh_access_token().await?;
        tracing::info!(year, "Strava access token acquired");

        let mut report = SyncReport::default();
        let remote_ids = self.fetch_and_insert(&access_token, &window, &mut report).await?;
        tracing::info!(count = remote_ids.len(), "Retrieved activities from Strava");

        let stored_ids = self.store.stored_activity_ids(&window).await?;
        tracing::info!(count = stored_ids.len(), "Found activities in InfluxDB");

        if stored_ids.len() < DEBUG_ID_LIST_LIMIT {
            tracing::debug!(ids = ?stored_ids, "Stored IDs");
        }
        if remote_ids.len() < DEBUG_ID_LIST_LIMIT {
            tracing::debug!(ids = ?remote_ids, "Strava IDs");
        }

        let orphaned: Vec<u64> = stored_ids.difference(&remote_ids).copied().collect();
        tracing::info!(count = orphaned.len(), "Found activities to delete");

        for activity_id in orphaned {
            tracing::info!(activity_id, "Activity no longer exists in Strava, deleting");
            match self.store.delete_activity(activity_id).await {
                Ok(()) => {
                    report.deleted += 1;
                    tracing::info!(activity_id, "Activity deleted from InfluxDB");
                }
                Err(e) => {
                    report.delete_failures += 1;
                    tracing::warn!(activity_id, error = %e, "Error deleting activity");
                }
            }
        }

        tracing::info!(
            year,
            fetched = report.fetched,
            inserted = report.inserted,
            deleted = report.deleted,
            delete_failures = report.delete_failures,
            "Synchronization complete"
        );
        Ok(report)
    }

    /// Page through the window, writing activities missing from the store.
    /// Returns the set of remote IDs seen.
    async fn fetch_and_insert(
        &self,
        access_token: &str,
        window: &YearWindow,
        report: &mut SyncReport,
    ) -> Result<BTreeSet<u64>> {
        let mut remote_ids = BTreeSet::new();
        let mut page = 1u32;

        loop {
            tracing::info!(page, "Fetching page of activities");
            let activities = match self
                .source
                .list_activities(access_token, window, page, self.per_page)
                .await
            {
                Ok(activities) => activities,
                Err(e) if e.is_strava_rate_limit() => {
                    tracing::warn!(page, "Strava rate limited, reconciling partial list");
                    report.rate_limited = true;
                    return Ok(remote_ids);
                }
                Err(e) => {
                    tracing::error!(page, error = %e, "Error retrieving activities page");
                    return Ok(remote_ids);
                }
            };

            if activities.is_empty() {
                tracing::info!(pages = page - 1, "No more activities");
                report.fetch_complete = true;
                return Ok(remote_ids);
            }

            report.pages += 1;
            tracing::info!(page, count = activities.len(), "Retrieved activities");

            for activity in &activities {
                if !remote_ids.insert(activity.id) {
                    continue;
                }
                report.fetched += 1;

                if self.store.activity_exists(activity.id).await? {
                    continue;
                }

                self.store.write_points(&[activity_point(activity)]).await?;
                report.inserted += 1;
                tracing::info!(activity_id = activity.id, "Activity added");
            }

            page += 1;
        }
    }
}

