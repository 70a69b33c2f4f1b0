// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory collaborators shared by the integration tests.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;
use strava_influx_sync::db::{measurements, TimeSeriesStore};
use strava_influx_sync::error::{AppError, Result};
use strava_influx_sync::models::{Point, StravaActivity};
use strava_influx_sync::services::mapper::activity_point;
use strava_influx_sync::services::ActivitySource;
use strava_influx_sync::time_utils::YearWindow;

/// Build a Strava activity with plausible values.
#[allow(dead_code)]
pub fn activity(id: u64, start_date: &str) -> StravaActivity {
    StravaActivity {
        id,
        activity_type: "Ride".to_string(),
        distance: 20_000.0 + id as f64,
        moving_time: 3_600,
        elapsed_time: 3_900,
        total_elevation_gain: 150.0,
        average_speed: 5.5,
        max_speed: 12.0,
        start_latlng: Some(vec![45.76, 4.83]),
        end_latlng: Some(vec![45.75, 4.85]),
        start_date: start_date.to_string(),
        start_date_local: start_date.to_string(),
        commute: false,
    }
}

/// Activities dated in April 2025, one per ID.
#[allow(dead_code)]
pub fn activities_2025(ids: &[u64]) -> Vec<StravaActivity> {
    ids.iter()
        .map(|&id| activity(id, &format!("2025-04-{:02}T07:30:00Z", (id % 28) + 1)))
        .collect()
}

/// Store backed by maps, counting every call that touches activities.
#[derive(Default)]
pub struct MemoryStore {
    pub activities: Mutex<BTreeMap<u64, Point>>,
    pub day_numbers: Mutex<Vec<Point>>,
    pub write_calls: Mutex<usize>,
    pub delete_calls: Mutex<usize>,
    /// Deletes of these IDs fail
    pub failing_deletes: Mutex<BTreeSet<u64>>,
    /// Every write fails when set
    pub fail_writes: Mutex<bool>,
}

#[allow(dead_code)]
impl MemoryStore {
    /// Store pre-populated with the mapped points of `activities`.
    pub fn with_activities(activities: &[StravaActivity]) -> Self {
        let store = Self::default();
        {
            let mut map = store.activities.lock().unwrap();
            for a in activities {
                map.insert(a.id, activity_point(a));
            }
        }
        store
    }

    pub fn ids(&self) -> BTreeSet<u64> {
        self.activities.lock().unwrap().keys().copied().collect()
    }

    pub fn writes(&self) -> usize {
        *self.write_calls.lock().unwrap()
    }

    pub fn deletes(&self) -> usize {
        *self.delete_calls.lock().unwrap()
    }
}

impl TimeSeriesStore for MemoryStore {
    async fn activity_exists(&self, activity_id: u64) -> Result<bool> {
        Ok(self.activities.lock().unwrap().contains_key(&activity_id))
    }

    async fn day_numbers_exist(&self, year: i32) -> Result<bool> {
        let year = year.to_string();
        Ok(self
            .day_numbers
            .lock()
            .unwrap()
            .iter()
            .any(|p| p.tags.get("year") == Some(&year)))
    }

    async fn write_points(&self, points: &[Point]) -> Result<()> {
        if *self.fail_writes.lock().unwrap() {
            return Err(AppError::Store("connection refused".to_string()));
        }
        *self.write_calls.lock().unwrap() += 1;

        for point in points {
            if point.measurement == measurements::DAY_NUMBERS {
                self.day_numbers.lock().unwrap().push(point.clone());
                continue;
            }
            let id: u64 = point.tags["id"].parse().unwrap();
            self.activities.lock().unwrap().insert(id, point.clone());
        }
        Ok(())
    }

    async fn stored_activity_ids(&self, window: &YearWindow) -> Result<BTreeSet<u64>> {
        Ok(self
            .activities
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, p)| window.contains(p.timestamp))
            .map(|(id, _)| *id)
            .collect())
    }

    async fn delete_activity(&self, activity_id: u64) -> Result<()> {
        *self.delete_calls.lock().unwrap() += 1;
        if self.failing_deletes.lock().unwrap().contains(&activity_id) {
            return Err(AppError::Store(format!("delete of {activity_id} rejected")));
        }
        self.activities.lock().unwrap().remove(&activity_id);
        Ok(())
    }
}

/// One scripted response of the activity list.
#[allow(dead_code)]
pub enum Page {
    Ok(Vec<StravaActivity>),
    Fail,
    RateLimited,
}

/// Activity source replaying scripted pages; pages past the script are empty.
pub struct ScriptedSource {
    pages: Vec<Page>,
    pub fail_token: bool,
    requested_pages: Mutex<Vec<u32>>,
}

#[allow(dead_code)]
impl ScriptedSource {
    pub fn new(pages: Vec<Page>) -> Self {
        Self {
            pages,
            fail_token: false,
            requested_pages: Mutex::new(Vec::new()),
        }
    }

    /// Split `activities` into pages of `per_page`.
    pub fn paged(activities: Vec<StravaActivity>, per_page: usize) -> Self {
        Self::new(
            activities
                .chunks(per_page)
                .map(|chunk| Page::Ok(chunk.to_vec()))
                .collect(),
        )
    }

    pub fn pages_requested(&self) -> Vec<u32> {
        self.requested_pages.lock().unwrap().clone()
    }
}

impl ActivitySource for ScriptedSource {
    async fn refresh_access_token(&self) -> Result<String> {
        if self.fail_token {
            return Err(AppError::StravaApi(AppError::STRAVA_TOKEN_ERROR.to_string()));
        }
        Ok("scripted-access-token".to_string())
    }

    async fn list_activities(
        &self,
        access_token: &str,
        _window: &YearWindow,
        page: u32,
        _per_page: u32,
    ) -> Result<Vec<StravaActivity>> {
        assert_eq!(access_token, "scripted-access-token");
        self.requested_pages.lock().unwrap().push(page);

        match self.pages.get(page as usize - 1) {
            Some(Page::Ok(activities)) => Ok(activities.clone()),
            Some(Page::Fail) => Err(AppError::StravaApi("HTTP 500: upstream".to_string())),
            Some(Page::RateLimited) => {
                Err(AppError::StravaApi(AppError::STRAVA_RATE_LIMIT.to_string()))
            }
            None => Ok(Vec::new()),
        }
    }
}
