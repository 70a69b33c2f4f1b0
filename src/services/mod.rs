// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - sync logic layer.

pub mod calendar;
pub mod mapper;
pub mod preflight;
pub mod strava;
pub mod sync;

pub use calendar::SeedOutcome;
pub use strava::{ActivitySource, StravaClient};
pub use sync::{ActivitySync, SyncReport};
