//! Age-based reference values.
//!
//! Each table is an ascending list of `(max_age_months_inclusive, value)`
//! brackets followed by a fallback for older children. Lookups scan the
//! brackets in order and return the first one the age fits in.

use serde::{Deserialize, Serialize};

/// Typical awake time between sleeps, in minutes.
const WAKE_WINDOW_TABLE: &[(u32, u32)] = &[(1, 45), (3, 75), (6, 105), (9, 150)];
const WAKE_WINDOW_FALLBACK: u32 = 180;

/// Typical total sleep per 24 hours, in hours.
const DAILY_SLEEP_TABLE: &[(u32, u32)] = &[(1, 16), (3, 15), (6, 14), (12, 13)];
const DAILY_SLEEP_FALLBACK: u32 = 12;

fn lookup(table: &[(u32, u32)], fallback: u32, age_in_months: u32) -> u32 {
    table
        .iter()
        .find(|(max_age, _)| age_in_months <= *max_age)
        .map_or(fallback, |(_, value)| *value)
}

/// Recommended wake window (minutes) for a child of `age_in_months`.
pub fn recommended_wake_window(age_in_months: u32) -> u32 {
    lookup(WAKE_WINDOW_TABLE, WAKE_WINDOW_FALLBACK, age_in_months)
}

/// Recommended total daily sleep (hours) for a child of `age_in_months`.
pub fn recommended_daily_sleep(age_in_months: u32) -> u32 {
    lookup(DAILY_SLEEP_TABLE, DAILY_SLEEP_FALLBACK, age_in_months)
}

/// Both targets for one age.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeProfile {
    pub age_in_months: u32,
    pub wake_window_minutes: u32,
    pub daily_sleep_hours: u32,
}

pub fn age_profile(age_in_months: u32) -> AgeProfile {
    AgeProfile {
        age_in_months,
        wake_window_minutes: recommended_wake_window(age_in_months),
        daily_sleep_hours: recommended_daily_sleep(age_in_months),
    }
}
