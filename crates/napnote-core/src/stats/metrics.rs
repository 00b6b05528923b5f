//! Aggregate sleep pattern metrics fed to the insights prompt and dashboards.

use chrono::TimeZone;
use serde::{Deserialize, Serialize};

use super::{classify_night_day, raw_average_wake_window, summarize_period};
use crate::session::SleepSession;

/// Derived pattern summary over a snapshot of sessions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SleepMetrics {
    /// Mean completed session length
    pub avg_duration_minutes: f64,
    /// Number of completed sessions
    pub total_sessions: u32,
    /// Unfiltered mean wake window (historical view)
    pub avg_wake_window_minutes: f64,
    /// Completed sessions starting between 19:00 and 07:00 local time
    pub night_count: u32,
    /// Completed sessions starting between 07:00 and 19:00 local time
    pub day_count: u32,
}

/// Summarize a snapshot into [`SleepMetrics`].
///
/// The wake-window figure is the raw historical mean, matching what a
/// caregiver sees as "average wake window" over the period. Predictions use
/// the filtered mean instead (see [`super::compute_average_wake_window`]).
pub fn analyze_patterns<Tz: TimeZone>(sessions: &[SleepSession], tz: &Tz) -> SleepMetrics {
    let summary = summarize_period(sessions);
    if summary.count == 0 {
        return SleepMetrics::default();
    }

    let split = classify_night_day(sessions, tz);

    let metrics = SleepMetrics {
        avg_duration_minutes: summary.avg_minutes,
        total_sessions: summary.count,
        avg_wake_window_minutes: raw_average_wake_window(sessions),
        night_count: split.night,
        day_count: split.day,
    };
    tracing::debug!(?metrics, "analyzed sleep patterns");
    metrics
}
