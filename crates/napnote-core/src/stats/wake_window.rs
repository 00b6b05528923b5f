//! Wake windows: the awake time between two consecutive completed sessions.
//!
//! Two views are exposed:
//! - [`compute_wake_windows`] is the raw historical list. Every adjacent pair
//!   of completed sessions yields a window, including negative ones caused by
//!   overlapping entries and very long ones spanning a missed log.
//! - [`compute_average_wake_window`] is the filtered mean used for
//!   predictions. Only windows in `(0, MAX_PLAUSIBLE_WAKE_WINDOW_MIN]` count.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session::{completed_sessions, minutes_between, SleepSession};

/// Longest wake window (minutes) treated as real awake time.
pub const MAX_PLAUSIBLE_WAKE_WINDOW_MIN: f64 = 300.0;

/// Awake interval between two completed sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WakeWindow {
    /// End of the earlier session
    pub start: DateTime<Utc>,
    /// Start of the following session
    pub end: DateTime<Utc>,
    /// `end - start` in minutes; may be negative for overlapping records
    pub duration_minutes: f64,
}

impl WakeWindow {
    /// Whether the window is usable for averages that feed predictions.
    pub fn is_plausible(&self) -> bool {
        self.duration_minutes > 0.0 && self.duration_minutes <= MAX_PLAUSIBLE_WAKE_WINDOW_MIN
    }
}

/// Every wake window between chronologically adjacent completed sessions.
///
/// Completed sessions are ordered by `start_time` regardless of input order,
/// so `N` completed sessions always produce `max(0, N - 1)` windows.
pub fn compute_wake_windows(sessions: &[SleepSession]) -> Vec<WakeWindow> {
    let mut completed: Vec<&SleepSession> = completed_sessions(sessions).collect();
    completed.sort_by(|a, b| {
        a.start_time
            .cmp(&b.start_time)
            .then_with(|| a.end_time.cmp(&b.end_time))
            .then_with(|| a.id.cmp(&b.id))
    });

    completed
        .windows(2)
        .filter_map(|pair| {
            let start = pair[0].end_time?;
            let end = pair[1].start_time;
            Some(WakeWindow {
                start,
                end,
                duration_minutes: minutes_between(start, end),
            })
        })
        .collect()
}

/// Mean of the plausible wake windows, or `None` when none qualify.
pub fn compute_average_wake_window(sessions: &[SleepSession]) -> Option<f64> {
    let plausible: Vec<f64> = compute_wake_windows(sessions)
        .into_iter()
        .filter(WakeWindow::is_plausible)
        .map(|w| w.duration_minutes)
        .collect();

    if plausible.is_empty() {
        None
    } else {
        Some(plausible.iter().sum::<f64>() / plausible.len() as f64)
    }
}

/// Mean over every wake window without the plausibility filter, zero when
/// there are fewer than two completed sessions.
pub fn raw_average_wake_window(sessions: &[SleepSession]) -> f64 {
    let windows = compute_wake_windows(sessions);
    if windows.is_empty() {
        return 0.0;
    }
    windows.iter().map(|w| w.duration_minutes).sum::<f64>() / windows.len() as f64
}
