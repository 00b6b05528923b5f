//! Next-event prediction: when the child will likely wake, or when the next
//! nap is due.
//!
//! Predictions never fail. Missing history degrades to the age-based
//! recommendation tables, and an empty snapshot yields
//! [`PredictedEvent::ReadyToTrack`].

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::recommend::recommended_wake_window;
use crate::session::{
    active_session, completed_sessions, recent_sessions, SleepSession, RECENT_WINDOW_DAYS,
};
use crate::stats::{compute_average_wake_window, compute_duration};

/// How many of the most recent completed sessions feed the wake estimate.
pub const RECENT_SESSION_SAMPLE: usize = 10;

/// A nap this close (minutes) is reported as due soon.
pub const DUE_SOON_MINUTES: f64 = 15.0;

/// Urgency of the next nap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NapBand {
    DueNow,
    DueSoon,
    NotYet,
}

impl NapBand {
    pub fn from_minutes_until(minutes: f64) -> Self {
        if minutes <= 0.0 {
            NapBand::DueNow
        } else if minutes <= DUE_SOON_MINUTES {
            NapBand::DueSoon
        } else {
            NapBand::NotYet
        }
    }
}

/// Where the wake window used for a nap prediction came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowSource {
    /// Filtered average of the child's own wake windows
    Historical,
    /// Age-based reference value
    Recommended,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PredictedEvent {
    /// No active session and nothing completed yet
    ReadyToTrack,
    Sleeping {
        session_id: String,
        started_at: DateTime<Utc>,
        elapsed_minutes: i64,
        /// Start plus the recent average duration, when history exists
        predicted_wake_at: Option<DateTime<Utc>>,
        /// Present only while the predicted wake time is still ahead
        minutes_until_wake: Option<i64>,
    },
    Awake {
        last_woke_at: DateTime<Utc>,
        minutes_awake: i64,
        window_minutes: f64,
        window_source: WindowSource,
        minutes_until_next_nap: f64,
        band: NapBand,
    },
}

/// Mean duration of the most recently started completed sessions.
pub fn average_recent_duration(sessions: &[SleepSession]) -> Option<f64> {
    let mut completed: Vec<&SleepSession> = completed_sessions(sessions).collect();
    if completed.is_empty() {
        return None;
    }
    completed.sort_by(|a, b| b.start_time.cmp(&a.start_time));
    completed.truncate(RECENT_SESSION_SAMPLE);

    let total: f64 = completed.iter().map(|s| compute_duration(s)).sum();
    Some(total / completed.len() as f64)
}

fn whole_minutes(from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
    (to - from).num_minutes().max(0)
}

/// Predict the next event given the snapshot and an optional active session.
///
/// `sessions` may contain the active session itself; open sessions never
/// contribute to averages.
pub fn predict_next_event(
    sessions: &[SleepSession],
    active: Option<&SleepSession>,
    age_in_months: u32,
    now: DateTime<Utc>,
) -> PredictedEvent {
    if let Some(active) = active {
        return predict_wake(sessions, active, now);
    }

    let last_completed = completed_sessions(sessions).max_by_key(|s| s.start_time);
    let Some(last_woke_at) = last_completed.and_then(|s| s.end_time) else {
        return PredictedEvent::ReadyToTrack;
    };

    let (window_minutes, window_source) = match compute_average_wake_window(sessions) {
        Some(avg) => (avg, WindowSource::Historical),
        None => (
            f64::from(recommended_wake_window(age_in_months)),
            WindowSource::Recommended,
        ),
    };

    let minutes_awake = whole_minutes(last_woke_at, now);
    let minutes_until_next_nap = (window_minutes - minutes_awake as f64).max(0.0);
    let band = NapBand::from_minutes_until(minutes_until_next_nap);

    tracing::debug!(
        minutes_awake,
        window_minutes,
        ?window_source,
        ?band,
        "predicted next nap"
    );

    PredictedEvent::Awake {
        last_woke_at,
        minutes_awake,
        window_minutes,
        window_source,
        minutes_until_next_nap,
        band,
    }
}

fn predict_wake(
    sessions: &[SleepSession],
    active: &SleepSession,
    now: DateTime<Utc>,
) -> PredictedEvent {
    let elapsed_minutes = whole_minutes(active.start_time, now);

    let predicted_wake_at = average_recent_duration(sessions).map(|avg| {
        active.start_time + Duration::milliseconds((avg * 60_000.0).round() as i64)
    });

    let minutes_until_wake = predicted_wake_at
        .map(|wake| (wake - now).num_minutes())
        .filter(|minutes| *minutes > 0);

    PredictedEvent::Sleeping {
        session_id: active.id.clone(),
        started_at: active.start_time,
        elapsed_minutes,
        predicted_wake_at,
        minutes_until_wake,
    }
}

/// [`predict_next_event`] over the past week of the snapshot, with the
/// active session taken from that week. Sessions after `now` are ignored.
pub fn predict_from_snapshot(
    sessions: &[SleepSession],
    age_in_months: u32,
    now: DateTime<Utc>,
) -> PredictedEvent {
    let recent = recent_sessions(sessions, now, RECENT_WINDOW_DAYS);
    predict_next_event(&recent, active_session(&recent), age_in_months, now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc_datetime(day: u32, hour: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, day, hour, min, 0).unwrap()
    }

    #[test]
    fn test_empty_snapshot_is_ready_to_track() {
        let event = predict_next_event(&[], None, 4, utc_datetime(15, 12, 0));
        assert_eq!(event, PredictedEvent::ReadyToTrack);
    }

    #[test]
    fn test_open_session_without_history_reports_elapsed_only() {
        let now = utc_datetime(15, 12, 0);
        let active = SleepSession::open("a", now - Duration::minutes(45));
        let sessions = vec![active.clone()];

        let event = predict_next_event(&sessions, Some(&active), 4, now);
        assert_eq!(
            event,
            PredictedEvent::Sleeping {
                session_id: "a".to_string(),
                started_at: active.start_time,
                elapsed_minutes: 45,
                predicted_wake_at: None,
                minutes_until_wake: None,
            }
        );
    }

    #[test]
    fn test_open_session_with_history_predicts_wake() {
        let now = utc_datetime(15, 14, 30);
        let active = SleepSession::open("current", utc_datetime(15, 14, 0));
        let sessions = vec![
            SleepSession::completed("1", utc_datetime(15, 8, 0), utc_datetime(15, 9, 0)),
            SleepSession::completed("2", utc_datetime(15, 11, 0), utc_datetime(15, 12, 30)),
            active.clone(),
        ];

        match predict_from_snapshot(&sessions, 4, now) {
            PredictedEvent::Sleeping {
                elapsed_minutes,
                predicted_wake_at,
                minutes_until_wake,
                ..
            } => {
                assert_eq!(elapsed_minutes, 30);
                // mean of 60 and 90
                assert_eq!(predicted_wake_at, Some(utc_datetime(15, 15, 15)));
                assert_eq!(minutes_until_wake, Some(45));
            }
            other => panic!("expected sleeping, got {other:?}"),
        }
    }

    #[test]
    fn test_overdue_wake_has_no_countdown() {
        let now = utc_datetime(15, 18, 0);
        let active = SleepSession::open("current", utc_datetime(15, 14, 0));
        let sessions = vec![SleepSession::completed(
            "1",
            utc_datetime(15, 8, 0),
            utc_datetime(15, 9, 0),
        )];

        match predict_next_event(&sessions, Some(&active), 4, now) {
            PredictedEvent::Sleeping {
                predicted_wake_at,
                minutes_until_wake,
                ..
            } => {
                assert_eq!(predicted_wake_at, Some(utc_datetime(15, 15, 0)));
                assert_eq!(minutes_until_wake, None);
            }
            other => panic!("expected sleeping, got {other:?}"),
        }
    }

    #[test]
    fn test_recent_average_uses_last_ten_sessions() {
        let mut sessions: Vec<SleepSession> = (0..10)
            .map(|i| {
                let start = utc_datetime(10 + i, 9, 0);
                SleepSession::completed(format!("recent{i}"), start, start + Duration::minutes(60))
            })
            .collect();
        // Older and much longer; must be ignored
        sessions.push(SleepSession::completed(
            "old",
            utc_datetime(1, 9, 0),
            utc_datetime(1, 19, 0),
        ));

        assert_eq!(average_recent_duration(&sessions), Some(60.0));
    }

    #[test]
    fn test_awake_falls_back_to_recommended_window() {
        let sessions = vec![SleepSession::completed(
            "1",
            utc_datetime(15, 8, 0),
            utc_datetime(15, 9, 0),
        )];

        let event = predict_next_event(&sessions, None, 5, utc_datetime(15, 10, 0));
        assert_eq!(
            event,
            PredictedEvent::Awake {
                last_woke_at: utc_datetime(15, 9, 0),
                minutes_awake: 60,
                window_minutes: 105.0,
                window_source: WindowSource::Recommended,
                minutes_until_next_nap: 45.0,
                band: NapBand::NotYet,
            }
        );
    }

    #[test]
    fn test_awake_uses_historical_window_and_bands() {
        let sessions = vec![
            SleepSession::completed("1", utc_datetime(15, 7, 0), utc_datetime(15, 8, 0)),
            SleepSession::completed("2", utc_datetime(15, 9, 30), utc_datetime(15, 10, 30)),
        ];

        let soon = predict_next_event(&sessions, None, 5, utc_datetime(15, 11, 50));
        match soon {
            PredictedEvent::Awake {
                window_minutes,
                window_source,
                minutes_until_next_nap,
                band,
                ..
            } => {
                assert_eq!(window_minutes, 90.0);
                assert_eq!(window_source, WindowSource::Historical);
                assert_eq!(minutes_until_next_nap, 10.0);
                assert_eq!(band, NapBand::DueSoon);
            }
            other => panic!("expected awake, got {other:?}"),
        }

        let overdue = predict_next_event(&sessions, None, 5, utc_datetime(15, 13, 0));
        match overdue {
            PredictedEvent::Awake {
                minutes_awake,
                minutes_until_next_nap,
                band,
                ..
            } => {
                assert_eq!(minutes_awake, 150);
                assert_eq!(minutes_until_next_nap, 0.0);
                assert_eq!(band, NapBand::DueNow);
            }
            other => panic!("expected awake, got {other:?}"),
        }
    }

    #[test]
    fn test_snapshot_prediction_ignores_later_sessions() {
        let sessions = vec![
            SleepSession::completed("past", utc_datetime(15, 8, 0), utc_datetime(15, 9, 0)),
            SleepSession::completed("later", utc_datetime(20, 8, 0), utc_datetime(20, 9, 0)),
        ];

        let event = predict_from_snapshot(&sessions, 5, utc_datetime(15, 10, 0));
        assert_eq!(
            event,
            PredictedEvent::Awake {
                last_woke_at: utc_datetime(15, 9, 0),
                minutes_awake: 60,
                window_minutes: 105.0,
                window_source: WindowSource::Recommended,
                minutes_until_next_nap: 45.0,
                band: NapBand::NotYet,
            }
        );
    }

    #[test]
    fn test_snapshot_prediction_uses_past_week_only() {
        let sessions = vec![SleepSession::completed(
            "stale",
            utc_datetime(1, 8, 0),
            utc_datetime(1, 9, 0),
        )];

        let event = predict_from_snapshot(&sessions, 5, utc_datetime(15, 10, 0));
        assert_eq!(event, PredictedEvent::ReadyToTrack);
    }

    #[test]
    fn test_band_thresholds() {
        assert_eq!(NapBand::from_minutes_until(0.0), NapBand::DueNow);
        assert_eq!(NapBand::from_minutes_until(15.0), NapBand::DueSoon);
        assert_eq!(NapBand::from_minutes_until(15.5), NapBand::NotYet);
    }

    #[test]
    fn test_serialized_state_tag() {
        let json = serde_json::to_value(PredictedEvent::ReadyToTrack).unwrap();
        assert_eq!(json["state"], "ready_to_track");
    }
}
