//! Session durations and period totals.

use serde::{Deserialize, Serialize};

use crate::session::{completed_sessions, SleepSession};

/// Totals over the completed sessions of a period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PeriodSummary {
    /// Sum of completed session durations
    pub total_minutes: f64,
    /// `total_minutes / count`, zero when there is no data
    pub avg_minutes: f64,
    /// Number of completed sessions
    pub count: u32,
}

/// Length of one session in minutes, never negative.
///
/// Sessions whose end is not after their start count as zero. An open
/// session also yields zero; callers are expected to filter those out first.
pub fn compute_duration(session: &SleepSession) -> f64 {
    session.duration_minutes().unwrap_or(0.0)
}

/// Total and average duration over the completed sessions in `sessions`.
///
/// Open sessions and sessions with a non-positive duration are skipped.
/// With no completed sessions the result is all zeros.
pub fn summarize_period(sessions: &[SleepSession]) -> PeriodSummary {
    let (total_minutes, count) = completed_sessions(sessions)
        .fold((0.0, 0u32), |(total, count), s| {
            (total + compute_duration(s), count + 1)
        });

    let avg_minutes = if count > 0 {
        total_minutes / f64::from(count)
    } else {
        0.0
    };

    PeriodSummary {
        total_minutes,
        avg_minutes,
        count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use proptest::prelude::*;

    fn utc_datetime(day: u32, hour: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, day, hour, min, 0).unwrap()
    }

    #[test]
    fn test_summarize_empty() {
        assert_eq!(summarize_period(&[]), PeriodSummary::default());
    }

    #[test]
    fn test_summarize_only_open_sessions() {
        let sessions = vec![SleepSession::open("a", utc_datetime(15, 8, 0))];
        let summary = summarize_period(&sessions);
        assert_eq!(summary.count, 0);
        assert_eq!(summary.total_minutes, 0.0);
        assert_eq!(summary.avg_minutes, 0.0);
    }

    #[test]
    fn test_summarize_mixed_day() {
        let sessions = vec![
            SleepSession::completed("1", utc_datetime(15, 8, 0), utc_datetime(15, 9, 30)),
            SleepSession::completed("2", utc_datetime(15, 11, 0), utc_datetime(15, 12, 0)),
            SleepSession::completed("3", utc_datetime(15, 19, 0), utc_datetime(16, 7, 0)),
            SleepSession::open("4", utc_datetime(16, 9, 0)),
        ];

        let summary = summarize_period(&sessions);
        assert_eq!(summary.count, 3);
        assert_eq!(summary.total_minutes, 870.0);
        assert_eq!(summary.avg_minutes, 290.0);
    }

    #[test]
    fn test_reversed_session_is_excluded() {
        let sessions = vec![
            SleepSession::completed("ok", utc_datetime(15, 8, 0), utc_datetime(15, 9, 0)),
            SleepSession::completed("bad", utc_datetime(15, 12, 0), utc_datetime(15, 11, 0)),
        ];

        let summary = summarize_period(&sessions);
        assert_eq!(summary.count, 1);
        assert_eq!(summary.avg_minutes, 60.0);
        assert_eq!(compute_duration(&sessions[1]), 0.0);
    }

    proptest! {
        #[test]
        fn duration_is_never_negative(start in 0i64..1_000_000, offset in -100_000i64..100_000) {
            let start_time = utc_datetime(1, 0, 0) + chrono::Duration::seconds(start);
            let end_time = start_time + chrono::Duration::seconds(offset);
            let session = SleepSession::completed("p", start_time, end_time);
            prop_assert!(compute_duration(&session) >= 0.0);
        }
    }
}
