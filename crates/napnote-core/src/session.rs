//! Sleep session records and the child profile they belong to.
//!
//! A [`SleepSession`] is a read-only snapshot of one sleep interval. Sessions
//! are *open* while `end_time` is absent (the child is asleep right now) and
//! *completed* once `end_time` is present and strictly after `start_time`.
//! Records whose end is not after their start are kept in the snapshot but
//! carry no weight in any aggregate.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Average month length used to turn a birth date into an age bracket.
pub const DAYS_PER_MONTH: f64 = 30.44;

/// History considered by the time-relative views: the past week.
pub const RECENT_WINDOW_DAYS: u32 = 7;

/// Informational category of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SleepType {
    Nap,
    Night,
}

/// One logged sleep interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleepSession {
    /// Opaque unique identifier
    pub id: String,
    /// When the child fell asleep
    pub start_time: DateTime<Utc>,
    /// When the child woke up; `None` while still asleep
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sleep_type: Option<SleepType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wake_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl SleepSession {
    /// Create an open session starting at `start_time`.
    pub fn open(id: impl Into<String>, start_time: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            start_time,
            end_time: None,
            sleep_type: None,
            location: None,
            wake_reason: None,
            notes: None,
        }
    }

    /// Create a session with both timestamps.
    pub fn completed(
        id: impl Into<String>,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Self {
        Self {
            end_time: Some(end_time),
            ..Self::open(id, start_time)
        }
    }

    pub fn with_type(mut self, sleep_type: SleepType) -> Self {
        self.sleep_type = Some(sleep_type);
        self
    }

    /// True while the child is still asleep in this session.
    pub fn is_open(&self) -> bool {
        self.end_time.is_none()
    }

    /// True when the session has an end strictly after its start.
    pub fn is_completed(&self) -> bool {
        matches!(self.end_time, Some(end) if end > self.start_time)
    }

    /// Length of the session in minutes, clamped to zero.
    ///
    /// Returns `None` for open sessions.
    pub fn duration_minutes(&self) -> Option<f64> {
        self.end_time
            .map(|end| minutes_between(self.start_time, end).max(0.0))
    }

    /// Minutes elapsed since the session started, clamped to zero.
    pub fn elapsed_minutes(&self, now: DateTime<Utc>) -> f64 {
        minutes_between(self.start_time, now).max(0.0)
    }
}

/// Signed number of minutes from `from` to `to`, with sub-minute precision.
pub fn minutes_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    (to - from).num_milliseconds() as f64 / 60_000.0
}

/// Completed sessions in the order they appear in the input.
pub fn completed_sessions(sessions: &[SleepSession]) -> impl Iterator<Item = &SleepSession> {
    sessions.iter().filter(|s| s.is_completed())
}

/// Sessions that started within `[from, to]`, in input order.
pub fn sessions_between(
    sessions: &[SleepSession],
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> Vec<SleepSession> {
    sessions
        .iter()
        .filter(|s| s.start_time >= from && s.start_time <= to)
        .cloned()
        .collect()
}

/// Sessions that started in the `days` leading up to `now`. Anything that
/// starts after `now` is left out.
pub fn recent_sessions(
    sessions: &[SleepSession],
    now: DateTime<Utc>,
    days: u32,
) -> Vec<SleepSession> {
    let since = now
        .checked_sub_signed(Duration::days(i64::from(days)))
        .unwrap_or(DateTime::<Utc>::MIN_UTC);
    sessions_between(sessions, since, now)
}

/// Whether the child is currently asleep or awake, as observed from a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SleepState {
    Awake,
    Asleep,
}

/// The most recently started open session, if any.
pub fn active_session(sessions: &[SleepSession]) -> Option<&SleepSession> {
    sessions
        .iter()
        .filter(|s| s.is_open())
        .max_by_key(|s| s.start_time)
}

/// Current state of the child derived from the presence of an open session.
pub fn sleep_state(sessions: &[SleepSession]) -> SleepState {
    if active_session(sessions).is_some() {
        SleepState::Asleep
    } else {
        SleepState::Awake
    }
}

/// The child whose sleep is being tracked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildProfile {
    pub name: String,
    pub birth_date: NaiveDate,
}

impl ChildProfile {
    pub fn new(name: impl Into<String>, birth_date: NaiveDate) -> Self {
        Self {
            name: name.into(),
            birth_date,
        }
    }

    /// Whole months since birth at `now`, zero for birth dates in the future.
    pub fn age_in_months(&self, now: DateTime<Utc>) -> u32 {
        age_in_months(self.birth_date, now)
    }
}

/// Whole months between `birth_date` (midnight UTC) and `now`.
pub fn age_in_months(birth_date: NaiveDate, now: DateTime<Utc>) -> u32 {
    let born = birth_date.and_time(NaiveTime::MIN).and_utc();
    let days = (now - born).num_milliseconds() as f64 / 86_400_000.0;
    if days <= 0.0 {
        return 0;
    }
    (days / DAYS_PER_MONTH).floor() as u32
}

/// Parse an RFC 3339 timestamp into UTC.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, ValidationError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| ValidationError::InvalidTimestamp {
            value: value.to_string(),
            message: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(hour: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, hour, min, 0).unwrap()
    }

    #[test]
    fn completed_requires_end_after_start() {
        assert!(SleepSession::completed("a", at(8, 0), at(9, 0)).is_completed());
        assert!(!SleepSession::completed("b", at(9, 0), at(9, 0)).is_completed());
        assert!(!SleepSession::completed("c", at(9, 0), at(8, 0)).is_completed());
        assert!(!SleepSession::open("d", at(9, 0)).is_completed());
    }

    #[test]
    fn duration_is_clamped_to_zero() {
        let reversed = SleepSession::completed("r", at(10, 0), at(9, 30));
        assert_eq!(reversed.duration_minutes(), Some(0.0));

        let normal = SleepSession::completed("n", at(8, 0), at(9, 30));
        assert_eq!(normal.duration_minutes(), Some(90.0));

        assert_eq!(SleepSession::open("o", at(8, 0)).duration_minutes(), None);
    }

    #[test]
    fn active_session_picks_latest_open() {
        let sessions = vec![
            SleepSession::open("stale", at(6, 0)),
            SleepSession::completed("done", at(7, 0), at(8, 0)),
            SleepSession::open("current", at(10, 0)),
        ];
        assert_eq!(active_session(&sessions).map(|s| s.id.as_str()), Some("current"));
        assert_eq!(sleep_state(&sessions), SleepState::Asleep);
        assert_eq!(sleep_state(&sessions[1..2]), SleepState::Awake);
    }

    #[test]
    fn recent_sessions_stop_at_now() {
        let week = Duration::days(8);
        let sessions = vec![
            SleepSession::completed("old", at(8, 0) - week, at(9, 0) - week),
            SleepSession::completed("past", at(8, 0), at(9, 0)),
            SleepSession::open("later", at(10, 30)),
        ];

        let recent = recent_sessions(&sessions, at(10, 0), RECENT_WINDOW_DAYS);
        let ids: Vec<&str> = recent.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["past"]);
    }

    #[test]
    fn recent_sessions_with_huge_window_keep_all_history() {
        let sessions = vec![
            SleepSession::completed("ancient", at(8, 0) - Duration::days(20_000), at(9, 0)),
            SleepSession::completed("past", at(8, 0), at(9, 0)),
        ];

        assert_eq!(recent_sessions(&sessions, at(10, 0), u32::MAX).len(), 2);
    }

    #[test]
    fn age_uses_average_month_length() {
        let birth = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let born = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

        assert_eq!(age_in_months(birth, born + Duration::days(30)), 0);
        assert_eq!(age_in_months(birth, born + Duration::days(31)), 1);
        // 6 * 30.44 = 182.64
        assert_eq!(age_in_months(birth, born + Duration::days(182)), 5);
        assert_eq!(age_in_months(birth, born + Duration::days(183)), 6);
    }

    #[test]
    fn age_is_zero_before_birth() {
        let profile = ChildProfile::new("Ada", NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());
        assert_eq!(profile.age_in_months(at(12, 0)), 0);
    }

    #[test]
    fn deserializes_store_rows() {
        let json = r#"[
            {"id": "1", "start_time": "2024-01-15T08:00:00.000+00:00", "end_time": "2024-01-15T09:30:00Z", "sleep_type": "nap"},
            {"id": "2", "start_time": "2024-01-15T11:00:00Z", "end_time": null, "notes": "car seat"}
        ]"#;
        let sessions: Vec<SleepSession> = serde_json::from_str(json).unwrap();

        assert_eq!(sessions[0].sleep_type, Some(SleepType::Nap));
        assert_eq!(sessions[0].duration_minutes(), Some(90.0));
        assert!(sessions[1].is_open());
        assert_eq!(sessions[1].notes.as_deref(), Some("car seat"));
    }

    #[test]
    fn parse_timestamp_rejects_garbage() {
        assert!(parse_timestamp("2024-01-15T08:00:00+02:00").is_ok());
        assert!(matches!(
            parse_timestamp("yesterday"),
            Err(ValidationError::InvalidTimestamp { .. })
        ));
    }
}
