//! Per-day views: daily totals, today's goal progress, day-over-day trend
//! and the headline insight for today.
//!
//! Days are calendar dates in the caller's time zone, keyed by the local
//! date of each session's `start_time`. A night that starts at 19:00 counts
//! entirely toward the day it started.

use std::collections::BTreeMap;

use chrono::{DateTime, Days, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::{compute_duration, summarize_period};
use crate::recommend::recommended_daily_sleep;
use crate::session::{completed_sessions, recent_sessions, SleepSession, RECENT_WINDOW_DAYS};

/// Day-over-day change (hours) above which the trend is up or down.
pub const TREND_THRESHOLD_HOURS: f64 = 0.5;

/// Completed sleep logged on one local date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyTotal {
    pub date: NaiveDate,
    pub total_minutes: f64,
    pub completed_sessions: u32,
}

/// Today's sleep against the age-based daily target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyProgress {
    pub date: NaiveDate,
    pub total_minutes: f64,
    pub total_hours: f64,
    /// Every session started today, open ones included
    pub logged_sessions: u32,
    pub completed_sessions: u32,
    pub recommended_hours: u32,
    /// Share of the target reached, capped at 100
    pub goal_percent: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Up,
    Down,
    Steady,
}

/// Comparison of today's total sleep with yesterday's.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayOverDayTrend {
    pub today_hours: f64,
    pub yesterday_hours: f64,
    pub delta_hours: f64,
    /// Rounded percentage change, absent when yesterday had no sleep
    pub percent_change: Option<i64>,
    pub direction: TrendDirection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightConfidence {
    High,
    Medium,
    Info,
}

/// Headline observation about today's sleep compared to recent days.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DailyInsight {
    /// Nothing completed today yet
    NoData,
    /// Today is within 30 minutes of the recent daily average
    Consistent { daily_average_minutes: f64 },
    /// Today exceeds the recent daily average by more than an hour
    AboveAverage { extra_minutes: f64 },
    /// Today falls short of the recent daily average by more than an hour
    BelowAverage { missing_minutes: f64 },
    /// Three or more completed sessions today
    WellTracked { sessions: u32 },
    KeepTracking,
}

impl DailyInsight {
    pub fn confidence(&self) -> InsightConfidence {
        match self {
            DailyInsight::Consistent { .. }
            | DailyInsight::AboveAverage { .. }
            | DailyInsight::WellTracked { .. } => InsightConfidence::High,
            DailyInsight::BelowAverage { .. } => InsightConfidence::Medium,
            DailyInsight::NoData | DailyInsight::KeepTracking => InsightConfidence::Info,
        }
    }
}

/// Calendar date of `at` in `tz`.
pub fn local_date<Tz: TimeZone>(at: DateTime<Utc>, tz: &Tz) -> NaiveDate {
    at.with_timezone(tz).date_naive()
}

/// Sessions whose start falls on `date` in `tz`.
pub fn sessions_on<Tz: TimeZone>(
    sessions: &[SleepSession],
    date: NaiveDate,
    tz: &Tz,
) -> Vec<SleepSession> {
    sessions
        .iter()
        .filter(|s| local_date(s.start_time, tz) == date)
        .cloned()
        .collect()
}

/// Completed sleep per local date, ascending, limited to the latest
/// `max_days` dates that have data.
pub fn daily_totals<Tz: TimeZone>(
    sessions: &[SleepSession],
    tz: &Tz,
    max_days: usize,
) -> Vec<DailyTotal> {
    let mut by_date: BTreeMap<NaiveDate, (f64, u32)> = BTreeMap::new();
    for session in completed_sessions(sessions) {
        let entry = by_date
            .entry(local_date(session.start_time, tz))
            .or_insert((0.0, 0));
        entry.0 += compute_duration(session);
        entry.1 += 1;
    }

    let skip = by_date.len().saturating_sub(max_days);
    by_date
        .into_iter()
        .skip(skip)
        .map(|(date, (total_minutes, completed_sessions))| DailyTotal {
            date,
            total_minutes,
            completed_sessions,
        })
        .collect()
}

/// Progress toward the recommended daily sleep for the local day of `now`.
pub fn daily_progress<Tz: TimeZone>(
    sessions: &[SleepSession],
    tz: &Tz,
    age_in_months: u32,
    now: DateTime<Utc>,
) -> DailyProgress {
    let date = local_date(now, tz);
    let today = sessions_on(sessions, date, tz);
    let summary = summarize_period(&today);

    let total_hours = summary.total_minutes / 60.0;
    let recommended_hours = recommended_daily_sleep(age_in_months);
    let goal_percent = ((total_hours / f64::from(recommended_hours)) * 100.0)
        .round()
        .clamp(0.0, 100.0) as u32;

    DailyProgress {
        date,
        total_minutes: summary.total_minutes,
        total_hours,
        logged_sessions: today.len() as u32,
        completed_sessions: summary.count,
        recommended_hours,
        goal_percent,
    }
}

/// Compare total completed sleep between two days.
pub fn day_over_day(today: &[SleepSession], yesterday: &[SleepSession]) -> DayOverDayTrend {
    let today_hours = summarize_period(today).total_minutes / 60.0;
    let yesterday_hours = summarize_period(yesterday).total_minutes / 60.0;
    let delta_hours = today_hours - yesterday_hours;

    let percent_change = if yesterday_hours > 0.0 {
        Some(((delta_hours / yesterday_hours) * 100.0).round() as i64)
    } else {
        None
    };

    let direction = if delta_hours > TREND_THRESHOLD_HOURS {
        TrendDirection::Up
    } else if delta_hours < -TREND_THRESHOLD_HOURS {
        TrendDirection::Down
    } else {
        TrendDirection::Steady
    };

    DayOverDayTrend {
        today_hours,
        yesterday_hours,
        delta_hours,
        percent_change,
        direction,
    }
}

/// [`day_over_day`] for the local day of `now` and the day before it.
pub fn trend_at<Tz: TimeZone>(
    sessions: &[SleepSession],
    tz: &Tz,
    now: DateTime<Utc>,
) -> DayOverDayTrend {
    let today = local_date(now, tz);
    let yesterday = today.checked_sub_days(Days::new(1)).unwrap_or(today);
    day_over_day(
        &sessions_on(sessions, today, tz),
        &sessions_on(sessions, yesterday, tz),
    )
}

/// Pick today's headline insight.
///
/// The recent daily average is approximated from the 30 most recent
/// completed sessions at roughly four sessions per day.
pub fn daily_insight(today: &[SleepSession], recent: &[SleepSession]) -> DailyInsight {
    let today_summary = summarize_period(today);
    if today_summary.count == 0 {
        return DailyInsight::NoData;
    }

    let mut recent_completed: Vec<&SleepSession> = completed_sessions(recent).collect();
    recent_completed.sort_by(|a, b| b.start_time.cmp(&a.start_time));
    recent_completed.truncate(30);

    let daily_average_minutes = if recent_completed.is_empty() {
        0.0
    } else {
        let total: f64 = recent_completed.iter().map(|s| compute_duration(s)).sum();
        let approx_days = (recent_completed.len() as f64 / 4.0).max(1.0);
        total / approx_days
    };

    let difference = today_summary.total_minutes - daily_average_minutes;

    if difference.abs() < 30.0 {
        DailyInsight::Consistent {
            daily_average_minutes,
        }
    } else if difference > 60.0 {
        DailyInsight::AboveAverage {
            extra_minutes: difference,
        }
    } else if difference < -60.0 {
        DailyInsight::BelowAverage {
            missing_minutes: -difference,
        }
    } else if today_summary.count >= 3 {
        DailyInsight::WellTracked {
            sessions: today_summary.count,
        }
    } else {
        DailyInsight::KeepTracking
    }
}

/// [`daily_insight`] for the local day of `now` against the past week.
/// Sessions after `now` are ignored.
pub fn insight_at<Tz: TimeZone>(
    sessions: &[SleepSession],
    tz: &Tz,
    now: DateTime<Utc>,
) -> DailyInsight {
    let recent = recent_sessions(sessions, now, RECENT_WINDOW_DAYS);
    let today = sessions_on(&recent, local_date(now, tz), tz);
    daily_insight(&today, &recent)
}
