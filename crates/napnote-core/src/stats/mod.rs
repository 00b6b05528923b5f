//! Sleep analytics engine.
//!
//! Pure, deterministic functions over a snapshot of [`SleepSession`]s:
//! durations and period totals, wake windows, night/day split, aggregate
//! pattern metrics, and per-day views. Nothing here performs I/O or reads
//! the system clock; time-relative functions take `now` explicitly and
//! local-time functions take the caller's time zone.
//!
//! [`SleepSession`]: crate::session::SleepSession

mod daily;
mod duration;
mod metrics;
mod night_day;
mod wake_window;

pub use duration::{compute_duration, summarize_period, PeriodSummary};

pub use wake_window::{
    compute_average_wake_window, compute_wake_windows, raw_average_wake_window, WakeWindow,
    MAX_PLAUSIBLE_WAKE_WINDOW_MIN,
};

pub use night_day::{
    classify_night_day, is_night_hour, NightDaySplit, NIGHT_END_HOUR, NIGHT_START_HOUR,
};

pub use metrics::{analyze_patterns, SleepMetrics};

pub use daily::{
    daily_insight, daily_progress, daily_totals, day_over_day, insight_at, local_date,
    sessions_on, trend_at, DailyInsight, DailyProgress, DailyTotal, DayOverDayTrend,
    InsightConfidence, TrendDirection, TREND_THRESHOLD_HOURS,
};
