use clap::Subcommand;
use napnote_core::stats::{
    analyze_patterns, classify_night_day, compute_average_wake_window, compute_wake_windows,
    daily_progress, daily_totals, insight_at, raw_average_wake_window, summarize_period, trend_at,
    DailyInsight, InsightConfidence, WakeWindow,
};
use napnote_core::Config;
use serde::Serialize;

use super::{print_json, with_zone, CmdResult, Context};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Total and average duration of completed sessions
    Summary,
    /// Wake windows between consecutive sessions
    WakeWindows,
    /// Night vs day session counts
    NightDay,
    /// Aggregate sleep pattern metrics
    Metrics,
    /// Completed sleep per day
    Daily {
        /// Number of most recent days with data to show
        #[arg(long, default_value_t = 7)]
        days: usize,
    },
    /// Today's total compared with yesterday's
    Trend,
    /// Today's progress toward the recommended daily sleep
    Progress,
    /// Headline insight for today
    Insight,
}

#[derive(Serialize)]
struct WakeWindowView {
    windows: Vec<WakeWindow>,
    /// Mean of plausible windows; `null` when there are none
    average_minutes: Option<f64>,
    raw_average_minutes: f64,
}

#[derive(Serialize)]
struct InsightView {
    insight: DailyInsight,
    confidence: InsightConfidence,
}

pub fn run(ctx: &Context, action: StatsAction) -> CmdResult {
    let sessions = ctx.snapshot()?;
    let config = Config::load()?;

    match action {
        StatsAction::Summary => print_json(&summarize_period(&sessions)),
        StatsAction::WakeWindows => print_json(&WakeWindowView {
            windows: compute_wake_windows(&sessions),
            average_minutes: compute_average_wake_window(&sessions),
            raw_average_minutes: raw_average_wake_window(&sessions),
        }),
        StatsAction::NightDay => {
            with_zone!(config, |tz| print_json(&classify_night_day(&sessions, tz)))
        }
        StatsAction::Metrics => {
            with_zone!(config, |tz| print_json(&analyze_patterns(&sessions, tz)))
        }
        StatsAction::Daily { days } => {
            with_zone!(config, |tz| print_json(&daily_totals(&sessions, tz, days)))
        }
        StatsAction::Trend => {
            with_zone!(config, |tz| print_json(&trend_at(&sessions, tz, ctx.now)))
        }
        StatsAction::Progress => {
            let age = ctx.age_in_months(&config)?;
            with_zone!(config, |tz| print_json(&daily_progress(
                &sessions, tz, age, ctx.now
            )))
        }
        StatsAction::Insight => with_zone!(config, |tz| {
            let insight = insight_at(&sessions, tz, ctx.now);
            print_json(&InsightView {
                confidence: insight.confidence(),
                insight,
            })
        }),
    }
}
