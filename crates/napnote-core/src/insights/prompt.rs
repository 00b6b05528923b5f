//! Prompt template sent to the completion service.

use indoc::formatdoc;

use crate::stats::SleepMetrics;

/// Render the pediatric sleep consultant prompt for a week of metrics.
///
/// Numeric values are rounded to whole minutes; the model is asked to
/// answer with a JSON array of `{title, description, confidence}` objects.
pub fn build_prompt(metrics: &SleepMetrics, age_in_months: u32, lookback_days: u32) -> String {
    formatdoc! {r#"
        You are a pediatric sleep consultant. Analyze this baby's sleep data and provide 3-4 actionable, evidence-based recommendations.

        Child Age: {age_in_months} months old
        Sleep Data (Past {lookback_days} days):
        - Average sleep duration per session: {avg_duration} minutes
        - Total sleep sessions: {total_sessions}
        - Average wake window: {avg_wake} minutes
        - Night sessions: {night}, Day sessions: {day}

        Please provide recommendations in this exact JSON format:
        [
          {{
            "title": "Brief recommendation title",
            "description": "Detailed explanation and action steps",
            "confidence": "high|medium|low"
          }}
        ]

        Focus on: wake windows, nap timing, bedtime optimization, and age-appropriate sleep patterns. Be specific and actionable."#,
        age_in_months = age_in_months,
        lookback_days = lookback_days,
        avg_duration = metrics.avg_duration_minutes.round() as i64,
        total_sessions = metrics.total_sessions,
        avg_wake = metrics.avg_wake_window_minutes.round() as i64,
        night = metrics.night_count,
        day = metrics.day_count,
    }
}
