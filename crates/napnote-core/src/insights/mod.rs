//! AI sleep recommendations.
//!
//! Turns a week of sessions into [`SleepMetrics`], renders them into a
//! prompt, asks a [`CompletionClient`] for advice and parses the reply with
//! a fallback. Every failure past the metrics stage degrades to a
//! statistics-only report; generating insights never returns an error.

mod client;
mod parse;
mod prompt;

pub use client::{AnthropicClient, CompletionClient, ANTHROPIC_VERSION};
pub use parse::{
    parse_recommendations, Confidence, ParsedRecommendations, Recommendation, FALLBACK_TITLE,
};
pub use prompt::build_prompt;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::session::{recent_sessions, SleepSession};
use crate::stats::{analyze_patterns, SleepMetrics};
use crate::storage::InsightsConfig;

/// Why a report looks the way it does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightsStatus {
    /// Recommendations came from the model
    Ok,
    /// Too few sessions in the lookback window to say anything
    InsufficientData,
    /// No completion client configured; statistics plus a setup hint
    AiNotConfigured,
    /// The completion call failed; statistics only
    AiUnavailable,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightsReport {
    pub status: InsightsStatus,
    pub age_in_months: u32,
    /// Sessions considered (started within the lookback window)
    pub sessions_considered: u32,
    pub patterns: Option<SleepMetrics>,
    pub recommendations: Vec<Recommendation>,
    pub ai_enabled: bool,
}

/// Recommendation shown when no API key is set.
pub fn configure_ai_recommendation() -> Recommendation {
    Recommendation::new(
        "Configure AI for Personalized Insights",
        "Set your Anthropic API key in the configured environment variable to get AI-powered recommendations based on your baby's sleep patterns.",
        Confidence::High,
    )
}

pub struct InsightsService {
    client: Option<Box<dyn CompletionClient>>,
    lookback_days: u32,
    min_sessions: usize,
}

impl InsightsService {
    pub const DEFAULT_LOOKBACK_DAYS: u32 = 7;
    pub const DEFAULT_MIN_SESSIONS: usize = 3;

    pub fn new(client: Option<Box<dyn CompletionClient>>) -> Self {
        Self {
            client,
            lookback_days: Self::DEFAULT_LOOKBACK_DAYS,
            min_sessions: Self::DEFAULT_MIN_SESSIONS,
        }
    }

    /// Build from config. A missing API key or `enabled = false` leaves the
    /// service without a client rather than failing.
    pub fn from_config(config: &InsightsConfig) -> Self {
        let client: Option<Box<dyn CompletionClient>> = if config.enabled {
            match AnthropicClient::from_config(config) {
                Ok(client) => Some(Box::new(client)),
                Err(e) => {
                    info!("AI recommendations disabled: {e}");
                    None
                }
            }
        } else {
            None
        };

        Self::new(client)
            .with_lookback_days(config.lookback_days)
            .with_min_sessions(config.min_sessions)
    }

    pub fn with_lookback_days(mut self, days: u32) -> Self {
        self.lookback_days = days;
        self
    }

    pub fn with_min_sessions(mut self, count: usize) -> Self {
        self.min_sessions = count;
        self
    }

    pub fn has_client(&self) -> bool {
        self.client.is_some()
    }

    /// Produce an insights report for the snapshot at `now`.
    ///
    /// Only sessions that started within the lookback window ending at `now`
    /// are considered.
    pub async fn generate<Tz: TimeZone>(
        &self,
        sessions: &[SleepSession],
        age_in_months: u32,
        tz: &Tz,
        now: DateTime<Utc>,
    ) -> InsightsReport {
        let recent = recent_sessions(sessions, now, self.lookback_days);
        let sessions_considered = recent.len() as u32;

        if recent.len() < self.min_sessions {
            debug!(
                sessions = recent.len(),
                required = self.min_sessions,
                "not enough sessions for insights"
            );
            return InsightsReport {
                status: InsightsStatus::InsufficientData,
                age_in_months,
                sessions_considered,
                patterns: None,
                recommendations: Vec::new(),
                ai_enabled: false,
            };
        }

        let patterns = analyze_patterns(&recent, tz);

        let Some(client) = self.client.as_deref() else {
            return InsightsReport {
                status: InsightsStatus::AiNotConfigured,
                age_in_months,
                sessions_considered,
                patterns: Some(patterns),
                recommendations: vec![configure_ai_recommendation()],
                ai_enabled: false,
            };
        };

        let prompt = build_prompt(&patterns, age_in_months, self.lookback_days);
        match client.complete(&prompt).await {
            Ok(text) => {
                let parsed = parse_recommendations(&text);
                debug!(
                    client = client.name(),
                    structured = parsed.is_structured(),
                    "parsed recommendations"
                );
                InsightsReport {
                    status: InsightsStatus::Ok,
                    age_in_months,
                    sessions_considered,
                    patterns: Some(patterns),
                    recommendations: parsed.into_vec(),
                    ai_enabled: true,
                }
            }
            Err(e) => {
                warn!(client = client.name(), "AI unavailable, statistics only: {e}");
                InsightsReport {
                    status: InsightsStatus::AiUnavailable,
                    age_in_months,
                    sessions_considered,
                    patterns: Some(patterns),
                    recommendations: Vec::new(),
                    ai_enabled: false,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InsightsError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct ScriptedClient {
        reply: Result<String, ()>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedClient {
        fn replying(text: &str) -> Self {
            Self {
                reply: Ok(text.to_string()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                reply: Err(()),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl CompletionClient for ScriptedClient {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn complete(&self, prompt: &str) -> Result<String, InsightsError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.reply.clone().map_err(|_| InsightsError::EmptyResponse)
        }
    }

    fn utc_datetime(day: u32, hour: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, day, hour, min, 0).unwrap()
    }

    fn week() -> Vec<SleepSession> {
        vec![
            SleepSession::completed("1", utc_datetime(14, 8, 0), utc_datetime(14, 9, 30)),
            SleepSession::completed("2", utc_datetime(14, 11, 0), utc_datetime(14, 12, 0)),
            SleepSession::completed("3", utc_datetime(14, 19, 0), utc_datetime(15, 7, 0)),
            // Outside the 7-day window
            SleepSession::completed("old", utc_datetime(1, 9, 0), utc_datetime(1, 10, 0)),
        ]
    }

    #[tokio::test]
    async fn test_insufficient_data() {
        let service = InsightsService::new(Some(Box::new(ScriptedClient::replying("[]"))));
        let report = service
            .generate(&week()[..2], 4, &Utc, utc_datetime(15, 12, 0))
            .await;

        assert_eq!(report.status, InsightsStatus::InsufficientData);
        assert!(report.patterns.is_none());
        assert!(report.recommendations.is_empty());
    }

    #[tokio::test]
    async fn test_old_sessions_do_not_count_toward_minimum() {
        let sessions = vec![
            week()[0].clone(),
            week()[1].clone(),
            week()[3].clone(),
        ];
        let report = InsightsService::new(None)
            .generate(&sessions, 4, &Utc, utc_datetime(15, 12, 0))
            .await;

        assert_eq!(report.status, InsightsStatus::InsufficientData);
        assert_eq!(report.sessions_considered, 2);
    }

    #[tokio::test]
    async fn test_without_client_returns_setup_hint() {
        let report = InsightsService::new(None)
            .generate(&week(), 4, &Utc, utc_datetime(15, 12, 0))
            .await;

        assert_eq!(report.status, InsightsStatus::AiNotConfigured);
        assert!(!report.ai_enabled);
        assert_eq!(report.patterns.map(|p| p.total_sessions), Some(3));
        assert_eq!(report.recommendations, vec![configure_ai_recommendation()]);
    }

    #[tokio::test]
    async fn test_structured_reply() {
        let reply = r#"Sure! [{"title": "Shorter wake windows", "description": "Aim for 90 minutes.", "confidence": "high"}]"#;
        let client = ScriptedClient::replying(reply);
        let service = InsightsService::new(Some(Box::new(client)));

        let report = service
            .generate(&week(), 4, &Utc, utc_datetime(15, 12, 0))
            .await;

        assert_eq!(report.status, InsightsStatus::Ok);
        assert!(report.ai_enabled);
        assert_eq!(report.recommendations.len(), 1);
        assert_eq!(report.recommendations[0].title, "Shorter wake windows");
    }

    #[tokio::test]
    async fn test_prompt_reflects_recent_metrics() {
        let client = std::sync::Arc::new(ScriptedClient::replying("no json here"));

        struct Shared(std::sync::Arc<ScriptedClient>);

        #[async_trait]
        impl CompletionClient for Shared {
            fn name(&self) -> &str {
                "shared"
            }

            async fn complete(&self, prompt: &str) -> Result<String, InsightsError> {
                self.0.complete(prompt).await
            }
        }

        let service = InsightsService::new(Some(Box::new(Shared(client.clone()))));
        let report = service
            .generate(&week(), 4, &Utc, utc_datetime(15, 12, 0))
            .await;

        assert_eq!(report.recommendations[0].title, FALLBACK_TITLE);
        assert_eq!(report.recommendations[0].description, "no json here");

        let prompts = client.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Total sleep sessions: 3"));
        assert!(prompts[0].contains("Average sleep duration per session: 290 minutes"));
        assert!(prompts[0].contains("Night sessions: 1, Day sessions: 2"));
    }

    #[tokio::test]
    async fn test_client_failure_degrades_to_statistics() {
        let service = InsightsService::new(Some(Box::new(ScriptedClient::failing())));
        let report = service
            .generate(&week(), 4, &Utc, utc_datetime(15, 12, 0))
            .await;

        assert_eq!(report.status, InsightsStatus::AiUnavailable);
        assert!(!report.ai_enabled);
        assert!(report.patterns.is_some());
        assert!(report.recommendations.is_empty());
    }

    #[tokio::test]
    async fn test_sessions_after_now_are_ignored() {
        let mut sessions = week();
        sessions.push(SleepSession::completed(
            "later",
            utc_datetime(20, 8, 0),
            utc_datetime(20, 9, 0),
        ));

        let report = InsightsService::new(None)
            .generate(&sessions, 4, &Utc, utc_datetime(15, 12, 0))
            .await;

        assert_eq!(report.sessions_considered, 3);
        assert_eq!(report.patterns.map(|p| p.total_sessions), Some(3));
    }

    #[tokio::test]
    async fn test_huge_lookback_does_not_overflow() {
        let service = InsightsService::new(None).with_lookback_days(u32::MAX);
        let report = service
            .generate(&week(), 4, &Utc, utc_datetime(15, 12, 0))
            .await;

        assert_eq!(report.status, InsightsStatus::AiNotConfigured);
        assert_eq!(report.sessions_considered, 4);
    }

    #[test]
    fn test_disabled_config_has_no_client() {
        let config = InsightsConfig {
            enabled: false,
            ..InsightsConfig::default()
        };
        let service = InsightsService::from_config(&config);
        assert!(!service.has_client());
    }
}
