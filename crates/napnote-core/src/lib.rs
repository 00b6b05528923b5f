//! # Napnote Core Library
//!
//! Sleep-session analytics for infant sleep tracking. All operations are
//! available through the standalone `napnote` CLI, which is a thin layer over
//! this library.
//!
//! ## Architecture
//!
//! - **Sessions**: Timestamped sleep records with an optional end time; at most
//!   one is open (the child is asleep) at any moment
//! - **Stats**: Durations, wake windows, night/day split and daily rollups
//!   computed from a read-only snapshot of sessions
//! - **Recommend / Predict**: Age-based reference tables and next-nap timing
//! - **Insights**: Prompt construction and AI completion with a
//!   statistics-only fallback
//! - **Storage**: TOML configuration and a JSON session log
//!
//! ## Key Components
//!
//! - [`SleepSession`]: A single sleep record
//! - [`analyze_patterns`]: Aggregate metrics for a set of sessions
//! - [`predict_next_event`]: Current-state prediction for the dashboard
//! - [`InsightsService`]: AI recommendations with graceful degradation
//! - [`SessionLog`]: Persisted sessions and the Awake/Asleep transitions

pub mod error;
pub mod insights;
pub mod predict;
pub mod recommend;
pub mod session;
pub mod stats;
pub mod storage;

pub use error::{ConfigError, CoreError, InsightsError, SessionError, ValidationError};
pub use insights::{InsightsReport, InsightsService, InsightsStatus, Recommendation};
pub use predict::{predict_from_snapshot, predict_next_event, PredictedEvent};
pub use recommend::{age_profile, recommended_daily_sleep, recommended_wake_window, AgeProfile};
pub use session::{ChildProfile, SleepSession, SleepState, SleepType};
pub use stats::{analyze_patterns, SleepMetrics};
pub use storage::{Config, SessionLog};
