//! TOML-based application configuration.
//!
//! Stores:
//! - The tracked child's name and birth date
//! - The time zone used for day boundaries and night/day classification
//! - Settings for the AI recommendation service
//!
//! Configuration is stored at `~/.config/napnote/config.toml`.

use std::path::{Path, PathBuf};

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::error::{ConfigError, Result};
use crate::session::ChildProfile;

/// Longest insights lookback accepted from config.
pub const MAX_LOOKBACK_DAYS: u32 = 365;

/// The child being tracked.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChildConfig {
    #[serde(default = "default_child_name")]
    pub name: String,
    /// Needed for every age-based lookup
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
}

/// Time zone used for local dates and hours.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClockConfig {
    /// Fixed offset from UTC; absent means the system's local zone.
    #[serde(default)]
    pub utc_offset_minutes: Option<i32>,
}

/// AI recommendation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_lookback_days")]
    pub lookback_days: u32,
    #[serde(default = "default_min_sessions")]
    pub min_sessions: usize,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/napnote/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub child: ChildConfig,
    #[serde(default)]
    pub clock: ClockConfig,
    #[serde(default)]
    pub insights: InsightsConfig,
}

// Default functions
fn default_child_name() -> String {
    "Baby".into()
}
fn default_true() -> bool {
    true
}
fn default_model() -> String {
    "claude-3-5-sonnet-20241022".into()
}
fn default_max_tokens() -> u32 {
    1024
}
fn default_api_key_env() -> String {
    "ANTHROPIC_API_KEY".into()
}
fn default_base_url() -> String {
    "https://api.anthropic.com".into()
}
fn default_lookback_days() -> u32 {
    7
}
fn default_min_sessions() -> usize {
    3
}

impl Default for ChildConfig {
    fn default() -> Self {
        Self {
            name: default_child_name(),
            birth_date: None,
        }
    }
}

impl Default for InsightsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            model: default_model(),
            max_tokens: default_max_tokens(),
            api_key_env: default_api_key_env(),
            base_url: default_base_url(),
            lookback_days: default_lookback_days(),
            min_sessions: default_min_sessions(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<()> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().is_none() || key.is_empty() {
            return Err(ConfigError::UnknownKey(key.to_string()).into());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current
                    .as_object_mut()
                    .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
                let existing = obj
                    .get(part)
                    .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => {
                        if let Ok(n) = value.parse::<i64>() {
                            serde_json::Value::Number(n.into())
                        } else {
                            let message = format!("cannot parse '{value}' as integer");
                            return Err(invalid(message).into());
                        }
                    }
                    // Optional fields: numbers stay numbers, anything else is a string
                    serde_json::Value::Null => serde_json::from_str::<serde_json::Value>(value)
                        .ok()
                        .filter(|v| v.is_number())
                        .unwrap_or_else(|| serde_json::Value::String(value.into())),
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value)?
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current
                .get_mut(part)
                .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
        }

        Err(ConfigError::UnknownKey(key.to_string()).into())
    }

    fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults if missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`, writing defaults there if the file is missing.
    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content)?;
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Persist to the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Update a value in memory by dot-separated key.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value does not fit
    /// the field's type.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let candidate: Config =
            serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            })?;
        candidate.validate()?;
        *self = candidate;
        Ok(())
    }

    /// Set a config value by key and save to the default location.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.apply(key, value)?;
        self.save()
    }

    /// Check values serde cannot express as types.
    pub fn validate(&self) -> Result<()> {
        self.fixed_offset()?;
        if self.insights.min_sessions == 0 {
            return Err(ConfigError::InvalidValue {
                key: "insights.min_sessions".into(),
                message: "must be at least 1".into(),
            }
            .into());
        }
        if !(1..=MAX_LOOKBACK_DAYS).contains(&self.insights.lookback_days) {
            return Err(ConfigError::InvalidValue {
                key: "insights.lookback_days".into(),
                message: format!("must be within 1..={MAX_LOOKBACK_DAYS}"),
            }
            .into());
        }
        Ok(())
    }

    /// Configured fixed offset, or `None` to use the system local zone.
    pub fn fixed_offset(&self) -> Result<Option<FixedOffset>> {
        match self.clock.utc_offset_minutes {
            None => Ok(None),
            Some(minutes) => FixedOffset::east_opt(minutes * 60).map(Some).ok_or_else(|| {
                ConfigError::InvalidValue {
                    key: "clock.utc_offset_minutes".into(),
                    message: format!("{minutes} is outside -1439..=1439"),
                }
                .into()
            }),
        }
    }

    pub fn child_profile(&self) -> Option<ChildProfile> {
        self.child
            .birth_date
            .map(|birth_date| ChildProfile::new(self.child.name.clone(), birth_date))
    }

    /// Age of the configured child at `now`.
    ///
    /// # Errors
    /// Returns [`ConfigError::MissingKey`] if no birth date is configured.
    pub fn age_in_months(&self, now: DateTime<Utc>) -> Result<u32> {
        self.child_profile()
            .map(|child| child.age_in_months(now))
            .ok_or_else(|| ConfigError::MissingKey("child.birth_date".into()).into())
    }
}
