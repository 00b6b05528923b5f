pub mod config;
pub mod insights;
pub mod predict;
pub mod recommend;
pub mod sleep;
pub mod stats;

use std::error::Error;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use napnote_core::session::parse_timestamp;
use napnote_core::storage::{load_snapshot, SessionLog};
use napnote_core::{Config, SleepSession};
use serde::Serialize;

pub type CmdResult = Result<(), Box<dyn Error>>;

/// Inputs shared by every command: where sessions live, the clock, and an
/// optional age override.
pub struct Context {
    sessions_path: Option<PathBuf>,
    pub now: DateTime<Utc>,
    age: Option<u32>,
}

impl Context {
    pub fn new(
        sessions_path: Option<PathBuf>,
        now: Option<&str>,
        age: Option<u32>,
    ) -> Result<Self, Box<dyn Error>> {
        let now = match now {
            Some(value) => parse_timestamp(value)?,
            None => Utc::now(),
        };
        Ok(Self {
            sessions_path,
            now,
            age,
        })
    }

    /// Read-only snapshot, newest first.
    pub fn snapshot(&self) -> Result<Vec<SleepSession>, Box<dyn Error>> {
        let mut sessions = match &self.sessions_path {
            Some(path) => load_snapshot(path)?,
            None => SessionLog::open()?.snapshot(),
        };
        sessions.sort_by(|a, b| b.start_time.cmp(&a.start_time));
        Ok(sessions)
    }

    pub fn session_log(&self) -> Result<SessionLog, Box<dyn Error>> {
        Ok(match &self.sessions_path {
            Some(path) => SessionLog::open_at(path)?,
            None => SessionLog::open()?,
        })
    }

    /// `--age`, or the configured child's age at `now`.
    pub fn age_in_months(&self, config: &Config) -> Result<u32, Box<dyn Error>> {
        match self.age {
            Some(age) => Ok(age),
            None => Ok(config.age_in_months(self.now).map_err(|e| {
                format!("{e} (pass --age or run `napnote config set child.birth_date YYYY-MM-DD`)")
            })?),
        }
    }
}

/// Run `$body` with `$tz` bound to the configured fixed offset, or to the
/// system local zone when none is set.
macro_rules! with_zone {
    ($config:expr, |$tz:ident| $body:expr) => {
        match $config.fixed_offset()? {
            Some(offset) => {
                let $tz = &offset;
                $body
            }
            None => {
                let $tz = &chrono::Local;
                $body
            }
        }
    };
}
pub(crate) use with_zone;

pub fn print_json<T: Serialize>(value: &T) -> CmdResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
