//! JSON-file session log owning the Awake/Asleep transitions.
//!
//! The log is the only writer of session records. Starting sleep appends an
//! open session; ending sleep stamps `end_time` on it. At most one session
//! is open at a time. The analytics engine only ever reads
//! [`SessionLog::snapshot`].

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

use super::data_dir;
use crate::error::{Result, SessionError};
use crate::session::{active_session, SleepSession, SleepType};

/// Sleep sessions persisted as a JSON array.
#[derive(Debug)]
pub struct SessionLog {
    path: PathBuf,
    sessions: Vec<SleepSession>,
}

impl SessionLog {
    /// Open the log at `~/.config/napnote/sessions.json`.
    ///
    /// # Errors
    /// Returns an error if the data directory is unavailable or the file
    /// exists but is not a valid session array.
    pub fn open() -> Result<Self> {
        Self::open_at(data_dir()?.join("sessions.json"))
    }

    /// Open the log at `path`; a missing file is an empty log.
    pub fn open_at(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let sessions = match std::fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => Vec::new(),
            Ok(content) => serde_json::from_str(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self { path, sessions })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn save(&self) -> Result<()> {
        let content = serde_json::to_string_pretty(&self.sessions)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }

    /// All records, most recently started first.
    pub fn snapshot(&self) -> Vec<SleepSession> {
        let mut sessions = self.sessions.clone();
        sessions.sort_by(|a, b| b.start_time.cmp(&a.start_time));
        sessions
    }

    pub fn active(&self) -> Option<&SleepSession> {
        active_session(&self.sessions)
    }

    /// Awake -> Asleep: append an open session starting at `now` and save.
    ///
    /// # Errors
    /// Returns [`SessionError::AlreadyAsleep`] if a session is already open.
    pub fn start(
        &mut self,
        now: DateTime<Utc>,
        sleep_type: Option<SleepType>,
    ) -> Result<SleepSession> {
        if let Some(active) = self.active() {
            return Err(SessionError::AlreadyAsleep {
                id: active.id.clone(),
            }
            .into());
        }

        let mut session = SleepSession::open(Uuid::new_v4().to_string(), now);
        if let Some(sleep_type) = sleep_type {
            session = session.with_type(sleep_type);
        }
        self.sessions.push(session.clone());
        self.save()?;

        info!(id = %session.id, "sleep session started");
        Ok(session)
    }

    /// Asleep -> Awake: set `end_time = now` on the given session, or on the
    /// active one when `id` is `None`, and save.
    ///
    /// # Errors
    /// Returns [`SessionError::NoActiveSession`], [`SessionError::SessionNotFound`]
    /// or [`SessionError::AlreadyEnded`] when the transition is not possible.
    pub fn end(&mut self, id: Option<&str>, now: DateTime<Utc>) -> Result<SleepSession> {
        let target_id = match id {
            Some(id) => id.to_string(),
            None => self
                .active()
                .map(|s| s.id.clone())
                .ok_or(SessionError::NoActiveSession)?,
        };

        let session = self
            .sessions
            .iter_mut()
            .find(|s| s.id == target_id)
            .ok_or_else(|| SessionError::SessionNotFound(target_id.clone()))?;

        if session.end_time.is_some() {
            return Err(SessionError::AlreadyEnded(target_id).into());
        }

        session.end_time = Some(now);
        let ended = session.clone();
        self.save()?;

        info!(id = %ended.id, "sleep session ended");
        Ok(ended)
    }
}

/// Read a JSON array of sessions exported from a session store.
pub fn load_snapshot(path: &Path) -> Result<Vec<SleepSession>> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
