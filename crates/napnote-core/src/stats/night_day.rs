//! Night vs day classification by the local start hour of a session.

use chrono::{TimeZone, Timelike};
use serde::{Deserialize, Serialize};

use crate::session::{completed_sessions, SleepSession};

/// First hour (inclusive) of the night window.
pub const NIGHT_START_HOUR: u32 = 19;
/// Hour (exclusive) at which the night window ends.
pub const NIGHT_END_HOUR: u32 = 7;

/// Count of completed sessions per bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NightDaySplit {
    pub night: u32,
    pub day: u32,
}

impl NightDaySplit {
    pub fn total(&self) -> u32 {
        self.night + self.day
    }
}

/// Hours in `[19, 24) ∪ [0, 7)` are night.
pub fn is_night_hour(hour: u32) -> bool {
    hour >= NIGHT_START_HOUR || hour < NIGHT_END_HOUR
}

/// Bucket each completed session by the hour of its start in `tz`.
pub fn classify_night_day<Tz: TimeZone>(sessions: &[SleepSession], tz: &Tz) -> NightDaySplit {
    completed_sessions(sessions).fold(NightDaySplit::default(), |mut split, session| {
        let hour = session.start_time.with_timezone(tz).hour();
        if is_night_hour(hour) {
            split.night += 1;
        } else {
            split.day += 1;
        }
        split
    })
}
