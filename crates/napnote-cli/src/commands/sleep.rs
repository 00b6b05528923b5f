use clap::{Subcommand, ValueEnum};
use napnote_core::session::{active_session, sleep_state, SleepState};
use napnote_core::{SleepSession, SleepType};
use serde::Serialize;

use super::{print_json, CmdResult, Context};

#[derive(Clone, Copy, ValueEnum)]
pub enum SleepKind {
    Nap,
    Night,
}

impl From<SleepKind> for SleepType {
    fn from(kind: SleepKind) -> Self {
        match kind {
            SleepKind::Nap => SleepType::Nap,
            SleepKind::Night => SleepType::Night,
        }
    }
}

#[derive(Subcommand)]
pub enum SleepAction {
    /// Start a sleep session now
    Start {
        /// Kind of sleep
        #[arg(long = "type", value_enum)]
        kind: Option<SleepKind>,
    },
    /// End the active sleep session
    End {
        /// End this session instead of the active one
        #[arg(long)]
        id: Option<String>,
    },
    /// Show whether the child is asleep
    Status,
}

#[derive(Serialize)]
struct StatusView {
    state: SleepState,
    elapsed_minutes: Option<i64>,
    session: Option<SleepSession>,
}

pub fn run(ctx: &Context, action: SleepAction) -> CmdResult {
    match action {
        SleepAction::Start { kind } => {
            let mut log = ctx.session_log()?;
            let session = log.start(ctx.now, kind.map(SleepType::from))?;
            print_json(&session)
        }
        SleepAction::End { id } => {
            let mut log = ctx.session_log()?;
            let session = log.end(id.as_deref(), ctx.now)?;
            print_json(&session)
        }
        SleepAction::Status => {
            let sessions = ctx.snapshot()?;
            let state = sleep_state(&sessions);
            let session = active_session(&sessions).cloned();
            let elapsed_minutes = session
                .as_ref()
                .map(|s| s.elapsed_minutes(ctx.now).floor() as i64);
            print_json(&StatusView {
                state,
                elapsed_minutes,
                session,
            })
        }
    }
}
