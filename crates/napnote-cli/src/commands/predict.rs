use napnote_core::{predict_from_snapshot, Config};

use super::{print_json, CmdResult, Context};

pub fn run(ctx: &Context) -> CmdResult {
    let sessions = ctx.snapshot()?;
    let config = Config::load()?;
    let age = ctx.age_in_months(&config)?;

    print_json(&predict_from_snapshot(&sessions, age, ctx.now))
}
