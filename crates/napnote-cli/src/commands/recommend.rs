use napnote_core::{age_profile, Config};

use super::{print_json, CmdResult, Context};

pub fn run(ctx: &Context) -> CmdResult {
    let config = Config::load()?;
    let age = ctx.age_in_months(&config)?;
    print_json(&age_profile(age))
}
