use napnote_core::{Config, InsightsService};

use super::{print_json, with_zone, CmdResult, Context};

pub fn run(ctx: &Context) -> CmdResult {
    let sessions = ctx.snapshot()?;
    let config = Config::load()?;
    let age = ctx.age_in_months(&config)?;
    let service = InsightsService::from_config(&config.insights);

    let runtime = tokio::runtime::Runtime::new()?;
    let report = with_zone!(config, |tz| runtime
        .block_on(service.generate(&sessions, age, tz, ctx.now)));

    print_json(&report)
}
