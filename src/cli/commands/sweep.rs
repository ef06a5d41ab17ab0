//! mastery sweep - Dispatch pending cooldown-elapsed notifications

use clap::Args;
use colored::Colorize;

use crate::app::AppContext;
use crate::error::Result;
use crate::service::ValidationService;

use super::format_timestamp;

#[derive(Args, Debug)]
pub struct SweepArgs {}

pub fn run(ctx: &AppContext, _args: &SweepArgs) -> Result<()> {
    let service = ValidationService::new(&ctx.db, &ctx.clock, &ctx.locks);
    let notices = service.sweep_cooldowns()?;

    if ctx.json {
        let value: Vec<_> = notices
            .iter()
            .map(|n| {
                serde_json::json!({
                    "skill_id": n.skill_id,
                    "skill_name": n.skill_name,
                    "cooldown_end": n.cooldown_end,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    if notices.is_empty() {
        println!("No finished cooldowns to notify.");
        return Ok(());
    }

    for notice in &notices {
        println!(
            "{} {} finished its 48h window at {}. Ready for the Consolidation check.",
            "Ready:".green().bold(),
            notice.skill_name,
            format_timestamp(notice.cooldown_end)
        );
    }
    Ok(())
}
