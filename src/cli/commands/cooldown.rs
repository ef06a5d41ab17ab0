//! mastery cooldown - Consolidation cooldown status

use clap::Args;
use colored::Colorize;

use crate::app::AppContext;
use crate::core::CooldownStatus;
use crate::error::Result;
use crate::service::ValidationService;

use super::format_timestamp;

#[derive(Args, Debug)]
pub struct CooldownArgs {
    /// Skill id to check
    pub skill: String,
}

pub fn run(ctx: &AppContext, args: &CooldownArgs) -> Result<()> {
    let service = ValidationService::new(&ctx.db, &ctx.clock, &ctx.locks);
    let status = service.cooldown_status(ctx.owner(), &args.skill)?;

    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    match status {
        CooldownStatus::AutonomyIncomplete => {
            println!(
                "{} Pass Autonomy (L3) first; the 48h window starts there.",
                "Not ready:".yellow().bold()
            );
        }
        CooldownStatus::Waiting {
            cooldown_end,
            remaining_ms,
        } => {
            let hours = remaining_ms / (60 * 60 * 1000);
            let minutes = (remaining_ms / (60 * 1000)) % 60;
            println!(
                "{} {hours}h{minutes:02}m remaining (until {}).",
                "Waiting:".yellow().bold(),
                format_timestamp(cooldown_end)
            );
        }
        CooldownStatus::Ready { cooldown_end } => {
            println!(
                "{} window elapsed at {}. Consolidation (L4) may be attempted.",
                "Ready:".green().bold(),
                format_timestamp(cooldown_end)
            );
        }
    }

    Ok(())
}
