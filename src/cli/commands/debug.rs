//! mastery debug - Debug helpers

use clap::{Args, Subcommand};
use colored::Colorize;

use crate::app::AppContext;
use crate::error::Result;
use crate::service::SkillService;

#[derive(Args, Debug)]
pub struct DebugArgs {
    #[command(subcommand)]
    pub command: DebugCommand,
}

#[derive(Subcommand, Debug)]
pub enum DebugCommand {
    /// Pretend hours have already passed for a skill's cooldown
    FastForward {
        /// Skill id
        skill: String,
        /// Hours to skip
        hours: i64,
    },
}

pub fn run(ctx: &AppContext, args: &DebugArgs) -> Result<()> {
    match &args.command {
        DebugCommand::FastForward { skill, hours } => {
            let service = SkillService::new(&ctx.db);
            let loaded = service.get(ctx.owner(), skill)?;
            let shifted = loaded.fast_forward(*hours);
            ctx.db.save_skill(&shifted)?;
            ctx.db
                .shift_validation_timestamps(ctx.owner(), skill, hours * 60 * 60 * 1000)?;
            println!(
                "{} {} moved {hours}h into the past.",
                "Fast-forward:".cyan().bold(),
                skill
            );
            Ok(())
        }
    }
}
