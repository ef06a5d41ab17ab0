//! mastery up - Attempt a level-up

use clap::Args;
use colored::Colorize;

use crate::app::AppContext;
use crate::error::Result;
use crate::service::{LevelUpOutcome, ProgressionService};

#[derive(Args, Debug)]
pub struct UpArgs {
    /// Skill id to advance
    pub skill: String,
}

pub fn run(ctx: &AppContext, args: &UpArgs) -> Result<()> {
    let service = ProgressionService::new(&ctx.db, &ctx.clock, &ctx.locks);
    let outcome = service.attempt_level_up(ctx.owner(), &args.skill)?;

    match outcome {
        LevelUpOutcome::Advanced(skill) => {
            if ctx.json {
                println!("{}", serde_json::to_string_pretty(&skill)?);
            } else {
                println!(
                    "{} {} is now at {}",
                    "Advanced:".green().bold(),
                    skill.name,
                    skill.level
                );
                if !skill.active {
                    println!("  Consolidated. The WIP slot is free again.");
                }
            }
        }
        LevelUpOutcome::Blocked(block) => {
            if ctx.json {
                println!(
                    "{}",
                    serde_json::json!({ "blocked": true, "reason": block.to_string() })
                );
            } else {
                println!("{} {block}", "Blocked:".yellow().bold());
            }
        }
    }

    Ok(())
}
