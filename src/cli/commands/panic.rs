//! mastery panic - Invalidate an unearned pass

use clap::Args;
use colored::Colorize;

use crate::app::AppContext;
use crate::error::Result;
use crate::service::ValidationService;

#[derive(Args, Debug)]
pub struct PanicArgs {
    /// Validation record id to invalidate (see `mastery history`)
    pub validation: String,
}

pub fn run(ctx: &AppContext, args: &PanicArgs) -> Result<()> {
    let service = ValidationService::new(&ctx.db, &ctx.clock, &ctx.locks);
    let outcome = service.panic(ctx.owner(), &args.validation)?;

    if ctx.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "previous_level": outcome.previous_level,
                "skill": outcome.skill,
            }))?
        );
    } else {
        println!(
            "{} {} dropped {} → {}, fail streak cleared.",
            "Honest reset:".red().bold(),
            outcome.skill.name,
            outcome.previous_level,
            outcome.skill.level
        );
        println!("  The validation record was marked failed.");
    }
    Ok(())
}
