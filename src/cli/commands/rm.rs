//! mastery rm - Delete a skill

use clap::Args;
use colored::Colorize;

use crate::app::AppContext;
use crate::error::Result;
use crate::service::SkillService;

#[derive(Args, Debug)]
pub struct RmArgs {
    /// Skill id to delete
    pub skill: String,
}

pub fn run(ctx: &AppContext, args: &RmArgs) -> Result<()> {
    SkillService::new(&ctx.db).delete(ctx.owner(), &args.skill)?;

    if ctx.json {
        println!("{}", serde_json::json!({ "deleted": args.skill }));
    } else {
        println!(
            "{} {} (requirement edges and history removed)",
            "Deleted".red().bold(),
            args.skill
        );
    }
    Ok(())
}
