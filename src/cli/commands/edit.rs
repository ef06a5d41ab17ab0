//! mastery edit - Edit a skill

use clap::Args;
use colored::Colorize;

use crate::app::AppContext;
use crate::error::Result;
use crate::service::{CatalogOutcome, SkillEdit, SkillService};

#[derive(Args, Debug)]
pub struct EditArgs {
    /// Skill id to edit
    pub skill: String,

    /// New name
    #[arg(long)]
    pub name: Option<String>,

    /// New category
    #[arg(long, short)]
    pub category: Option<String>,

    /// Replace the full requirement set (repeatable)
    #[arg(long = "requires", short = 'r', value_name = "SKILL_ID", num_args = 0..)]
    pub requires: Option<Vec<String>>,

    /// Set or clear the milestone marker
    #[arg(long)]
    pub milestone: Option<bool>,
}

pub fn run(ctx: &AppContext, args: &EditArgs) -> Result<()> {
    let outcome = SkillService::new(&ctx.db).edit(
        ctx.owner(),
        &args.skill,
        SkillEdit {
            name: args.name.clone(),
            category: args.category.clone(),
            requirements: args.requires.clone(),
            milestone: args.milestone,
        },
    )?;

    match outcome {
        CatalogOutcome::Saved(skill) => {
            if ctx.json {
                println!("{}", serde_json::to_string_pretty(&skill)?);
            } else {
                println!("{} {}", "Updated".green().bold(), skill.id);
            }
        }
        CatalogOutcome::Rejected(rejection) => {
            if ctx.json {
                println!(
                    "{}",
                    serde_json::json!({ "rejected": true, "reason": rejection.to_string() })
                );
            } else {
                println!("{} {rejection}", "Rejected:".yellow().bold());
            }
        }
    }

    Ok(())
}
