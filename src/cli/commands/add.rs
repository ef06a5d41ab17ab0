//! mastery add - Add a skill to the graph

use clap::Args;
use colored::Colorize;

use crate::app::AppContext;
use crate::error::Result;
use crate::service::{CatalogOutcome, NewSkill, SkillService};

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Skill name
    pub name: String,

    /// Grouping category
    #[arg(long, short, default_value = "general")]
    pub category: String,

    /// Explicit id (defaults to a slug of the name)
    #[arg(long)]
    pub id: Option<String>,

    /// Requirement skill ids (repeatable)
    #[arg(long = "requires", short = 'r', value_name = "SKILL_ID")]
    pub requires: Vec<String>,

    /// Mark as a milestone
    #[arg(long)]
    pub milestone: bool,

    /// Create as a reinforcement node for --parent
    #[arg(long, requires = "parent")]
    pub reinforcement: bool,

    /// Skill this reinforcement node shores up
    #[arg(long, value_name = "SKILL_ID")]
    pub parent: Option<String>,
}

pub fn run(ctx: &AppContext, args: &AddArgs) -> Result<()> {
    let service = SkillService::new(&ctx.db);
    let outcome = service.create(
        ctx.owner(),
        NewSkill {
            id: args.id.clone(),
            name: args.name.clone(),
            category: args.category.clone(),
            requirements: args.requires.clone(),
            milestone: args.milestone,
            reinforcement: args.reinforcement,
            parent_skill_id: args.parent.clone(),
        },
    )?;

    match outcome {
        CatalogOutcome::Saved(skill) => {
            if ctx.json {
                println!("{}", serde_json::to_string_pretty(&skill)?);
            } else {
                println!("{} {} ({})", "Added".green().bold(), skill.name, skill.id);
                if !skill.requirements.is_empty() {
                    println!("  requires: {}", skill.requirements.join(", "));
                }
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
