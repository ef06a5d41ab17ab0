//! mastery list - List skills with level and WIP state

use clap::Args;
use colored::Colorize;

use crate::app::AppContext;
use crate::core::MAX_WIP;
use crate::error::Result;
use crate::service::SkillService;

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only show skills in this category
    #[arg(long, short)]
    pub category: Option<String>,

    /// Only show active (WIP) skills
    #[arg(long)]
    pub active: bool,
}

pub fn run(ctx: &AppContext, args: &ListArgs) -> Result<()> {
    let mut skills = SkillService::new(&ctx.db).list(ctx.owner())?;

    if let Some(category) = &args.category {
        skills.retain(|s| &s.category == category);
    }
    if args.active {
        skills.retain(|s| s.active);
    }

    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&skills)?);
        return Ok(());
    }

    if skills.is_empty() {
        println!("No skills yet. Add one with `mastery add <name>`.");
        return Ok(());
    }

    let wip = skills.iter().filter(|s| s.active).count();
    println!(
        "{} skills, WIP {wip}/{MAX_WIP}",
        skills.len().to_string().bold()
    );
    println!();

    for skill in &skills {
        let marker = if skill.active {
            "●".green()
        } else {
            "○".dimmed()
        };
        let fails = if skill.fail_count > 0 {
            format!("  ({} fails)", skill.fail_count).red().to_string()
        } else {
            String::new()
        };
        let milestone = if skill.milestone { " ★" } else { "" };
        println!(
            "{marker} {:<24} {:<14} {}{milestone}{fails}",
            skill.id,
            skill.category.dimmed(),
            skill.level,
        );
    }

    Ok(())
}
