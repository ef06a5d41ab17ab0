//! mastery show - Show skill details

use clap::Args;
use colored::Colorize;

use crate::app::AppContext;
use crate::core::CooldownStatus;
use crate::error::Result;
use crate::service::{SkillService, ValidationService};

use super::format_timestamp;

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Skill id to show
    pub skill: String,
}

pub fn run(ctx: &AppContext, args: &ShowArgs) -> Result<()> {
    let service = SkillService::new(&ctx.db);
    let skill = service.get(ctx.owner(), &args.skill)?;
    let snapshot = service.list(ctx.owner())?;
    let missing = skill.missing_requirements(|id| snapshot.iter().find(|s| s.id == id));

    let validations = ValidationService::new(&ctx.db, &ctx.clock, &ctx.locks);
    let cooldown = validations.cooldown_status(ctx.owner(), &skill.id)?;

    if ctx.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "skill": skill,
                "missing_requirements": missing,
                "cooldown": cooldown,
            }))?
        );
        return Ok(());
    }

    println!("{}", skill.name.bold());
    println!("{}", "═".repeat(skill.name.len()));
    println!();
    println!("{}: {}", "ID".dimmed(), skill.id);
    println!("{}: {}", "Category".dimmed(), skill.category);
    println!("{}: {}", "Level".dimmed(), skill.level);
    println!(
        "{}: {}",
        "Active".dimmed(),
        if skill.active { "yes (WIP)".green() } else { "no".normal() }
    );
    if skill.fail_count > 0 {
        println!("{}: {}", "Fail streak".dimmed(), skill.fail_count.to_string().red());
    }
    if let Some(last) = skill.last_practiced {
        println!("{}: {}", "Last practiced".dimmed(), format_timestamp(last));
    }
    if skill.milestone {
        println!("{}: yes", "Milestone".dimmed());
    }
    if skill.reinforcement {
        println!(
            "{}: reinforces {}",
            "Reinforcement".dimmed(),
            skill.parent_skill_id.as_deref().unwrap_or("?")
        );
    }

    if !skill.requirements.is_empty() {
        println!();
        println!("{}:", "Requirements".dimmed());
        for req in &skill.requirements {
            if missing.contains(req) {
                println!("  {} {req} (below Consolidation)", "✗".red());
            } else {
                println!("  {} {req}", "✓".green());
            }
        }
    }

    println!();
    match cooldown {
        CooldownStatus::AutonomyIncomplete => {
            println!("{}: pass Autonomy (L3) to start the 48h window", "Cooldown".dimmed());
        }
        CooldownStatus::Waiting {
            cooldown_end,
            remaining_ms,
        } => {
            let hours = remaining_ms / (60 * 60 * 1000);
            let minutes = (remaining_ms / (60 * 1000)) % 60;
            println!(
                "{}: {} left (until {})",
                "Cooldown".dimmed(),
                format!("{hours}h{minutes:02}m").yellow(),
                format_timestamp(cooldown_end)
            );
        }
        CooldownStatus::Ready { .. } => {
            println!("{}: {}", "Cooldown".dimmed(), "elapsed, L4 unlocked".green());
        }
    }

    Ok(())
}
