//! mastery history - Validation history for a skill

use clap::Args;
use colored::Colorize;

use crate::app::AppContext;
use crate::error::Result;
use crate::service::ValidationService;

use super::format_timestamp;

#[derive(Args, Debug)]
pub struct HistoryArgs {
    /// Skill id
    pub skill: String,

    /// Limit to the most recent N attempts
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,
}

pub fn run(ctx: &AppContext, args: &HistoryArgs) -> Result<()> {
    let service = ValidationService::new(&ctx.db, &ctx.clock, &ctx.locks);
    let mut records = service.history(ctx.owner(), &args.skill)?;
    if let Some(limit) = args.limit {
        records.truncate(limit);
    }

    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    if records.is_empty() {
        println!("No validation attempts yet for {}.", args.skill);
        return Ok(());
    }

    for record in &records {
        let verdict = if record.passed {
            "PASS".green().bold()
        } else {
            "FAIL".red().bold()
        };
        println!(
            "{} {} {} [{}] {}",
            format_timestamp(record.attempted_at).dimmed(),
            verdict,
            record.level,
            record.evidence_type,
            record.id.dimmed()
        );
        if !record.evidence.is_empty() {
            println!("    {}", record.evidence);
        }
    }

    Ok(())
}
