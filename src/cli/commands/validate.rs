//! mastery validate - Submit a validation attempt

use clap::{ArgGroup, Args};
use colored::Colorize;

use crate::app::AppContext;
use crate::core::{EvidenceType, Level, SubmissionOutcome, SubmissionRequest};
use crate::error::{MasteryError, Result};
use crate::service::ValidationService;

#[derive(Args, Debug)]
#[command(group(ArgGroup::new("verdict").required(true).args(["passed", "failed"])))]
pub struct ValidateArgs {
    /// Skill id being validated
    pub skill: String,

    /// Level being attempted (1-4)
    #[arg(long, short, value_parser = clap::value_parser!(u8).range(1..=4))]
    pub level: u8,

    /// Kind of evidence
    #[arg(long = "type", short = 't', value_enum, default_value = "text")]
    pub evidence_type: EvidenceType,

    /// Evidence description (what you did, link, file, ...)
    #[arg(long, short, default_value = "")]
    pub evidence: String,

    /// The attempt passed
    #[arg(long)]
    pub passed: bool,

    /// The attempt failed
    #[arg(long)]
    pub failed: bool,
}

pub fn run(ctx: &AppContext, args: &ValidateArgs) -> Result<()> {
    let level = Level::from_u8(args.level)
        .ok_or_else(|| MasteryError::Config(format!("invalid level {}", args.level)))?;

    let service = ValidationService::new(&ctx.db, &ctx.clock, &ctx.locks);
    let outcome = service.submit(
        ctx.owner(),
        SubmissionRequest {
            skill_id: args.skill.clone(),
            level,
            evidence_type: args.evidence_type,
            evidence: args.evidence.clone(),
            passed: args.passed,
        },
    )?;

    if ctx.json {
        print_json(&outcome)?;
        return Ok(());
    }

    match outcome {
        SubmissionOutcome::Passed { skill, .. } => {
            println!(
                "{} {} validated at {}",
                "Passed:".green().bold(),
                skill.name,
                skill.level
            );
        }
        SubmissionOutcome::Failed {
            skill,
            regressed_to,
            ..
        } => {
            println!(
                "{} fail streak is now {}",
                "Failed:".red().bold(),
                skill.fail_count
            );
            if let Some(level) = regressed_to {
                println!("  Regressed to {level}.");
            }
        }
        SubmissionOutcome::ReinforcementSuggested { fail_count, .. } => {
            println!(
                "{} {fail_count} consecutive fails.",
                "Failed:".red().bold()
            );
            println!(
                "  Consider a reinforcement skill: `mastery add <name> --reinforcement --parent {}`",
                args.skill
            );
        }
        SubmissionOutcome::Rejected(rejection) => {
            println!("{} {rejection}", "Rejected:".yellow().bold());
        }
    }

    Ok(())
}

fn print_json(outcome: &SubmissionOutcome) -> Result<()> {
    let value = match outcome {
        SubmissionOutcome::Passed { skill, record } => {
            serde_json::json!({ "result": "passed", "skill": skill, "record": record })
        }
        SubmissionOutcome::Failed {
            skill,
            record,
            regressed_to,
        } => serde_json::json!({
            "result": "failed",
            "skill": skill,
            "record": record,
            "regressed_to": regressed_to,
        }),
        SubmissionOutcome::ReinforcementSuggested {
            skill,
            record,
            fail_count,
        } => serde_json::json!({
            "result": "failed",
            "skill": skill,
            "record": record,
            "fail_count": fail_count,
            "suggestion": "create a reinforcement skill",
        }),
        SubmissionOutcome::Rejected(rejection) => {
            serde_json::json!({ "result": "rejected", "reason": rejection.to_string() })
        }
    };
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}
