//! mastery import - One-shot import of a legacy JSON export

use std::path::PathBuf;

use clap::Args;
use colored::Colorize;

use crate::app::AppContext;
use crate::error::{MasteryError, Result};
use crate::storage::legacy;

#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Path to a JSON export on the legacy 0..5 level scale
    #[arg(long, value_name = "FILE")]
    pub legacy: Option<PathBuf>,
}

pub fn run(ctx: &AppContext, args: &ImportArgs) -> Result<()> {
    let Some(path) = &args.legacy else {
        return Err(MasteryError::Config(
            "nothing to import: pass --legacy <FILE>".to_string(),
        ));
    };

    let summary = legacy::import_file(&ctx.db, ctx.owner(), path)?;

    if ctx.json {
        println!(
            "{}",
            serde_json::json!({
                "imported": summary.imported,
                "retired_masteries": summary.retired_masteries,
            })
        );
    } else {
        println!(
            "{} {} skills imported onto the 1..4 scale.",
            "Imported:".green().bold(),
            summary.imported
        );
        if summary.retired_masteries > 0 {
            println!(
                "  {} legacy Mastery (L5) skills now sit at Consolidation, no longer in progress.",
                summary.retired_masteries
            );
        }
    }
    Ok(())
}
