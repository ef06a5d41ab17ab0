//! mastery layout - Recompute display coordinates

use clap::Args;
use colored::Colorize;

use crate::app::AppContext;
use crate::error::Result;
use crate::service::SkillService;

#[derive(Args, Debug)]
pub struct LayoutArgs {}

pub fn run(ctx: &AppContext, _args: &LayoutArgs) -> Result<()> {
    let positioned = SkillService::new(&ctx.db).relayout(ctx.owner())?;

    if ctx.json {
        let coords: Vec<_> = positioned
            .iter()
            .map(|s| serde_json::json!({ "id": s.id, "x": s.x, "y": s.y }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&coords)?);
    } else {
        println!(
            "{} coordinates recomputed for {} skills.",
            "Layout:".green().bold(),
            positioned.len()
        );
    }
    Ok(())
}
