//! mastery graph - Print the dependency graph by layer

use std::collections::BTreeMap;

use clap::Args;
use colored::Colorize;

use crate::app::AppContext;
use crate::error::Result;
use crate::graph::{adjacency_of, dependency_depths};
use crate::service::SkillService;

#[derive(Args, Debug)]
pub struct GraphArgs {}

pub fn run(ctx: &AppContext, _args: &GraphArgs) -> Result<()> {
    let skills = SkillService::new(&ctx.db).list(ctx.owner())?;
    if skills.is_empty() {
        println!("No skills yet.");
        return Ok(());
    }

    let adj = adjacency_of(&skills);
    let depths = dependency_depths(&adj);

    let mut layers: BTreeMap<usize, Vec<&crate::core::Skill>> = BTreeMap::new();
    for skill in &skills {
        let depth = depths.get(&skill.id).copied().unwrap_or(0);
        layers.entry(depth).or_default().push(skill);
    }

    if ctx.json {
        let value: Vec<_> = layers
            .iter()
            .map(|(depth, layer)| {
                serde_json::json!({
                    "depth": depth,
                    "skills": layer.iter().map(|s| s.id.clone()).collect::<Vec<_>>(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    for (depth, mut layer) in layers {
        layer.sort_by(|a, b| a.category.cmp(&b.category).then_with(|| a.id.cmp(&b.id)));
        println!("{}", format!("Layer {depth}").bold());
        for skill in layer {
            let deps = if skill.requirements.is_empty() {
                String::new()
            } else {
                format!("  ← {}", skill.requirements.join(", "))
            };
            println!("  {} {}{}", skill.id, skill.level.to_string().dimmed(), deps.dimmed());
        }
    }

    Ok(())
}
