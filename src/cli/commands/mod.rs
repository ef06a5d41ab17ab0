//! CLI command implementations
//!
//! Each subcommand has its own module with:
//! - Args struct for command-line arguments
//! - `run()` function to execute the command

use crate::app::AppContext;
use crate::cli::Commands;
use crate::error::Result;

pub mod add;
pub mod completions;
pub mod cooldown;
pub mod debug;
pub mod edit;
pub mod graph;
pub mod history;
pub mod import;
pub mod layout;
pub mod list;
pub mod panic;
pub mod rm;
pub mod show;
pub mod sweep;
pub mod up;
pub mod validate;

/// Human-readable UTC timestamp from epoch milliseconds.
pub(crate) fn format_timestamp(ms: i64) -> String {
    chrono::DateTime::from_timestamp_millis(ms)
        .map(|dt| dt.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| format!("{ms}ms"))
}

/// Dispatch a command to its handler
pub fn run(ctx: &AppContext, command: &Commands) -> Result<()> {
    match command {
        Commands::Add(args) => add::run(ctx, args),
        Commands::List(args) => list::run(ctx, args),
        Commands::Show(args) => show::run(ctx, args),
        Commands::Edit(args) => edit::run(ctx, args),
        Commands::Rm(args) => rm::run(ctx, args),
        Commands::Up(args) => up::run(ctx, args),
        Commands::Validate(args) => validate::run(ctx, args),
        Commands::Panic(args) => panic::run(ctx, args),
        Commands::Cooldown(args) => cooldown::run(ctx, args),
        Commands::History(args) => history::run(ctx, args),
        Commands::Layout(args) => layout::run(ctx, args),
        Commands::Graph(args) => graph::run(ctx, args),
        Commands::Sweep(args) => sweep::run(ctx, args),
        Commands::Import(args) => import::run(ctx, args),
        Commands::Debug(args) => debug::run(ctx, args),
        Commands::Completions(args) => completions::run(args),
    }
}
