//! CLI module - Command-line interface definitions and handlers
//!
//! Uses clap v4 with derive macros for argument parsing.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod commands;

/// mastery - track skills as a dependency graph with honest progression
#[derive(Parser, Debug)]
#[command(name = "mastery")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Machine-readable JSON output
    #[arg(long, short = 'j', global = true)]
    pub json: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Config file path (default: ~/.config/mastery/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add a skill to the graph
    Add(commands::add::AddArgs),

    /// List skills with level and WIP state
    List(commands::list::ListArgs),

    /// Show one skill in detail
    Show(commands::show::ShowArgs),

    /// Edit a skill (rename, recategorize, replace requirements)
    Edit(commands::edit::EditArgs),

    /// Delete a skill and its validation history
    Rm(commands::rm::RmArgs),

    /// Attempt a level-up
    Up(commands::up::UpArgs),

    /// Submit a validation attempt with evidence
    Validate(commands::validate::ValidateArgs),

    /// Brutal honesty: invalidate a past pass and regress the skill
    Panic(commands::panic::PanicArgs),

    /// Check the consolidation cooldown for a skill
    Cooldown(commands::cooldown::CooldownArgs),

    /// Validation history for a skill
    History(commands::history::HistoryArgs),

    /// Recompute display coordinates for the graph
    Layout(commands::layout::LayoutArgs),

    /// Print the dependency graph by layer
    Graph(commands::graph::GraphArgs),

    /// Dispatch pending cooldown-elapsed notifications
    Sweep(commands::sweep::SweepArgs),

    /// Import a legacy (0..5 scale) JSON export
    Import(commands::import::ImportArgs),

    /// Debug helpers (fast-forward time for a skill)
    Debug(commands::debug::DebugArgs),

    /// Generate shell completions
    Completions(commands::completions::CompletionsArgs),
}
