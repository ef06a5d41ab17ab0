//! Shared application context for CLI commands.

use crate::cli::Cli;
use crate::config::Config;
use crate::core::SystemClock;
use crate::error::Result;
use crate::service::SkillLocks;
use crate::storage::Database;

/// Everything a command handler needs.
pub struct AppContext {
    pub config: Config,
    pub db: Database,
    pub clock: SystemClock,
    pub locks: SkillLocks,
    /// Machine-readable JSON output requested.
    pub json: bool,
}

impl AppContext {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let config = Config::load(cli.config.as_deref())?;
        let db = Database::open(config.db_path())?;

        Ok(Self {
            config,
            db,
            clock: SystemClock,
            locks: SkillLocks::new(),
            json: cli.json,
        })
    }

    /// Owner profile all operations run as.
    #[must_use]
    pub fn owner(&self) -> &str {
        &self.config.owner
    }
}
