use std::io;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MasteryError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Skill not found: {0}")]
    SkillNotFound(String),

    #[error("Validation record not found: {0}")]
    ValidationNotFound(String),

    #[error("Requirement target not found: {0}")]
    RequirementNotFound(String),

    #[error("Not authorized")]
    NotAuthorized,

    #[error("Config error: {0}")]
    Config(String),

    #[error("Import failed: {0}")]
    Import(String),

    #[error("Transaction failed: {0}")]
    TransactionFailed(String),
}

pub type Result<T> = std::result::Result<T, MasteryError>;
