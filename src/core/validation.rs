//! Validation attempts and their outcomes.
//!
//! Every evidence submission becomes an append-only [`ValidationRecord`].
//! The typed outcome enums keep policy rejections out of the error channel:
//! a blocked submission is a normal negative result with a reason, not a
//! fault.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::clock::TimestampMs;
use super::level::Level;
use super::skill::Skill;

/// Kind of evidence attached to a validation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum EvidenceType {
    Video,
    Audio,
    Image,
    Text,
}

impl EvidenceType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Audio => "audio",
            Self::Image => "image",
            Self::Text => "text",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "video" => Some(Self::Video),
            "audio" => Some(Self::Audio),
            "image" => Some(Self::Image),
            "text" => Some(Self::Text),
            _ => None,
        }
    }
}

impl fmt::Display for EvidenceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One validation attempt for a skill at a given level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationRecord {
    pub id: String,
    pub skill_id: String,
    pub level: Level,
    pub evidence_type: EvidenceType,
    pub evidence: String,
    pub passed: bool,
    pub attempted_at: TimestampMs,
    /// Set iff the attempt passed. Cleared again if a later panic
    /// invalidates the record.
    pub passed_at: Option<TimestampMs>,
    /// Set iff this attempt is a passing Autonomy validation: the moment
    /// future Consolidation attempts become legal.
    pub cooldown_end: Option<TimestampMs>,
    /// Whether the cooldown-elapsed notification has been dispatched.
    pub notified: bool,
}

/// Input for a validation submission.
#[derive(Debug, Clone)]
pub struct SubmissionRequest {
    pub skill_id: String,
    pub level: Level,
    pub evidence_type: EvidenceType,
    pub evidence: String,
    pub passed: bool,
}

/// Why a submission was refused before any record was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionRejection {
    /// Levels are strictly sequential; `attempted > current + 1` is never
    /// allowed, regardless of evidence content.
    LevelSkip { attempted: Level, current: Level },
    /// Consolidation requires a prior passing Autonomy validation.
    AutonomyIncomplete,
    /// The 48h window since the qualifying Autonomy pass has not elapsed.
    CooldownActive {
        cooldown_end: TimestampMs,
        remaining_ms: i64,
    },
}

impl fmt::Display for SubmissionRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LevelSkip { attempted, current } => write!(
                f,
                "Cannot skip levels: the skill is at {current}, so {attempted} is out of reach. \
                 Complete the current level first."
            ),
            Self::AutonomyIncomplete => {
                write!(f, "Complete Autonomy (L3) before attempting Consolidation (L4).")
            }
            Self::CooldownActive { remaining_ms, .. } => {
                let hours = (*remaining_ms as f64 / (1000.0 * 60.0 * 60.0)).ceil() as i64;
                write!(
                    f,
                    "Cooldown active: wait ~{hours}h (48h required since passing Autonomy)."
                )
            }
        }
    }
}

/// Result of a validation submission.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionOutcome {
    /// The attempt passed: the skill now sits at the attempted level.
    Passed {
        skill: Skill,
        record: ValidationRecord,
    },
    /// The attempt failed; `regressed_to` is set when the fail kicked the
    /// skill back out of the level it was trying to leave.
    Failed {
        skill: Skill,
        record: ValidationRecord,
        regressed_to: Option<Level>,
    },
    /// Third consecutive failure: the fail count is persisted and the
    /// caller is advised to create a reinforcement skill. No regression is
    /// applied in the same call.
    ReinforcementSuggested {
        skill: Skill,
        record: ValidationRecord,
        fail_count: u32,
    },
    /// Refused before any state change.
    Rejected(SubmissionRejection),
}

/// Answer to "may this skill attempt Consolidation yet?".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CooldownStatus {
    /// No passing Autonomy validation exists yet.
    AutonomyIncomplete,
    /// Qualifying pass exists but the window is still running.
    Waiting {
        cooldown_end: TimestampMs,
        remaining_ms: i64,
    },
    /// The window has elapsed; Consolidation may be attempted.
    Ready { cooldown_end: TimestampMs },
}
