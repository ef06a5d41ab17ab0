//! Domain core: the skill progression state machine.

pub mod clock;
pub mod level;
pub mod skill;
pub mod validation;

pub use clock::{Clock, ManualClock, SystemClock, TimestampMs};
pub use level::{CONSOLIDATION_HOURS, CONSOLIDATION_MS, Level, MAX_WIP};
pub use skill::{LevelUpBlock, Skill};
pub use validation::{
    CooldownStatus, EvidenceType, SubmissionOutcome, SubmissionRejection, SubmissionRequest,
    ValidationRecord,
};
