//! The S.M.A.E. mastery scale.
//!
//! Four levels: Exposure (you understand the theory), Imitation (execution
//! with guidance), Autonomy (execution without help, the "cold test"), and
//! Consolidation (repetition after the 48-hour window, long-term memory).
//! A skill that has not been started yet sits at Exposure with its active
//! flag cleared.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Maximum number of skills that may be active (work-in-progress) at once.
pub const MAX_WIP: usize = 3;

/// Mandatory wait between passing Autonomy and attempting Consolidation.
pub const CONSOLIDATION_HOURS: i64 = 48;

/// The consolidation window in milliseconds.
pub const CONSOLIDATION_MS: i64 = CONSOLIDATION_HOURS * 60 * 60 * 1000;

/// Mastery level of a skill.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Level {
    Exposure = 1,
    Imitation = 2,
    Autonomy = 3,
    Consolidation = 4,
}

impl Level {
    pub const MIN: Level = Level::Exposure;
    pub const MAX: Level = Level::Consolidation;

    /// Numeric value on the 1..=4 scale.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Parse a numeric level. Values outside 1..=4 are rejected, not clamped.
    #[must_use]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::Exposure),
            2 => Some(Self::Imitation),
            3 => Some(Self::Autonomy),
            4 => Some(Self::Consolidation),
            _ => None,
        }
    }

    /// The next level up, if any.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        Self::from_u8(self.as_u8() + 1)
    }

    /// The level below, saturating at Exposure.
    #[must_use]
    pub const fn prev(self) -> Self {
        match Self::from_u8(self.as_u8().saturating_sub(1)) {
            Some(level) => level,
            None => Self::Exposure,
        }
    }

    /// Drop by `steps`, saturating at Exposure.
    #[must_use]
    pub const fn down(self, steps: u8) -> Self {
        match Self::from_u8(self.as_u8().saturating_sub(steps)) {
            Some(level) => level,
            None => Self::Exposure,
        }
    }

    /// Human label for display.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Exposure => "Exposure",
            Self::Imitation => "Imitation",
            Self::Autonomy => "Autonomy",
            Self::Consolidation => "Consolidation",
        }
    }

    /// Short description of what the level means.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Exposure => "You understand the theory. You know what it is.",
            Self::Imitation => "Execution with guidance or instructions.",
            Self::Autonomy => "Execution without help (the cold test).",
            Self::Consolidation => "Repetition after 48h (long-term memory).",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{} {}", self.as_u8(), self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_u8_rejects_out_of_range() {
        assert_eq!(Level::from_u8(0), None);
        assert_eq!(Level::from_u8(5), None);
        assert_eq!(Level::from_u8(1), Some(Level::Exposure));
        assert_eq!(Level::from_u8(4), Some(Level::Consolidation));
    }

    #[test]
    fn next_stops_at_consolidation() {
        assert_eq!(Level::Autonomy.next(), Some(Level::Consolidation));
        assert_eq!(Level::Consolidation.next(), None);
    }

    #[test]
    fn down_saturates_at_exposure() {
        assert_eq!(Level::Consolidation.down(2), Level::Imitation);
        assert_eq!(Level::Imitation.down(2), Level::Exposure);
        assert_eq!(Level::Exposure.down(2), Level::Exposure);
    }

    #[test]
    fn ordering_follows_scale() {
        assert!(Level::Exposure < Level::Imitation);
        assert!(Level::Autonomy < Level::Consolidation);
    }
}
