//! Skill entity and its level-transition rules.
//!
//! `Skill` is an immutable value: every transition returns a new instance,
//! and persisting the result is the orchestrating service's job. All gating
//! conditions for advancement live in [`Skill::can_level_up`] so the
//! precedence between them stays explicit: dependency failures surface
//! before WIP failures, which surface before cooldown failures.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::clock::{Clock, TimestampMs};
use super::level::{CONSOLIDATION_HOURS, Level, MAX_WIP};

/// A skill node in the mastery graph.
///
/// "Not started" is `level = Exposure, active = false, last_practiced = None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    /// Unique per owner.
    pub id: String,
    /// Profile the skill belongs to.
    pub owner: String,
    pub name: String,
    /// Free-form grouping label.
    pub category: String,
    pub level: Level,
    /// Whether the skill counts against the WIP budget.
    pub active: bool,
    /// Consecutive failed validations since the last pass.
    pub fail_count: u32,
    /// Set exactly when a level-up or a passing validation occurs.
    pub last_practiced: Option<TimestampMs>,
    /// IDs of skills that must reach Consolidation before this one advances.
    pub requirements: Vec<String>,
    /// Milestone marker, display-only.
    pub milestone: bool,
    /// Created to shore up a repeatedly-failed skill.
    pub reinforcement: bool,
    /// Back-reference to the skill that spawned this reinforcement node.
    pub parent_skill_id: Option<String>,
    /// Derived display coordinate, recomputed by the layout engine.
    pub x: f64,
    /// Derived display coordinate, recomputed by the layout engine.
    pub y: f64,
}

/// Why a level-up attempt was blocked. A normal negative outcome, not an
/// error: carries the human-readable reason and any structured data the
/// caller needs.
#[derive(Debug, Clone, PartialEq)]
pub enum LevelUpBlock {
    MasteryReached,
    RequirementsUnmet { missing: Vec<String> },
    WipLimitReached { active: usize },
    CooldownActive { hours_remaining: f64 },
}

impl fmt::Display for LevelUpBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MasteryReached => write!(f, "Mastery already reached (Consolidation is the final level)."),
            Self::RequirementsUnmet { .. } => {
                write!(f, "Parent skills must reach Consolidation (L4) first.")
            }
            Self::WipLimitReached { .. } => {
                write!(f, "WIP limit reached! Finish or pause an active skill.")
            }
            Self::CooldownActive { hours_remaining } => write!(
                f,
                "Wait {}h to consolidate long-term memory (L4).",
                hours_remaining.ceil() as i64
            ),
        }
    }
}

impl Skill {
    /// A fresh, not-yet-started skill.
    pub fn new(
        id: impl Into<String>,
        owner: impl Into<String>,
        name: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            owner: owner.into(),
            name: name.into(),
            category: category.into(),
            level: Level::Exposure,
            active: false,
            fail_count: 0,
            last_practiced: None,
            requirements: Vec::new(),
            milestone: false,
            reinforcement: false,
            parent_skill_id: None,
            x: 0.0,
            y: 0.0,
        }
    }

    pub fn with_requirements(mut self, requirements: Vec<String>) -> Self {
        self.requirements = requirements;
        self
    }

    /// True iff every requirement resolves to a skill at Consolidation.
    /// An unresolvable requirement ID counts as not satisfied.
    pub fn is_unlocked<'a, F>(&self, lookup: F) -> bool
    where
        F: Fn(&str) -> Option<&'a Skill>,
    {
        self.requirements
            .iter()
            .all(|req_id| lookup(req_id).is_some_and(|parent| parent.level >= Level::Consolidation))
    }

    /// Requirement IDs that are missing or below Consolidation.
    pub fn missing_requirements<'a, F>(&self, lookup: F) -> Vec<String>
    where
        F: Fn(&str) -> Option<&'a Skill>,
    {
        self.requirements
            .iter()
            .filter(|req_id| {
                !lookup(req_id.as_str()).is_some_and(|parent| parent.level >= Level::Consolidation)
            })
            .cloned()
            .collect()
    }

    /// True iff the 48h window is still running. Cooldown only gates the
    /// Autonomy → Consolidation transition; at any other level it is never
    /// active.
    pub fn is_in_cooldown(&self, clock: &dyn Clock) -> bool {
        if self.level != Level::Autonomy {
            return false;
        }
        let Some(last) = self.last_practiced else {
            return false;
        };
        hours_since(last, clock.now_ms()) < CONSOLIDATION_HOURS as f64
    }

    /// Hours left in the cooldown window; zero when no cooldown is active.
    pub fn cooldown_hours_remaining(&self, clock: &dyn Clock) -> f64 {
        if !self.is_in_cooldown(clock) {
            return 0.0;
        }
        let Some(last) = self.last_practiced else {
            return 0.0;
        };
        (CONSOLIDATION_HOURS as f64 - hours_since(last, clock.now_ms())).max(0.0)
    }

    /// Ordered gating checks for advancement; the first failing reason wins.
    pub fn can_level_up<'a, F>(
        &self,
        lookup: F,
        current_wip: usize,
        clock: &dyn Clock,
    ) -> Result<(), LevelUpBlock>
    where
        F: Fn(&str) -> Option<&'a Skill>,
    {
        if self.level == Level::MAX {
            return Err(LevelUpBlock::MasteryReached);
        }

        if !self.is_unlocked(&lookup) {
            return Err(LevelUpBlock::RequirementsUnmet {
                missing: self.missing_requirements(&lookup),
            });
        }

        // The WIP ceiling only gates starting a skill; active skills are
        // already inside the budget.
        if !self.active && current_wip >= MAX_WIP {
            return Err(LevelUpBlock::WipLimitReached {
                active: current_wip,
            });
        }

        if self.is_in_cooldown(clock) {
            return Err(LevelUpBlock::CooldownActive {
                hours_remaining: self.cooldown_hours_remaining(clock),
            });
        }

        Ok(())
    }

    /// Advance one step: starting an inactive skill activates it at its
    /// current level; an active skill moves up exactly one level. Reaching
    /// Consolidation clears the active flag so mastery does not count
    /// against the WIP budget.
    pub fn level_up<'a, F>(
        &self,
        lookup: F,
        current_wip: usize,
        clock: &dyn Clock,
    ) -> Result<Skill, LevelUpBlock>
    where
        F: Fn(&str) -> Option<&'a Skill>,
    {
        self.can_level_up(lookup, current_wip, clock)?;

        let next = if self.active {
            match self.level.next() {
                Some(level) => level,
                None => return Err(LevelUpBlock::MasteryReached),
            }
        } else {
            self.level
        };

        Ok(Skill {
            level: next,
            active: next < Level::MAX,
            last_practiced: Some(clock.now_ms()),
            ..self.clone()
        })
    }

    /// Apply a passing validation: level set to the attempted level, fail
    /// count reset, practice timestamp stamped.
    pub fn record_pass(&self, level: Level, clock: &dyn Clock) -> Skill {
        Skill {
            level,
            active: level < Level::MAX,
            fail_count: 0,
            last_practiced: Some(clock.now_ms()),
            ..self.clone()
        }
    }

    /// Apply a failed validation. Never touches the practice timestamp.
    pub fn record_fail(&self) -> Skill {
        Skill {
            fail_count: self.fail_count + 1,
            ..self.clone()
        }
    }

    /// Kick the skill back to `level` after a failed attempt above it.
    pub fn regressed_to(&self, level: Level) -> Skill {
        Skill {
            level,
            ..self.clone()
        }
    }

    /// Brutal-honesty reset: drop two levels (floored at Exposure) and
    /// forget the fail streak.
    pub fn panic_reset(&self) -> Skill {
        Skill {
            level: self.level.down(2),
            fail_count: 0,
            ..self.clone()
        }
    }

    /// Debug helper: pretend `hours` have already passed by shifting the
    /// practice timestamp back.
    pub fn fast_forward(&self, hours: i64) -> Skill {
        Skill {
            last_practiced: self
                .last_practiced
                .map(|ts| ts - hours * 60 * 60 * 1000),
            ..self.clone()
        }
    }

    /// Updated display position from the layout engine.
    pub fn at_position(&self, x: f64, y: f64) -> Skill {
        Skill {
            x,
            y,
            ..self.clone()
        }
    }
}

fn hours_since(then: TimestampMs, now: TimestampMs) -> f64 {
    (now - then) as f64 / (1000.0 * 60.0 * 60.0)
}
