//! Level-up orchestration.

use tracing::debug;

use crate::core::{Clock, LevelUpBlock, Skill};
use crate::error::{MasteryError, Result};
use crate::storage::Database;

use super::SkillLocks;

/// Result of a level-up attempt. A block is a normal negative outcome.
#[derive(Debug, Clone, PartialEq)]
pub enum LevelUpOutcome {
    Advanced(Skill),
    Blocked(LevelUpBlock),
}

pub struct ProgressionService<'a> {
    db: &'a Database,
    clock: &'a dyn Clock,
    locks: &'a SkillLocks,
}

impl<'a> ProgressionService<'a> {
    #[must_use]
    pub fn new(db: &'a Database, clock: &'a dyn Clock, locks: &'a SkillLocks) -> Self {
        Self { db, clock, locks }
    }

    /// Validate and apply a single-step advance for `skill_id`.
    ///
    /// Runs under the per-skill lock against one snapshot of the owner's
    /// graph, so the WIP count and dependency levels the decision is based
    /// on are consistent with what gets persisted.
    pub fn attempt_level_up(&self, owner: &str, skill_id: &str) -> Result<LevelUpOutcome> {
        self.locks.with_lock(owner, skill_id, || {
            let snapshot = self.db.skills_for_owner(owner)?;
            let skill = snapshot
                .iter()
                .find(|s| s.id == skill_id)
                .ok_or_else(|| MasteryError::SkillNotFound(skill_id.to_string()))?;

            let current_wip = snapshot.iter().filter(|s| s.active).count();
            let lookup = |id: &str| snapshot.iter().find(|s| s.id == id);

            match skill.level_up(lookup, current_wip, self.clock) {
                Ok(updated) => {
                    self.db.save_skill(&updated)?;
                    debug!(skill = %skill_id, level = %updated.level, "level up");
                    Ok(LevelUpOutcome::Advanced(updated))
                }
                Err(block) => Ok(LevelUpOutcome::Blocked(block)),
            }
        })
    }

    /// Current WIP count for display.
    pub fn current_wip(&self, owner: &str) -> Result<usize> {
        self.db.active_count(owner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Level, ManualClock, MAX_WIP};
    use crate::service::{CatalogOutcome, NewSkill, SkillService};

    const HOUR_MS: i64 = 60 * 60 * 1000;

    struct Fixture {
        db: Database,
        clock: ManualClock,
        locks: SkillLocks,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                db: Database::open_in_memory().unwrap(),
                clock: ManualClock::new(1_000 * HOUR_MS),
                locks: SkillLocks::new(),
            }
        }

        fn progression(&self) -> ProgressionService<'_> {
            ProgressionService::new(&self.db, &self.clock, &self.locks)
        }

        fn add_skill(&self, name: &str, requirements: &[&str]) -> Skill {
            let outcome = SkillService::new(&self.db)
                .create(
                    "ana",
                    NewSkill {
                        name: name.to_string(),
                        category: "general".to_string(),
                        requirements: requirements.iter().map(|r| (*r).to_string()).collect(),
                        ..NewSkill::default()
                    },
                )
                .unwrap();
            match outcome {
                CatalogOutcome::Saved(skill) => skill,
                CatalogOutcome::Rejected(r) => panic!("unexpected rejection: {r}"),
            }
        }
    }

    #[test]
    fn starting_a_skill_consumes_a_wip_slot() {
        let fx = Fixture::new();
        fx.add_skill("guitar", &[]);

        let outcome = fx.progression().attempt_level_up("ana", "guitar").unwrap();
        match outcome {
            LevelUpOutcome::Advanced(skill) => {
                assert!(skill.active);
                assert_eq!(skill.level, Level::Exposure);
            }
            other => panic!("expected advance, got {other:?}"),
        }
        assert_eq!(fx.progression().current_wip("ana").unwrap(), 1);
    }

    #[test]
    fn fourth_start_is_blocked_until_wip_frees_up() {
        let fx = Fixture::new();
        for name in ["a", "b", "c", "d"] {
            fx.add_skill(name, &[]);
        }
        for name in ["a", "b", "c"] {
            fx.progression().attempt_level_up("ana", name).unwrap();
        }
        assert_eq!(fx.progression().current_wip("ana").unwrap(), MAX_WIP);

        let blocked = fx.progression().attempt_level_up("ana", "d").unwrap();
        assert!(matches!(
            blocked,
            LevelUpOutcome::Blocked(LevelUpBlock::WipLimitReached { .. })
        ));

        // Free a slot and retry.
        let mut parked = fx.db.get_skill("ana", "a").unwrap().unwrap();
        parked.active = false;
        fx.db.save_skill(&parked).unwrap();

        let retried = fx.progression().attempt_level_up("ana", "d").unwrap();
        assert!(matches!(retried, LevelUpOutcome::Advanced(_)));
    }

    #[test]
    fn locked_skill_reports_unmet_requirements() {
        let fx = Fixture::new();
        fx.add_skill("guitar", &[]);
        let mut parent = fx.db.get_skill("ana", "guitar").unwrap().unwrap();
        parent.level = Level::Autonomy;
        fx.db.save_skill(&parent).unwrap();

        fx.add_skill("chords", &["guitar"]);
        let blocked = fx.progression().attempt_level_up("ana", "chords").unwrap();
        match blocked {
            LevelUpOutcome::Blocked(LevelUpBlock::RequirementsUnmet { missing }) => {
                assert_eq!(missing, vec!["guitar"]);
            }
            other => panic!("expected requirements block, got {other:?}"),
        }

        // Consolidate the parent and the child unlocks.
        let mut parent = fx.db.get_skill("ana", "guitar").unwrap().unwrap();
        parent.level = Level::Consolidation;
        fx.db.save_skill(&parent).unwrap();
        let outcome = fx.progression().attempt_level_up("ana", "chords").unwrap();
        assert!(matches!(outcome, LevelUpOutcome::Advanced(_)));
    }

    #[test]
    fn cooldown_blocks_and_then_releases() {
        let fx = Fixture::new();
        fx.add_skill("guitar", &[]);
        let mut skill = fx.db.get_skill("ana", "guitar").unwrap().unwrap();
        skill.level = Level::Autonomy;
        skill.active = true;
        skill.last_practiced = Some(fx.clock.now_ms());
        fx.db.save_skill(&skill).unwrap();

        fx.clock.advance_hours(47);
        let blocked = fx.progression().attempt_level_up("ana", "guitar").unwrap();
        match blocked {
            LevelUpOutcome::Blocked(LevelUpBlock::CooldownActive { hours_remaining }) => {
                assert!((hours_remaining - 1.0).abs() < 1e-9);
            }
            other => panic!("expected cooldown block, got {other:?}"),
        }

        fx.clock.advance_hours(2);
        let outcome = fx.progression().attempt_level_up("ana", "guitar").unwrap();
        match outcome {
            LevelUpOutcome::Advanced(skill) => {
                assert_eq!(skill.level, Level::Consolidation);
                assert!(!skill.active, "consolidation frees the WIP slot");
            }
            other => panic!("expected advance, got {other:?}"),
        }
    }

    #[test]
    fn unknown_skill_is_not_found() {
        let fx = Fixture::new();
        let err = fx.progression().attempt_level_up("ana", "nope").unwrap_err();
        assert!(matches!(err, MasteryError::SkillNotFound(_)));
    }
}
