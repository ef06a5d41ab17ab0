//! Evidence submissions, cooldown gating, fail regression, and the panic
//! escape hatch.
//!
//! The validation history is append-only: records are only ever mutated by
//! a panic (invalidation) or by the notification sweep (`notified`).

use tracing::{debug, info};
use uuid::Uuid;

use crate::core::{
    CONSOLIDATION_MS, Clock, CooldownStatus, Level, Skill, SubmissionOutcome,
    SubmissionRejection, SubmissionRequest, ValidationRecord,
};
use crate::error::{MasteryError, Result};
use crate::storage::{CooldownNotice, Database};

use super::SkillLocks;

/// Consecutive fails that trigger the reinforcement suggestion.
const REINFORCEMENT_THRESHOLD: u32 = 3;

/// Result of a panic reset.
#[derive(Debug, Clone, PartialEq)]
pub struct PanicOutcome {
    pub previous_level: Level,
    pub skill: Skill,
}

pub struct ValidationService<'a> {
    db: &'a Database,
    clock: &'a dyn Clock,
    locks: &'a SkillLocks,
}

impl<'a> ValidationService<'a> {
    #[must_use]
    pub fn new(db: &'a Database, clock: &'a dyn Clock, locks: &'a SkillLocks) -> Self {
        Self { db, clock, locks }
    }

    /// Validation history for a skill, newest first.
    pub fn history(&self, owner: &str, skill_id: &str) -> Result<Vec<ValidationRecord>> {
        if self.db.get_skill(owner, skill_id)?.is_none() {
            return Err(MasteryError::SkillNotFound(skill_id.to_string()));
        }
        self.db.validations_for_skill(owner, skill_id)
    }

    /// Record a validation attempt and apply its level side effects.
    pub fn submit(&self, owner: &str, request: SubmissionRequest) -> Result<SubmissionOutcome> {
        self.locks.with_lock(owner, &request.skill_id, || {
            let skill = self
                .db
                .get_skill(owner, &request.skill_id)?
                .ok_or_else(|| MasteryError::SkillNotFound(request.skill_id.clone()))?;

            // Levels are strictly sequential.
            if request.level.as_u8() > skill.level.as_u8() + 1 {
                return Ok(SubmissionOutcome::Rejected(SubmissionRejection::LevelSkip {
                    attempted: request.level,
                    current: skill.level,
                }));
            }

            // Consolidation only opens 48h after a passing Autonomy check.
            if request.level == Level::Consolidation {
                if let Some(rejection) = self.consolidation_gate(owner, &request.skill_id)? {
                    return Ok(SubmissionOutcome::Rejected(rejection));
                }
            }

            let now = self.clock.now_ms();
            let record = ValidationRecord {
                id: Uuid::new_v4().to_string(),
                skill_id: request.skill_id.clone(),
                level: request.level,
                evidence_type: request.evidence_type,
                evidence: request.evidence.clone(),
                passed: request.passed,
                attempted_at: now,
                passed_at: request.passed.then_some(now),
                cooldown_end: (request.passed && request.level == Level::Autonomy)
                    .then_some(now + CONSOLIDATION_MS),
                notified: false,
            };

            if request.passed {
                let updated = skill.record_pass(request.level, self.clock);
                self.db.record_submission(&updated, &record)?;
                debug!(skill = %updated.id, level = %updated.level, "validation passed");
                return Ok(SubmissionOutcome::Passed {
                    skill: updated,
                    record,
                });
            }

            let failed = skill.record_fail();

            // The reinforcement threshold short-circuits the regression rule.
            if failed.fail_count >= REINFORCEMENT_THRESHOLD {
                self.db.record_submission(&failed, &record)?;
                let fail_count = failed.fail_count;
                return Ok(SubmissionOutcome::ReinforcementSuggested {
                    skill: failed,
                    record,
                    fail_count,
                });
            }

            // Failing out of Autonomy or Consolidation kicks the skill back
            // below the attempted level; early-level fails only count.
            let regress_target = request.level.prev();
            if request.level >= Level::Autonomy && skill.level >= regress_target {
                let regressed = failed.regressed_to(regress_target);
                self.db.record_submission(&regressed, &record)?;
                return Ok(SubmissionOutcome::Failed {
                    skill: regressed,
                    record,
                    regressed_to: Some(regress_target),
                });
            }

            self.db.record_submission(&failed, &record)?;
            Ok(SubmissionOutcome::Failed {
                skill: failed,
                record,
                regressed_to: None,
            })
        })
    }

    /// Brutal-honesty reset: the caller admits a recorded pass was
    /// unearned. Drops the skill two levels, clears the fail streak, and
    /// invalidates the referenced record.
    pub fn panic(&self, owner: &str, validation_id: &str) -> Result<PanicOutcome> {
        let (record_owner, record) = self
            .db
            .get_validation(validation_id)?
            .ok_or_else(|| MasteryError::ValidationNotFound(validation_id.to_string()))?;

        if record_owner != owner {
            return Err(MasteryError::NotAuthorized);
        }

        self.locks.with_lock(owner, &record.skill_id, || {
            let skill = self
                .db
                .get_skill(owner, &record.skill_id)?
                .ok_or_else(|| MasteryError::SkillNotFound(record.skill_id.clone()))?;

            let previous_level = skill.level;
            let updated = skill.panic_reset();
            self.db.apply_panic(&updated, &record.id)?;
            info!(
                skill = %updated.id,
                from = %previous_level,
                to = %updated.level,
                "panic reset applied"
            );

            Ok(PanicOutcome {
                previous_level,
                skill: updated,
            })
        })
    }

    /// May this skill attempt Consolidation yet?
    pub fn cooldown_status(&self, owner: &str, skill_id: &str) -> Result<CooldownStatus> {
        if self.db.get_skill(owner, skill_id)?.is_none() {
            return Err(MasteryError::SkillNotFound(skill_id.to_string()));
        }

        let qualifying = self
            .db
            .latest_passing_validation(owner, skill_id, Level::Autonomy)?
            .and_then(|record| record.passed_at);

        let Some(passed_at) = qualifying else {
            return Ok(CooldownStatus::AutonomyIncomplete);
        };

        let cooldown_end = passed_at + CONSOLIDATION_MS;
        let now = self.clock.now_ms();
        if now >= cooldown_end {
            Ok(CooldownStatus::Ready { cooldown_end })
        } else {
            Ok(CooldownStatus::Waiting {
                cooldown_end,
                remaining_ms: cooldown_end - now,
            })
        }
    }

    /// Find elapsed, un-notified cooldowns, emit their notifications, and
    /// mark them dispatched.
    pub fn sweep_cooldowns(&self) -> Result<Vec<CooldownNotice>> {
        let notices = self.db.due_cooldown_notices(self.clock.now_ms())?;
        for notice in &notices {
            info!(
                skill = %notice.skill_id,
                owner = %notice.owner,
                "consolidation window elapsed, ready for the 48h check"
            );
            self.db.mark_notified(&notice.validation_id)?;
        }
        Ok(notices)
    }

    fn consolidation_gate(
        &self,
        owner: &str,
        skill_id: &str,
    ) -> Result<Option<SubmissionRejection>> {
        let qualifying = self
            .db
            .latest_passing_validation(owner, skill_id, Level::Autonomy)?
            .and_then(|record| record.passed_at);

        let Some(passed_at) = qualifying else {
            return Ok(Some(SubmissionRejection::AutonomyIncomplete));
        };

        let cooldown_end = passed_at + CONSOLIDATION_MS;
        let now = self.clock.now_ms();
        if now < cooldown_end {
            return Ok(Some(SubmissionRejection::CooldownActive {
                cooldown_end,
                remaining_ms: cooldown_end - now,
            }));
        }

        Ok(None)
    }
}
