//! End-to-end flows over the database and both services together.

use mastery::core::{
    EvidenceType, Level, LevelUpBlock, MAX_WIP, ManualClock, SubmissionOutcome,
    SubmissionRejection, SubmissionRequest,
};
use mastery::service::{
    CatalogOutcome, LevelUpOutcome, NewSkill, ProgressionService, SkillLocks, SkillService,
    ValidationService,
};
use mastery::storage::{Database, legacy};

const HOUR_MS: i64 = 60 * 60 * 1000;
const OWNER: &str = "ana";

struct World {
    db: Database,
    clock: ManualClock,
    locks: SkillLocks,
}

impl World {
    fn new() -> Self {
        Self {
            db: Database::open_in_memory().unwrap(),
            clock: ManualClock::new(10_000 * HOUR_MS),
            locks: SkillLocks::new(),
        }
    }

    fn skills(&self) -> SkillService<'_> {
        SkillService::new(&self.db)
    }

    fn progression(&self) -> ProgressionService<'_> {
        ProgressionService::new(&self.db, &self.clock, &self.locks)
    }

    fn validations(&self) -> ValidationService<'_> {
        ValidationService::new(&self.db, &self.clock, &self.locks)
    }

    fn add(&self, name: &str, requirements: &[&str]) -> String {
        match self
            .skills()
            .create(
                OWNER,
                NewSkill {
                    name: name.to_string(),
                    category: "general".to_string(),
                    requirements: requirements.iter().map(|r| (*r).to_string()).collect(),
                    ..NewSkill::default()
                },
            )
            .unwrap()
        {
            CatalogOutcome::Saved(skill) => skill.id,
            CatalogOutcome::Rejected(r) => panic!("unexpected rejection: {r}"),
        }
    }

    fn submit(&self, skill_id: &str, level: Level, passed: bool) -> SubmissionOutcome {
        self.validations()
            .submit(
                OWNER,
                SubmissionRequest {
                    skill_id: skill_id.to_string(),
                    level,
                    evidence_type: EvidenceType::Text,
                    evidence: "practice session".to_string(),
                    passed,
                },
            )
            .unwrap()
    }
}

#[test]
fn wip_gate_scenario() {
    let world = World::new();
    for name in ["a", "b", "c", "d"] {
        world.add(name, &[]);
    }
    for name in ["a", "b", "c"] {
        let outcome = world.progression().attempt_level_up(OWNER, name).unwrap();
        assert!(matches!(outcome, LevelUpOutcome::Advanced(_)));
    }
    assert_eq!(world.progression().current_wip(OWNER).unwrap(), MAX_WIP);

    // Fourth start is refused with a WIP reason.
    let blocked = world.progression().attempt_level_up(OWNER, "d").unwrap();
    match blocked {
        LevelUpOutcome::Blocked(block @ LevelUpBlock::WipLimitReached { .. }) => {
            assert!(block.to_string().contains("WIP"));
        }
        other => panic!("expected WIP block, got {other:?}"),
    }

    // Dropping to two active skills lets the retry through.
    let mut parked = world.db.get_skill(OWNER, "a").unwrap().unwrap();
    parked.active = false;
    world.db.save_skill(&parked).unwrap();

    let retried = world.progression().attempt_level_up(OWNER, "d").unwrap();
    assert!(matches!(retried, LevelUpOutcome::Advanced(_)));
}

#[test]
fn dependency_gate_follows_parent_level() {
    let world = World::new();
    world.add("parent", &[]);
    world.add("child", &["parent"]);

    let mut parent = world.db.get_skill(OWNER, "parent").unwrap().unwrap();
    parent.level = Level::Autonomy;
    world.db.save_skill(&parent).unwrap();

    let blocked = world.progression().attempt_level_up(OWNER, "child").unwrap();
    assert!(matches!(
        blocked,
        LevelUpOutcome::Blocked(LevelUpBlock::RequirementsUnmet { .. })
    ));

    parent.level = Level::Consolidation;
    world.db.save_skill(&parent).unwrap();

    let allowed = world.progression().attempt_level_up(OWNER, "child").unwrap();
    assert!(matches!(allowed, LevelUpOutcome::Advanced(_)));
}

#[test]
fn validation_driven_climb_to_consolidation() {
    let world = World::new();
    world.add("guitar", &[]);

    // Climb 1 → 2 → 3 through passing validations.
    for level in [Level::Exposure, Level::Imitation, Level::Autonomy] {
        match world.submit("guitar", level, true) {
            SubmissionOutcome::Passed { skill, .. } => assert_eq!(skill.level, level),
            other => panic!("expected pass at {level}, got {other:?}"),
        }
    }

    // 47h later the gate still holds, with roughly an hour remaining.
    world.clock.advance_hours(47);
    match world.submit("guitar", Level::Consolidation, true) {
        SubmissionOutcome::Rejected(SubmissionRejection::CooldownActive {
            remaining_ms, ..
        }) => assert_eq!(remaining_ms, HOUR_MS),
        other => panic!("expected cooldown rejection, got {other:?}"),
    }

    // 49h after the Autonomy pass the attempt proceeds.
    world.clock.advance_hours(2);
    match world.submit("guitar", Level::Consolidation, true) {
        SubmissionOutcome::Passed { skill, .. } => {
            assert_eq!(skill.level, Level::Consolidation);
            assert!(!skill.active);
        }
        other => panic!("expected pass, got {other:?}"),
    }
}

#[test]
fn no_skip_regardless_of_evidence() {
    let world = World::new();
    world.add("guitar", &[]);

    for (level, passed) in [(Level::Autonomy, true), (Level::Autonomy, false)] {
        let outcome = world.submit("guitar", level, passed);
        assert!(
            matches!(
                outcome,
                SubmissionOutcome::Rejected(SubmissionRejection::LevelSkip { .. })
            ),
            "skip to {level} must be rejected"
        );
    }
    assert!(
        world
            .validations()
            .history(OWNER, "guitar")
            .unwrap()
            .is_empty()
    );
}

#[test]
fn regression_and_reinforcement_sequence() {
    let world = World::new();
    world.add("guitar", &[]);

    let mut skill = world.db.get_skill(OWNER, "guitar").unwrap().unwrap();
    skill.level = Level::Autonomy;
    skill.active = true;
    skill.fail_count = 1;
    world.db.save_skill(&skill).unwrap();

    // Second fail at Autonomy: kicked back to Imitation.
    match world.submit("guitar", Level::Autonomy, false) {
        SubmissionOutcome::Failed {
            skill,
            regressed_to,
            ..
        } => {
            assert_eq!(skill.fail_count, 2);
            assert_eq!(regressed_to, Some(Level::Imitation));
        }
        other => panic!("expected regression, got {other:?}"),
    }

    // Third fail (attempting Autonomy from Imitation is legal): suggestion,
    // and the regression rule is not applied a second time.
    match world.submit("guitar", Level::Autonomy, false) {
        SubmissionOutcome::ReinforcementSuggested {
            skill, fail_count, ..
        } => {
            assert_eq!(fail_count, 3);
            assert_eq!(skill.level, Level::Imitation);
        }
        other => panic!("expected reinforcement suggestion, got {other:?}"),
    }

    // A later pass clears the streak.
    match world.submit("guitar", Level::Imitation, true) {
        SubmissionOutcome::Passed { skill, .. } => assert_eq!(skill.fail_count, 0),
        other => panic!("expected pass, got {other:?}"),
    }
}

#[test]
fn panic_twice_floors_at_exposure() {
    let world = World::new();
    world.add("guitar", &[]);

    for level in [Level::Exposure, Level::Imitation, Level::Autonomy] {
        world.submit("guitar", level, true);
    }
    world.clock.advance_hours(49);
    let record_id = match world.submit("guitar", Level::Consolidation, true) {
        SubmissionOutcome::Passed { record, .. } => record.id,
        other => panic!("expected pass, got {other:?}"),
    };

    let first = world.validations().panic(OWNER, &record_id).unwrap();
    assert_eq!(first.skill.level, Level::Imitation);
    assert_eq!(first.skill.fail_count, 0);

    let second = world.validations().panic(OWNER, &record_id).unwrap();
    assert_eq!(second.skill.level, Level::Exposure);

    let third = world.validations().panic(OWNER, &record_id).unwrap();
    assert_eq!(third.skill.level, Level::Exposure, "floor holds");
}

#[test]
fn legacy_import_then_progression() {
    let world = World::new();
    let raw = serde_json::json!([
        { "id": "scales", "name": "Scales", "category": "music",
          "level": 5, "lastPracticed": 1_000, "wip": true, "requirements": [] },
        { "id": "improv", "name": "Improvisation", "category": "music",
          "level": 3, "lastPracticed": null, "wip": true, "requirements": ["scales"] },
        { "id": "theory", "name": "Theory", "category": "music",
          "level": 0, "lastPracticed": null, "wip": false, "requirements": [] }
    ]);
    let records: Vec<legacy::LegacySkillData> = serde_json::from_value(raw).unwrap();
    let summary = legacy::import_records(&world.db, OWNER, &records).unwrap();
    assert_eq!(summary.imported, 3);
    assert_eq!(summary.retired_masteries, 1);

    // Old Mastery satisfies the dependency gate as Consolidation.
    let improv = world.db.get_skill(OWNER, "improv").unwrap().unwrap();
    assert_eq!(improv.level, Level::Autonomy);
    let outcome = world.progression().attempt_level_up(OWNER, "improv").unwrap();
    match outcome {
        LevelUpOutcome::Advanced(skill) => assert_eq!(skill.level, Level::Consolidation),
        other => panic!("expected advance, got {other:?}"),
    }

    // The retired Mastery no longer occupies a WIP slot.
    assert_eq!(world.progression().current_wip(OWNER).unwrap(), 0);
}

#[test]
fn sweep_targets_only_skills_still_at_autonomy() {
    let world = World::new();
    world.add("stuck", &[]);
    world.add("moved-on", &[]);

    for id in ["stuck", "moved-on"] {
        for level in [Level::Exposure, Level::Imitation, Level::Autonomy] {
            world.submit(id, level, true);
        }
    }

    // One of the two consolidates after the window.
    world.clock.advance_hours(49);
    world.submit("moved-on", Level::Consolidation, true);

    let notices = world.validations().sweep_cooldowns().unwrap();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].skill_id, "stuck");

    // Once notified, the sweep goes quiet.
    assert!(world.validations().sweep_cooldowns().unwrap().is_empty());
}
