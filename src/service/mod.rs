//! Orchestration services over the domain core and the repository.
//!
//! Services load state, apply the entity's pure transition functions, and
//! persist the result. Mutations of one skill are serialized through
//! [`SkillLocks`] so a panic and a concurrent submission can never race on
//! the same level/fail-count pair: each runs against the latest persisted
//! state, one after the other.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

pub mod progression;
pub mod skills;
pub mod validation;

pub use progression::{LevelUpOutcome, ProgressionService};
pub use skills::{CatalogRejection, CatalogOutcome, NewSkill, SkillEdit, SkillService};
pub use validation::{PanicOutcome, ValidationService};

/// Per-skill mutual exclusion for mutations.
#[derive(Debug, Default)]
pub struct SkillLocks {
    inner: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl SkillLocks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` while holding this skill's mutation lock.
    pub fn with_lock<T>(&self, owner: &str, skill_id: &str, f: impl FnOnce() -> T) -> T {
        let cell = {
            let mut map = self.inner.lock();
            map.entry(format!("{owner}/{skill_id}")).or_default().clone()
        };
        let _guard = cell.lock();
        f()
    }
}
