//! Cycle validation for requirement-edge writes.
//!
//! Runs before any edge write is persisted; a request that would create a
//! cycle is rejected with no partial mutation.

use std::collections::HashSet;

use crate::core::Skill;

use super::traversal::{adjacency_of, cycle_reachable_from};

/// How the proposed requirement IDs combine with the skill's current edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeMode {
    /// Union with the existing requirement set.
    Extend,
    /// The proposed set becomes the skill's entire requirement set.
    Replace,
}

/// Would attaching `proposed` requirement edges to `skill_id` introduce a
/// cycle into the owner's requirement graph?
///
/// `skills` must be the full set of skills belonging to the same owner,
/// loaded from one consistent snapshot.
#[must_use]
pub fn would_create_cycle(
    skill_id: &str,
    proposed: &[String],
    mode: EdgeMode,
    skills: &[Skill],
) -> bool {
    // Degenerate self-loop: no traversal needed.
    if proposed.iter().any(|req| req == skill_id) {
        return true;
    }

    let mut adj = adjacency_of(skills);
    let entry = adj.entry(skill_id.to_string()).or_default();
    match mode {
        EdgeMode::Extend => {
            let existing: HashSet<&String> = entry.iter().collect();
            let mut merged = entry.clone();
            merged.extend(
                proposed
                    .iter()
                    .filter(|req| !existing.contains(req))
                    .cloned(),
            );
            *entry = merged;
        }
        EdgeMode::Replace => {
            *entry = proposed.to_vec();
        }
    }

    cycle_reachable_from(&adj, skill_id)
}
