//! Skill catalog: create, edit, delete, and lay out skills.
//!
//! Every requirement-edge write goes through the cycle validator first;
//! a rejected write persists nothing.

use tracing::debug;

use crate::core::Skill;
use crate::error::{MasteryError, Result};
use crate::graph::{EdgeMode, assign_positions, would_create_cycle};
use crate::storage::Database;

/// Input for creating a skill.
#[derive(Debug, Clone, Default)]
pub struct NewSkill {
    /// Defaults to a slug of the name.
    pub id: Option<String>,
    pub name: String,
    pub category: String,
    pub requirements: Vec<String>,
    pub milestone: bool,
    /// Marks a node created to shore up `parent_skill_id`.
    pub reinforcement: bool,
    pub parent_skill_id: Option<String>,
}

/// Partial edit; `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct SkillEdit {
    pub name: Option<String>,
    pub category: Option<String>,
    /// Full replacement of the requirement set.
    pub requirements: Option<Vec<String>>,
    pub milestone: Option<bool>,
}

/// Policy-level refusal of a catalog write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogRejection {
    DuplicateId(String),
    SelfRequirement,
    WouldCycle,
}

impl std::fmt::Display for CatalogRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateId(id) => write!(f, "A skill with id '{id}' already exists."),
            Self::SelfRequirement => write!(f, "A skill cannot require itself."),
            Self::WouldCycle => {
                write!(f, "Rejected: those requirements would create a dependency cycle.")
            }
        }
    }
}

/// Result of a catalog write.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogOutcome {
    Saved(Skill),
    Rejected(CatalogRejection),
}

pub struct SkillService<'a> {
    db: &'a Database,
}

impl<'a> SkillService<'a> {
    #[must_use]
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    pub fn list(&self, owner: &str) -> Result<Vec<Skill>> {
        self.db.skills_for_owner(owner)
    }

    pub fn get(&self, owner: &str, id: &str) -> Result<Skill> {
        self.db
            .get_skill(owner, id)?
            .ok_or_else(|| MasteryError::SkillNotFound(id.to_string()))
    }

    pub fn create(&self, owner: &str, new: NewSkill) -> Result<CatalogOutcome> {
        let id = new.id.clone().unwrap_or_else(|| slugify(&new.name));

        if self.db.get_skill(owner, &id)?.is_some() {
            return Ok(CatalogOutcome::Rejected(CatalogRejection::DuplicateId(id)));
        }

        let snapshot = self.db.skills_for_owner(owner)?;
        if let Some(rejection) = self.check_edges(&id, &new.requirements, &snapshot)? {
            return Ok(CatalogOutcome::Rejected(rejection));
        }

        if let Some(parent) = &new.parent_skill_id {
            if self.db.get_skill(owner, parent)?.is_none() {
                return Err(MasteryError::SkillNotFound(parent.clone()));
            }
        }

        let mut skill = Skill::new(id, owner, new.name, new.category)
            .with_requirements(new.requirements);
        skill.milestone = new.milestone;
        skill.reinforcement = new.reinforcement;
        skill.parent_skill_id = new.parent_skill_id;

        self.db.save_skill(&skill)?;
        debug!(skill = %skill.id, "skill created");
        Ok(CatalogOutcome::Saved(skill))
    }

    pub fn edit(&self, owner: &str, id: &str, edit: SkillEdit) -> Result<CatalogOutcome> {
        let mut skill = self.get(owner, id)?;

        if let Some(requirements) = &edit.requirements {
            let snapshot = self.db.skills_for_owner(owner)?;
            if let Some(rejection) = self.check_edges(id, requirements, &snapshot)? {
                return Ok(CatalogOutcome::Rejected(rejection));
            }
            skill.requirements = requirements.clone();
        }

        if let Some(name) = edit.name {
            skill.name = name;
        }
        if let Some(category) = edit.category {
            skill.category = category;
        }
        if let Some(milestone) = edit.milestone {
            skill.milestone = milestone;
        }

        self.db.save_skill(&skill)?;
        Ok(CatalogOutcome::Saved(skill))
    }

    pub fn delete(&self, owner: &str, id: &str) -> Result<()> {
        if !self.db.delete_skill(owner, id)? {
            return Err(MasteryError::SkillNotFound(id.to_string()));
        }
        debug!(skill = %id, "skill deleted");
        Ok(())
    }

    /// Recompute display coordinates for the whole graph and persist them.
    pub fn relayout(&self, owner: &str) -> Result<Vec<Skill>> {
        let skills = self.db.skills_for_owner(owner)?;
        let positioned = assign_positions(&skills);
        self.db.update_positions(&positioned)?;
        Ok(positioned)
    }

    /// Requirement edges must point at existing skills (not-found, an
    /// error) and must keep the graph acyclic (a policy rejection).
    fn check_edges(
        &self,
        skill_id: &str,
        requirements: &[String],
        snapshot: &[Skill],
    ) -> Result<Option<CatalogRejection>> {
        if requirements.iter().any(|req| req == skill_id) {
            return Ok(Some(CatalogRejection::SelfRequirement));
        }

        for req in requirements {
            if !snapshot.iter().any(|s| &s.id == req) {
                return Err(MasteryError::RequirementNotFound(req.clone()));
            }
        }

        if would_create_cycle(skill_id, requirements, EdgeMode::Replace, snapshot) {
            return Ok(Some(CatalogRejection::WouldCycle));
        }

        Ok(None)
    }
}

/// Lowercased, dash-separated id from a human name.
fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_dash = true;
    for ch in name.chars() {
        if ch.is_alphanumeric() {
            slug.extend(ch.to_lowercase());
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }
    slug.trim_end_matches('-').to_string()
}
