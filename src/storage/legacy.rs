//! One-shot import of the legacy export format.
//!
//! Older exports carry a 0..5 `level` scale and a `wip` flag. The mapping
//! onto the canonical 1..4 scale happens entirely here, at the storage
//! boundary: level 0 becomes a not-started Exposure skill, levels above 4
//! collapse to Consolidation, and legacy level 5 (old "Mastery") clears the
//! in-progress flag. Re-running the import over the same file is a no-op.

use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::core::{Level, Skill};
use crate::error::{MasteryError, Result};
use crate::graph::{EdgeMode, would_create_cycle};
use crate::storage::Database;

/// A skill as serialized by the legacy exporter.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacySkillData {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub category: String,
    /// Legacy 0..5 scale.
    pub level: u8,
    #[serde(default)]
    pub last_practiced: Option<i64>,
    #[serde(default)]
    pub wip: bool,
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(default)]
    pub x: Option<f64>,
    #[serde(default)]
    pub y: Option<f64>,
}

/// Summary of a completed import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported: usize,
    /// How many rows arrived on the legacy 5 level and were retired.
    pub retired_masteries: usize,
}

/// Map one legacy record onto the canonical scale.
#[must_use]
pub fn convert(legacy: &LegacySkillData, owner: &str) -> Skill {
    let level = if legacy.level == 0 {
        Level::Exposure
    } else {
        Level::from_u8(legacy.level.min(Level::MAX.as_u8())).unwrap_or(Level::MAX)
    };
    let active = legacy.wip && legacy.level < 5;

    Skill {
        id: legacy.id.clone(),
        owner: owner.to_string(),
        name: legacy.name.clone(),
        category: legacy.category.clone(),
        level,
        active,
        fail_count: 0,
        last_practiced: legacy.last_practiced,
        requirements: legacy.requirements.clone(),
        milestone: false,
        reinforcement: false,
        parent_skill_id: None,
        x: legacy.x.unwrap_or(0.0),
        y: legacy.y.unwrap_or(0.0),
    }
}

/// Read a legacy JSON export and upsert its skills for `owner`.
pub fn import_file(db: &Database, owner: &str, path: &Path) -> Result<ImportSummary> {
    let raw = std::fs::read_to_string(path)?;
    let legacy: Vec<LegacySkillData> = serde_json::from_str(&raw)?;
    import_records(db, owner, &legacy)
}

/// Import already-parsed legacy records.
pub fn import_records(
    db: &Database,
    owner: &str,
    legacy: &[LegacySkillData],
) -> Result<ImportSummary> {
    let retired_masteries = legacy.iter().filter(|l| l.level >= 5).count();
    let skills: Vec<Skill> = legacy.iter().map(|l| convert(l, owner)).collect();

    // The acyclicity invariant holds for imports too: refuse the whole file
    // rather than persist a cyclic graph.
    for skill in &skills {
        if would_create_cycle(&skill.id, &skill.requirements, EdgeMode::Replace, &skills) {
            return Err(MasteryError::Import(format!(
                "requirement cycle through skill '{}'",
                skill.id
            )));
        }
    }

    db.import_skills(&skills)?;
    info!(
        count = skills.len(),
        retired = retired_masteries,
        "legacy import complete"
    );

    Ok(ImportSummary {
        imported: skills.len(),
        retired_masteries,
    })
}
