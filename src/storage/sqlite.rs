//! SQLite database layer
//!
//! One connection, owner-scoped queries. The paired writes the state
//! machine needs (validation record + skill update) run inside a single
//! transaction so a storage failure never leaves half a mutation behind.

use std::collections::HashMap;
use std::path::Path;

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef};
use rusqlite::{Connection, Row, ToSql, params};

use crate::core::{EvidenceType, Level, Skill, TimestampMs, ValidationRecord};
use crate::error::Result;
use crate::storage::migrations;

/// SQLite wrapper for the skill graph and validation history.
pub struct Database {
    conn: Connection,
    schema_version: u32,
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("schema_version", &self.schema_version)
            .finish_non_exhaustive()
    }
}

/// A cooldown that has elapsed and still needs its notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CooldownNotice {
    pub owner: String,
    pub skill_id: String,
    pub skill_name: String,
    pub validation_id: String,
    pub passed_at: TimestampMs,
    pub cooldown_end: TimestampMs,
}

impl ToSql for Level {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(i64::from(self.as_u8()).into())
    }
}

impl FromSql for Level {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let raw = i64::column_result(value)?;
        u8::try_from(raw)
            .ok()
            .and_then(Level::from_u8)
            .ok_or(FromSqlError::OutOfRange(raw))
    }
}

impl ToSql for EvidenceType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for EvidenceType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let raw = String::column_result(value)?;
        Self::parse(&raw)
            .ok_or_else(|| FromSqlError::Other(format!("unknown evidence type: {raw}").into()))
    }
}

impl Database {
    /// Open database at the given path
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    /// In-memory database, mainly for tests.
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        Self::configure_pragmas(&conn)?;
        let schema_version = migrations::run_migrations(&conn)?;
        Ok(Self {
            conn,
            schema_version,
        })
    }

    fn configure_pragmas(conn: &Connection) -> Result<()> {
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.pragma_update(None, "busy_timeout", 5000)?;
        Ok(())
    }

    /// Current schema version after migrations.
    pub fn schema_version(&self) -> u32 {
        self.schema_version
    }

    // =========================================================================
    // Skills
    // =========================================================================

    /// All of an owner's skills with their requirement edges, from one
    /// consistent snapshot.
    pub fn skills_for_owner(&self, owner: &str) -> Result<Vec<Skill>> {
        let tx = self.conn.unchecked_transaction()?;

        let mut skills = {
            let mut stmt = tx.prepare(
                "SELECT owner, id, name, category, level, active, fail_count, last_practiced, \
                 milestone, reinforcement, parent_skill_id, x, y \
                 FROM skills WHERE owner = ? ORDER BY id",
            )?;
            let rows = stmt.query_map([owner], skill_from_row)?;
            let mut skills = Vec::new();
            for row in rows {
                skills.push(row?);
            }
            skills
        };

        let mut edges: HashMap<String, Vec<String>> = HashMap::new();
        {
            let mut stmt = tx.prepare(
                "SELECT skill_id, requirement_id FROM skill_requirements \
                 WHERE owner = ? ORDER BY skill_id, requirement_id",
            )?;
            let rows = stmt.query_map([owner], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?;
            for row in rows {
                let (skill_id, requirement_id) = row?;
                edges.entry(skill_id).or_default().push(requirement_id);
            }
        }

        for skill in &mut skills {
            if let Some(reqs) = edges.remove(&skill.id) {
                skill.requirements = reqs;
            }
        }

        tx.commit()?;
        Ok(skills)
    }

    pub fn get_skill(&self, owner: &str, id: &str) -> Result<Option<Skill>> {
        let mut stmt = self.conn.prepare(
            "SELECT owner, id, name, category, level, active, fail_count, last_practiced, \
             milestone, reinforcement, parent_skill_id, x, y \
             FROM skills WHERE owner = ? AND id = ?",
        )?;
        let mut rows = stmt.query([owner, id])?;
        let Some(row) = rows.next()? else {
            return Ok(None);
        };
        let mut skill = skill_from_row(row)?;
        skill.requirements = self.requirements_of(owner, id)?;
        Ok(Some(skill))
    }

    fn requirements_of(&self, owner: &str, skill_id: &str) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT requirement_id FROM skill_requirements \
             WHERE owner = ? AND skill_id = ? ORDER BY requirement_id",
        )?;
        let rows = stmt.query_map([owner, skill_id], |row| row.get(0))?;
        let mut reqs = Vec::new();
        for row in rows {
            reqs.push(row?);
        }
        Ok(reqs)
    }

    /// Upsert a skill and replace its requirement edges, atomically.
    pub fn save_skill(&self, skill: &Skill) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        upsert_skill_row(&tx, skill)?;
        tx.execute(
            "DELETE FROM skill_requirements WHERE owner = ? AND skill_id = ?",
            params![skill.owner, skill.id],
        )?;
        insert_requirement_edges(&tx, skill)?;
        tx.commit()?;
        Ok(())
    }

    /// Delete a skill. Requirement edges referencing it and its validation
    /// history cascade away with it.
    pub fn delete_skill(&self, owner: &str, id: &str) -> Result<bool> {
        let affected = self.conn.execute(
            "DELETE FROM skills WHERE owner = ? AND id = ?",
            params![owner, id],
        )?;
        Ok(affected > 0)
    }

    /// Number of skills currently counting against the WIP budget.
    pub fn active_count(&self, owner: &str) -> Result<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM skills WHERE owner = ? AND active = 1",
            [owner],
            |row| row.get(0),
        )?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    /// Persist recomputed layout coordinates.
    pub fn update_positions(&self, skills: &[Skill]) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt =
                tx.prepare("UPDATE skills SET x = ?, y = ? WHERE owner = ? AND id = ?")?;
            for skill in skills {
                stmt.execute(params![skill.x, skill.y, skill.owner, skill.id])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    /// Bulk upsert for imports: all rows land before any edges so the
    /// foreign keys hold regardless of input order.
    pub fn import_skills(&self, skills: &[Skill]) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        for skill in skills {
            upsert_skill_row(&tx, skill)?;
        }
        for skill in skills {
            tx.execute(
                "DELETE FROM skill_requirements WHERE owner = ? AND skill_id = ?",
                params![skill.owner, skill.id],
            )?;
            insert_requirement_edges(&tx, skill)?;
        }
        tx.commit()?;
        Ok(())
    }

    // =========================================================================
    // Validations
    // =========================================================================

    /// History for one skill, newest attempt first.
    pub fn validations_for_skill(
        &self,
        owner: &str,
        skill_id: &str,
    ) -> Result<Vec<ValidationRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, skill_id, level, evidence_type, evidence, passed, \
             attempted_at, passed_at, cooldown_end, notified \
             FROM validations WHERE owner = ? AND skill_id = ? \
             ORDER BY attempted_at DESC, id",
        )?;
        let rows = stmt.query_map([owner, skill_id], validation_from_row)?;
        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }

    /// Fetch a validation together with the owner of its parent skill, so
    /// callers can make the authorization decision.
    pub fn get_validation(&self, id: &str) -> Result<Option<(String, ValidationRecord)>> {
        let mut stmt = self.conn.prepare(
            "SELECT owner, id, skill_id, level, evidence_type, evidence, passed, \
             attempted_at, passed_at, cooldown_end, notified \
             FROM validations WHERE id = ?",
        )?;
        let mut rows = stmt.query([id])?;
        let Some(row) = rows.next()? else {
            return Ok(None);
        };
        let owner: String = row.get(0)?;
        let record = ValidationRecord {
            id: row.get(1)?,
            skill_id: row.get(2)?,
            level: row.get(3)?,
            evidence_type: row.get(4)?,
            evidence: row.get(5)?,
            passed: row.get(6)?,
            attempted_at: row.get(7)?,
            passed_at: row.get(8)?,
            cooldown_end: row.get(9)?,
            notified: row.get(10)?,
        };
        Ok(Some((owner, record)))
    }

    /// Most recent passing validation at `level`, by pass timestamp.
    pub fn latest_passing_validation(
        &self,
        owner: &str,
        skill_id: &str,
        level: Level,
    ) -> Result<Option<ValidationRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, skill_id, level, evidence_type, evidence, passed, \
             attempted_at, passed_at, cooldown_end, notified \
             FROM validations \
             WHERE owner = ? AND skill_id = ? AND level = ? AND passed = 1 \
             ORDER BY passed_at DESC LIMIT 1",
        )?;
        let mut rows = stmt.query(params![owner, skill_id, level])?;
        match rows.next()? {
            Some(row) => Ok(Some(validation_from_row(row)?)),
            None => Ok(None),
        }
    }

    /// Atomic pair: append the validation record and persist the skill's
    /// post-submission state.
    pub fn record_submission(&self, skill: &Skill, record: &ValidationRecord) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        insert_validation_row(&tx, &skill.owner, record)?;
        upsert_skill_row(&tx, skill)?;
        tx.commit()?;
        Ok(())
    }

    /// Atomic pair for the panic operation: persist the regressed skill and
    /// invalidate the triggering record.
    pub fn apply_panic(&self, skill: &Skill, validation_id: &str) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        upsert_skill_row(&tx, skill)?;
        tx.execute(
            "UPDATE validations SET passed = 0, passed_at = NULL WHERE id = ?",
            [validation_id],
        )?;
        tx.commit()?;
        Ok(())
    }

    /// Passing Autonomy validations whose 48h window elapsed before `now`,
    /// not yet notified, on skills still sitting at Autonomy.
    pub fn due_cooldown_notices(&self, now_ms: TimestampMs) -> Result<Vec<CooldownNotice>> {
        let mut stmt = self.conn.prepare(
            "SELECT v.owner, v.skill_id, s.name, v.id, v.passed_at, v.cooldown_end \
             FROM validations v \
             JOIN skills s ON s.owner = v.owner AND s.id = v.skill_id \
             WHERE v.level = ? AND v.passed = 1 AND v.notified = 0 \
               AND v.cooldown_end IS NOT NULL AND v.cooldown_end <= ? \
               AND s.level = ? \
             ORDER BY v.cooldown_end",
        )?;
        let rows = stmt.query_map(
            params![Level::Autonomy, now_ms, Level::Autonomy],
            |row| {
                Ok(CooldownNotice {
                    owner: row.get(0)?,
                    skill_id: row.get(1)?,
                    skill_name: row.get(2)?,
                    validation_id: row.get(3)?,
                    passed_at: row.get(4)?,
                    cooldown_end: row.get(5)?,
                })
            },
        )?;
        let mut notices = Vec::new();
        for row in rows {
            notices.push(row?);
        }
        Ok(notices)
    }

    /// Shift every timestamp on a skill's validation history into the past.
    /// Debug support for fast-forwarding through the cooldown window.
    pub fn shift_validation_timestamps(
        &self,
        owner: &str,
        skill_id: &str,
        delta_ms: i64,
    ) -> Result<()> {
        self.conn.execute(
            "UPDATE validations SET \
                attempted_at = attempted_at - ?1, \
                passed_at = passed_at - ?1, \
                cooldown_end = cooldown_end - ?1 \
             WHERE owner = ?2 AND skill_id = ?3",
            params![delta_ms, owner, skill_id],
        )?;
        Ok(())
    }

    pub fn mark_notified(&self, validation_id: &str) -> Result<()> {
        self.conn.execute(
            "UPDATE validations SET notified = 1 WHERE id = ?",
            [validation_id],
        )?;
        Ok(())
    }
}

fn skill_from_row(row: &Row) -> rusqlite::Result<Skill> {
    Ok(Skill {
        owner: row.get("owner")?,
        id: row.get("id")?,
        name: row.get("name")?,
        category: row.get("category")?,
        level: row.get("level")?,
        active: row.get("active")?,
        fail_count: row.get("fail_count")?,
        last_practiced: row.get("last_practiced")?,
        milestone: row.get("milestone")?,
        reinforcement: row.get("reinforcement")?,
        parent_skill_id: row.get("parent_skill_id")?,
        x: row.get("x")?,
        y: row.get("y")?,
        requirements: Vec::new(),
    })
}

fn validation_from_row(row: &Row) -> rusqlite::Result<ValidationRecord> {
    Ok(ValidationRecord {
        id: row.get("id")?,
        skill_id: row.get("skill_id")?,
        level: row.get("level")?,
        evidence_type: row.get("evidence_type")?,
        evidence: row.get("evidence")?,
        passed: row.get("passed")?,
        attempted_at: row.get("attempted_at")?,
        passed_at: row.get("passed_at")?,
        cooldown_end: row.get("cooldown_end")?,
        notified: row.get("notified")?,
    })
}

fn insert_validation_row(
    conn: &Connection,
    owner: &str,
    record: &ValidationRecord,
) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO validations (
            id, owner, skill_id, level, evidence_type, evidence, passed,
            attempted_at, passed_at, cooldown_end, notified
         ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        params![
            record.id,
            owner,
            record.skill_id,
            record.level,
            record.evidence_type,
            record.evidence,
            record.passed,
            record.attempted_at,
            record.passed_at,
            record.cooldown_end,
            record.notified,
        ],
    )?;
    Ok(())
}

fn upsert_skill_row(conn: &Connection, skill: &Skill) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO skills (
            owner, id, name, category, level, active, fail_count, last_practiced,
            milestone, reinforcement, parent_skill_id, x, y
         ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
         ON CONFLICT(owner, id) DO UPDATE SET
            name=excluded.name,
            category=excluded.category,
            level=excluded.level,
            active=excluded.active,
            fail_count=excluded.fail_count,
            last_practiced=excluded.last_practiced,
            milestone=excluded.milestone,
            reinforcement=excluded.reinforcement,
            parent_skill_id=excluded.parent_skill_id,
            x=excluded.x,
            y=excluded.y",
        params![
            skill.owner,
            skill.id,
            skill.name,
            skill.category,
            skill.level,
            skill.active,
            skill.fail_count,
            skill.last_practiced,
            skill.milestone,
            skill.reinforcement,
            skill.parent_skill_id,
            skill.x,
            skill.y,
        ],
    )?;
    Ok(())
}

fn insert_requirement_edges(conn: &Connection, skill: &Skill) -> rusqlite::Result<()> {
    let mut stmt = conn.prepare(
        "INSERT OR IGNORE INTO skill_requirements (owner, skill_id, requirement_id) \
         VALUES (?, ?, ?)",
    )?;
    for requirement_id in &skill.requirements {
        stmt.execute(params![skill.owner, skill.id, requirement_id])?;
    }
    Ok(())
}
