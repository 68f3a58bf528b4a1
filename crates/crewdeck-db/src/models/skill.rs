//! Skill entity model.
//!
//! Individual skills within a group. `check_interval_months` drives how often
//! a skill-check assessment is due; `position` orders skills in a group.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgExecutor, PgPool};
use uuid::Uuid;

/// A skill record.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Skill {
    /// Unique identifier.
    pub id: Uuid,

    /// The tenant this skill belongs to.
    pub tenant_id: Uuid,

    /// The parent group.
    pub group_id: Uuid,

    /// Natural key from the imported catalog, scoped to the group.
    pub external_ref: String,

    /// Skill display name.
    pub name: String,

    /// Short reference code.
    pub ref_code: String,

    /// Optional long description.
    pub description: Option<String>,

    /// Recheck frequency in months; `None` means one-time.
    pub check_interval_months: Option<i32>,

    /// Ordering within the group.
    pub position: i32,

    /// Record creation timestamp.
    pub created_at: DateTime<Utc>,

    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Data required to create a skill.
#[derive(Debug, Clone)]
pub struct CreateSkill {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub group_id: Uuid,
    pub external_ref: String,
    pub name: String,
    pub ref_code: String,
    pub description: Option<String>,
    pub check_interval_months: Option<i32>,
    pub position: i32,
}

/// Managed fields applied by a catalog update.
#[derive(Debug, Clone)]
pub struct SkillUpdate {
    pub name: String,
    pub ref_code: String,
    pub description: Option<String>,
    pub check_interval_months: Option<i32>,
    pub position: i32,
}

impl Skill {
    /// Insert a new skill.
    pub async fn insert<'e>(
        executor: impl PgExecutor<'e>,
        data: &CreateSkill,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as(
            r"
            INSERT INTO skills
                (id, tenant_id, group_id, external_ref, name, ref_code, description,
                 check_interval_months, position)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            ",
        )
        .bind(data.id)
        .bind(data.tenant_id)
        .bind(data.group_id)
        .bind(&data.external_ref)
        .bind(&data.name)
        .bind(&data.ref_code)
        .bind(&data.description)
        .bind(data.check_interval_months)
        .bind(data.position)
        .fetch_one(executor)
        .await
    }

    /// List all skills of a group.
    pub async fn list_by_group(
        pool: &PgPool,
        tenant_id: Uuid,
        group_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as(
            r"
            SELECT * FROM skills
            WHERE tenant_id = $1 AND group_id = $2
            ORDER BY position, created_at
            ",
        )
        .bind(tenant_id)
        .bind(group_id)
        .fetch_all(pool)
        .await
    }

    /// Apply managed-field changes to a skill.
    pub async fn update<'e>(
        executor: impl PgExecutor<'e>,
        tenant_id: Uuid,
        id: Uuid,
        changes: &SkillUpdate,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r"
            UPDATE skills
            SET name = $3, ref_code = $4, description = $5,
                check_interval_months = $6, position = $7, updated_at = NOW()
            WHERE id = $1 AND tenant_id = $2
            ",
        )
        .bind(id)
        .bind(tenant_id)
        .bind(&changes.name)
        .bind(&changes.ref_code)
        .bind(&changes.description)
        .bind(changes.check_interval_months)
        .bind(changes.position)
        .execute(executor)
        .await?;
        Ok(())
    }
}
