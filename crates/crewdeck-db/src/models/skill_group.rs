//! Skill group entity model.
//!
//! Groups partition a skill package. `external_ref` is scoped to the package.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgExecutor, PgPool};
use uuid::Uuid;

/// A skill group record.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct SkillGroup {
    /// Unique identifier.
    pub id: Uuid,

    /// The tenant this group belongs to.
    pub tenant_id: Uuid,

    /// The parent package.
    pub package_id: Uuid,

    /// Natural key from the imported catalog, scoped to the package.
    pub external_ref: String,

    /// Group display name.
    pub name: String,

    /// Ordering within the package.
    pub position: i32,

    /// Record creation timestamp.
    pub created_at: DateTime<Utc>,

    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Data required to create a skill group.
#[derive(Debug, Clone)]
pub struct CreateSkillGroup {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub package_id: Uuid,
    pub external_ref: String,
    pub name: String,
    pub position: i32,
}

/// Managed fields applied by a catalog update.
#[derive(Debug, Clone)]
pub struct SkillGroupUpdate {
    pub name: String,
    pub position: i32,
}

impl SkillGroup {
    /// Insert a new skill group.
    pub async fn insert<'e>(
        executor: impl PgExecutor<'e>,
        data: &CreateSkillGroup,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as(
            r"
            INSERT INTO skill_groups (id, tenant_id, package_id, external_ref, name, position)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            ",
        )
        .bind(data.id)
        .bind(data.tenant_id)
        .bind(data.package_id)
        .bind(&data.external_ref)
        .bind(&data.name)
        .bind(data.position)
        .fetch_one(executor)
        .await
    }

    /// List all groups of a package.
    pub async fn list_by_package(
        pool: &PgPool,
        tenant_id: Uuid,
        package_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as(
            r"
            SELECT * FROM skill_groups
            WHERE tenant_id = $1 AND package_id = $2
            ORDER BY position, created_at
            ",
        )
        .bind(tenant_id)
        .bind(package_id)
        .fetch_all(pool)
        .await
    }

    /// Apply managed-field changes to a group.
    pub async fn update<'e>(
        executor: impl PgExecutor<'e>,
        tenant_id: Uuid,
        id: Uuid,
        changes: &SkillGroupUpdate,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r"
            UPDATE skill_groups
            SET name = $3, position = $4, updated_at = NOW()
            WHERE id = $1 AND tenant_id = $2
            ",
        )
        .bind(id)
        .bind(tenant_id)
        .bind(&changes.name)
        .bind(changes.position)
        .execute(executor)
        .await?;
        Ok(())
    }
}
