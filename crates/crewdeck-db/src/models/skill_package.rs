//! Skill package entity model.
//!
//! A skill package is an importable competency catalog. `external_ref` is the
//! package-defined id and is the natural key for catalog reconciliation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgExecutor, PgPool};
use uuid::Uuid;

/// A skill package record.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct SkillPackage {
    /// Unique identifier.
    pub id: Uuid,

    /// The tenant this package belongs to.
    pub tenant_id: Uuid,

    /// Natural key from the imported catalog.
    pub external_ref: String,

    /// Package display name.
    pub name: String,

    /// Short reference code (e.g. "MED").
    pub ref_code: String,

    /// Optional long description.
    pub description: Option<String>,

    /// Record creation timestamp.
    pub created_at: DateTime<Utc>,

    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Data required to create a skill package.
#[derive(Debug, Clone)]
pub struct CreateSkillPackage {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub external_ref: String,
    pub name: String,
    pub ref_code: String,
    pub description: Option<String>,
}

/// Managed fields applied by a catalog update.
#[derive(Debug, Clone)]
pub struct SkillPackageUpdate {
    pub name: String,
    pub ref_code: String,
    pub description: Option<String>,
}

impl SkillPackage {
    /// Insert a new skill package.
    pub async fn insert<'e>(
        executor: impl PgExecutor<'e>,
        data: &CreateSkillPackage,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as(
            r"
            INSERT INTO skill_packages (id, tenant_id, external_ref, name, ref_code, description)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            ",
        )
        .bind(data.id)
        .bind(data.tenant_id)
        .bind(&data.external_ref)
        .bind(&data.name)
        .bind(&data.ref_code)
        .bind(&data.description)
        .fetch_one(executor)
        .await
    }

    /// Find a package by its natural key within a tenant.
    pub async fn find_by_external_ref(
        pool: &PgPool,
        tenant_id: Uuid,
        external_ref: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as(
            r"
            SELECT * FROM skill_packages
            WHERE tenant_id = $1 AND external_ref = $2
            ",
        )
        .bind(tenant_id)
        .bind(external_ref)
        .fetch_optional(pool)
        .await
    }

    /// Apply managed-field changes to a package.
    pub async fn update<'e>(
        executor: impl PgExecutor<'e>,
        tenant_id: Uuid,
        id: Uuid,
        changes: &SkillPackageUpdate,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r"
            UPDATE skill_packages
            SET name = $3, ref_code = $4, description = $5, updated_at = NOW()
            WHERE id = $1 AND tenant_id = $2
            ",
        )
        .bind(id)
        .bind(tenant_id)
        .bind(&changes.name)
        .bind(&changes.ref_code)
        .bind(&changes.description)
        .execute(executor)
        .await?;
        Ok(())
    }
}
