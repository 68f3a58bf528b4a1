//! Person entity model.
//!
//! The global personnel catalog. People are shared across teams within a
//! tenant and deduplicated by `(display_name, email)` during roster imports.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgExecutor, PgPool};
use uuid::Uuid;

/// A person in the tenant-wide personnel catalog.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Person {
    /// Unique identifier.
    pub id: Uuid,

    /// The tenant this person belongs to.
    pub tenant_id: Uuid,

    /// Full display name.
    pub display_name: String,

    /// Contact email address.
    pub email: String,

    /// Record creation timestamp.
    pub created_at: DateTime<Utc>,

    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Data required to create a person.
#[derive(Debug, Clone)]
pub struct CreatePerson {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub display_name: String,
    pub email: String,
}

impl Person {
    /// Insert a new person. Accepts any executor so the insert can run inside
    /// a caller-owned transaction.
    pub async fn insert<'e>(
        executor: impl PgExecutor<'e>,
        data: &CreatePerson,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as(
            r"
            INSERT INTO people (id, tenant_id, display_name, email)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            ",
        )
        .bind(data.id)
        .bind(data.tenant_id)
        .bind(&data.display_name)
        .bind(&data.email)
        .fetch_one(executor)
        .await
    }

    /// Find a person by id within a tenant.
    pub async fn find_by_id(
        pool: &PgPool,
        tenant_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as(
            r"
            SELECT * FROM people
            WHERE id = $1 AND tenant_id = $2
            ",
        )
        .bind(id)
        .bind(tenant_id)
        .fetch_optional(pool)
        .await
    }

    /// Find a person by exact `(display_name, email)` identity within a
    /// tenant. Comparison is strict; no trimming or case folding.
    pub async fn find_by_identity(
        pool: &PgPool,
        tenant_id: Uuid,
        display_name: &str,
        email: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as(
            r"
            SELECT * FROM people
            WHERE tenant_id = $1 AND display_name = $2 AND email = $3
            LIMIT 1
            ",
        )
        .bind(tenant_id)
        .bind(display_name)
        .bind(email)
        .fetch_optional(pool)
        .await
    }

    /// Update a person's display name and email.
    pub async fn update_identity<'e>(
        executor: impl PgExecutor<'e>,
        tenant_id: Uuid,
        id: Uuid,
        display_name: &str,
        email: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r"
            UPDATE people
            SET display_name = $3, email = $4, updated_at = NOW()
            WHERE id = $1 AND tenant_id = $2
            ",
        )
        .bind(id)
        .bind(tenant_id)
        .bind(display_name)
        .bind(email)
        .execute(executor)
        .await?;
        Ok(())
    }
}
