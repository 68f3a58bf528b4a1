//! Team entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgExecutor, PgPool};
use uuid::Uuid;

/// A team within a tenant.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Team {
    /// Unique identifier.
    pub id: Uuid,

    /// The tenant this team belongs to.
    pub tenant_id: Uuid,

    /// Team display name.
    pub name: String,

    /// Record creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Data required to create a team.
#[derive(Debug, Clone)]
pub struct CreateTeam {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub name: String,
}

impl Team {
    /// Insert a new team.
    pub async fn insert<'e>(
        executor: impl PgExecutor<'e>,
        data: &CreateTeam,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as(
            r"
            INSERT INTO teams (id, tenant_id, name)
            VALUES ($1, $2, $3)
            RETURNING *
            ",
        )
        .bind(data.id)
        .bind(data.tenant_id)
        .bind(&data.name)
        .fetch_one(executor)
        .await
    }

    /// Find a team by id within a tenant.
    pub async fn find_by_id(
        pool: &PgPool,
        tenant_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as(
            r"
            SELECT * FROM teams
            WHERE id = $1 AND tenant_id = $2
            ",
        )
        .bind(id)
        .bind(tenant_id)
        .fetch_optional(pool)
        .await
    }
}
