//! Team membership entity model.
//!
//! Links a person to a team. `external_ref` is the member id assigned by the
//! external roster source and serves as the natural key for reconciliation
//! within one team.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgExecutor, PgPool};
use uuid::Uuid;

/// A team membership record.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct TeamMembership {
    /// Unique identifier.
    pub id: Uuid,

    /// The tenant this membership belongs to.
    pub tenant_id: Uuid,

    /// The team.
    pub team_id: Uuid,

    /// The person.
    pub person_id: Uuid,

    /// Natural key from the external roster source.
    pub external_ref: String,

    /// Role within the team, if any.
    pub role: Option<String>,

    /// Record creation timestamp.
    pub created_at: DateTime<Utc>,

    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Data required to create a membership.
#[derive(Debug, Clone)]
pub struct CreateTeamMembership {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub team_id: Uuid,
    pub person_id: Uuid,
    pub external_ref: String,
    pub role: Option<String>,
}

/// One roster entry: a membership joined with its person's identity fields.
///
/// This is the stored-state view that roster reconciliation diffs against.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct RosterRow {
    /// Membership id.
    pub membership_id: Uuid,

    /// Person id.
    pub person_id: Uuid,

    /// Natural key from the external roster source.
    pub external_ref: String,

    /// Person display name.
    pub display_name: String,

    /// Person email.
    pub email: String,

    /// Role within the team, if any.
    pub role: Option<String>,
}

impl TeamMembership {
    /// Insert a new membership.
    pub async fn insert<'e>(
        executor: impl PgExecutor<'e>,
        data: &CreateTeamMembership,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as(
            r"
            INSERT INTO team_memberships (id, tenant_id, team_id, person_id, external_ref, role)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            ",
        )
        .bind(data.id)
        .bind(data.tenant_id)
        .bind(data.team_id)
        .bind(data.person_id)
        .bind(&data.external_ref)
        .bind(&data.role)
        .fetch_one(executor)
        .await
    }

    /// List a team's roster: memberships joined with person identity fields.
    pub async fn list_roster(
        pool: &PgPool,
        tenant_id: Uuid,
        team_id: Uuid,
    ) -> Result<Vec<RosterRow>, sqlx::Error> {
        sqlx::query_as(
            r"
            SELECT
                m.id AS membership_id,
                m.person_id,
                m.external_ref,
                p.display_name,
                p.email,
                m.role
            FROM team_memberships m
            JOIN people p ON p.id = m.person_id
            WHERE m.tenant_id = $1 AND m.team_id = $2
            ORDER BY m.created_at
            ",
        )
        .bind(tenant_id)
        .bind(team_id)
        .fetch_all(pool)
        .await
    }

    /// Update a membership's role.
    pub async fn update_role<'e>(
        executor: impl PgExecutor<'e>,
        tenant_id: Uuid,
        id: Uuid,
        role: Option<&str>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r"
            UPDATE team_memberships
            SET role = $3, updated_at = NOW()
            WHERE id = $1 AND tenant_id = $2
            ",
        )
        .bind(id)
        .bind(tenant_id)
        .bind(role)
        .execute(executor)
        .await?;
        Ok(())
    }
}
