//! History event entity model.
//!
//! Append-only audit trail. Every data-mutating write to a tracked entity is
//! paired with exactly one history event inserted in the same transaction.
//! Events of one logical operation (e.g. one package import) share a
//! `group_id` established by the operation's root event.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgExecutor, PgPool};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// What a history event records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryVerb {
    /// A record was created.
    Create,
    /// A record was updated.
    Update,
    /// A record was deleted.
    Delete,
    /// Root event of a multi-record import operation.
    Import,
}

impl fmt::Display for HistoryVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create => write!(f, "create"),
            Self::Update => write!(f, "update"),
            Self::Delete => write!(f, "delete"),
            Self::Import => write!(f, "import"),
        }
    }
}

impl FromStr for HistoryVerb {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "create" => Ok(Self::Create),
            "update" => Ok(Self::Update),
            "delete" => Ok(Self::Delete),
            "import" => Ok(Self::Import),
            other => Err(format!("Unknown history verb: {other}")),
        }
    }
}

/// The entity type a history event or change tally refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Person,
    Team,
    TeamMembership,
    SkillPackage,
    SkillGroup,
    Skill,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Person => write!(f, "person"),
            Self::Team => write!(f, "team"),
            Self::TeamMembership => write!(f, "team_membership"),
            Self::SkillPackage => write!(f, "skill_package"),
            Self::SkillGroup => write!(f, "skill_group"),
            Self::Skill => write!(f, "skill"),
        }
    }
}

impl FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "person" => Ok(Self::Person),
            "team" => Ok(Self::Team),
            "team_membership" => Ok(Self::TeamMembership),
            "skill_package" => Ok(Self::SkillPackage),
            "skill_group" => Ok(Self::SkillGroup),
            "skill" => Ok(Self::Skill),
            other => Err(format!("Unknown entity kind: {other}")),
        }
    }
}

/// A persisted history event.
///
/// `verb` and `entity_kind` are stored as text; parse into [`HistoryVerb`]
/// and [`EntityKind`] where typed access is needed.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct HistoryEvent {
    /// Unique identifier.
    pub id: Uuid,

    /// The tenant this event belongs to.
    pub tenant_id: Uuid,

    /// The user who performed the write, if known.
    pub actor_id: Option<Uuid>,

    /// Action verb (`create`, `update`, `delete`, `import`).
    pub verb: String,

    /// Entity type the event refers to.
    pub entity_kind: String,

    /// Id of the affected entity.
    pub entity_id: Uuid,

    /// Groups the event under a root operation, if any.
    pub group_id: Option<Uuid>,

    /// When the event occurred.
    pub occurred_at: DateTime<Utc>,
}

/// Data required to create a history event.
#[derive(Debug, Clone)]
pub struct CreateHistoryEvent {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub actor_id: Option<Uuid>,
    pub verb: HistoryVerb,
    pub entity_kind: EntityKind,
    pub entity_id: Uuid,
    pub group_id: Option<Uuid>,
}

impl HistoryEvent {
    /// Insert a history event. Runs on any executor so the insert can share a
    /// transaction with the data write it describes.
    pub async fn insert<'e>(
        executor: impl PgExecutor<'e>,
        data: &CreateHistoryEvent,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as(
            r"
            INSERT INTO history_events (id, tenant_id, actor_id, verb, entity_kind, entity_id, group_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            ",
        )
        .bind(data.id)
        .bind(data.tenant_id)
        .bind(data.actor_id)
        .bind(data.verb.to_string())
        .bind(data.entity_kind.to_string())
        .bind(data.entity_id)
        .bind(data.group_id)
        .fetch_one(executor)
        .await
    }

    /// List all events sharing a group id, oldest first.
    ///
    /// Retrieves everything that happened during one logical operation.
    pub async fn list_by_group(
        pool: &PgPool,
        tenant_id: Uuid,
        group_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as(
            r"
            SELECT * FROM history_events
            WHERE tenant_id = $1 AND group_id = $2
            ORDER BY occurred_at
            ",
        )
        .bind(tenant_id)
        .bind(group_id)
        .fetch_all(pool)
        .await
    }
}
