//! Storage seam for import reconciliation.
//!
//! [`ImportStore`] abstracts the persistence backend behind typed reads and
//! paired writes. A paired write applies one data mutation and the history
//! event describing it as a single atomic unit: neither is observable without
//! the other. Batched variants apply N rows and N events in one atomic unit
//! and exist for pure additions.

mod mem;
mod pg;

pub use mem::MemStore;
pub use pg::PgStore;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::ImportError;
use crewdeck_db::models::{
    CreateHistoryEvent, CreatePerson, CreateSkill, CreateSkillGroup, CreateSkillPackage,
    CreateTeamMembership, HistoryEvent, Person, RosterRow, Skill, SkillGroup, SkillGroupUpdate,
    SkillPackage, SkillPackageUpdate, SkillUpdate, Team,
};

/// Managed fields of one roster entry.
///
/// Spans the membership (role) and its person (identity fields); a roster
/// update applies all of them in one atomic unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterUpdate {
    pub display_name: String,
    pub email: String,
    pub role: Option<String>,
}

/// Persistence backend for import reconciliation.
#[async_trait]
pub trait ImportStore: Send + Sync {
    // Reads

    /// Find a team by id.
    async fn find_team(&self, tenant_id: Uuid, team_id: Uuid)
        -> Result<Option<Team>, ImportError>;

    /// Load a team's stored roster (memberships joined with person identity).
    async fn list_roster(
        &self,
        tenant_id: Uuid,
        team_id: Uuid,
    ) -> Result<Vec<RosterRow>, ImportError>;

    /// Find a person by exact `(display_name, email)` within the tenant.
    async fn find_person(
        &self,
        tenant_id: Uuid,
        display_name: &str,
        email: &str,
    ) -> Result<Option<Person>, ImportError>;

    /// Find a skill package by its natural key.
    async fn find_package(
        &self,
        tenant_id: Uuid,
        external_ref: &str,
    ) -> Result<Option<SkillPackage>, ImportError>;

    /// Load all groups of a package.
    async fn list_groups(
        &self,
        tenant_id: Uuid,
        package_id: Uuid,
    ) -> Result<Vec<SkillGroup>, ImportError>;

    /// Load all skills of a group.
    async fn list_skills(&self, tenant_id: Uuid, group_id: Uuid)
        -> Result<Vec<Skill>, ImportError>;

    /// List all events recorded under one group id, oldest first.
    async fn events_by_group(
        &self,
        tenant_id: Uuid,
        group_id: Uuid,
    ) -> Result<Vec<HistoryEvent>, ImportError>;

    // Writes

    /// Append a standalone event (the root event of a grouped operation).
    async fn append_event(&self, event: CreateHistoryEvent) -> Result<(), ImportError>;

    /// Create a person, paired with its event.
    async fn create_person(
        &self,
        data: CreatePerson,
        event: CreateHistoryEvent,
    ) -> Result<(), ImportError>;

    /// Create a team membership, paired with its event.
    async fn create_membership(
        &self,
        data: CreateTeamMembership,
        event: CreateHistoryEvent,
    ) -> Result<(), ImportError>;

    /// Apply the managed fields of one roster entry (membership role plus
    /// person identity), paired with one event.
    async fn update_roster_entry(
        &self,
        tenant_id: Uuid,
        membership_id: Uuid,
        person_id: Uuid,
        changes: RosterUpdate,
        event: CreateHistoryEvent,
    ) -> Result<(), ImportError>;

    /// Create a skill package, paired with its event.
    async fn create_package(
        &self,
        data: CreateSkillPackage,
        event: CreateHistoryEvent,
    ) -> Result<(), ImportError>;

    /// Update a skill package's managed fields, paired with one event.
    async fn update_package(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        changes: SkillPackageUpdate,
        event: CreateHistoryEvent,
    ) -> Result<(), ImportError>;

    /// Create a batch of skill groups with their events in one atomic unit.
    async fn create_groups(
        &self,
        batch: Vec<(CreateSkillGroup, CreateHistoryEvent)>,
    ) -> Result<(), ImportError>;

    /// Update a skill group's managed fields, paired with one event.
    async fn update_group(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        changes: SkillGroupUpdate,
        event: CreateHistoryEvent,
    ) -> Result<(), ImportError>;

    /// Create a batch of skills with their events in one atomic unit.
    async fn create_skills(
        &self,
        batch: Vec<(CreateSkill, CreateHistoryEvent)>,
    ) -> Result<(), ImportError>;

    /// Update a skill's managed fields, paired with one event.
    async fn update_skill(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        changes: SkillUpdate,
        event: CreateHistoryEvent,
    ) -> Result<(), ImportError>;
}
