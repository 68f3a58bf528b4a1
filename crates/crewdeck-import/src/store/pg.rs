//! PostgreSQL import store.
//!
//! Paired writes open one transaction per logical record: the data write and
//! its history event commit together or not at all. Reads delegate to the
//! `crewdeck-db` model methods.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::ImportError;
use crate::store::{ImportStore, RosterUpdate};
use crewdeck_db::models::{
    CreateHistoryEvent, CreatePerson, CreateSkill, CreateSkillGroup, CreateSkillPackage,
    CreateTeamMembership, HistoryEvent, Person, RosterRow, Skill, SkillGroup, SkillGroupUpdate,
    SkillPackage, SkillPackageUpdate, SkillUpdate, Team, TeamMembership,
};

/// Import store backed by PostgreSQL.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Create a store over an existing pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ImportStore for PgStore {
    async fn find_team(
        &self,
        tenant_id: Uuid,
        team_id: Uuid,
    ) -> Result<Option<Team>, ImportError> {
        Ok(Team::find_by_id(&self.pool, tenant_id, team_id).await?)
    }

    async fn list_roster(
        &self,
        tenant_id: Uuid,
        team_id: Uuid,
    ) -> Result<Vec<RosterRow>, ImportError> {
        Ok(TeamMembership::list_roster(&self.pool, tenant_id, team_id).await?)
    }

    async fn find_person(
        &self,
        tenant_id: Uuid,
        display_name: &str,
        email: &str,
    ) -> Result<Option<Person>, ImportError> {
        Ok(Person::find_by_identity(&self.pool, tenant_id, display_name, email).await?)
    }

    async fn find_package(
        &self,
        tenant_id: Uuid,
        external_ref: &str,
    ) -> Result<Option<SkillPackage>, ImportError> {
        Ok(SkillPackage::find_by_external_ref(&self.pool, tenant_id, external_ref).await?)
    }

    async fn list_groups(
        &self,
        tenant_id: Uuid,
        package_id: Uuid,
    ) -> Result<Vec<SkillGroup>, ImportError> {
        Ok(SkillGroup::list_by_package(&self.pool, tenant_id, package_id).await?)
    }

    async fn list_skills(
        &self,
        tenant_id: Uuid,
        group_id: Uuid,
    ) -> Result<Vec<Skill>, ImportError> {
        Ok(Skill::list_by_group(&self.pool, tenant_id, group_id).await?)
    }

    async fn events_by_group(
        &self,
        tenant_id: Uuid,
        group_id: Uuid,
    ) -> Result<Vec<HistoryEvent>, ImportError> {
        Ok(HistoryEvent::list_by_group(&self.pool, tenant_id, group_id).await?)
    }

    async fn append_event(&self, event: CreateHistoryEvent) -> Result<(), ImportError> {
        HistoryEvent::insert(&self.pool, &event).await?;
        Ok(())
    }

    async fn create_person(
        &self,
        data: CreatePerson,
        event: CreateHistoryEvent,
    ) -> Result<(), ImportError> {
        let mut tx = self.pool.begin().await?;
        Person::insert(&mut *tx, &data).await?;
        HistoryEvent::insert(&mut *tx, &event).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn create_membership(
        &self,
        data: CreateTeamMembership,
        event: CreateHistoryEvent,
    ) -> Result<(), ImportError> {
        let mut tx = self.pool.begin().await?;
        TeamMembership::insert(&mut *tx, &data).await?;
        HistoryEvent::insert(&mut *tx, &event).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn update_roster_entry(
        &self,
        tenant_id: Uuid,
        membership_id: Uuid,
        person_id: Uuid,
        changes: RosterUpdate,
        event: CreateHistoryEvent,
    ) -> Result<(), ImportError> {
        let mut tx = self.pool.begin().await?;
        Person::update_identity(
            &mut *tx,
            tenant_id,
            person_id,
            &changes.display_name,
            &changes.email,
        )
        .await?;
        TeamMembership::update_role(&mut *tx, tenant_id, membership_id, changes.role.as_deref())
            .await?;
        HistoryEvent::insert(&mut *tx, &event).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn create_package(
        &self,
        data: CreateSkillPackage,
        event: CreateHistoryEvent,
    ) -> Result<(), ImportError> {
        let mut tx = self.pool.begin().await?;
        SkillPackage::insert(&mut *tx, &data).await?;
        HistoryEvent::insert(&mut *tx, &event).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn update_package(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        changes: SkillPackageUpdate,
        event: CreateHistoryEvent,
    ) -> Result<(), ImportError> {
        let mut tx = self.pool.begin().await?;
        SkillPackage::update(&mut *tx, tenant_id, id, &changes).await?;
        HistoryEvent::insert(&mut *tx, &event).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn create_groups(
        &self,
        batch: Vec<(CreateSkillGroup, CreateHistoryEvent)>,
    ) -> Result<(), ImportError> {
        let mut tx = self.pool.begin().await?;
        for (data, event) in &batch {
            SkillGroup::insert(&mut *tx, data).await?;
            HistoryEvent::insert(&mut *tx, event).await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn update_group(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        changes: SkillGroupUpdate,
        event: CreateHistoryEvent,
    ) -> Result<(), ImportError> {
        let mut tx = self.pool.begin().await?;
        SkillGroup::update(&mut *tx, tenant_id, id, &changes).await?;
        HistoryEvent::insert(&mut *tx, &event).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn create_skills(
        &self,
        batch: Vec<(CreateSkill, CreateHistoryEvent)>,
    ) -> Result<(), ImportError> {
        let mut tx = self.pool.begin().await?;
        for (data, event) in &batch {
            Skill::insert(&mut *tx, data).await?;
            HistoryEvent::insert(&mut *tx, event).await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn update_skill(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        changes: SkillUpdate,
        event: CreateHistoryEvent,
    ) -> Result<(), ImportError> {
        let mut tx = self.pool.begin().await?;
        Skill::update(&mut *tx, tenant_id, id, &changes).await?;
        HistoryEvent::insert(&mut *tx, &event).await?;
        tx.commit().await?;
        Ok(())
    }
}
