//! In-memory import store for testing.
//!
//! Paired writes take the state lock once and apply the mutation together
//! with its event, so the atomicity contract of [`ImportStore`] holds.
//! [`MemStore::fail_next_write`] makes the next mutating call fail before
//! anything is applied, which lets tests exercise that contract.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::ImportError;
use crate::store::{ImportStore, RosterUpdate};
use crewdeck_db::models::{
    CreateHistoryEvent, CreatePerson, CreateSkill, CreateSkillGroup, CreateSkillPackage,
    CreateTeamMembership, HistoryEvent, Person, RosterRow, Skill, SkillGroup, SkillGroupUpdate,
    SkillPackage, SkillPackageUpdate, SkillUpdate, Team, TeamMembership,
};

#[derive(Debug, Default)]
struct MemState {
    teams: HashMap<Uuid, Team>,
    people: HashMap<Uuid, Person>,
    memberships: HashMap<Uuid, TeamMembership>,
    packages: HashMap<Uuid, SkillPackage>,
    groups: HashMap<Uuid, SkillGroup>,
    skills: HashMap<Uuid, Skill>,
    events: Vec<HistoryEvent>,
}

/// In-memory [`ImportStore`] backend.
#[derive(Debug, Default)]
pub struct MemStore {
    state: RwLock<MemState>,
    fail_next: AtomicBool,
    writes: AtomicUsize,
}

fn materialize(event: &CreateHistoryEvent) -> HistoryEvent {
    HistoryEvent {
        id: event.id,
        tenant_id: event.tenant_id,
        actor_id: event.actor_id,
        verb: event.verb.to_string(),
        entity_kind: event.entity_kind.to_string(),
        entity_id: event.entity_id,
        group_id: event.group_id,
        occurred_at: Utc::now(),
    }
}

impl MemStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next mutating call fail before applying anything.
    pub fn fail_next_write(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    /// Number of successful mutating calls since creation.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Number of stored history events.
    pub async fn event_count(&self) -> usize {
        self.state.read().await.events.len()
    }

    /// Snapshot all stored history events, oldest first (for assertions).
    pub async fn events(&self) -> Vec<HistoryEvent> {
        self.state.read().await.events.clone()
    }

    fn checkpoint(&self) -> Result<(), ImportError> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(ImportError::Storage("injected write failure".to_string()));
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    // Seed helpers for tests. These write directly, without events.

    /// Seed a team.
    pub async fn seed_team(&self, tenant_id: Uuid, name: &str) -> Team {
        let team = Team {
            id: Uuid::new_v4(),
            tenant_id,
            name: name.to_string(),
            created_at: Utc::now(),
        };
        self.state.write().await.teams.insert(team.id, team.clone());
        team
    }

    /// Seed a person.
    pub async fn seed_person(&self, tenant_id: Uuid, display_name: &str, email: &str) -> Person {
        let person = Person {
            id: Uuid::new_v4(),
            tenant_id,
            display_name: display_name.to_string(),
            email: email.to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        self.state
            .write()
            .await
            .people
            .insert(person.id, person.clone());
        person
    }

    /// Seed a team membership.
    pub async fn seed_membership(
        &self,
        tenant_id: Uuid,
        team_id: Uuid,
        person_id: Uuid,
        external_ref: &str,
        role: Option<&str>,
    ) -> TeamMembership {
        let membership = TeamMembership {
            id: Uuid::new_v4(),
            tenant_id,
            team_id,
            person_id,
            external_ref: external_ref.to_string(),
            role: role.map(str::to_string),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        self.state
            .write()
            .await
            .memberships
            .insert(membership.id, membership.clone());
        membership
    }

    /// Seed a skill package.
    pub async fn seed_package(
        &self,
        tenant_id: Uuid,
        external_ref: &str,
        name: &str,
        ref_code: &str,
    ) -> SkillPackage {
        let package = SkillPackage {
            id: Uuid::new_v4(),
            tenant_id,
            external_ref: external_ref.to_string(),
            name: name.to_string(),
            ref_code: ref_code.to_string(),
            description: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        self.state
            .write()
            .await
            .packages
            .insert(package.id, package.clone());
        package
    }

    /// Seed a skill group.
    pub async fn seed_group(
        &self,
        tenant_id: Uuid,
        package_id: Uuid,
        external_ref: &str,
        name: &str,
        position: i32,
    ) -> SkillGroup {
        let group = SkillGroup {
            id: Uuid::new_v4(),
            tenant_id,
            package_id,
            external_ref: external_ref.to_string(),
            name: name.to_string(),
            position,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        self.state
            .write()
            .await
            .groups
            .insert(group.id, group.clone());
        group
    }

    /// Seed a skill.
    #[allow(clippy::too_many_arguments)]
    pub async fn seed_skill(
        &self,
        tenant_id: Uuid,
        group_id: Uuid,
        external_ref: &str,
        name: &str,
        ref_code: &str,
        check_interval_months: Option<i32>,
        position: i32,
    ) -> Skill {
        let skill = Skill {
            id: Uuid::new_v4(),
            tenant_id,
            group_id,
            external_ref: external_ref.to_string(),
            name: name.to_string(),
            ref_code: ref_code.to_string(),
            description: None,
            check_interval_months,
            position,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        self.state
            .write()
            .await
            .skills
            .insert(skill.id, skill.clone());
        skill
    }

    /// Snapshot a person by id (for assertions).
    pub async fn person(&self, id: Uuid) -> Option<Person> {
        self.state.read().await.people.get(&id).cloned()
    }

    /// Count people in a tenant (for assertions).
    pub async fn person_count(&self, tenant_id: Uuid) -> usize {
        self.state
            .read()
            .await
            .people
            .values()
            .filter(|p| p.tenant_id == tenant_id)
            .count()
    }

    /// Count memberships of a team (for assertions).
    pub async fn membership_count(&self, tenant_id: Uuid, team_id: Uuid) -> usize {
        self.state
            .read()
            .await
            .memberships
            .values()
            .filter(|m| m.tenant_id == tenant_id && m.team_id == team_id)
            .count()
    }
}

#[async_trait]
impl ImportStore for MemStore {
    async fn find_team(
        &self,
        tenant_id: Uuid,
        team_id: Uuid,
    ) -> Result<Option<Team>, ImportError> {
        Ok(self
            .state
            .read()
            .await
            .teams
            .get(&team_id)
            .filter(|t| t.tenant_id == tenant_id)
            .cloned())
    }

    async fn list_roster(
        &self,
        tenant_id: Uuid,
        team_id: Uuid,
    ) -> Result<Vec<RosterRow>, ImportError> {
        let state = self.state.read().await;
        let mut rows: Vec<RosterRow> = state
            .memberships
            .values()
            .filter(|m| m.tenant_id == tenant_id && m.team_id == team_id)
            .filter_map(|m| {
                state.people.get(&m.person_id).map(|p| RosterRow {
                    membership_id: m.id,
                    person_id: p.id,
                    external_ref: m.external_ref.clone(),
                    display_name: p.display_name.clone(),
                    email: p.email.clone(),
                    role: m.role.clone(),
                })
            })
            .collect();
        rows.sort_by(|a, b| a.external_ref.cmp(&b.external_ref));
        Ok(rows)
    }

    async fn find_person(
        &self,
        tenant_id: Uuid,
        display_name: &str,
        email: &str,
    ) -> Result<Option<Person>, ImportError> {
        Ok(self
            .state
            .read()
            .await
            .people
            .values()
            .find(|p| {
                p.tenant_id == tenant_id && p.display_name == display_name && p.email == email
            })
            .cloned())
    }

    async fn find_package(
        &self,
        tenant_id: Uuid,
        external_ref: &str,
    ) -> Result<Option<SkillPackage>, ImportError> {
        Ok(self
            .state
            .read()
            .await
            .packages
            .values()
            .find(|p| p.tenant_id == tenant_id && p.external_ref == external_ref)
            .cloned())
    }

    async fn list_groups(
        &self,
        tenant_id: Uuid,
        package_id: Uuid,
    ) -> Result<Vec<SkillGroup>, ImportError> {
        let mut groups: Vec<SkillGroup> = self
            .state
            .read()
            .await
            .groups
            .values()
            .filter(|g| g.tenant_id == tenant_id && g.package_id == package_id)
            .cloned()
            .collect();
        groups.sort_by_key(|g| g.position);
        Ok(groups)
    }

    async fn list_skills(
        &self,
        tenant_id: Uuid,
        group_id: Uuid,
    ) -> Result<Vec<Skill>, ImportError> {
        let mut skills: Vec<Skill> = self
            .state
            .read()
            .await
            .skills
            .values()
            .filter(|s| s.tenant_id == tenant_id && s.group_id == group_id)
            .cloned()
            .collect();
        skills.sort_by_key(|s| s.position);
        Ok(skills)
    }

    async fn events_by_group(
        &self,
        tenant_id: Uuid,
        group_id: Uuid,
    ) -> Result<Vec<HistoryEvent>, ImportError> {
        Ok(self
            .state
            .read()
            .await
            .events
            .iter()
            .filter(|e| e.tenant_id == tenant_id && e.group_id == Some(group_id))
            .cloned()
            .collect())
    }

    async fn append_event(&self, event: CreateHistoryEvent) -> Result<(), ImportError> {
        self.checkpoint()?;
        self.state.write().await.events.push(materialize(&event));
        Ok(())
    }

    async fn create_person(
        &self,
        data: CreatePerson,
        event: CreateHistoryEvent,
    ) -> Result<(), ImportError> {
        self.checkpoint()?;
        let mut state = self.state.write().await;
        let person = Person {
            id: data.id,
            tenant_id: data.tenant_id,
            display_name: data.display_name,
            email: data.email,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        state.people.insert(person.id, person);
        state.events.push(materialize(&event));
        Ok(())
    }

    async fn create_membership(
        &self,
        data: CreateTeamMembership,
        event: CreateHistoryEvent,
    ) -> Result<(), ImportError> {
        self.checkpoint()?;
        let mut state = self.state.write().await;
        let membership = TeamMembership {
            id: data.id,
            tenant_id: data.tenant_id,
            team_id: data.team_id,
            person_id: data.person_id,
            external_ref: data.external_ref,
            role: data.role,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        state.memberships.insert(membership.id, membership);
        state.events.push(materialize(&event));
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
        self.checkpoint()?;
        let mut state = self.state.write().await;
        if let Some(person) = state
            .people
            .get_mut(&person_id)
            .filter(|p| p.tenant_id == tenant_id)
        {
            person.display_name = changes.display_name;
            person.email = changes.email;
            person.updated_at = Utc::now();
        }
        if let Some(membership) = state
            .memberships
            .get_mut(&membership_id)
            .filter(|m| m.tenant_id == tenant_id)
        {
            membership.role = changes.role;
            membership.updated_at = Utc::now();
        }
        state.events.push(materialize(&event));
        Ok(())
    }

    async fn create_package(
        &self,
        data: CreateSkillPackage,
        event: CreateHistoryEvent,
    ) -> Result<(), ImportError> {
        self.checkpoint()?;
        let mut state = self.state.write().await;
        let package = SkillPackage {
            id: data.id,
            tenant_id: data.tenant_id,
            external_ref: data.external_ref,
            name: data.name,
            ref_code: data.ref_code,
            description: data.description,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        state.packages.insert(package.id, package);
        state.events.push(materialize(&event));
        Ok(())
    }

    async fn update_package(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        changes: SkillPackageUpdate,
        event: CreateHistoryEvent,
    ) -> Result<(), ImportError> {
        self.checkpoint()?;
        let mut state = self.state.write().await;
        if let Some(package) = state
            .packages
            .get_mut(&id)
            .filter(|p| p.tenant_id == tenant_id)
        {
            package.name = changes.name;
            package.ref_code = changes.ref_code;
            package.description = changes.description;
            package.updated_at = Utc::now();
        }
        state.events.push(materialize(&event));
        Ok(())
    }

    async fn create_groups(
        &self,
        batch: Vec<(CreateSkillGroup, CreateHistoryEvent)>,
    ) -> Result<(), ImportError> {
        self.checkpoint()?;
        let mut state = self.state.write().await;
        for (data, event) in batch {
            let group = SkillGroup {
                id: data.id,
                tenant_id: data.tenant_id,
                package_id: data.package_id,
                external_ref: data.external_ref,
                name: data.name,
                position: data.position,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            };
            state.groups.insert(group.id, group);
            state.events.push(materialize(&event));
        }
        Ok(())
    }

    async fn update_group(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        changes: SkillGroupUpdate,
        event: CreateHistoryEvent,
    ) -> Result<(), ImportError> {
        self.checkpoint()?;
        let mut state = self.state.write().await;
        if let Some(group) = state
            .groups
            .get_mut(&id)
            .filter(|g| g.tenant_id == tenant_id)
        {
            group.name = changes.name;
            group.position = changes.position;
            group.updated_at = Utc::now();
        }
        state.events.push(materialize(&event));
        Ok(())
    }

    async fn create_skills(
        &self,
        batch: Vec<(CreateSkill, CreateHistoryEvent)>,
    ) -> Result<(), ImportError> {
        self.checkpoint()?;
        let mut state = self.state.write().await;
        for (data, event) in batch {
            let skill = Skill {
                id: data.id,
                tenant_id: data.tenant_id,
                group_id: data.group_id,
                external_ref: data.external_ref,
                name: data.name,
                ref_code: data.ref_code,
                description: data.description,
                check_interval_months: data.check_interval_months,
                position: data.position,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            };
            state.skills.insert(skill.id, skill);
            state.events.push(materialize(&event));
        }
        Ok(())
    }

    async fn update_skill(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        changes: SkillUpdate,
        event: CreateHistoryEvent,
    ) -> Result<(), ImportError> {
        self.checkpoint()?;
        let mut state = self.state.write().await;
        if let Some(skill) = state
            .skills
            .get_mut(&id)
            .filter(|s| s.tenant_id == tenant_id)
        {
            skill.name = changes.name;
            skill.ref_code = changes.ref_code;
            skill.description = changes.description;
            skill.check_interval_months = changes.check_interval_months;
            skill.position = changes.position;
            skill.updated_at = Utc::now();
        }
        state.events.push(materialize(&event));
        Ok(())
    }
}
