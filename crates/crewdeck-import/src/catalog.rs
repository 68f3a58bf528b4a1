//! Skill catalog reconciliation.
//!
//! Imports a skill-package definition against stored state: the package
//! record first, then its groups, then the skills of each group. All natural
//! keys are `external_ref`s scoped to their parent. Pure additions are
//! applied through batched paired writes; matched records are field-compared
//! with strict inequality and updated individually.

use std::collections::HashMap;

use uuid::Uuid;

use crate::audit::EventBuilder;
use crate::counts::ChangeCounts;
use crate::error::ImportError;
use crate::store::ImportStore;
use crate::types::{GroupSpec, ImportContext, PackageSpec, SkillSpec};
use crewdeck_db::models::{
    CreateSkill, CreateSkillGroup, CreateSkillPackage, EntityKind, HistoryVerb, Skill, SkillGroup,
    SkillGroupUpdate, SkillPackage, SkillPackageUpdate, SkillUpdate,
};

/// Planned action for the package record itself.
#[derive(Debug)]
enum PackageAction {
    Create(CreateSkillPackage),
    Update(Uuid, SkillPackageUpdate),
    Unchanged,
}

/// The full write plan for one package import, computed before any write.
#[derive(Debug)]
struct CatalogPlan {
    package_id: Uuid,
    package: PackageAction,
    group_adds: Vec<CreateSkillGroup>,
    group_updates: Vec<(Uuid, SkillGroupUpdate)>,
    skill_adds: Vec<CreateSkill>,
    skill_updates: Vec<(Uuid, SkillUpdate)>,
    stale_group_refs: Vec<String>,
    stale_skill_refs: Vec<String>,
}

impl CatalogPlan {
    fn is_noop(&self) -> bool {
        matches!(self.package, PackageAction::Unchanged)
            && self.group_adds.is_empty()
            && self.group_updates.is_empty()
            && self.skill_adds.is_empty()
            && self.skill_updates.is_empty()
    }
}

fn package_differs(stored: &SkillPackage, spec: &PackageSpec) -> bool {
    stored.name != spec.name
        || stored.ref_code != spec.ref_code
        || stored.description != spec.description
}

fn group_differs(stored: &SkillGroup, spec: &GroupSpec) -> bool {
    stored.name != spec.name || stored.position != spec.position
}

fn skill_differs(stored: &Skill, spec: &SkillSpec) -> bool {
    stored.name != spec.name
        || stored.ref_code != spec.ref_code
        || stored.description != spec.description
        || stored.check_interval_months != spec.check_interval_months
        || stored.position != spec.position
}

fn plan_new_skills(plan: &mut CatalogPlan, tenant_id: Uuid, group_id: Uuid, skills: &[SkillSpec]) {
    for skill in skills {
        plan.skill_adds.push(CreateSkill {
            id: Uuid::new_v4(),
            tenant_id,
            group_id,
            external_ref: skill.external_ref.clone(),
            name: skill.name.clone(),
            ref_code: skill.ref_code.clone(),
            description: skill.description.clone(),
            check_interval_months: skill.check_interval_months,
            position: skill.position,
        });
    }
}

/// Compute the write plan for a package import. Reads only.
async fn plan_catalog<S: ImportStore + ?Sized>(
    store: &S,
    tenant_id: Uuid,
    spec: &PackageSpec,
) -> Result<CatalogPlan, ImportError> {
    let existing = store.find_package(tenant_id, &spec.external_ref).await?;

    let (package_id, package) = match &existing {
        None => {
            let id = Uuid::new_v4();
            (
                id,
                PackageAction::Create(CreateSkillPackage {
                    id,
                    tenant_id,
                    external_ref: spec.external_ref.clone(),
                    name: spec.name.clone(),
                    ref_code: spec.ref_code.clone(),
                    description: spec.description.clone(),
                }),
            )
        }
        Some(stored) if package_differs(stored, spec) => (
            stored.id,
            PackageAction::Update(
                stored.id,
                SkillPackageUpdate {
                    name: spec.name.clone(),
                    ref_code: spec.ref_code.clone(),
                    description: spec.description.clone(),
                },
            ),
        ),
        Some(stored) => (stored.id, PackageAction::Unchanged),
    };

    let mut plan = CatalogPlan {
        package_id,
        package,
        group_adds: Vec::new(),
        group_updates: Vec::new(),
        skill_adds: Vec::new(),
        skill_updates: Vec::new(),
        stale_group_refs: Vec::new(),
        stale_skill_refs: Vec::new(),
    };

    let stored_groups = if existing.is_some() {
        store.list_groups(tenant_id, package_id).await?
    } else {
        Vec::new()
    };
    let groups_by_ref: HashMap<&str, &SkillGroup> = stored_groups
        .iter()
        .map(|g| (g.external_ref.as_str(), g))
        .collect();

    for group in &spec.groups {
        match groups_by_ref.get(group.external_ref.as_str()) {
            None => {
                let group_id = Uuid::new_v4();
                plan.group_adds.push(CreateSkillGroup {
                    id: group_id,
                    tenant_id,
                    package_id,
                    external_ref: group.external_ref.clone(),
                    name: group.name.clone(),
                    position: group.position,
                });
                plan_new_skills(&mut plan, tenant_id, group_id, &group.skills);
            }
            Some(stored) => {
                if group_differs(stored, group) {
                    plan.group_updates.push((
                        stored.id,
                        SkillGroupUpdate {
                            name: group.name.clone(),
                            position: group.position,
                        },
                    ));
                }

                let stored_skills = store.list_skills(tenant_id, stored.id).await?;
                let skills_by_ref: HashMap<&str, &Skill> = stored_skills
                    .iter()
                    .map(|s| (s.external_ref.as_str(), s))
                    .collect();

                for skill in &group.skills {
                    match skills_by_ref.get(skill.external_ref.as_str()) {
                        None => plan_new_skills(
                            &mut plan,
                            tenant_id,
                            stored.id,
                            std::slice::from_ref(skill),
                        ),
                        Some(stored_skill) if skill_differs(stored_skill, skill) => {
                            plan.skill_updates.push((
                                stored_skill.id,
                                SkillUpdate {
                                    name: skill.name.clone(),
                                    ref_code: skill.ref_code.clone(),
                                    description: skill.description.clone(),
                                    check_interval_months: skill.check_interval_months,
                                    position: skill.position,
                                },
                            ));
                        }
                        Some(_) => {}
                    }
                }

                let desired_skill_refs: HashMap<&str, ()> = group
                    .skills
                    .iter()
                    .map(|s| (s.external_ref.as_str(), ()))
                    .collect();
                for stored_skill in &stored_skills {
                    if !desired_skill_refs.contains_key(stored_skill.external_ref.as_str()) {
                        plan.stale_skill_refs
                            .push(stored_skill.external_ref.clone());
                    }
                }
            }
        }
    }

    let desired_group_refs: HashMap<&str, ()> = spec
        .groups
        .iter()
        .map(|g| (g.external_ref.as_str(), ()))
        .collect();
    for stored in &stored_groups {
        if !desired_group_refs.contains_key(stored.external_ref.as_str()) {
            plan.stale_group_refs.push(stored.external_ref.clone());
        }
    }

    Ok(plan)
}

/// Reconcile a skill-package definition against stored state.
///
/// All events of one run share the group id of the run's root import event.
/// Each record's paired write is atomic; the run as a whole is not, and can
/// be re-invoked safely after a partial failure.
pub async fn reconcile_package<S: ImportStore + ?Sized>(
    store: &S,
    ctx: &ImportContext,
    spec: &PackageSpec,
) -> Result<ChangeCounts, ImportError> {
    let tenant_id = ctx.tenant_id.into_uuid();
    let plan = plan_catalog(store, tenant_id, spec).await?;

    let mut counts = ChangeCounts::new();

    if plan.is_noop() {
        tracing::debug!(
            package_ref = %spec.external_ref,
            "Skill package already matches desired state"
        );
        return Ok(counts);
    }

    let mut events = EventBuilder::new(tenant_id, ctx.actor_id);
    let root = events.root(HistoryVerb::Import, EntityKind::SkillPackage, plan.package_id);
    store.append_event(root).await?;

    match plan.package {
        PackageAction::Create(data) => {
            let event = events.child(HistoryVerb::Create, EntityKind::SkillPackage, data.id);
            store.create_package(data, event).await?;
            counts.record_create(EntityKind::SkillPackage);
        }
        PackageAction::Update(id, changes) => {
            let event = events.child(HistoryVerb::Update, EntityKind::SkillPackage, id);
            store.update_package(tenant_id, id, changes, event).await?;
            counts.record_update(EntityKind::SkillPackage);
        }
        PackageAction::Unchanged => {}
    }

    if !plan.group_adds.is_empty() {
        let n = plan.group_adds.len() as u32;
        let batch = plan
            .group_adds
            .into_iter()
            .map(|data| {
                let event = events.child(HistoryVerb::Create, EntityKind::SkillGroup, data.id);
                (data, event)
            })
            .collect();
        store.create_groups(batch).await?;
        counts.record_creates(EntityKind::SkillGroup, n);
    }

    for (id, changes) in plan.group_updates {
        let event = events.child(HistoryVerb::Update, EntityKind::SkillGroup, id);
        store.update_group(tenant_id, id, changes, event).await?;
        counts.record_update(EntityKind::SkillGroup);
    }

    if !plan.skill_adds.is_empty() {
        let n = plan.skill_adds.len() as u32;
        let batch = plan
            .skill_adds
            .into_iter()
            .map(|data| {
                let event = events.child(HistoryVerb::Create, EntityKind::Skill, data.id);
                (data, event)
            })
            .collect();
        store.create_skills(batch).await?;
        counts.record_creates(EntityKind::Skill, n);
    }

    for (id, changes) in plan.skill_updates {
        let event = events.child(HistoryVerb::Update, EntityKind::Skill, id);
        store.update_skill(tenant_id, id, changes, event).await?;
        counts.record_update(EntityKind::Skill);
    }

    if !plan.stale_group_refs.is_empty() || !plan.stale_skill_refs.is_empty() {
        tracing::debug!(
            package_ref = %spec.external_ref,
            stale_groups = ?plan.stale_group_refs,
            stale_skills = ?plan.stale_skill_refs,
            "Stored catalog records absent from desired package; no removal applied"
        );
    }

    tracing::info!(
        tenant_id = %tenant_id,
        package_ref = %spec.external_ref,
        writes = counts.total_writes(),
        "Skill package reconciliation applied"
    );

    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn stored_package(name: &str, ref_code: &str) -> SkillPackage {
        SkillPackage {
            id: Uuid::new_v4(),
            tenant_id: Uuid::new_v4(),
            external_ref: "pkg-1".to_string(),
            name: name.to_string(),
            ref_code: ref_code.to_string(),
            description: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn spec(name: &str, ref_code: &str) -> PackageSpec {
        PackageSpec {
            external_ref: "pkg-1".to_string(),
            name: name.to_string(),
            ref_code: ref_code.to_string(),
            description: None,
            groups: Vec::new(),
        }
    }

    #[test]
    fn package_comparison_is_field_by_field() {
        let stored = stored_package("Medical", "MED");
        assert!(!package_differs(&stored, &spec("Medical", "MED")));
        assert!(package_differs(&stored, &spec("Medical v2", "MED")));
        assert!(package_differs(&stored, &spec("Medical", "MED2")));
    }

    #[test]
    fn skill_comparison_covers_frequency_and_position() {
        let stored = Skill {
            id: Uuid::new_v4(),
            tenant_id: Uuid::new_v4(),
            group_id: Uuid::new_v4(),
            external_ref: "s-1".to_string(),
            name: "CPR".to_string(),
            ref_code: "CPR".to_string(),
            description: None,
            check_interval_months: Some(12),
            position: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let mut desired = SkillSpec {
            external_ref: "s-1".to_string(),
            name: "CPR".to_string(),
            ref_code: "CPR".to_string(),
            description: None,
            check_interval_months: Some(12),
            position: 0,
        };
        assert!(!skill_differs(&stored, &desired));

        desired.check_interval_months = Some(6);
        assert!(skill_differs(&stored, &desired));

        desired.check_interval_months = Some(12);
        desired.position = 3;
        assert!(skill_differs(&stored, &desired));
    }
}
