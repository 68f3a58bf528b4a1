//! Team roster reconciliation.
//!
//! Diffs a desired roster (from an external personnel source) against the
//! stored memberships of one team and applies the minimal set of writes.
//! Matching is two-level: memberships are matched by `external_ref` within
//! the team; people are matched by `(display_name, email)` against the
//! tenant-wide catalog, so a person is reused across teams even when the
//! membership itself is new.

use std::collections::HashMap;

use uuid::Uuid;

use crate::audit::EventBuilder;
use crate::counts::ChangeCounts;
use crate::error::ImportError;
use crate::store::{ImportStore, RosterUpdate};
use crate::types::{DesiredMember, ImportContext};
use crewdeck_db::models::{
    CreatePerson, CreateTeamMembership, EntityKind, HistoryVerb, RosterRow,
};

/// One classified roster change.
///
/// Each desired record lands in exactly one class; records whose managed
/// fields all match their stored counterpart produce no change at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberChange {
    /// No natural-key match: the membership is new.
    Add(DesiredMember),
    /// Natural-key match with at least one differing managed field.
    Update {
        membership_id: Uuid,
        person_id: Uuid,
        external_ref: String,
        fields: RosterUpdate,
    },
    /// Stored membership absent from the desired roster. Detected only;
    /// removal semantics are unresolved and no delete is applied.
    Remove {
        membership_id: Uuid,
        external_ref: String,
    },
}

/// Partition a desired roster against stored rows by natural key.
///
/// Field comparison is strict per-field inequality with no normalization.
#[must_use]
pub fn partition_members(desired: &[DesiredMember], stored: &[RosterRow]) -> Vec<MemberChange> {
    let by_ref: HashMap<&str, &RosterRow> = stored
        .iter()
        .map(|row| (row.external_ref.as_str(), row))
        .collect();

    let mut changes = Vec::new();

    for member in desired {
        match by_ref.get(member.external_ref.as_str()) {
            None => changes.push(MemberChange::Add(member.clone())),
            Some(row) => {
                let differs = member.display_name != row.display_name
                    || member.email != row.email
                    || member.role != row.role;
                if differs {
                    changes.push(MemberChange::Update {
                        membership_id: row.membership_id,
                        person_id: row.person_id,
                        external_ref: member.external_ref.clone(),
                        fields: RosterUpdate {
                            display_name: member.display_name.clone(),
                            email: member.email.clone(),
                            role: member.role.clone(),
                        },
                    });
                }
            }
        }
    }

    let desired_refs: HashMap<&str, ()> = desired
        .iter()
        .map(|m| (m.external_ref.as_str(), ()))
        .collect();
    for row in stored {
        if !desired_refs.contains_key(row.external_ref.as_str()) {
            changes.push(MemberChange::Remove {
                membership_id: row.membership_id,
                external_ref: row.external_ref.clone(),
            });
        }
    }

    changes
}

/// Reconcile a team's roster against the desired state.
///
/// Returns the per-entity change counts for the run. Each record's paired
/// write is atomic; the run as a whole is not, and a failed run can be
/// re-invoked safely because reconciliation re-diffs current state.
pub async fn reconcile_roster<S: ImportStore + ?Sized>(
    store: &S,
    ctx: &ImportContext,
    team_id: Uuid,
    desired: &[DesiredMember],
) -> Result<ChangeCounts, ImportError> {
    let tenant_id = ctx.tenant_id.into_uuid();

    let team = store
        .find_team(tenant_id, team_id)
        .await?
        .ok_or(ImportError::TeamNotFound(team_id))?;

    let stored = store.list_roster(tenant_id, team_id).await?;
    let changes = partition_members(desired, &stored);

    let mut counts = ChangeCounts::new();
    let mut stale: Vec<String> = Vec::new();

    let has_writes = changes
        .iter()
        .any(|c| !matches!(c, MemberChange::Remove { .. }));
    if !has_writes {
        for change in changes {
            if let MemberChange::Remove { external_ref, .. } = change {
                stale.push(external_ref);
            }
        }
        if !stale.is_empty() {
            tracing::debug!(
                team_id = %team_id,
                stale_refs = ?stale,
                "Stored memberships absent from desired roster; no removal applied"
            );
        }
        tracing::debug!(team_id = %team_id, "Roster already matches desired state");
        return Ok(counts);
    }

    let mut events = EventBuilder::new(tenant_id, ctx.actor_id);
    let root = events.root(HistoryVerb::Import, EntityKind::Team, team.id);
    store.append_event(root).await?;

    for change in changes {
        match change {
            MemberChange::Add(member) => {
                let person_id = match store
                    .find_person(tenant_id, &member.display_name, &member.email)
                    .await?
                {
                    Some(person) => person.id,
                    None => {
                        let person_id = Uuid::new_v4();
                        store
                            .create_person(
                                CreatePerson {
                                    id: person_id,
                                    tenant_id,
                                    display_name: member.display_name.clone(),
                                    email: member.email.clone(),
                                },
                                events.child(HistoryVerb::Create, EntityKind::Person, person_id),
                            )
                            .await?;
                        counts.record_create(EntityKind::Person);
                        person_id
                    }
                };

                let membership_id = Uuid::new_v4();
                store
                    .create_membership(
                        CreateTeamMembership {
                            id: membership_id,
                            tenant_id,
                            team_id,
                            person_id,
                            external_ref: member.external_ref,
                            role: member.role,
                        },
                        events.child(HistoryVerb::Create, EntityKind::TeamMembership, membership_id),
                    )
                    .await?;
                counts.record_create(EntityKind::TeamMembership);
            }
            MemberChange::Update {
                membership_id,
                person_id,
                fields,
                ..
            } => {
                store
                    .update_roster_entry(
                        tenant_id,
                        membership_id,
                        person_id,
                        fields,
                        events.child(HistoryVerb::Update, EntityKind::TeamMembership, membership_id),
                    )
                    .await?;
                counts.record_update(EntityKind::TeamMembership);
            }
            MemberChange::Remove { external_ref, .. } => stale.push(external_ref),
        }
    }

    if !stale.is_empty() {
        tracing::debug!(
            team_id = %team_id,
            stale_refs = ?stale,
            "Stored memberships absent from desired roster; no removal applied"
        );
    }

    tracing::info!(
        tenant_id = %tenant_id,
        team_id = %team_id,
        created = counts.get(EntityKind::TeamMembership).create,
        updated = counts.get(EntityKind::TeamMembership).update,
        people_created = counts.get(EntityKind::Person).create,
        "Roster reconciliation applied"
    );

    Ok(counts)
}
