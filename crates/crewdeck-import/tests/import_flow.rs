//! End-to-end reconciliation tests against the in-memory store.

use std::sync::Arc;

use uuid::Uuid;

use crewdeck_core::TenantId;
use crewdeck_db::models::EntityKind;
use crewdeck_import::{
    reconcile_package, reconcile_roster, DesiredMember, GroupSpec, ImportContext, ImportError,
    ImportService, ImportStore, MemStore, PackageSpec, SkillSpec,
};

fn ctx(tenant_id: Uuid) -> ImportContext {
    ImportContext::new(TenantId::from_uuid(tenant_id), Some(Uuid::new_v4()))
}

fn member(external_ref: &str, name: &str, email: &str, role: Option<&str>) -> DesiredMember {
    DesiredMember {
        external_ref: external_ref.to_string(),
        display_name: name.to_string(),
        email: email.to_string(),
        role: role.map(str::to_string),
    }
}

fn skill(external_ref: &str, name: &str, interval: Option<i32>, position: i32) -> SkillSpec {
    SkillSpec {
        external_ref: external_ref.to_string(),
        name: name.to_string(),
        ref_code: name.to_uppercase().replace(' ', "-"),
        description: None,
        check_interval_months: interval,
        position,
    }
}

fn group(external_ref: &str, name: &str, position: i32, skills: Vec<SkillSpec>) -> GroupSpec {
    GroupSpec {
        external_ref: external_ref.to_string(),
        name: name.to_string(),
        position,
        skills,
    }
}

fn package(external_ref: &str, name: &str, ref_code: &str, groups: Vec<GroupSpec>) -> PackageSpec {
    PackageSpec {
        external_ref: external_ref.to_string(),
        name: name.to_string(),
        ref_code: ref_code.to_string(),
        description: None,
        groups,
    }
}

#[tokio::test]
async fn roster_import_classifies_and_counts() {
    let store = MemStore::new();
    let tenant_id = Uuid::new_v4();
    let team = store.seed_team(tenant_id, "Alpha Watch").await;

    let ada = store
        .seed_person(tenant_id, "Ada Lovelace", "ada@example.org")
        .await;
    let grace = store
        .seed_person(tenant_id, "Grace Hopper", "grace@example.org")
        .await;
    let gone = store
        .seed_person(tenant_id, "Gone Member", "gone@example.org")
        .await;
    store
        .seed_membership(tenant_id, team.id, ada.id, "m-1", Some("lead"))
        .await;
    store
        .seed_membership(tenant_id, team.id, grace.id, "m-2", None)
        .await;
    store
        .seed_membership(tenant_id, team.id, gone.id, "m-3", None)
        .await;

    let desired = vec![
        member("m-1", "Ada Lovelace", "ada@example.org", Some("lead")),
        member("m-2", "Grace M. Hopper", "grace@example.org", None),
        member("m-4", "New Member", "new@example.org", None),
    ];

    let counts = reconcile_roster(&store, &ctx(tenant_id), team.id, &desired)
        .await
        .unwrap();

    assert_eq!(counts.get(EntityKind::TeamMembership).create, 1);
    assert_eq!(counts.get(EntityKind::TeamMembership).update, 1);
    assert_eq!(counts.get(EntityKind::Person).create, 1);
    // Stale membership m-3 is detected but never deleted.
    assert_eq!(counts.get(EntityKind::TeamMembership).delete, 0);
    assert_eq!(store.membership_count(tenant_id, team.id).await, 4);

    // Updated fields landed on the stored person.
    let updated = store.person(grace.id).await.unwrap();
    assert_eq!(updated.display_name, "Grace M. Hopper");
}

#[tokio::test]
async fn second_roster_run_performs_no_writes() {
    let store = MemStore::new();
    let tenant_id = Uuid::new_v4();
    let team = store.seed_team(tenant_id, "Alpha Watch").await;

    let desired = vec![
        member("m-1", "Ada Lovelace", "ada@example.org", Some("lead")),
        member("m-2", "Grace Hopper", "grace@example.org", None),
    ];

    let first = reconcile_roster(&store, &ctx(tenant_id), team.id, &desired)
        .await
        .unwrap();
    assert_eq!(first.total_writes(), 4);

    let writes_after_first = store.write_count();
    let events_after_first = store.event_count().await;

    let second = reconcile_roster(&store, &ctx(tenant_id), team.id, &desired)
        .await
        .unwrap();
    assert!(second.is_empty());
    assert_eq!(store.write_count(), writes_after_first);
    assert_eq!(store.event_count().await, events_after_first);
}

#[tokio::test]
async fn person_is_reused_across_teams() {
    let store = MemStore::new();
    let tenant_id = Uuid::new_v4();
    let alpha = store.seed_team(tenant_id, "Alpha Watch").await;
    let bravo = store.seed_team(tenant_id, "Bravo Watch").await;

    let desired = vec![member("m-1", "Ada Lovelace", "ada@example.org", None)];

    reconcile_roster(&store, &ctx(tenant_id), alpha.id, &desired)
        .await
        .unwrap();
    reconcile_roster(&store, &ctx(tenant_id), bravo.id, &desired)
        .await
        .unwrap();

    assert_eq!(store.person_count(tenant_id).await, 1);
    assert_eq!(store.membership_count(tenant_id, alpha.id).await, 1);
    assert_eq!(store.membership_count(tenant_id, bravo.id).await, 1);
}

#[tokio::test]
async fn roster_import_rejects_unknown_team() {
    let store = MemStore::new();
    let tenant_id = Uuid::new_v4();
    let team_id = Uuid::new_v4();

    let err = reconcile_roster(&store, &ctx(tenant_id), team_id, &[])
        .await
        .unwrap_err();
    assert!(matches!(err, ImportError::TeamNotFound(id) if id == team_id));
}

#[tokio::test]
async fn run_events_share_the_root_group_id() {
    let store = MemStore::new();
    let tenant_id = Uuid::new_v4();
    let team = store.seed_team(tenant_id, "Alpha Watch").await;

    let desired = vec![
        member("m-1", "Ada Lovelace", "ada@example.org", None),
        member("m-2", "Grace Hopper", "grace@example.org", None),
    ];
    reconcile_roster(&store, &ctx(tenant_id), team.id, &desired)
        .await
        .unwrap();

    let events = store.events().await;
    // Root import event plus two person creates and two membership creates.
    assert_eq!(events.len(), 5);

    let root = events
        .iter()
        .find(|e| e.verb == "import")
        .expect("root event");
    let group_id = root.group_id.expect("root carries its own group id");
    assert!(events.iter().all(|e| e.group_id == Some(group_id)));

    let trail = store.events_by_group(tenant_id, group_id).await.unwrap();
    assert_eq!(trail.len(), events.len());
}

#[tokio::test]
async fn failed_run_can_be_reinvoked_to_convergence() {
    let store = MemStore::new();
    let tenant_id = Uuid::new_v4();
    let team = store.seed_team(tenant_id, "Alpha Watch").await;

    let desired = vec![
        member("m-1", "Ada Lovelace", "ada@example.org", None),
        member("m-2", "Grace Hopper", "grace@example.org", None),
    ];

    // The root event write fails; nothing is applied.
    store.fail_next_write();
    let err = reconcile_roster(&store, &ctx(tenant_id), team.id, &desired).await;
    assert!(matches!(err, Err(ImportError::Storage(_))));
    assert_eq!(store.membership_count(tenant_id, team.id).await, 0);
    assert_eq!(store.event_count().await, 0);

    // Re-invoking converges from current state.
    let counts = reconcile_roster(&store, &ctx(tenant_id), team.id, &desired)
        .await
        .unwrap();
    assert_eq!(counts.get(EntityKind::TeamMembership).create, 2);
    assert_eq!(store.membership_count(tenant_id, team.id).await, 2);
}

#[tokio::test]
async fn fresh_package_import_creates_everything() {
    let store = MemStore::new();
    let tenant_id = Uuid::new_v4();

    let spec = package(
        "pkg-1",
        "Medical",
        "MED",
        vec![
            group(
                "g-1",
                "First Aid",
                0,
                vec![
                    skill("s-1", "CPR", Some(12), 0),
                    skill("s-2", "Bandaging", None, 1),
                ],
            ),
            group("g-2", "Trauma", 1, vec![skill("s-3", "Triage", Some(24), 0)]),
            group("g-3", "Hygiene", 2, vec![]),
        ],
    );

    let counts = reconcile_package(&store, &ctx(tenant_id), &spec)
        .await
        .unwrap();

    assert_eq!(counts.get(EntityKind::SkillPackage).create, 1);
    assert_eq!(counts.get(EntityKind::SkillGroup).create, 3);
    assert_eq!(counts.get(EntityKind::Skill).create, 3);

    let events = store.events().await;
    let group_creates = events
        .iter()
        .filter(|e| e.verb == "create" && e.entity_kind == "skill_group")
        .count();
    assert_eq!(group_creates, 3);
    // Root plus one event per created record, all in one group.
    assert_eq!(events.len(), 8);
    let group_id = events[0].group_id.unwrap();
    assert!(events.iter().all(|e| e.group_id == Some(group_id)));
}

#[tokio::test]
async fn package_rename_updates_only_the_package() {
    let store = MemStore::new();
    let tenant_id = Uuid::new_v4();
    let stored = store.seed_package(tenant_id, "pkg-1", "Medical", "MED").await;
    store
        .seed_group(tenant_id, stored.id, "g-1", "First Aid", 0)
        .await;

    let spec = package(
        "pkg-1",
        "Medical v2",
        "MED",
        vec![group("g-1", "First Aid", 0, vec![])],
    );

    let counts = reconcile_package(&store, &ctx(tenant_id), &spec)
        .await
        .unwrap();

    assert_eq!(counts.get(EntityKind::SkillPackage).update, 1);
    assert_eq!(counts.total_writes(), 1);

    let events = store.events().await;
    assert_eq!(events.len(), 2);
    assert!(events
        .iter()
        .any(|e| e.verb == "update" && e.entity_kind == "skill_package"));
}

#[tokio::test]
async fn second_package_run_performs_no_writes() {
    let store = MemStore::new();
    let tenant_id = Uuid::new_v4();

    let spec = package(
        "pkg-1",
        "Medical",
        "MED",
        vec![group("g-1", "First Aid", 0, vec![skill("s-1", "CPR", Some(12), 0)])],
    );

    reconcile_package(&store, &ctx(tenant_id), &spec)
        .await
        .unwrap();
    let writes_after_first = store.write_count();
    let events_after_first = store.event_count().await;

    let second = reconcile_package(&store, &ctx(tenant_id), &spec)
        .await
        .unwrap();
    assert!(second.is_empty());
    assert_eq!(store.write_count(), writes_after_first);
    assert_eq!(store.event_count().await, events_after_first);
}

#[tokio::test]
async fn skill_frequency_change_is_an_update() {
    let store = MemStore::new();
    let tenant_id = Uuid::new_v4();
    let stored = store.seed_package(tenant_id, "pkg-1", "Medical", "MED").await;
    let g = store
        .seed_group(tenant_id, stored.id, "g-1", "First Aid", 0)
        .await;
    store
        .seed_skill(tenant_id, g.id, "s-1", "CPR", "CPR", Some(12), 0)
        .await;

    let spec = package(
        "pkg-1",
        "Medical",
        "MED",
        vec![group("g-1", "First Aid", 0, vec![skill("s-1", "CPR", Some(6), 0)])],
    );

    let counts = reconcile_package(&store, &ctx(tenant_id), &spec)
        .await
        .unwrap();
    assert_eq!(counts.get(EntityKind::Skill).update, 1);
    assert_eq!(counts.total_writes(), 1);
}

#[tokio::test]
async fn service_reports_summary_with_timing() {
    let store = Arc::new(MemStore::new());
    let tenant_id = Uuid::new_v4();
    let team = store.seed_team(tenant_id, "Alpha Watch").await;
    let service = ImportService::new(store.clone());

    let desired = vec![member("m-1", "Ada Lovelace", "ada@example.org", None)];
    let summary = service
        .import_roster(&ctx(tenant_id), team.id, &desired)
        .await
        .unwrap();

    assert_eq!(summary.change_counts.total_writes(), 2);
    let json = serde_json::to_value(&summary).unwrap();
    assert_eq!(json["change_counts"]["person"]["create"], 1);
    assert!(json["elapsed_ms"].is_u64());
}
