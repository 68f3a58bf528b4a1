//! PostgreSQL store integration tests.
//!
//! Run against a live database:
//!
//! ```sh
//! DATABASE_URL=postgres://localhost/crewdeck_test cargo test -- --ignored
//! ```

use uuid::Uuid;

use crewdeck_core::TenantId;
use crewdeck_db::models::{CreateTeam, EntityKind, Team};
use crewdeck_db::{run_migrations, DbPool};
use crewdeck_import::{reconcile_roster, DesiredMember, ImportContext, ImportStore, PgStore};

struct TestContext {
    pool: DbPool,
    tenant_id: Uuid,
}

impl TestContext {
    async fn new() -> Self {
        static INIT: std::sync::Once = std::sync::Once::new();
        INIT.call_once(|| {
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| "info".into()),
                )
                .with_test_writer()
                .init();
        });

        let database_url =
            std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for ignored tests");
        let pool = DbPool::connect(&database_url).await.expect("connect");
        run_migrations(&pool).await.expect("migrations");

        let tenant_id = Uuid::new_v4();
        sqlx::query("INSERT INTO tenants (id, name, slug) VALUES ($1, $2, $3)")
            .bind(tenant_id)
            .bind("Test Tenant")
            .bind(format!("test-{tenant_id}"))
            .execute(pool.inner())
            .await
            .expect("seed tenant");

        Self { pool, tenant_id }
    }

    async fn seed_team(&self, name: &str) -> Team {
        Team::insert(
            self.pool.inner(),
            &CreateTeam {
                id: Uuid::new_v4(),
                tenant_id: self.tenant_id,
                name: name.to_string(),
            },
        )
        .await
        .expect("seed team")
    }
}

fn member(external_ref: &str, name: &str, email: &str) -> DesiredMember {
    DesiredMember {
        external_ref: external_ref.to_string(),
        display_name: name.to_string(),
        email: email.to_string(),
        role: None,
    }
}

#[tokio::test]
#[ignore]
async fn roster_import_round_trips_through_postgres() {
    let ctx = TestContext::new().await;
    let team = ctx.seed_team("Alpha Watch").await;
    let store = PgStore::new(ctx.pool.inner().clone());

    let import_ctx = ImportContext::new(TenantId::from_uuid(ctx.tenant_id), None);
    let desired = vec![
        member("m-1", "Ada Lovelace", "ada@example.org"),
        member("m-2", "Grace Hopper", "grace@example.org"),
    ];

    let counts = reconcile_roster(&store, &import_ctx, team.id, &desired)
        .await
        .expect("first run");
    assert_eq!(counts.get(EntityKind::Person).create, 2);
    assert_eq!(counts.get(EntityKind::TeamMembership).create, 2);

    let roster = store
        .list_roster(ctx.tenant_id, team.id)
        .await
        .expect("list roster");
    assert_eq!(roster.len(), 2);

    // Second run against identical desired state writes nothing.
    let second = reconcile_roster(&store, &import_ctx, team.id, &desired)
        .await
        .expect("second run");
    assert!(second.is_empty());
}

#[tokio::test]
#[ignore]
async fn paired_write_persists_event_with_data() {
    let ctx = TestContext::new().await;
    let team = ctx.seed_team("Bravo Watch").await;
    let store = PgStore::new(ctx.pool.inner().clone());

    let import_ctx = ImportContext::new(TenantId::from_uuid(ctx.tenant_id), Some(Uuid::new_v4()));
    let desired = vec![member("m-1", "Ada Lovelace", "ada@example.org")];

    reconcile_roster(&store, &import_ctx, team.id, &desired)
        .await
        .expect("run");

    let root: (Uuid,) = sqlx::query_as(
        "SELECT group_id FROM history_events
         WHERE tenant_id = $1 AND verb = 'import' AND entity_id = $2",
    )
    .bind(ctx.tenant_id)
    .bind(team.id)
    .fetch_one(ctx.pool.inner())
    .await
    .expect("root event");

    let trail = store
        .events_by_group(ctx.tenant_id, root.0)
        .await
        .expect("trail");
    // Root, person create, membership create.
    assert_eq!(trail.len(), 3);
}
