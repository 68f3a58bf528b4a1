//! Import entry points.
//!
//! [`ImportService`] wraps the reconcilers with run timing and summary
//! logging. Callers hand it a desired state and get back an [`ImportSummary`]
//! describing what was written.

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use uuid::Uuid;

use crate::catalog::reconcile_package;
use crate::counts::ChangeCounts;
use crate::error::ImportError;
use crate::roster::reconcile_roster;
use crate::store::ImportStore;
use crate::types::{DesiredMember, ImportContext, PackageSpec};

/// Outcome of one import run.
#[derive(Debug, Clone, Serialize)]
pub struct ImportSummary {
    /// Writes performed, keyed by entity type.
    pub change_counts: ChangeCounts,
    /// Wall-clock duration of the run.
    pub elapsed_ms: u64,
}

/// Runs imports against a store.
#[derive(Clone)]
pub struct ImportService {
    store: Arc<dyn ImportStore>,
}

impl ImportService {
    /// Create a service over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn ImportStore>) -> Self {
        Self { store }
    }

    /// Import a team roster.
    pub async fn import_roster(
        &self,
        ctx: &ImportContext,
        team_id: Uuid,
        desired: &[DesiredMember],
    ) -> Result<ImportSummary, ImportError> {
        let started = Instant::now();
        let change_counts = reconcile_roster(self.store.as_ref(), ctx, team_id, desired).await?;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        tracing::info!(
            tenant_id = %ctx.tenant_id,
            team_id = %team_id,
            writes = change_counts.total_writes(),
            elapsed_ms,
            "Roster import finished"
        );

        Ok(ImportSummary {
            change_counts,
            elapsed_ms,
        })
    }

    /// Import a skill-package definition.
    pub async fn import_package(
        &self,
        ctx: &ImportContext,
        spec: &PackageSpec,
    ) -> Result<ImportSummary, ImportError> {
        let started = Instant::now();
        let change_counts = reconcile_package(self.store.as_ref(), ctx, spec).await?;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        tracing::info!(
            tenant_id = %ctx.tenant_id,
            package_ref = %spec.external_ref,
            writes = change_counts.total_writes(),
            elapsed_ms,
            "Skill package import finished"
        );

        Ok(ImportSummary {
            change_counts,
            elapsed_ms,
        })
    }
}
