//! Desired-state record types supplied to reconciliation.
//!
//! These mirror the shape of an external roster export or a skill-package
//! definition file. Natural keys (`external_ref`) identify records across
//! runs; all other fields are the managed state an import drives toward.

use crewdeck_core::TenantId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Actor context for one import run.
#[derive(Debug, Clone, Copy)]
pub struct ImportContext {
    /// Tenant the run operates in.
    pub tenant_id: TenantId,
    /// User who triggered the import, if known.
    pub actor_id: Option<Uuid>,
}

impl ImportContext {
    /// Create a context for the given tenant and actor.
    #[must_use]
    pub fn new(tenant_id: TenantId, actor_id: Option<Uuid>) -> Self {
        Self {
            tenant_id,
            actor_id,
        }
    }
}

/// One desired roster entry from an external personnel source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesiredMember {
    /// Stable member id assigned by the external source.
    pub external_ref: String,
    /// Person display name.
    pub display_name: String,
    /// Person email.
    pub email: String,
    /// Role within the team, if any.
    #[serde(default)]
    pub role: Option<String>,
}

/// A skill-package definition to import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageSpec {
    /// Package-defined stable id.
    pub external_ref: String,
    /// Package display name.
    pub name: String,
    /// Short reference code.
    pub ref_code: String,
    /// Optional long description.
    #[serde(default)]
    pub description: Option<String>,
    /// Groups contained in the package.
    #[serde(default)]
    pub groups: Vec<GroupSpec>,
}

/// A skill group within a package definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSpec {
    /// Stable id scoped to the package.
    pub external_ref: String,
    /// Group display name.
    pub name: String,
    /// Ordering within the package.
    #[serde(default)]
    pub position: i32,
    /// Skills contained in the group.
    #[serde(default)]
    pub skills: Vec<SkillSpec>,
}

/// A skill within a group definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillSpec {
    /// Stable id scoped to the group.
    pub external_ref: String,
    /// Skill display name.
    pub name: String,
    /// Short reference code.
    pub ref_code: String,
    /// Optional long description.
    #[serde(default)]
    pub description: Option<String>,
    /// Recheck frequency in months; `None` means one-time.
    #[serde(default)]
    pub check_interval_months: Option<i32>,
    /// Ordering within the group.
    #[serde(default)]
    pub position: i32,
}
