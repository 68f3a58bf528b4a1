//! Import reconciliation for crewdeck.
//!
//! Takes a desired state (a team roster export or a skill-package
//! definition) and converges stored state toward it: new records are
//! created, matched records with differing fields are updated, and stored
//! records absent from the desired state are detected but never deleted.
//! Every data write is paired with a history event in one atomic unit, and
//! all events of a run share the group id of the run's root import event.

pub mod audit;
pub mod catalog;
pub mod counts;
pub mod error;
pub mod roster;
pub mod service;
pub mod store;
pub mod types;

pub use audit::EventBuilder;
pub use catalog::reconcile_package;
pub use counts::{ChangeCounts, Tally};
pub use error::ImportError;
pub use roster::{partition_members, reconcile_roster, MemberChange};
pub use service::{ImportService, ImportSummary};
pub use store::{ImportStore, MemStore, PgStore, RosterUpdate};
pub use types::{DesiredMember, GroupSpec, ImportContext, PackageSpec, SkillSpec};
