//! History event construction.
//!
//! [`EventBuilder`] produces structurally consistent [`CreateHistoryEvent`]
//! payloads for one actor context. Pure data construction, no I/O: the store
//! persists each event in the same transaction as the write it describes.

use crewdeck_db::models::{CreateHistoryEvent, EntityKind, HistoryVerb};
use uuid::Uuid;

/// Builds history events for one actor context.
///
/// Calling [`EventBuilder::root`] establishes a group id; every event built
/// afterwards carries it, so the whole operation can later be retrieved as a
/// single audit trail via the group id.
#[derive(Debug, Clone)]
pub struct EventBuilder {
    tenant_id: Uuid,
    actor_id: Option<Uuid>,
    group_id: Option<Uuid>,
}

impl EventBuilder {
    /// Create a builder scoped to one tenant and acting user.
    #[must_use]
    pub fn new(tenant_id: Uuid, actor_id: Option<Uuid>) -> Self {
        Self {
            tenant_id,
            actor_id,
            group_id: None,
        }
    }

    /// Build the root event of a multi-record operation and establish a new
    /// group id. The root event itself carries the group id so it appears in
    /// the grouped trail.
    pub fn root(
        &mut self,
        verb: HistoryVerb,
        entity_kind: EntityKind,
        entity_id: Uuid,
    ) -> CreateHistoryEvent {
        let group_id = Uuid::new_v4();
        self.group_id = Some(group_id);
        CreateHistoryEvent {
            id: Uuid::new_v4(),
            tenant_id: self.tenant_id,
            actor_id: self.actor_id,
            verb,
            entity_kind,
            entity_id,
            group_id: Some(group_id),
        }
    }

    /// Build a child event for one record-level write, tagged with the
    /// current group id (`None` if no root has been established).
    #[must_use]
    pub fn child(
        &self,
        verb: HistoryVerb,
        entity_kind: EntityKind,
        entity_id: Uuid,
    ) -> CreateHistoryEvent {
        CreateHistoryEvent {
            id: Uuid::new_v4(),
            tenant_id: self.tenant_id,
            actor_id: self.actor_id,
            verb,
            entity_kind,
            entity_id,
            group_id: self.group_id,
        }
    }

    /// The group id established by [`EventBuilder::root`], if any.
    #[must_use]
    pub fn group_id(&self) -> Option<Uuid> {
        self.group_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_establishes_group_id() {
        let mut builder = EventBuilder::new(Uuid::new_v4(), Some(Uuid::new_v4()));
        assert_eq!(builder.group_id(), None);

        let root = builder.root(HistoryVerb::Import, EntityKind::SkillPackage, Uuid::new_v4());
        assert!(root.group_id.is_some());
        assert_eq!(builder.group_id(), root.group_id);
    }

    #[test]
    fn children_share_the_group_id() {
        let tenant_id = Uuid::new_v4();
        let actor_id = Uuid::new_v4();
        let mut builder = EventBuilder::new(tenant_id, Some(actor_id));
        let root = builder.root(HistoryVerb::Import, EntityKind::SkillPackage, Uuid::new_v4());

        let a = builder.child(HistoryVerb::Create, EntityKind::SkillGroup, Uuid::new_v4());
        let b = builder.child(HistoryVerb::Update, EntityKind::Skill, Uuid::new_v4());

        assert_eq!(a.group_id, root.group_id);
        assert_eq!(b.group_id, root.group_id);
        assert_eq!(a.tenant_id, tenant_id);
        assert_eq!(a.actor_id, Some(actor_id));
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn child_without_root_is_ungrouped() {
        let builder = EventBuilder::new(Uuid::new_v4(), None);
        let event = builder.child(HistoryVerb::Update, EntityKind::Person, Uuid::new_v4());
        assert_eq!(event.group_id, None);
    }
}
