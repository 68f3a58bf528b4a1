//! Change counting for reconciliation runs.
//!
//! A [`ChangeCounts`] is created fresh per run, accumulated as writes occur,
//! and returned to the caller (e.g. to render "Created 4, Updated 2"). It is
//! never persisted. Counts are threaded through the run as an explicit value
//! rather than shared mutable state.

use crewdeck_db::models::EntityKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-entity-type tally of writes performed during one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    /// Records created.
    pub create: u32,
    /// Records updated.
    pub update: u32,
    /// Records deleted. Currently never incremented: stale records are
    /// detected but removal semantics are unresolved.
    pub delete: u32,
}

/// Change counts for one reconciliation run, keyed by entity type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChangeCounts(BTreeMap<EntityKind, Tally>);

impl ChangeCounts {
    /// Create an empty set of counts.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `n` created records of the given kind.
    pub fn record_creates(&mut self, kind: EntityKind, n: u32) {
        self.0.entry(kind).or_default().create += n;
    }

    /// Record one created record of the given kind.
    pub fn record_create(&mut self, kind: EntityKind) {
        self.record_creates(kind, 1);
    }

    /// Record one updated record of the given kind.
    pub fn record_update(&mut self, kind: EntityKind) {
        self.0.entry(kind).or_default().update += 1;
    }

    /// Record one deleted record of the given kind. Reconcilers currently
    /// detect stale records without deleting, so this stays at zero there.
    pub fn record_delete(&mut self, kind: EntityKind) {
        self.0.entry(kind).or_default().delete += 1;
    }

    /// The tally for one entity kind (zero if nothing was recorded).
    #[must_use]
    pub fn get(&self, kind: EntityKind) -> Tally {
        self.0.get(&kind).copied().unwrap_or_default()
    }

    /// Fold another set of counts into this one.
    pub fn merge(&mut self, other: ChangeCounts) {
        for (kind, tally) in other.0 {
            let entry = self.0.entry(kind).or_default();
            entry.create += tally.create;
            entry.update += tally.update;
            entry.delete += tally.delete;
        }
    }

    /// Total number of writes recorded across all entity kinds.
    #[must_use]
    pub fn total_writes(&self) -> u32 {
        self.0
            .values()
            .map(|t| t.create + t.update + t.delete)
            .sum()
    }

    /// True if no writes were recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total_writes() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_start_at_zero() {
        let counts = ChangeCounts::new();
        assert!(counts.is_empty());
        assert_eq!(counts.get(EntityKind::Person), Tally::default());
    }

    #[test]
    fn record_and_get() {
        let mut counts = ChangeCounts::new();
        counts.record_creates(EntityKind::SkillGroup, 3);
        counts.record_update(EntityKind::SkillPackage);
        counts.record_update(EntityKind::SkillPackage);
        counts.record_delete(EntityKind::Skill);

        assert_eq!(counts.get(EntityKind::SkillGroup).create, 3);
        assert_eq!(counts.get(EntityKind::SkillPackage).update, 2);
        assert_eq!(counts.get(EntityKind::Skill).delete, 1);
        assert_eq!(counts.total_writes(), 6);
    }

    #[test]
    fn merge_folds_tallies() {
        let mut a = ChangeCounts::new();
        a.record_create(EntityKind::Skill);

        let mut b = ChangeCounts::new();
        b.record_creates(EntityKind::Skill, 2);
        b.record_update(EntityKind::SkillGroup);

        a.merge(b);
        assert_eq!(a.get(EntityKind::Skill).create, 3);
        assert_eq!(a.get(EntityKind::SkillGroup).update, 1);
    }

    #[test]
    fn serializes_keyed_by_kind_name() {
        let mut counts = ChangeCounts::new();
        counts.record_create(EntityKind::TeamMembership);
        let json = serde_json::to_value(&counts).unwrap();
        assert_eq!(json["team_membership"]["create"], 1);
        assert_eq!(json["team_membership"]["update"], 0);
    }
}
