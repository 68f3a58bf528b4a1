//! Database entity models.
//!
//! One module per table. Structs derive `FromRow` and expose inherent query
//! methods; `Create*` structs carry the data for inserts.

pub mod history_event;
pub mod person;
pub mod skill;
pub mod skill_group;
pub mod skill_package;
pub mod team;
pub mod team_membership;

pub use history_event::{CreateHistoryEvent, EntityKind, HistoryEvent, HistoryVerb};
pub use person::{CreatePerson, Person};
pub use skill::{CreateSkill, Skill, SkillUpdate};
pub use skill_group::{CreateSkillGroup, SkillGroup, SkillGroupUpdate};
pub use skill_package::{CreateSkillPackage, SkillPackage, SkillPackageUpdate};
pub use team::{CreateTeam, Team};
pub use team_membership::{CreateTeamMembership, RosterRow, TeamMembership};
