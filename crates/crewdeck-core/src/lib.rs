//! Crewdeck core library.
//!
//! Shared types for the crewdeck workspace:
//!
//! - [`ids`] - strongly typed identifiers (`TenantId`, `PersonId`, `TeamId`)
//! - [`error`] - standardized error types (`CoreError`)

pub mod error;
pub mod ids;

pub use error::{CoreError, Result};
pub use ids::{PersonId, TeamId, TenantId};
