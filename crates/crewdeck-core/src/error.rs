//! Standardized error types shared across crewdeck services.

use crate::ids::TenantId;
use serde::Serialize;
use thiserror::Error;

/// Standardized error type for crewdeck services.
///
/// Each variant maps to a common failure scenario and converts cleanly to an
/// HTTP status code at the service boundary.
#[derive(Debug, Clone, Error, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CoreError {
    /// Authentication or authorization failure.
    #[error("Unauthorized{}", message.as_ref().map(|m| format!(": {m}")).unwrap_or_default())]
    Unauthorized {
        /// Optional message providing more context.
        #[serde(skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },

    /// Requested resource was not found.
    #[error("{resource} not found{}", id.as_ref().map(|i| format!(": {i}")).unwrap_or_default())]
    NotFound {
        /// The type of resource that was not found (e.g., "Team", "Person").
        resource: String,
        /// Optional identifier of the resource.
        #[serde(skip_serializing_if = "Option::is_none")]
        id: Option<String>,
    },

    /// Tenant isolation violation. This is a critical security error.
    #[error("Tenant mismatch: expected {expected}, got {actual}")]
    TenantMismatch {
        /// The expected tenant id.
        expected: TenantId,
        /// The tenant id that was provided.
        actual: TenantId,
    },

    /// Input validation failure.
    #[error("Validation error on field '{field}': {message}")]
    Validation {
        /// The field that failed validation.
        field: String,
        /// Description of the validation failure.
        message: String,
    },
}

/// Type alias for Results using [`CoreError`].
pub type Result<T> = std::result::Result<T, CoreError>;
