//! Error types for import reconciliation.

use thiserror::Error;
use uuid::Uuid;

/// Import reconciliation errors.
///
/// Errors propagate uncaught from the failing step; writes already committed
/// by earlier steps of the same run stay applied. Re-running the import is
/// safe because reconciliation re-diffs current state.
#[derive(Debug, Error)]
pub enum ImportError {
    /// The target team does not exist in the tenant.
    #[error("Team not found: {0}")]
    TeamNotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Storage backend failure outside the database layer.
    #[error("Storage error: {0}")]
    Storage(String),
}
