//! Crewdeck database layer.
//!
//! PostgreSQL models for the personnel and skill-catalog schema, a connection
//! pool wrapper, and embedded migrations.
//!
//! Each model is a plain `FromRow` struct with inherent async query methods.
//! Reads bind against a pool; inserts and updates accept any `PgExecutor` so
//! they can participate in a caller-owned transaction.

pub mod error;
pub mod migrations;
pub mod models;
pub mod pool;

pub use error::DbError;
pub use migrations::run_migrations;
pub use pool::DbPool;
