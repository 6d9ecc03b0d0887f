//! Error type for multi-step database operations.

use plank_core::types::DbId;

/// Error returned by the recovery (soft-delete / restore) operations.
///
/// Single-table CRUD repos return plain `sqlx::Error`; the recovery core
/// needs to distinguish missing identities and restore conflicts from
/// transport-level store failures.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error(transparent)]
    Database(sqlx::Error),
}

/// Convenience alias for recovery operation results.
pub type DbResult<T> = Result<T, DbError>;

impl From<sqlx::Error> for DbError {
    /// Classify unique-key violations (PostgreSQL error code 23505) as
    /// `Conflict`: reinserting a tombstoned row whose id was reused by an
    /// independently created row must fail loudly, never overwrite.
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                return DbError::Conflict(format!(
                    "unique constraint violated: {constraint}"
                ));
            }
        }
        DbError::Database(err)
    }
}
