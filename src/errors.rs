use sea_orm::error::{DbErr, SqlErr};
use thiserror::Error;

/// Error type returned by every service operation.
///
/// All variants are recoverable at the console loop: the message is shown to
/// the operator and the menu continues. Mutations are transactional, so a
/// failed operation never leaves a detail row and its parent aggregate out of
/// sync.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] DbErr),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Unique or foreign-key constraint rejected the change. Carries the
    /// driver's message so the operator sees which constraint fired.
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),
}

impl ServiceError {
    /// Maps a database error, turning unique and foreign-key failures into
    /// `ConstraintViolation` so the console reports them as operator errors
    /// rather than internal ones.
    pub fn from_db(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(msg)) => {
                ServiceError::ConstraintViolation(msg)
            }
            Some(SqlErr::ForeignKeyConstraintViolation(msg)) => {
                ServiceError::ConstraintViolation(msg)
            }
            _ => ServiceError::DatabaseError(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_db_errors_stay_database_errors() {
        let err = ServiceError::from_db(DbErr::Custom("boom".into()));
        assert!(matches!(err, ServiceError::DatabaseError(_)));
    }

    #[test]
    fn not_found_formats_with_context() {
        let err = ServiceError::NotFound("customer 7".into());
        assert_eq!(err.to_string(), "Not found: customer 7");
    }
}
