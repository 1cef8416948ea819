use thiserror::Error;

use crate::domain::types::TypeConstraintError;

/// Errors surfaced by repository implementations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] diesel::result::Error),
    #[error("connection pool error: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),
    /// A stored value no longer satisfies a domain constraint.
    #[error("constraint violation: {0}")]
    Constraint(#[from] TypeConstraintError),
}

impl RepositoryError {
    /// Whether the error is a unique-constraint violation, e.g. a taken
    /// username or slug.
    pub fn is_unique_violation(&self) -> bool {
        matches!(
            self,
            Self::Database(diesel::result::Error::DatabaseError(
                diesel::result::DatabaseErrorKind::UniqueViolation,
                _,
            ))
        )
    }
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;
