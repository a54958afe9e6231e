use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Database error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

pub type DatabaseResult<T> = Result<T, DatabaseError>;

impl DatabaseError {
    /// True when the underlying failure is a unique or foreign key violation.
    pub fn is_constraint_violation(&self) -> bool {
        match self {
            DatabaseError::ConstraintViolation(_) => true,
            DatabaseError::SqlxError(sqlx::Error::Database(db)) => {
                db.is_unique_violation() || db.is_foreign_key_violation()
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_failure_formats_with_detail() {
        let err = DatabaseError::ConnectionFailed("refused".to_string());
        assert_eq!(err.to_string(), "Connection failed: refused");
    }

    #[test]
    fn row_not_found_is_not_a_constraint_violation() {
        let err = DatabaseError::SqlxError(sqlx::Error::RowNotFound);
        assert!(!err.is_constraint_violation());
    }
}
