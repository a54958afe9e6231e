use thiserror::Error;

/// Simplified error enum for common use cases
#[derive(Error, Debug)]
pub enum MediCoreError {
    /// Network communication errors
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Server configuration errors
    #[error("Server error: {0}")]
    ServerError(String),

    /// Database operation errors
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Internal system errors
    #[error("Internal error: {0}")]
    InternalError(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Wrapped external errors
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for MediCore operations
pub type Result<T> = std::result::Result<T, MediCoreError>;

/// Async logging function for errors
pub async fn log_error(context: &str, error: &MediCoreError) {
    tracing::error!(
        context = context,
        error = %error,
        "MediCore error occurred"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_category_prefix() {
        let err = MediCoreError::DatabaseError("pool exhausted".to_string());
        assert_eq!(err.to_string(), "Database error: pool exhausted");
    }

    #[test]
    fn anyhow_errors_convert_transparently() {
        let err: MediCoreError = anyhow::anyhow!("boom").into();
        assert_eq!(err.to_string(), "boom");
    }
}
