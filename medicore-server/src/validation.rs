//! Request validation utilities for consistent validation across handlers
//!
//! This module provides a `RequestValidation` trait and helper macros to
//! centralize validation logic and ensure consistent error messages.

use crate::error::ApiError;

/// Trait for validating request payloads
///
/// Implement this trait for all create/update request types. Validation
/// runs at the top of each handler, before any write is attempted.
pub trait RequestValidation {
    /// Validates the request and returns an error if validation fails
    fn validate(&self) -> Result<(), ApiError>;
}

/// Macro for validating fields with custom predicates
///
/// # Usage
///
/// ```ignore
/// validate_field!(self.status, !self.status.trim().is_empty(), "status is required");
/// ```
#[macro_export]
macro_rules! validate_field {
    ($field:expr, $predicate:expr, $message:expr) => {
        if !$predicate {
            return Err($crate::error::ApiError::validation($message));
        }
    };
}

/// Macro for validating required fields (non-empty strings)
#[macro_export]
macro_rules! validate_required {
    ($field:expr, $message:expr) => {
        $crate::validate_field!($field, !$field.trim().is_empty(), $message);
    };
}

/// Macro for validating UUID fields (non-nil)
#[macro_export]
macro_rules! validate_uuid {
    ($field:expr, $message:expr) => {
        $crate::validate_field!($field, !$field.is_nil(), $message);
    };
}

/// Macro for validating string length
#[macro_export]
macro_rules! validate_length {
    ($field:expr, $min:expr, $max:expr, $message:expr) => {
        let len = $field.len();
        $crate::validate_field!($field, len >= $min && len <= $max, $message);
    };
}

/// Macro for validating numeric ranges
#[macro_export]
macro_rules! validate_range {
    ($field:expr, $min:expr, $max:expr, $message:expr) => {
        $crate::validate_field!($field, $field >= $min && $field <= $max, $message);
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use uuid::Uuid;

    struct TestRequest {
        reason: String,
        patient_id: Uuid,
        duration_mins: i32,
    }

    impl RequestValidation for TestRequest {
        fn validate(&self) -> Result<(), ApiError> {
            validate_required!(self.reason, "reason is required");
            validate_length!(self.reason, 2, 200, "reason must be between 2 and 200 characters");
            validate_uuid!(self.patient_id, "patient_id is required");
            validate_range!(self.duration_mins, 1, 1440, "duration_mins must be between 1 and 1440");
            Ok(())
        }
    }

    fn valid_request() -> TestRequest {
        TestRequest {
            reason: "Routine checkup".to_string(),
            patient_id: Uuid::new_v4(),
            duration_mins: 30,
        }
    }

    #[test]
    fn test_validation_success() {
        assert!(valid_request().validate().is_ok());
    }

    #[test]
    fn test_validation_empty_reason() {
        let mut request = valid_request();
        request.reason = "  ".to_string();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_validation_nil_uuid() {
        let mut request = valid_request();
        request.patient_id = Uuid::nil();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_validation_duration_out_of_range() {
        let mut request = valid_request();
        request.duration_mins = 0;
        let err = request.validate().unwrap_err();
        assert!(err.to_string().contains("duration_mins"));
    }
}
