// Error codes implementation
// This module contains standardized error codes for the MediCore Engine

pub mod validation {
    pub const INVALID_INPUT: &str = "VALIDATION_1001";
    pub const MISSING_REQUIRED_FIELD: &str = "VALIDATION_1002";
    pub const INVALID_FORMAT: &str = "VALIDATION_1003";
}

pub mod database {
    pub const CONNECTION_FAILED: &str = "DB_4001";
    pub const QUERY_FAILED: &str = "DB_4002";
    pub const CONSTRAINT_VIOLATION: &str = "DB_4003";
}

pub mod resource {
    pub const NOT_FOUND: &str = "RESOURCE_5001";
}

pub mod system {
    pub const INTERNAL_ERROR: &str = "SYSTEM_9001";
}
