//! Common error handling utilities for MediCore Engine
//!
//! This module provides the standardized error type and error codes used
//! across all MediCore Engine crates at process boundaries. Handlers use
//! their own `ApiError` for HTTP translation; `MediCoreError` covers the
//! binaries and cross-crate glue.
//!
//! # Error Categories
//!
//! - **ValidationError**: Input validation and data format errors
//! - **DatabaseError**: Database connection and query errors
//! - **NetworkError**: HTTP and network communication errors
//! - **ServerError**: Server startup and runtime errors
//! - **ConfigError**: Configuration and environment errors

pub mod codes;
pub mod types;

pub use codes::*;
pub use types::*;
