//! Database layer for MediCore Engine
//!
//! Provides the owned Postgres connection pool and the database error
//! taxonomy shared by the HTTP server's repositories. The pool is created
//! once at startup and handed to each repository explicitly, which keeps
//! lifecycle and test substitution under the caller's control.
//!
//! # Example
//!
//! ```no_run
//! use database_layer::DatabasePool;
//!
//! # async fn run() -> Result<(), database_layer::DatabaseError> {
//! let db = DatabasePool::new("postgresql://localhost:5432/medicore").await?;
//! assert!(db.is_healthy().await);
//! # Ok(())
//! # }
//! ```

pub mod connection;
pub mod error;

pub use connection::*;
pub use error::*;
