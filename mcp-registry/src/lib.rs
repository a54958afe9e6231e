//! MCP Tool Registry for MediCore Engine
//!
//! Exposes the MediCore CRUD surface under a manifest/tool-discovery
//! protocol for AI tool-calling clients. The facade is a thin adapter:
//! no state of its own beyond a directory of JSON schema files that are
//! served verbatim, and a static catalog describing the HTTP endpoints
//! of the main server.
//!
//! # Endpoints
//!
//! - `POST /mcp/manifest` — protocol manifest (version, capabilities)
//! - `GET /mcp/tools` — tool catalog: name, description, method, path
//! - `GET /mcp/registry` — JSON schema files from the registry directory
//! - `GET /` — liveness text

pub mod error;
pub mod protocol;
pub mod registry;
pub mod server;
pub mod tools;

pub use error::{McpError, McpResult};
pub use protocol::*;
pub use registry::*;
pub use server::*;
pub use tools::*;
