//! Axum wiring for the registry facade

use crate::error::McpError;
use crate::protocol::{manifest, Manifest, ToolCatalog};
use crate::registry::{RegistryListing, SchemaRegistry};
use crate::tools::catalog;
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Registry server state
#[derive(Clone)]
pub struct McpRegistryServer {
    pub registry: SchemaRegistry,
}

impl McpRegistryServer {
    pub fn new(registry_path: impl Into<std::path::PathBuf>) -> Self {
        Self {
            registry: SchemaRegistry::new(registry_path),
        }
    }
}

/// Manifest handler (clients POST here per the protocol)
pub async fn serve_manifest() -> Json<Manifest> {
    Json(manifest())
}

/// Tool catalog handler
pub async fn serve_tools() -> Json<ToolCatalog> {
    Json(catalog())
}

/// Registry listing handler
pub async fn serve_registry(
    State(server): State<McpRegistryServer>,
) -> Result<Json<RegistryListing>, McpError> {
    let listing = server.registry.listing()?;
    Ok(Json(listing))
}

/// Liveness handler
pub async fn root() -> &'static str {
    "MediCore MCP Registry Server is running"
}

/// Create the registry application router
pub fn create_app(server: McpRegistryServer) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/mcp/manifest", post(serve_manifest))
        .route("/mcp/tools", get(serve_tools))
        .route("/mcp/registry", get(serve_registry))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(server)
}
