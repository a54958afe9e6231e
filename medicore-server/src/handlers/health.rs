use crate::server::MediCoreServer;
use axum::{extract::State, response::Json};
use serde::Serialize;
use std::collections::HashMap;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub version: String,
    pub checks: HashMap<String, String>,
}

/// Version information response
#[derive(Debug, Serialize)]
pub struct VersionResponse {
    pub name: String,
    pub version: String,
}

/// Health check handler
///
/// Reports `degraded` rather than failing the request when the database
/// probe fails, so orchestration can tell "up but unhealthy" from "down".
pub async fn health_check(State(server): State<MediCoreServer>) -> Json<HealthResponse> {
    let mut checks = HashMap::new();

    let db_healthy = server.db.is_healthy().await;
    checks.insert(
        "database".to_string(),
        if db_healthy { "ok" } else { "unreachable" }.to_string(),
    );

    let status = if db_healthy { "healthy" } else { "degraded" };

    Json(HealthResponse {
        status: status.to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks,
    })
}

/// Version info handler
pub async fn version_info(State(server): State<MediCoreServer>) -> Json<VersionResponse> {
    Json(VersionResponse {
        name: server.config.name.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
