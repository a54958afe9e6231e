use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Errors surfaced by the registry facade
#[derive(Error, Debug)]
pub enum McpError {
    #[error("Registry error: {0}")]
    Registry(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

pub type McpResult<T> = Result<T, McpError>;

impl IntoResponse for McpError {
    fn into_response(self) -> Response {
        error!(error = %self, "MCP registry error");
        let body = json!({
            "success": false,
            "error": self.to_string(),
        });
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}
