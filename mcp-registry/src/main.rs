use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use error_common::{MediCoreError, Result};
use mcp_registry::{create_app, McpRegistryServer};

/// MediCore MCP Registry Server
#[derive(Parser, Debug)]
#[command(name = "mcp-registry")]
#[command(about = "Serves MediCore entity schemas and tools over the MCP discovery protocol")]
struct Args {
    /// Server bind address
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Server port
    #[arg(short, long, default_value = "3001", env = "MCP_PORT")]
    port: u16,

    /// Directory of JSON schema files to serve
    #[arg(long, default_value = "./mcp_registry", env = "MCP_REGISTRY_PATH")]
    registry_path: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("mcp_registry=info,tower_http=info")),
        )
        .init();

    let server = McpRegistryServer::new(&args.registry_path);
    info!("📂 Registry path: {}", server.registry.path().display());

    let app = create_app(server);

    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| MediCoreError::NetworkError(format!("Failed to bind to {}: {}", addr, e)))?;

    info!("✅ MCP Registry Server running at: http://{}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| MediCoreError::ServerError(format!("HTTP server error: {}", e)))?;

    Ok(())
}
