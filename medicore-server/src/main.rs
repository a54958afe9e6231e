use clap::Parser;
use std::env;
use tracing::{info, Level};
use tracing_subscriber::{
    fmt::{self, time::ChronoUtc},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use error_common::{MediCoreError, Result};
use medicore_server::{create_app, MediCoreServer};

/// MediCore Engine HTTP Server
#[derive(Parser, Debug)]
#[command(name = "medicore-server")]
#[command(about = "Hospital management platform HTTP API server")]
struct Args {
    /// Server bind address
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Server port
    #[arg(short, long, default_value = "8080")]
    port: u16,

    /// Postgres connection string
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    init_tracing(args.verbose)?;

    info!("🏥 Starting MediCore Engine HTTP Server");
    info!("📋 Version: {}", env!("CARGO_PKG_VERSION"));
    info!("🌐 Bind address: {}:{}", args.host, args.port);

    // Initialize the MediCore server (owns the database pool)
    let server = MediCoreServer::new(&args.database_url)
        .await
        .map_err(|e| MediCoreError::DatabaseError(format!("Database init failed: {}", e)))?;

    // Create the router with all routes
    let app = create_app(server);

    // Bind and serve HTTP server
    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| MediCoreError::NetworkError(format!("Failed to bind to {}: {}", addr, e)))?;

    info!("🚀 MediCore Engine server running on http://{}", addr);
    info!("📋 Health check available at: http://{}/health", addr);
    info!("📋 API v1 available at: http://{}/api/v1", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| MediCoreError::ServerError(format!("HTTP server error: {}", e)))?;

    Ok(())
}

fn init_tracing(verbose: bool) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };

    let is_development =
        env::var("MEDICORE_ENV").unwrap_or_else(|_| "development".to_string()) == "development";

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "medicore_server={},tower_http=info,sqlx=warn,hyper=info",
            level
        ))
    });

    if is_development {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_level(true),
            )
            .init();
    } else {
        // Structured JSON logging for production
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_ansi(false)
                    .json(),
            )
            .init();
    }

    Ok(())
}
