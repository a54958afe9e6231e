use anyhow::Result;
use database_layer::DatabasePool;

/// Main MediCore server state
///
/// Cloned into every handler by axum; the database pool is the only shared
/// resource and is injected here once at startup rather than constructed
/// per module.
#[derive(Clone)]
pub struct MediCoreServer {
    /// Server configuration
    pub config: ServerConfig,
    /// Database connection pool
    pub db: DatabasePool,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server name
    pub name: String,
    /// Maximum request body size in bytes
    pub max_body_bytes: usize,
    /// Request timeout in seconds
    pub request_timeout: u64,
}

impl MediCoreServer {
    /// Create a new MediCore server instance backed by the given pool
    pub async fn new(database_url: &str) -> Result<Self> {
        let db = DatabasePool::new(database_url).await?;
        Ok(Self {
            config: ServerConfig::default(),
            db,
        })
    }

    /// Build a server around an existing pool (tests, embedding)
    pub fn with_pool(db: DatabasePool) -> Self {
        Self {
            config: ServerConfig::default(),
            db,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: "MediCore Engine".to_string(),
            max_body_bytes: 1024 * 1024,
            request_timeout: 30,
        }
    }
}
