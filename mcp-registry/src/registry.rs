//! Schema registry: a directory of JSON files served verbatim

use crate::error::{McpError, McpResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// One schema file from the registry directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryFile {
    /// File stem, e.g. `appointment` for `appointment.json`
    pub name: String,
    /// Parsed file content, served unchanged
    pub content: serde_json::Value,
}

/// Registry listing response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryListing {
    pub success: bool,
    pub count: usize,
    pub registry_files: Vec<RegistryFile>,
}

/// Reader over the registry directory
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    path: PathBuf,
}

impl SchemaRegistry {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load every `*.json` file in the registry directory
    ///
    /// Files that fail to parse are skipped with a warning rather than
    /// failing the whole listing; a missing directory is an error.
    pub fn load(&self) -> McpResult<Vec<RegistryFile>> {
        let entries = fs::read_dir(&self.path).map_err(|e| {
            McpError::Registry(format!(
                "cannot read registry directory {}: {}",
                self.path.display(),
                e
            ))
        })?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            let Some(name) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };

            let raw = fs::read_to_string(&path)?;
            match serde_json::from_str(&raw) {
                Ok(content) => files.push(RegistryFile {
                    name: name.to_string(),
                    content,
                }),
                Err(e) => {
                    warn!(file = %path.display(), error = %e, "Skipping unparseable registry file");
                }
            }
        }

        files.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(files)
    }

    /// Build the listing response served at `/mcp/registry`
    pub fn listing(&self) -> McpResult<RegistryListing> {
        let registry_files = self.load()?;
        Ok(RegistryListing {
            success: true,
            count: registry_files.len(),
            registry_files,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_registry_dir() -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.subsec_nanos())
            .unwrap_or(0);
        let dir = std::env::temp_dir().join(format!(
            "mcp-registry-test-{}-{}",
            std::process::id(),
            nanos
        ));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn load_reads_json_files_and_skips_others() {
        let dir = temp_registry_dir();
        fs::write(dir.join("appointment.json"), r#"{"model": "Appointment"}"#).unwrap();
        fs::write(dir.join("notes.txt"), "not json").unwrap();

        let registry = SchemaRegistry::new(&dir);
        let files = registry.load().unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].name, "appointment");
        assert_eq!(files[0].content["model"], "Appointment");

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn load_skips_unparseable_json() {
        let dir = temp_registry_dir();
        fs::write(dir.join("broken.json"), "{ nope").unwrap();
        fs::write(dir.join("ok.json"), "{}").unwrap();

        let registry = SchemaRegistry::new(&dir);
        let listing = registry.listing().unwrap();
        assert_eq!(listing.count, 1);
        assert!(listing.success);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn missing_directory_is_an_error() {
        let registry = SchemaRegistry::new("/nonexistent/mcp_registry");
        assert!(registry.load().is_err());
    }
}
