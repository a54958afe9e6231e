//! Manifest and tool descriptor types
use serde::{Deserialize, Serialize};

/// Protocol revision served in the manifest
pub const PROTOCOL_VERSION: &str = "2025-06-18";

/// MCP manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    /// Protocol version
    pub version: String,
    /// Server name
    pub name: String,
    /// Server description
    pub description: String,
    /// Capability flags
    pub capabilities: Capabilities,
    /// Endpoint map
    pub endpoints: Endpoints,
}

/// Capability flags advertised to clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Capabilities {
    pub registry: bool,
    pub schema: bool,
    pub autocomplete: bool,
}

/// Endpoints advertised to clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Endpoints {
    pub registry: String,
    pub tools: String,
}

/// One tool: a named, described HTTP operation on the main server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tool {
    /// Tool name
    pub name: String,
    /// Tool description
    pub description: String,
    /// HTTP method of the forwarded operation
    pub method: String,
    /// Path on the MediCore HTTP server
    pub path: String,
    /// Input schema (JSON Schema)
    pub input_schema: serde_json::Value,
}

/// Tool catalog response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCatalog {
    pub name: String,
    pub version: String,
    pub tools: Vec<Tool>,
}

/// Build the manifest served at `/mcp/manifest`
pub fn manifest() -> Manifest {
    Manifest {
        version: PROTOCOL_VERSION.to_string(),
        name: "MediCore MCP Server".to_string(),
        description: "Serves MediCore entity schemas and tools for AI tool-calling clients"
            .to_string(),
        capabilities: Capabilities {
            registry: true,
            schema: true,
            autocomplete: true,
        },
        endpoints: Endpoints {
            registry: "/mcp/registry".to_string(),
            tools: "/mcp/tools".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manifest_carries_protocol_version() {
        let manifest = manifest();
        assert_eq!(manifest.version, PROTOCOL_VERSION);
        assert!(manifest.capabilities.registry);
        assert_eq!(manifest.endpoints.registry, "/mcp/registry");
    }

    #[test]
    fn manifest_serializes_with_expected_keys() {
        let value = serde_json::to_value(manifest()).unwrap();
        assert!(value.get("version").is_some());
        assert!(value.get("capabilities").is_some());
        assert!(value["endpoints"].get("tools").is_some());
    }
}
