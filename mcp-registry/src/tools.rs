//! Static tool catalog over the MediCore HTTP surface
//!
//! Each tool is a contract translation of one HTTP endpoint on the main
//! server; invocation is forwarded there, no state lives here.

use crate::protocol::{Tool, ToolCatalog};
use serde_json::json;

/// Build the catalog served at `/mcp/tools`
pub fn catalog() -> ToolCatalog {
    ToolCatalog {
        name: "MediCore MCP Server".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        tools: tools(),
    }
}

fn tools() -> Vec<Tool> {
    vec![
        Tool {
            name: "create_appointment".to_string(),
            description: "Book an appointment for a patient in a department".to_string(),
            method: "POST".to_string(),
            path: "/api/v1/appointments".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "patient_id": { "type": "string", "description": "Patient UUID" },
                    "doctor_id": { "type": "string", "description": "Doctor UUID" },
                    "department": { "type": "string", "description": "Department key, e.g. CARDIOLOGY" },
                    "scheduled_at": { "type": "string", "description": "RFC 3339 datetime" },
                    "duration_mins": { "type": "integer" },
                    "reason": { "type": "string" }
                },
                "required": ["patient_id", "department", "scheduled_at"]
            }),
        },
        Tool {
            name: "list_appointments".to_string(),
            description: "List appointments, excluding cancelled-and-removed ones".to_string(),
            method: "GET".to_string(),
            path: "/api/v1/appointments".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "patient_id": { "type": "string" },
                    "status": { "type": "string" },
                    "page": { "type": "integer" }
                }
            }),
        },
        Tool {
            name: "get_appointment".to_string(),
            description: "Fetch one appointment with its related records".to_string(),
            method: "GET".to_string(),
            path: "/api/v1/appointments/{id}".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "id": { "type": "string", "description": "Appointment UUID" }
                },
                "required": ["id"]
            }),
        },
        Tool {
            name: "update_appointment".to_string(),
            description: "Reschedule or edit an appointment".to_string(),
            method: "PUT".to_string(),
            path: "/api/v1/appointments/{id}".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "id": { "type": "string" },
                    "department": { "type": "string" },
                    "scheduled_at": { "type": "string" },
                    "status": { "type": "string" }
                },
                "required": ["id"]
            }),
        },
        Tool {
            name: "cancel_appointment".to_string(),
            description: "Soft-delete an appointment; it stays retrievable by id".to_string(),
            method: "DELETE".to_string(),
            path: "/api/v1/appointments/{id}".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "id": { "type": "string" }
                },
                "required": ["id"]
            }),
        },
        Tool {
            name: "create_prescription".to_string(),
            description: "Create a prescription with one or more medicine items".to_string(),
            method: "POST".to_string(),
            path: "/api/v1/prescriptions".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "patient_id": { "type": "string" },
                    "doctor_id": { "type": "string" },
                    "notes": { "type": "string" },
                    "items": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "medicine_id": { "type": "string" },
                                "dosage": { "type": "string" },
                                "quantity": { "type": "integer" },
                                "duration_days": { "type": "integer" },
                                "instructions": { "type": "string" }
                            },
                            "required": ["medicine_id"]
                        },
                        "minItems": 1
                    }
                },
                "required": ["patient_id", "doctor_id", "items"]
            }),
        },
        Tool {
            name: "get_prescription".to_string(),
            description: "Fetch one prescription with items and medicines".to_string(),
            method: "GET".to_string(),
            path: "/api/v1/prescriptions/{id}".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "id": { "type": "string" }
                },
                "required": ["id"]
            }),
        },
        Tool {
            name: "delete_prescription".to_string(),
            description: "Hard-delete a prescription and all its items".to_string(),
            method: "DELETE".to_string(),
            path: "/api/v1/prescriptions/{id}".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "id": { "type": "string" }
                },
                "required": ["id"]
            }),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_is_not_empty() {
        assert!(!catalog().tools.is_empty());
    }

    #[test]
    fn every_tool_targets_the_api_surface() {
        for tool in catalog().tools {
            assert!(tool.path.starts_with("/api/v1/"), "unexpected path: {}", tool.path);
            assert!(
                ["GET", "POST", "PUT", "DELETE"].contains(&tool.method.as_str()),
                "unexpected method: {}",
                tool.method
            );
            assert!(!tool.description.is_empty());
        }
    }

    #[test]
    fn tool_names_are_unique() {
        let tools = catalog().tools;
        let mut names: Vec<&str> = tools.iter().map(|t| t.name.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), tools.len());
    }
}
