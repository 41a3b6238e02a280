use axum::Json;
use serde_json::{json, Value};
use std::sync::OnceLock;

/// Static JSON response for the index endpoint
static INDEX_JSON: OnceLock<Value> = OnceLock::new();

fn short_name_param(what: &str) -> Value {
    json!({
        "short_name": {
            "type": "string",
            "required": true,
            "description": format!("Short name of the {what}")
        }
    })
}

fn connection_id_param() -> Value {
    json!({
        "connection_id": {
            "type": "string",
            "required": true,
            "description": "Connection identifier"
        }
    })
}

/// Handler for the index endpoint that provides API documentation
///
/// # Endpoint: GET /
pub fn index() -> Json<Value> {
    let value = INDEX_JSON.get_or_init(|| {
        json!({
            "endpoints": [
                {
                    "path": "/",
                    "method": "GET",
                    "description": "API endpoint documentation",
                    "params": {}
                },
                {
                    "path": "/health",
                    "method": "GET",
                    "description": "Liveness probe",
                    "params": {}
                },
                {
                    "path": "/api/v1/destinations/list",
                    "method": "GET",
                    "description": "List all available destinations",
                    "params": {}
                },
                {
                    "path": "/api/v1/destinations/detail/:short_name",
                    "method": "GET",
                    "description": "Get a destination and the fields of its auth config",
                    "params": short_name_param("destination")
                },
                {
                    "path": "/api/v1/sources/list",
                    "method": "GET",
                    "description": "List all available sources",
                    "params": {}
                },
                {
                    "path": "/api/v1/sources/detail/:short_name",
                    "method": "GET",
                    "description": "Get a source and the fields of its auth config",
                    "params": short_name_param("source")
                },
                {
                    "path": "/api/v1/connections/list/:integration_type",
                    "method": "GET",
                    "description": "List connections of one integration type",
                    "params": {
                        "integration_type": {
                            "type": "string",
                            "required": true,
                            "description": "One of source, destination, embedding_model"
                        },
                        "active": {
                            "type": "boolean",
                            "required": false,
                            "description": "Only return active connections, with credentials"
                        }
                    }
                },
                {
                    "path": "/api/v1/connections/detail/:connection_id",
                    "method": "GET",
                    "description": "Get one connection",
                    "params": connection_id_param()
                },
                {
                    "path": "/api/v1/connections/by-short-name/:short_name",
                    "method": "GET",
                    "description": "Get all connections to a source or destination, 404 when there are none",
                    "params": short_name_param("source or destination")
                },
                {
                    "path": "/api/v1/connections/create",
                    "method": "POST",
                    "description": "Create a connection",
                    "params": {
                        "name": { "type": "string", "required": true, "description": "Display name" },
                        "integration_type": { "type": "string", "required": true, "description": "One of source, destination, embedding_model" },
                        "short_name": { "type": "string", "required": true, "description": "Short name of the integration" },
                        "integration_credential_id": { "type": "string", "required": false, "description": "Credential to authenticate with" }
                    }
                },
                {
                    "path": "/api/v1/connections/:connection_id/status",
                    "method": "PUT",
                    "description": "Change a connection's status",
                    "params": {
                        "connection_id": { "type": "string", "required": true, "description": "Connection identifier" },
                        "status": { "type": "string", "required": true, "description": "One of active, inactive, error" }
                    }
                },
                {
                    "path": "/api/v1/connections/delete/:connection_id",
                    "method": "DELETE",
                    "description": "Delete a connection",
                    "params": connection_id_param()
                },
                {
                    "path": "/api/v1/cursor-dev/test-sync/:short_name",
                    "method": "POST",
                    "description": "Local development only. Queue a sync for the connection to a source",
                    "params": short_name_param("source")
                },
            ]
        })
    });

    Json(value.clone())
}
