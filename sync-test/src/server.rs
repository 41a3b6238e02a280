//! JSON-RPC 2.0 surface exposing the tools over HTTP.
//!
//! Implements the subset of the Model Context Protocol a tool server needs:
//! `initialize`, `ping`, `tools/list` and `tools/call`.

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{info, warn};

use crate::{
    errors::SyncTestError,
    models::ToolResult,
    tools::SyncTester,
    validation::{validate_http_url, validate_short_name},
};

pub const PROTOCOL_VERSION: &str = "2024-11-05";
pub const SERVER_NAME: &str = "Sync Test MCP Server";

const PARSE_ERROR: i64 = -32700;
const INVALID_REQUEST: i64 = -32600;
const METHOD_NOT_FOUND: i64 = -32601;
const INVALID_PARAMS: i64 = -32602;

#[derive(Debug, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    /// `None` only when the member is absent (a notification). An explicit
    /// `"id": null` is `Some(Value::Null)` and still gets a response.
    #[serde(default, deserialize_with = "present_id")]
    pub id: Option<Value>,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    pub id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

fn present_id<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl JsonRpcResponse {
    fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    fn failure(id: Value, code: i64, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
            }),
        }
    }
}

/// Arguments shared by both tools
#[derive(Debug, PartialEq)]
struct ToolArguments {
    short_name: String,
    backend_url: Option<String>,
}

impl ToolArguments {
    fn parse(arguments: &Value) -> Result<Self, SyncTestError> {
        let short_name = arguments
            .get("short_name")
            .and_then(Value::as_str)
            .ok_or(SyncTestError::MissingArgument("short_name"))?;
        validate_short_name(short_name)?;

        let backend_url = match arguments.get("backend_url") {
            None | Some(Value::Null) => None,
            Some(Value::String(url)) => {
                validate_http_url(url)?;
                Some(url.clone())
            }
            Some(_) => {
                return Err(SyncTestError::InvalidArgument {
                    name: "backend_url",
                    reason: "must be a string".to_string(),
                })
            }
        };

        Ok(Self {
            short_name: short_name.to_string(),
            backend_url,
        })
    }
}

fn tool_definitions() -> Value {
    let input_schema = json!({
        "type": "object",
        "properties": {
            "short_name": {
                "type": "string",
                "description": "The short name of the source"
            },
            "backend_url": {
                "type": "string",
                "description": "Optional backend URL to override the default"
            }
        },
        "required": ["short_name"]
    });

    json!({
        "tools": [
            {
                "name": "check_connection",
                "title": "Check Connection",
                "description": "Check if a source connection is established. This will poll the backend until a connection is found or timeout is reached.",
                "inputSchema": input_schema
            },
            {
                "name": "run_sync",
                "title": "Run Sync",
                "description": "Run a sync for a source integration. This will first check if a connection exists, then run the sync.",
                "inputSchema": input_schema
            }
        ]
    })
}

/// Wraps a tool outcome in an MCP tool-call result
fn tool_call_result(result: &ToolResult) -> Value {
    let structured = serde_json::to_value(result)
        .unwrap_or_else(|err| json!({ "error": err.to_string() }));
    json!({
        "content": [{ "type": "text", "text": structured.to_string() }],
        "structuredContent": structured,
        "isError": matches!(result, ToolResult::Error { .. } | ToolResult::Timeout { .. }),
    })
}

async fn call_tool(tester: &SyncTester, params: &Value) -> Result<Value, SyncTestError> {
    let name = params
        .get("name")
        .and_then(Value::as_str)
        .ok_or(SyncTestError::MissingArgument("name"))?;
    let empty = json!({});
    let arguments = params.get("arguments").unwrap_or(&empty);

    let result = match name {
        "check_connection" => {
            let args = ToolArguments::parse(arguments)?;
            tester
                .check_connection(&args.short_name, args.backend_url.as_deref())
                .await
        }
        "run_sync" => {
            let args = ToolArguments::parse(arguments)?;
            tester
                .run_sync(&args.short_name, args.backend_url.as_deref())
                .await
        }
        other => return Err(SyncTestError::UnknownTool(other.to_string())),
    };

    Ok(tool_call_result(&result))
}

/// Dispatches one request. Notifications yield `None`.
pub async fn handle_request(
    tester: &SyncTester,
    request: JsonRpcRequest,
) -> Option<JsonRpcResponse> {
    let Some(id) = request.id else {
        info!("Received notification: {}", request.method);
        return None;
    };

    if request.jsonrpc != "2.0" {
        return Some(JsonRpcResponse::failure(
            id,
            INVALID_REQUEST,
            "jsonrpc must be \"2.0\"",
        ));
    }

    let response = match request.method.as_str() {
        "initialize" => JsonRpcResponse::success(
            id,
            json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": { "tools": {} },
                "serverInfo": {
                    "name": SERVER_NAME,
                    "version": env!("CARGO_PKG_VERSION")
                },
                "instructions": "This server provides tools for testing source integrations."
            }),
        ),
        "ping" => JsonRpcResponse::success(id, json!({})),
        "tools/list" => JsonRpcResponse::success(id, tool_definitions()),
        "tools/call" => match call_tool(tester, &request.params).await {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(err) => {
                warn!("Rejected tool call: {}", err);
                JsonRpcResponse::failure(id, INVALID_PARAMS, err.to_string())
            }
        },
        other => {
            JsonRpcResponse::failure(id, METHOD_NOT_FOUND, format!("Method not found: {other}"))
        }
    };

    Some(response)
}

async fn rpc_endpoint(State(tester): State<Arc<SyncTester>>, body: Bytes) -> Response {
    let request = match serde_json::from_slice::<Value>(&body) {
        Ok(value) => value,
        Err(err) => {
            return Json(JsonRpcResponse::failure(
                Value::Null,
                PARSE_ERROR,
                format!("Parse error: {err}"),
            ))
            .into_response()
        }
    };

    let request = match serde_json::from_value::<JsonRpcRequest>(request) {
        Ok(request) => request,
        Err(err) => {
            return Json(JsonRpcResponse::failure(
                Value::Null,
                INVALID_REQUEST,
                format!("Invalid request: {err}"),
            ))
            .into_response()
        }
    };

    match handle_request(&tester, request).await {
        Some(response) => Json(response).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}

pub fn initialize_router(tester: SyncTester) -> Router {
    let backend = tester.default_backend().to_string();

    Router::new()
        .route("/mcp", post(rpc_endpoint))
        .route(
            "/",
            get(move || async move {
                Json(json!({
                    "name": SERVER_NAME,
                    "endpoint": "/mcp",
                    "backend_url": backend,
                    "tools": ["check_connection", "run_sync"]
                }))
            }),
        )
        .route("/health", get(|| async { StatusCode::OK }))
        .with_state(Arc::new(tester))
}
