use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// Backend the tools talk to when the caller does not name one
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8001";

/// Timing and retry knobs of the tools
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollSettings {
    /// HTTP timeout of a single status check
    pub status_request_timeout: Duration,
    /// HTTP timeout of a single sync trigger
    pub sync_request_timeout: Duration,
    /// How long `check_connection` keeps polling
    pub poll_timeout: Duration,
    /// Pause between two status checks
    pub poll_interval: Duration,
    /// Attempts at triggering a sync
    pub max_sync_attempts: u32,
    /// Pause between two sync attempts
    pub sync_retry_delay: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            status_request_timeout: Duration::from_secs(10),
            sync_request_timeout: Duration::from_secs(60),
            poll_timeout: Duration::from_secs(300),
            poll_interval: Duration::from_secs(5),
            max_sync_attempts: 3,
            sync_retry_delay: Duration::from_secs(2),
        }
    }
}

/// Outcome of a tool call, tagged by `status`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ToolResult {
    Success {
        #[serde(skip_serializing_if = "Option::is_none")]
        connection_found: Option<bool>,
        data: Value,
    },
    Pending {
        connection_found: bool,
        message: String,
    },
    Error {
        #[serde(skip_serializing_if = "Option::is_none")]
        connection_found: Option<bool>,
        error: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        message: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        stacktrace: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        status_code: Option<u16>,
    },
    Timeout {
        connection_found: bool,
        message: String,
    },
}

impl ToolResult {
    /// A status check that found the connection
    pub fn connection_found(data: Value) -> Self {
        ToolResult::Success {
            connection_found: Some(true),
            data,
        }
    }

    /// A sync trigger that succeeded
    pub fn synced(data: Value) -> Self {
        ToolResult::Success {
            connection_found: None,
            data,
        }
    }

    pub fn pending(short_name: &str) -> Self {
        ToolResult::Pending {
            connection_found: false,
            message: format!("No connection found for source: {short_name}"),
        }
    }

    pub fn timeout(short_name: &str) -> Self {
        ToolResult::Timeout {
            connection_found: false,
            message: format!("Timeout waiting for connection: {short_name}"),
        }
    }

    pub fn error(error: impl Into<String>) -> Self {
        ToolResult::Error {
            connection_found: None,
            error: error.into(),
            message: None,
            stacktrace: None,
            status_code: None,
        }
    }

    /// An error raised while checking a connection
    pub fn check_error(error: impl Into<String>, status_code: Option<u16>) -> Self {
        ToolResult::Error {
            connection_found: Some(false),
            error: error.into(),
            message: None,
            stacktrace: None,
            status_code,
        }
    }

    pub fn with_status_code(mut self, code: u16) -> Self {
        if let ToolResult::Error { status_code, .. } = &mut self {
            *status_code = Some(code);
        }
        self
    }

    pub fn with_stacktrace(mut self, trace: Option<String>) -> Self {
        if let ToolResult::Error { stacktrace, .. } = &mut self {
            *stacktrace = trace;
        }
        self
    }

    pub fn with_message(mut self, text: impl Into<String>) -> Self {
        if let ToolResult::Error { message, .. } = &mut self {
            *message = Some(text.into());
        }
        self
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ToolResult::Success { .. })
    }

    /// Label matching the serialized `status` tag
    pub fn status(&self) -> &'static str {
        match self {
            ToolResult::Success { .. } => "success",
            ToolResult::Pending { .. } => "pending",
            ToolResult::Error { .. } => "error",
            ToolResult::Timeout { .. } => "timeout",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_pending_serializes_like_the_wire_format() {
        let value = serde_json::to_value(ToolResult::pending("slack")).unwrap();
        assert_eq!(
            value,
            json!({
                "status": "pending",
                "connection_found": false,
                "message": "No connection found for source: slack"
            })
        );
    }

    #[test]
    fn test_error_omits_unset_fields() {
        let value = serde_json::to_value(ToolResult::error("boom")).unwrap();
        assert_eq!(value, json!({ "status": "error", "error": "boom" }));
    }

    #[test]
    fn test_builders_only_touch_errors() {
        let result = ToolResult::pending("x").with_status_code(500);
        assert_eq!(result, ToolResult::pending("x"));

        let result = ToolResult::error("boom")
            .with_status_code(500)
            .with_stacktrace(Some("trace".to_string()));
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({ "status": "error", "error": "boom", "stacktrace": "trace", "status_code": 500 })
        );
    }

    #[test]
    fn test_status_label_matches_tag() {
        for result in [
            ToolResult::synced(json!({})),
            ToolResult::pending("a"),
            ToolResult::error("b"),
            ToolResult::timeout("c"),
        ] {
            let value = serde_json::to_value(&result).unwrap();
            assert_eq!(value["status"], result.status());
        }
    }

    #[test]
    fn test_default_settings() {
        let settings = PollSettings::default();
        assert_eq!(settings.poll_timeout, Duration::from_secs(300));
        assert_eq!(settings.poll_interval, Duration::from_secs(5));
        assert_eq!(settings.max_sync_attempts, 3);
    }
}
