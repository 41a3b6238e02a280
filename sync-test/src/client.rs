use reqwest::{Client, StatusCode};
use serde_json::Value;
use tokio::time::sleep;

use crate::{
    errors::SyncTestError,
    models::{PollSettings, ToolResult},
};

/// HTTP client for the two backend routes the tools drive
pub struct BackendClient {
    base_url: String,
    status_http: Client,
    sync_http: Client,
    settings: PollSettings,
}

impl BackendClient {
    pub fn new(base_url: &str, settings: PollSettings) -> Result<Self, SyncTestError> {
        let status_http = Client::builder()
            .timeout(settings.status_request_timeout)
            .build()?;
        let sync_http = Client::builder()
            .timeout(settings.sync_request_timeout)
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            status_http,
            sync_http,
            settings,
        })
    }

    pub fn settings(&self) -> &PollSettings {
        &self.settings
    }

    /// Checks once whether a connection exists for `short_name`
    ///
    /// # Returns
    /// * `success` with the backend's body when it answers 2xx
    /// * `pending` on 404
    /// * `error` with `status_code` for any other status
    /// * `error` without a code when the request itself failed
    pub async fn check_connection_status(&self, short_name: &str) -> ToolResult {
        let url = format!(
            "{}/api/v1/connections/by-short-name/{}",
            self.base_url, short_name
        );

        let response = match self.status_http.get(&url).send().await {
            Ok(response) => response,
            Err(err) => return ToolResult::check_error(err.to_string(), None),
        };

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return ToolResult::pending(short_name);
        }
        if let Err(err) = response.error_for_status_ref() {
            return ToolResult::check_error(err.to_string(), Some(status.as_u16()));
        }

        match response.json::<Value>().await {
            Ok(data) => ToolResult::connection_found(data),
            Err(err) => ToolResult::check_error(err.to_string(), None),
        }
    }

    /// Triggers a sync for `short_name`, retrying transient failures
    ///
    /// 404 and 500 end the attempt loop at once: the former means the source
    /// does not exist, the latter carries the backend's own failure report.
    /// Any other failure is retried after `sync_retry_delay`.
    pub async fn run_sync_for_source(&self, short_name: &str) -> ToolResult {
        let url = format!(
            "{}/api/v1/cursor-dev/test-sync/{}",
            self.base_url, short_name
        );
        let attempts = self.settings.max_sync_attempts;

        for attempt in 1..=attempts {
            match self.sync_http.post(&url).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status == StatusCode::NOT_FOUND {
                        return ToolResult::error(format!("Source {short_name} not found"))
                            .with_status_code(status.as_u16());
                    }
                    if status == StatusCode::INTERNAL_SERVER_ERROR {
                        return server_failure(response, &url).await;
                    }
                    if status.is_success() {
                        // An undecodable body is retried like a failed request
                        match response.json::<Value>().await {
                            Ok(data) => return ToolResult::synced(data),
                            Err(err) => tracing::warn!(
                                "Sync attempt {}/{} for {} returned an unreadable body: {}",
                                attempt,
                                attempts,
                                short_name,
                                err
                            ),
                        }
                    } else {
                        tracing::warn!(
                            "Sync attempt {}/{} for {} returned {}",
                            attempt,
                            attempts,
                            short_name,
                            status
                        );
                    }
                }
                Err(err) => {
                    tracing::warn!(
                        "Sync attempt {}/{} for {} failed: {}",
                        attempt,
                        attempts,
                        short_name,
                        err
                    );
                }
            }

            if attempt < attempts {
                sleep(self.settings.sync_retry_delay).await;
            }
        }

        ToolResult::error("Max retries exceeded when trying to run sync")
    }
}

/// Turns a 500 from the sync trigger into an error result, keeping the
/// backend's `detail` and `stacktrace` when the body has them
async fn server_failure(response: reqwest::Response, url: &str) -> ToolResult {
    let status = response.status();
    let fallback = format!("Server error '{status}' for url '{url}'");

    let body = match response.json::<Value>().await {
        Ok(body) => body,
        Err(_) => return ToolResult::error(fallback).with_status_code(status.as_u16()),
    };

    let detail = match body.get("detail") {
        Some(Value::String(detail)) => detail.clone(),
        Some(Value::Null) | None => fallback,
        Some(other) => other.to_string(),
    };
    let stacktrace = body
        .get("stacktrace")
        .and_then(Value::as_str)
        .map(str::to_string);

    ToolResult::error(detail)
        .with_stacktrace(stacktrace)
        .with_status_code(status.as_u16())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{fast_settings, spawn_backend, unused_base_url};
    use axum::{
        http::StatusCode as AxumStatus,
        routing::{get, post},
        Json, Router,
    };
    use serde_json::json;
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    #[tokio::test]
    async fn test_status_found_returns_body() {
        let app = Router::new().route(
            "/api/v1/connections/by-short-name/:short_name",
            get(|| async { Json(json!([{ "id": "conn-1", "short_name": "slack" }])) }),
        );
        let base = spawn_backend(app).await;
        let client = BackendClient::new(&base, fast_settings()).unwrap();

        let result = client.check_connection_status("slack").await;
        assert_eq!(
            result,
            ToolResult::connection_found(json!([{ "id": "conn-1", "short_name": "slack" }]))
        );
    }

    #[tokio::test]
    async fn test_status_404_is_pending() {
        let app = Router::new().route(
            "/api/v1/connections/by-short-name/:short_name",
            get(|| async { (AxumStatus::NOT_FOUND, Json(json!({ "detail": "none" }))) }),
        );
        let base = spawn_backend(app).await;
        let client = BackendClient::new(&base, fast_settings()).unwrap();

        assert_eq!(
            client.check_connection_status("notion").await,
            ToolResult::pending("notion")
        );
    }

    #[tokio::test]
    async fn test_status_server_error_keeps_code() {
        let app = Router::new().route(
            "/api/v1/connections/by-short-name/:short_name",
            get(|| async { AxumStatus::BAD_GATEWAY }),
        );
        let base = spawn_backend(app).await;
        let client = BackendClient::new(&base, fast_settings()).unwrap();

        match client.check_connection_status("slack").await {
            ToolResult::Error {
                connection_found,
                status_code,
                ..
            } => {
                assert_eq!(connection_found, Some(false));
                assert_eq!(status_code, Some(502));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_status_unreachable_backend_has_no_code() {
        let client = BackendClient::new(&unused_base_url(), fast_settings()).unwrap();

        match client.check_connection_status("slack").await {
            ToolResult::Error { status_code, .. } => assert_eq!(status_code, None),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_sync_success() {
        let app = Router::new().route(
            "/api/v1/cursor-dev/test-sync/:short_name",
            post(|| async { Json(json!({ "sync_job_id": "job-1", "status": "pending" })) }),
        );
        let base = spawn_backend(app).await;
        let client = BackendClient::new(&base, fast_settings()).unwrap();

        assert_eq!(
            client.run_sync_for_source("slack").await,
            ToolResult::synced(json!({ "sync_job_id": "job-1", "status": "pending" }))
        );
    }

    #[tokio::test]
    async fn test_sync_404_is_not_retried() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let app = Router::new().route(
            "/api/v1/cursor-dev/test-sync/:short_name",
            post(move || {
                counter.fetch_add(1, Ordering::SeqCst);
                async { AxumStatus::NOT_FOUND }
            }),
        );
        let base = spawn_backend(app).await;
        let client = BackendClient::new(&base, fast_settings()).unwrap();

        let result = client.run_sync_for_source("ghost").await;
        assert_eq!(
            result,
            ToolResult::error("Source ghost not found").with_status_code(404)
        );
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_sync_500_surfaces_detail_and_stacktrace() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let app = Router::new().route(
            "/api/v1/cursor-dev/test-sync/:short_name",
            post(move || {
                counter.fetch_add(1, Ordering::SeqCst);
                async {
                    (
                        AxumStatus::INTERNAL_SERVER_ERROR,
                        Json(json!({ "detail": "sync blew up", "stacktrace": "line 1\nline 2" })),
                    )
                }
            }),
        );
        let base = spawn_backend(app).await;
        let client = BackendClient::new(&base, fast_settings()).unwrap();

        let result = client.run_sync_for_source("slack").await;
        assert_eq!(
            result,
            ToolResult::error("sync blew up")
                .with_stacktrace(Some("line 1\nline 2".to_string()))
                .with_status_code(500)
        );
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_sync_500_without_json_body() {
        let app = Router::new().route(
            "/api/v1/cursor-dev/test-sync/:short_name",
            post(|| async { (AxumStatus::INTERNAL_SERVER_ERROR, "plain text") }),
        );
        let base = spawn_backend(app).await;
        let client = BackendClient::new(&base, fast_settings()).unwrap();

        match client.run_sync_for_source("slack").await {
            ToolResult::Error {
                error,
                stacktrace,
                status_code,
                ..
            } => {
                assert!(error.starts_with("Server error '500 Internal Server Error'"));
                assert_eq!(stacktrace, None);
                assert_eq!(status_code, Some(500));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_sync_retries_unavailable_then_succeeds() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let app = Router::new().route(
            "/api/v1/cursor-dev/test-sync/:short_name",
            post(move || {
                let attempt = counter.fetch_add(1, Ordering::SeqCst);
                async move {
                    if attempt == 0 {
                        (AxumStatus::SERVICE_UNAVAILABLE, Json(json!({})))
                    } else {
                        (AxumStatus::OK, Json(json!({ "sync_job_id": "job-2" })))
                    }
                }
            }),
        );
        let base = spawn_backend(app).await;
        let client = BackendClient::new(&base, fast_settings()).unwrap();

        let result = client.run_sync_for_source("slack").await;
        assert_eq!(result, ToolResult::synced(json!({ "sync_job_id": "job-2" })));
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_sync_gives_up_after_max_attempts() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let app = Router::new().route(
            "/api/v1/cursor-dev/test-sync/:short_name",
            post(move || {
                counter.fetch_add(1, Ordering::SeqCst);
                async { AxumStatus::SERVICE_UNAVAILABLE }
            }),
        );
        let base = spawn_backend(app).await;
        let client = BackendClient::new(&base, fast_settings()).unwrap();

        let result = client.run_sync_for_source("slack").await;
        assert_eq!(
            result,
            ToolResult::error("Max retries exceeded when trying to run sync")
        );
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_sync_unreadable_success_body_is_retried() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let app = Router::new().route(
            "/api/v1/cursor-dev/test-sync/:short_name",
            post(move || {
                counter.fetch_add(1, Ordering::SeqCst);
                async { (AxumStatus::OK, "queued") }
            }),
        );
        let base = spawn_backend(app).await;
        let client = BackendClient::new(&base, fast_settings()).unwrap();

        assert_eq!(
            client.run_sync_for_source("slack").await,
            ToolResult::error("Max retries exceeded when trying to run sync")
        );
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_sync_unreachable_backend_exhausts_retries() {
        let client = BackendClient::new(&unused_base_url(), fast_settings()).unwrap();

        assert_eq!(
            client.run_sync_for_source("slack").await,
            ToolResult::error("Max retries exceeded when trying to run sync")
        );
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let client = BackendClient::new("http://localhost:8001/", PollSettings::default()).unwrap();
        assert_eq!(client.base_url, "http://localhost:8001");
    }
}
