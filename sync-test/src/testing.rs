//! Helpers for tests that need a backend to talk to

use axum::Router;
use std::net::TcpListener;
use std::time::Duration;

use crate::models::PollSettings;

/// Settings short enough for tests to run in milliseconds
pub(crate) fn fast_settings() -> PollSettings {
    PollSettings {
        status_request_timeout: Duration::from_secs(2),
        sync_request_timeout: Duration::from_secs(2),
        poll_timeout: Duration::from_millis(400),
        poll_interval: Duration::from_millis(50),
        max_sync_attempts: 3,
        sync_retry_delay: Duration::from_millis(10),
    }
}

/// Serves `app` on an ephemeral local port and returns its base URL
pub(crate) async fn spawn_backend(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let server = axum::Server::from_tcp(listener)
        .unwrap()
        .serve(app.into_make_service());
    tokio::spawn(server);
    format!("http://{addr}")
}

/// Base URL of a port nothing listens on
pub(crate) fn unused_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}
