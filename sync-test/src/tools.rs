use tokio::time::{sleep, Instant};
use tracing::{error, info, warn};

use crate::{
    client::BackendClient,
    models::{PollSettings, ToolResult},
};

/// The two tools exposed to remote callers
#[derive(Debug, Clone)]
pub struct SyncTester {
    default_backend: String,
    settings: PollSettings,
}

impl SyncTester {
    pub fn new(default_backend: impl Into<String>, settings: PollSettings) -> Self {
        Self {
            default_backend: default_backend.into(),
            settings,
        }
    }

    pub fn default_backend(&self) -> &str {
        &self.default_backend
    }

    fn client(&self, backend_url: Option<&str>) -> Result<BackendClient, ToolResult> {
        let backend = backend_url.unwrap_or(&self.default_backend);
        BackendClient::new(backend, self.settings.clone())
            .map_err(|err| ToolResult::error(err.to_string()))
    }

    /// Polls the backend until a connection for `short_name` shows up
    ///
    /// Stops early on success and on errors carrying a non-404 status code.
    /// Pending results and transport errors keep polling until `poll_timeout`.
    pub async fn check_connection(
        &self,
        short_name: &str,
        backend_url: Option<&str>,
    ) -> ToolResult {
        let backend = backend_url.unwrap_or(&self.default_backend);
        info!(
            "Checking connection for source: {} using backend: {}",
            short_name, backend
        );

        let client = match self.client(backend_url) {
            Ok(client) => client,
            Err(result) => return result,
        };
        let settings = client.settings();

        let started = Instant::now();
        while started.elapsed() < settings.poll_timeout {
            let result = client.check_connection_status(short_name).await;

            match &result {
                ToolResult::Success { .. } => {
                    info!("Connection found for source: {}", short_name);
                    return result;
                }
                ToolResult::Error {
                    error: message,
                    status_code,
                    ..
                } => {
                    error!("Error checking connection: {}", message);
                    if status_code.is_some_and(|code| code != 404) {
                        return result;
                    }
                }
                _ => {}
            }

            info!(
                "Connection not found for source: {}, retrying in {:?}",
                short_name, settings.poll_interval
            );
            sleep(settings.poll_interval).await;
        }

        warn!("Timeout reached waiting for connection: {}", short_name);
        ToolResult::timeout(short_name)
    }

    /// Triggers a sync for `short_name` once its connection exists
    pub async fn run_sync(&self, short_name: &str, backend_url: Option<&str>) -> ToolResult {
        let backend = backend_url.unwrap_or(&self.default_backend);
        info!(
            "Running sync for source: {} using backend: {}",
            short_name, backend
        );

        let client = match self.client(backend_url) {
            Ok(client) => client,
            Err(result) => return result,
        };

        if !client.check_connection_status(short_name).await.is_success() {
            return ToolResult::error(format!("No connection found for source: {short_name}"))
                .with_message("Please ensure a connection is established before running a sync");
        }

        let result = client.run_sync_for_source(short_name).await;
        info!("Sync result for {}: {}", short_name, result.status());
        result
    }
}
