use anyhow::Context;
use chrono::Utc;
use serde_json::Value;
use std::fs;
use tracing::info;
use tracing_appender::rolling;
use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::{fmt, layer::SubscriberExt, Layer, Registry};

/// Target routed to the rolling audit file in addition to stdout
pub const AUDIT_TARGET: &str = "save_to_log_file";

pub fn setup_logging(log_dir: &str) -> Result<(), anyhow::Error> {
    fs::create_dir_all(log_dir).context("Failed to create logs directory")?;

    let file_appender = rolling::daily(log_dir, "audit.log");

    // Only the audit target reaches the file
    let target_filter = Targets::new().with_target(AUDIT_TARGET, LevelFilter::TRACE);

    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false)
        .with_filter(target_filter);

    let stdout_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_filter(LevelFilter::INFO);

    let subscriber = Registry::default().with(stdout_layer).with(file_layer);

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set global default subscriber")?;

    Ok(())
}

/// Records a mutating request in the audit log
pub fn log_to_file(method: &str, path: &str, actor: &str, body: Option<&Value>) {
    let timestamp = Utc::now().to_rfc3339();

    match body {
        Some(b) => {
            info!(
                target: AUDIT_TARGET,
                method = method,
                uri = path,
                actor = actor,
                body = %b,
                "{} {} {} {} {}", timestamp, actor, method, path, b
            );
        }
        None => {
            info!(
                target: AUDIT_TARGET,
                method = method,
                uri = path,
                actor = actor,
                "{} {} {} {}", timestamp, actor, method, path
            );
        }
    }
}
