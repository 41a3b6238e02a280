use axum::Server;
use config::Config;
use std::net::SocketAddr;

mod api;
mod config;
mod db;
mod errors;
mod logging;
mod platform;
mod schema;

/// Result type for API
pub type Result<T> = std::result::Result<T, errors::ApiError>;

/// Static configuration instance for the API
static CONFIG: once_cell::sync::Lazy<Config> = once_cell::sync::Lazy::new(|| {
    dotenv::dotenv().ok();
    envy::from_env::<Config>().expect("Failed to load configuration")
});

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::setup_logging(&CONFIG.log_dir)?;

    let db_client = db::DbClient::with_config(
        &CONFIG.database_url,
        &CONFIG.redis_url,
        20,
        CONFIG.cache_ttl_seconds,
    )?;

    match db_client.get_async_redis_conn().await {
        Ok(_) => tracing::info!("Redis cache connected"),
        Err(e) => tracing::warn!("Redis cache unavailable, serving uncached: {}", e),
    }

    if !CONFIG.auth_enabled {
        tracing::warn!(
            "Authentication disabled, requests run as {}",
            CONFIG.first_superuser
        );
    }

    let app = api::initialize_router(api::AppState::new(db_client, CONFIG.clone()));
    let addr = SocketAddr::from(([0, 0, 0, 0], CONFIG.port));
    tracing::info!("Server starting on {}", addr);

    Server::bind(&addr)
        .serve(app.into_make_service_with_connect_info::<SocketAddr>())
        .await?;

    Ok(())
}
