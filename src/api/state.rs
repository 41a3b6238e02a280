use crate::{config::Config, db::DbClient};
use axum::extract::FromRef;
use std::sync::Arc;

/// State shared by every handler
#[derive(Clone, FromRef)]
pub struct AppState {
    pub db: DbClient,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(db: DbClient, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }
}
