use super::{db_error, not_found, HandlerError};
use crate::{
    api::auth::CurrentUser,
    db::{
        models::{Source, SourceWithConfigFields, ShortNameParams},
        DbClient,
    },
};
use axum::{
    extract::{Path, State},
    Json,
};
use tracing::info;

/// # Endpoint: GET /api/v1/sources/list
pub(crate) async fn list_sources(
    State(db): State<DbClient>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<Source>>, HandlerError> {
    info!("Listing sources for user {}", user.id);

    let sources = db
        .get_sources()
        .await
        .map_err(|err| db_error("Failed to fetch sources", err))?;

    info!("Found {} sources", sources.len());
    Ok(Json(sources))
}

/// # Endpoint: GET /api/v1/sources/detail/:short_name
pub(crate) async fn read_source(
    State(db): State<DbClient>,
    CurrentUser(_user): CurrentUser,
    Path(ShortNameParams { short_name }): Path<ShortNameParams>,
) -> Result<Json<SourceWithConfigFields>, HandlerError> {
    info!("Reading source: {}", short_name);

    match db.get_source_by_short_name(&short_name).await {
        Ok(Some(source)) => Ok(Json(source.into())),
        Ok(None) => Err(not_found("Source not found")),
        Err(err) => Err(db_error("Failed to fetch source", err)),
    }
}
