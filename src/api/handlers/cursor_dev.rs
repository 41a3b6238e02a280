use super::{not_found, HandlerError};
use crate::{
    api::auth::CurrentUser,
    db::{
        models::{ErrorDetail, ShortNameParams, SyncJobResponse},
        DbClient,
    },
    errors::ApiError,
    logging::log_to_file,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::{error, info};

/// Server errors from this route carry their error chain so that the
/// harness driving it can show what went wrong
fn server_error(context: &str, err: ApiError) -> HandlerError {
    error!("{}: {}", context, err);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorDetail::from_error(format!("{context}: {err}"), &err)),
    )
}

/// Handler that queues a sync for the caller's connection to a source
///
/// # Endpoint: POST /api/v1/cursor-dev/test-sync/:short_name
///
/// Only mounted when `LOCAL_CURSOR_DEVELOPMENT` is enabled.
///
/// # Returns
/// * 200 with the pending sync job
/// * 404 when the source or the caller's connection to it does not exist
/// * 500 with `detail` and `stacktrace` for anything else
pub(crate) async fn test_sync(
    State(db): State<DbClient>,
    CurrentUser(user): CurrentUser,
    Path(ShortNameParams { short_name }): Path<ShortNameParams>,
) -> Result<Json<SyncJobResponse>, HandlerError> {
    let path = format!("/api/v1/cursor-dev/test-sync/{short_name}");
    log_to_file("POST", &path, &user.email, None);

    let source = db
        .get_source_by_short_name(&short_name)
        .await
        .map_err(|err| server_error("Failed to look up source", err))?;
    if source.is_none() {
        return Err(not_found(format!("Source {short_name} not found")));
    }

    let connections = db
        .get_connections_by_short_name(&short_name, &user)
        .await
        .map_err(|err| server_error("Failed to look up connections", err))?;
    let Some((connection, _)) = connections.into_iter().next() else {
        return Err(not_found(format!(
            "No connection found for source: {short_name}"
        )));
    };

    let job = db
        .create_sync_job(&connection)
        .await
        .map_err(|err| server_error("Failed to create sync job", err))?;

    info!(
        "Queued sync job {} for connection {} ({})",
        job.id, connection.id, short_name
    );
    SyncJobResponse::try_from(job)
        .map(Json)
        .map_err(|err| server_error("Stored sync job is invalid", err))
}
