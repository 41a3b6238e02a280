use super::{db_error, not_found, HandlerError};
use crate::{
    api::auth::CurrentUser,
    db::{
        models::{
            ConnectionIdParams, ConnectionResponse, CreateConnectionParams, IntegrationTypeParams,
            ListConnectionsQuery, ShortNameParams, UpdateConnectionStatusParams,
        },
        DbClient,
    },
    errors::ApiError,
    logging::log_to_file,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::to_value;
use tracing::{info, warn};

/// Converts stored rows, failing the request on a corrupt enum column
fn into_responses<T>(rows: Vec<T>) -> Result<Vec<ConnectionResponse>, HandlerError>
where
    ConnectionResponse: TryFrom<T, Error = ApiError>,
{
    rows.into_iter()
        .map(ConnectionResponse::try_from)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|err| db_error("Stored connection is invalid", err))
}

/// Handler for listing the caller's connections of one integration type
///
/// # Endpoint: GET /api/v1/connections/list/:integration_type?active=true
///
/// With `active=true` only active connections are returned, each with its
/// integration credential.
pub(crate) async fn list_connections(
    State(db): State<DbClient>,
    CurrentUser(user): CurrentUser,
    Path(IntegrationTypeParams { integration_type }): Path<IntegrationTypeParams>,
    Query(ListConnectionsQuery { active }): Query<ListConnectionsQuery>,
) -> Result<Json<Vec<ConnectionResponse>>, HandlerError> {
    info!(
        "Listing {:?} connections for organization {} (active only: {})",
        integration_type, user.organization_id, active
    );

    let responses = if active {
        let rows = db
            .get_active_connections_by_integration_type(integration_type, &user.organization_id)
            .await
            .map_err(|err| db_error("Failed to fetch active connections", err))?;
        into_responses(rows)?
    } else {
        let rows = db
            .get_connections_by_integration_type(integration_type, &user.organization_id)
            .await
            .map_err(|err| db_error("Failed to fetch connections", err))?;
        into_responses(rows)?
    };

    Ok(Json(responses))
}

/// # Endpoint: GET /api/v1/connections/detail/:connection_id
pub(crate) async fn get_connection_detail(
    State(db): State<DbClient>,
    CurrentUser(user): CurrentUser,
    Path(ConnectionIdParams { connection_id }): Path<ConnectionIdParams>,
) -> Result<Json<ConnectionResponse>, HandlerError> {
    match db.get_connection(&connection_id, &user.organization_id).await {
        Ok(Some(connection)) => ConnectionResponse::try_from(connection)
            .map(Json)
            .map_err(|err| db_error("Stored connection is invalid", err)),
        Ok(None) => Err(not_found("Connection not found")),
        Err(err) => Err(db_error("Failed to fetch connection", err)),
    }
}

/// Handler for finding the caller's connections to a source/destination
///
/// # Endpoint: GET /api/v1/connections/by-short-name/:short_name
///
/// # Returns
/// The matching connections with their credentials. An empty match is a 404 so
/// that pollers can tell "not connected yet" apart from success.
pub(crate) async fn get_connections_by_short_name(
    State(db): State<DbClient>,
    CurrentUser(user): CurrentUser,
    Path(ShortNameParams { short_name }): Path<ShortNameParams>,
) -> Result<Json<Vec<ConnectionResponse>>, HandlerError> {
    let rows = db
        .get_connections_by_short_name(&short_name, &user)
        .await
        .map_err(|err| db_error("Failed to fetch connections", err))?;

    if rows.is_empty() {
        info!("No connection found for {}", short_name);
        return Err(not_found(format!(
            "No connections found for short name: {short_name}"
        )));
    }

    info!("Found {} connections for {}", rows.len(), short_name);
    into_responses(rows).map(Json)
}

/// # Endpoint: POST /api/v1/connections/create
pub(crate) async fn create_connection(
    State(db): State<DbClient>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<CreateConnectionParams>,
) -> Result<(StatusCode, Json<ConnectionResponse>), HandlerError> {
    log_to_file(
        "POST",
        "/api/v1/connections/create",
        &user.email,
        to_value(&payload).ok().as_ref(),
    );

    let connection = db
        .create_connection(&payload, &user.organization_id)
        .await
        .map_err(|err| db_error("Failed to create connection", err))?;

    info!("Created connection {} for {}", connection.id, connection.short_name);
    ConnectionResponse::try_from(connection)
        .map(|response| (StatusCode::CREATED, Json(response)))
        .map_err(|err| db_error("Stored connection is invalid", err))
}

/// # Endpoint: PUT /api/v1/connections/:connection_id/status
pub(crate) async fn update_connection_status(
    State(db): State<DbClient>,
    CurrentUser(user): CurrentUser,
    Path(ConnectionIdParams { connection_id }): Path<ConnectionIdParams>,
    Json(UpdateConnectionStatusParams { status }): Json<UpdateConnectionStatusParams>,
) -> Result<Json<ConnectionResponse>, HandlerError> {
    let path = format!("/api/v1/connections/{connection_id}/status");
    log_to_file("PUT", &path, &user.email, to_value(status).ok().as_ref());

    match db
        .update_connection_status(&connection_id, &user.organization_id, status)
        .await
    {
        Ok(Some(connection)) => ConnectionResponse::try_from(connection)
            .map(Json)
            .map_err(|err| db_error("Stored connection is invalid", err)),
        Ok(None) => {
            warn!("Status update for unknown connection {}", connection_id);
            Err(not_found("Connection not found"))
        }
        Err(err) => Err(db_error("Failed to update connection", err)),
    }
}

/// # Endpoint: DELETE /api/v1/connections/delete/:connection_id
pub(crate) async fn delete_connection(
    State(db): State<DbClient>,
    CurrentUser(user): CurrentUser,
    Path(ConnectionIdParams { connection_id }): Path<ConnectionIdParams>,
) -> Result<Json<ConnectionResponse>, HandlerError> {
    let path = format!("/api/v1/connections/delete/{connection_id}");
    log_to_file("DELETE", &path, &user.email, None);

    match db
        .delete_connection(&connection_id, &user.organization_id)
        .await
    {
        Ok(Some(connection)) => ConnectionResponse::try_from(connection)
            .map(Json)
            .map_err(|err| db_error("Stored connection is invalid", err)),
        Ok(None) => Err(not_found("Connection not found")),
        Err(err) => Err(db_error("Failed to delete connection", err)),
    }
}
