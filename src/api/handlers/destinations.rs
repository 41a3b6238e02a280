use super::{db_error, not_found, HandlerError};
use crate::{
    api::auth::CurrentUser,
    db::{
        models::{Destination, DestinationWithConfigFields, ShortNameParams},
        DbClient,
    },
};
use axum::{
    extract::{Path, State},
    Json,
};
use tracing::info;

/// Handler for listing every available destination
///
/// # Endpoint: GET /api/v1/destinations/list
pub(crate) async fn list_destinations(
    State(db): State<DbClient>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<Destination>>, HandlerError> {
    info!("Listing destinations for user {}", user.id);

    let destinations = db
        .get_destinations()
        .await
        .map_err(|err| db_error("Failed to fetch destinations", err))?;

    info!("Found {} destinations", destinations.len());
    Ok(Json(destinations))
}

/// Handler for reading one destination by short name
///
/// # Endpoint: GET /api/v1/destinations/detail/:short_name
///
/// # Returns
/// The destination, with the fields of its auth config when it declares one.
/// 404 when no destination has that short name.
pub(crate) async fn read_destination(
    State(db): State<DbClient>,
    CurrentUser(_user): CurrentUser,
    Path(ShortNameParams { short_name }): Path<ShortNameParams>,
) -> Result<Json<DestinationWithConfigFields>, HandlerError> {
    info!("Reading destination: {}", short_name);

    match db.get_destination_by_short_name(&short_name).await {
        Ok(Some(destination)) => Ok(Json(destination.into())),
        Ok(None) => Err(not_found("Destination not found")),
        Err(err) => Err(db_error("Failed to fetch destination", err)),
    }
}
