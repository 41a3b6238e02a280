//! API request handlers.
//! Each module corresponds to a specific API resource.

pub mod connections; // Connection CRUD and lookups
pub mod cursor_dev; // Local development hooks used by the sync test harness
pub mod destinations; // Destination catalogue
pub mod sources; // Source catalogue

pub(crate) use connections::{
    create_connection, delete_connection, get_connection_detail, get_connections_by_short_name,
    list_connections, update_connection_status,
};
pub(crate) use cursor_dev::test_sync;
pub(crate) use destinations::{list_destinations, read_destination};
pub(crate) use sources::{list_sources, read_source};

use crate::{
    db::models::ErrorDetail,
    errors::{ApiError, ErrorMessages},
};
use axum::{http::StatusCode, Json};
use tracing::error;

/// Error half of every handler result
pub(crate) type HandlerError = (StatusCode, Json<ErrorDetail>);

pub(crate) fn not_found(detail: impl Into<String>) -> HandlerError {
    (StatusCode::NOT_FOUND, Json(ErrorDetail::new(detail)))
}

/// Logs `err` and hides it behind the generic database message
pub(crate) fn db_error(context: &str, err: ApiError) -> HandlerError {
    error!("{}: {}", context, err);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorDetail::new(ErrorMessages::DB.to_string())),
    )
}
