use serde::{Deserialize, Serialize};

use super::{ConnectionStatus, IntegrationType};

/// Body of `POST /connections/create`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateConnectionParams {
    /// Display name of the connection
    pub name: String,
    /// Kind of integration the connection points at
    pub integration_type: IntegrationType,
    /// Short name of the source/destination/model
    pub short_name: String,
    /// Credential the connection authenticates with
    pub integration_credential_id: Option<String>,
}

/// Body of `PUT /connections/:connection_id/status`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateConnectionStatusParams {
    pub status: ConnectionStatus,
}

/// Path parameter for short-name lookups
#[derive(Debug, Deserialize, Serialize)]
pub(crate) struct ShortNameParams {
    pub short_name: String,
}

/// Path parameter for connection id lookups
#[derive(Debug, Deserialize, Serialize)]
pub(crate) struct ConnectionIdParams {
    pub connection_id: String,
}

/// Path parameter for listing connections of one integration type
#[derive(Debug, Deserialize, Serialize)]
pub(crate) struct IntegrationTypeParams {
    pub integration_type: IntegrationType,
}

/// Query string for listing connections
#[derive(Debug, Default, Deserialize, Serialize)]
pub(crate) struct ListConnectionsQuery {
    /// Restrict the listing to active connections
    #[serde(default)]
    pub active: bool,
}
