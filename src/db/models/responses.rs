use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{
    Connection, ConnectionStatus, Destination, IntegrationCredential, IntegrationType, Source,
    SyncJob, SyncJobStatus,
};
use crate::errors::ApiError;
use crate::platform::Fields;

/// Error body returned by every failing endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Human-readable reason
    pub detail: String,
    /// Rendered error chain, only present for server errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stacktrace: Option<String>,
}

impl ErrorDetail {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
            stacktrace: None,
        }
    }

    pub fn from_error(detail: impl Into<String>, err: &ApiError) -> Self {
        Self {
            detail: detail.into(),
            stacktrace: Some(err.stacktrace()),
        }
    }
}

/// Destination with the fields its auth config requires
#[derive(Debug, Serialize, Deserialize)]
pub struct DestinationWithConfigFields {
    #[serde(flatten)]
    pub destination: Destination,
    /// Present when the destination has a registered auth config class
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_fields: Option<Fields>,
}

impl From<Destination> for DestinationWithConfigFields {
    fn from(destination: Destination) -> Self {
        let config_fields = destination
            .auth_config_class
            .as_deref()
            .and_then(Fields::from_config_class);
        Self {
            destination,
            config_fields,
        }
    }
}

/// Source with the fields its auth config requires
#[derive(Debug, Serialize, Deserialize)]
pub struct SourceWithConfigFields {
    #[serde(flatten)]
    pub source: Source,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_fields: Option<Fields>,
}

impl From<Source> for SourceWithConfigFields {
    fn from(source: Source) -> Self {
        let config_fields = source
            .auth_config_class
            .as_deref()
            .and_then(Fields::from_config_class);
        Self {
            source,
            config_fields,
        }
    }
}

/// Credential summary embedded in connection responses.
/// Secrets are never part of it.
#[derive(Debug, Serialize, Deserialize)]
pub struct IntegrationCredentialSummary {
    pub id: String,
    pub name: String,
    pub integration_short_name: String,
    pub auth_type: String,
}

impl From<IntegrationCredential> for IntegrationCredentialSummary {
    fn from(credential: IntegrationCredential) -> Self {
        Self {
            id: credential.id,
            name: credential.name,
            integration_short_name: credential.integration_short_name,
            auth_type: credential.auth_type,
        }
    }
}

/// Connection as returned by the connection endpoints
#[derive(Debug, Serialize, Deserialize)]
pub struct ConnectionResponse {
    pub id: String,
    pub name: String,
    pub integration_type: IntegrationType,
    pub status: ConnectionStatus,
    pub short_name: String,
    pub organization_id: String,
    pub created_at: NaiveDateTime,
    pub modified_at: NaiveDateTime,
    /// Only populated by the queries that eagerly load credentials
    #[serde(skip_serializing_if = "Option::is_none")]
    pub integration_credential: Option<IntegrationCredentialSummary>,
}

impl TryFrom<Connection> for ConnectionResponse {
    type Error = ApiError;

    fn try_from(connection: Connection) -> Result<Self, Self::Error> {
        Ok(Self {
            integration_type: connection.integration_type.parse()?,
            status: connection.status.parse()?,
            id: connection.id,
            name: connection.name,
            short_name: connection.short_name,
            organization_id: connection.organization_id,
            created_at: connection.created_at,
            modified_at: connection.modified_at,
            integration_credential: None,
        })
    }
}

impl TryFrom<(Connection, Option<IntegrationCredential>)> for ConnectionResponse {
    type Error = ApiError;

    fn try_from(
        (connection, credential): (Connection, Option<IntegrationCredential>),
    ) -> Result<Self, Self::Error> {
        let mut response = ConnectionResponse::try_from(connection)?;
        response.integration_credential = credential.map(Into::into);
        Ok(response)
    }
}

/// Response of the test-sync trigger
#[derive(Debug, Serialize, Deserialize)]
pub struct SyncJobResponse {
    pub sync_job_id: String,
    pub connection_id: String,
    pub short_name: String,
    pub status: SyncJobStatus,
    pub created_at: NaiveDateTime,
}

impl TryFrom<SyncJob> for SyncJobResponse {
    type Error = ApiError;

    fn try_from(job: SyncJob) -> Result<Self, Self::Error> {
        Ok(Self {
            status: job.status.parse()?,
            sync_job_id: job.id,
            connection_id: job.connection_id,
            short_name: job.short_name,
            created_at: job.created_at,
        })
    }
}
