use crate::errors::ApiError;
use crate::schema::{
    api_keys, connections, destinations, integration_credentials, sources, sync_jobs, users,
};
use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::CreateConnectionParams;

#[derive(Clone, Debug, Serialize, Deserialize, Identifiable, Queryable)]
#[diesel(table_name = users, primary_key(id))]
pub struct User {
    pub id: String,
    pub email: String,
    pub full_name: Option<String>,
    pub organization_id: String,
    pub created_at: NaiveDateTime,
}

/// The part of an `api_keys` row that authentication reads
#[derive(Clone, Debug, Queryable, Selectable)]
#[diesel(table_name = api_keys)]
pub struct ApiKey {
    pub expires_at: Option<NaiveDateTime>,
}

impl ApiKey {
    pub fn is_expired(&self, now: NaiveDateTime) -> bool {
        self.expires_at.is_some_and(|expires_at| expires_at <= now)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, Identifiable, Queryable)]
#[diesel(table_name = destinations, primary_key(id))]
pub struct Destination {
    pub id: String,
    pub name: String,
    pub short_name: String,
    pub description: Option<String>,
    pub class_name: String,
    pub auth_type: Option<String>,
    pub auth_config_class: Option<String>,
    pub created_at: NaiveDateTime,
    pub modified_at: NaiveDateTime,
}

#[derive(Clone, Debug, Serialize, Deserialize, Identifiable, Queryable)]
#[diesel(table_name = sources, primary_key(id))]
pub struct Source {
    pub id: String,
    pub name: String,
    pub short_name: String,
    pub description: Option<String>,
    pub class_name: String,
    pub auth_type: Option<String>,
    pub auth_config_class: Option<String>,
    pub created_at: NaiveDateTime,
    pub modified_at: NaiveDateTime,
}

#[derive(Clone, Debug, Serialize, Deserialize, Identifiable, Queryable)]
#[diesel(table_name = integration_credentials, primary_key(id))]
pub struct IntegrationCredential {
    pub id: String,
    pub name: String,
    pub integration_short_name: String,
    pub integration_type: String,
    pub auth_type: String,
    pub organization_id: String,
    pub created_at: NaiveDateTime,
}

#[derive(Clone, Debug, Serialize, Deserialize, Insertable, Identifiable, Queryable)]
#[diesel(table_name = connections, primary_key(id))]
pub struct Connection {
    pub id: String,
    pub name: String,
    pub integration_type: String,
    pub status: String,
    pub short_name: String,
    pub integration_credential_id: Option<String>,
    pub organization_id: String,
    pub created_at: NaiveDateTime,
    pub modified_at: NaiveDateTime,
}

impl Connection {
    /// Builds a new active connection owned by `organization_id`
    pub fn new(params: &CreateConnectionParams, organization_id: &str) -> Self {
        let now = Utc::now().naive_utc();
        Connection {
            id: uuid::Uuid::new_v4().to_string(),
            name: params.name.clone(),
            integration_type: params.integration_type.into(),
            status: ConnectionStatus::Active.into(),
            short_name: params.short_name.clone(),
            integration_credential_id: params.integration_credential_id.clone(),
            organization_id: organization_id.to_string(),
            created_at: now,
            modified_at: now,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, Insertable, Identifiable, Queryable)]
#[diesel(table_name = sync_jobs, primary_key(id))]
pub struct SyncJob {
    pub id: String,
    pub connection_id: String,
    pub short_name: String,
    pub organization_id: String,
    pub status: String,
    pub created_at: NaiveDateTime,
}

impl SyncJob {
    pub fn pending_for(connection: &Connection) -> Self {
        SyncJob {
            id: uuid::Uuid::new_v4().to_string(),
            connection_id: connection.id.clone(),
            short_name: connection.short_name.clone(),
            organization_id: connection.organization_id.clone(),
            status: SyncJobStatus::Pending.into(),
            created_at: Utc::now().naive_utc(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegrationType {
    Source,
    Destination,
    EmbeddingModel,
}

impl From<IntegrationType> for String {
    fn from(kind: IntegrationType) -> Self {
        match kind {
            IntegrationType::Source => "source".to_string(),
            IntegrationType::Destination => "destination".to_string(),
            IntegrationType::EmbeddingModel => "embedding_model".to_string(),
        }
    }
}

impl FromStr for IntegrationType {
    type Err = ApiError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "source" => Ok(IntegrationType::Source),
            "destination" => Ok(IntegrationType::Destination),
            "embedding_model" => Ok(IntegrationType::EmbeddingModel),
            _ => Err(ApiError::InvalidEnum {
                kind: "integration type",
                value: value.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    Active,
    Inactive,
    Error,
}

impl From<ConnectionStatus> for String {
    fn from(status: ConnectionStatus) -> Self {
        match status {
            ConnectionStatus::Active => "active".to_string(),
            ConnectionStatus::Inactive => "inactive".to_string(),
            ConnectionStatus::Error => "error".to_string(),
        }
    }
}

impl FromStr for ConnectionStatus {
    type Err = ApiError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "active" => Ok(ConnectionStatus::Active),
            "inactive" => Ok(ConnectionStatus::Inactive),
            "error" => Ok(ConnectionStatus::Error),
            _ => Err(ApiError::InvalidEnum {
                kind: "connection status",
                value: value.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncJobStatus {
    Pending,
    InProgress,
    Completed,
    Failed,
}

impl From<SyncJobStatus> for String {
    fn from(status: SyncJobStatus) -> Self {
        match status {
            SyncJobStatus::Pending => "pending".to_string(),
            SyncJobStatus::InProgress => "in_progress".to_string(),
            SyncJobStatus::Completed => "completed".to_string(),
            SyncJobStatus::Failed => "failed".to_string(),
        }
    }
}

impl FromStr for SyncJobStatus {
    type Err = ApiError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(SyncJobStatus::Pending),
            "in_progress" => Ok(SyncJobStatus::InProgress),
            "completed" => Ok(SyncJobStatus::Completed),
            "failed" => Ok(SyncJobStatus::Failed),
            _ => Err(ApiError::InvalidEnum {
                kind: "sync job status",
                value: value.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_integration_type_round_trips_through_string() {
        for kind in [
            IntegrationType::Source,
            IntegrationType::Destination,
            IntegrationType::EmbeddingModel,
        ] {
            let stored: String = kind.into();
            assert_eq!(stored.parse::<IntegrationType>().unwrap(), kind);
        }
    }

    #[test]
    fn test_unknown_status_is_an_error() {
        assert!("paused".parse::<ConnectionStatus>().is_err());
        assert!("".parse::<SyncJobStatus>().is_err());
        assert!("Source".parse::<IntegrationType>().is_err());
    }

    #[test]
    fn test_serde_names_match_stored_strings() {
        let json = serde_json::to_string(&IntegrationType::EmbeddingModel).unwrap();
        assert_eq!(json, "\"embedding_model\"");
        let json = serde_json::to_string(&SyncJobStatus::InProgress).unwrap();
        assert_eq!(json, "\"in_progress\"");
        let status: ConnectionStatus = serde_json::from_str("\"inactive\"").unwrap();
        assert_eq!(status, ConnectionStatus::Inactive);
    }

    #[test]
    fn test_new_connection_is_active_and_scoped() {
        let params = CreateConnectionParams {
            name: "Slack workspace".to_string(),
            integration_type: IntegrationType::Source,
            short_name: "slack".to_string(),
            integration_credential_id: None,
        };
        let connection = Connection::new(&params, "org-1");

        assert_eq!(connection.status, "active");
        assert_eq!(connection.integration_type, "source");
        assert_eq!(connection.organization_id, "org-1");
        assert_eq!(connection.created_at, connection.modified_at);
        assert!(uuid::Uuid::parse_str(&connection.id).is_ok());
    }

    #[test]
    fn test_pending_sync_job_copies_connection_scope() {
        let params = CreateConnectionParams {
            name: "Notion".to_string(),
            integration_type: IntegrationType::Source,
            short_name: "notion".to_string(),
            integration_credential_id: Some("cred-1".to_string()),
        };
        let connection = Connection::new(&params, "org-2");
        let job = SyncJob::pending_for(&connection);

        assert_eq!(job.connection_id, connection.id);
        assert_eq!(job.short_name, "notion");
        assert_eq!(job.organization_id, "org-2");
        assert_eq!(job.status, "pending");
    }

    #[test]
    fn test_api_key_expiry() {
        let now = Utc::now().naive_utc();
        let key = ApiKey {
            expires_at: Some(now - Duration::seconds(1)),
        };
        assert!(key.is_expired(now));

        let expires_now = ApiKey {
            expires_at: Some(now),
        };
        assert!(expires_now.is_expired(now));

        let forever = ApiKey { expires_at: None };
        assert!(!forever.is_expired(now));
    }
}
