use super::DbClient;
use crate::db::models::{
    Connection, ConnectionStatus, CreateConnectionParams, IntegrationCredential, IntegrationType,
    User,
};
use crate::Result;
use diesel::{
    expression_methods::ExpressionMethods, query_dsl::QueryDsl, NullableExpressionMethods,
    OptionalExtension,
};
use diesel_async::RunQueryDsl;
use tracing::info;

/// Connection joined with its credential, when it has one
pub type ConnectionWithCredential = (Connection, Option<IntegrationCredential>);

/// DbClient helper functions for the connections table.
/// Every lookup is scoped to a single organization.
impl DbClient {
    /// All connections of `kind` inside `org_id`
    pub async fn get_connections_by_integration_type(
        &self,
        kind: IntegrationType,
        org_id: &str,
    ) -> Result<Vec<Connection>> {
        use crate::schema::connections::dsl::*;

        let conn = &mut self.get_db_conn().await?;
        connections
            .filter(integration_type.eq(String::from(kind)))
            .filter(organization_id.eq(org_id))
            .order_by(created_at)
            .load::<Connection>(conn)
            .await
            .map_err(Into::into)
    }

    /// Active connections of `kind` inside `org_id`, credentials loaded alongside
    pub async fn get_active_connections_by_integration_type(
        &self,
        kind: IntegrationType,
        org_id: &str,
    ) -> Result<Vec<ConnectionWithCredential>> {
        use crate::schema::{connections, integration_credentials};

        let conn = &mut self.get_db_conn().await?;
        connections::table
            .left_join(integration_credentials::table)
            .filter(connections::integration_type.eq(String::from(kind)))
            .filter(connections::organization_id.eq(org_id))
            .filter(connections::status.eq(String::from(ConnectionStatus::Active)))
            .select((
                connections::all_columns,
                integration_credentials::all_columns.nullable(),
            ))
            .order_by(connections::created_at)
            .load::<ConnectionWithCredential>(conn)
            .await
            .map_err(Into::into)
    }

    /// All connections named `name` inside the user's organization, credentials loaded alongside
    pub async fn get_connections_by_short_name(
        &self,
        name: &str,
        current_user: &User,
    ) -> Result<Vec<ConnectionWithCredential>> {
        use crate::schema::{connections, integration_credentials};

        let conn = &mut self.get_db_conn().await?;
        info!(
            "Fetching connections for {} in organization {}",
            name, current_user.organization_id
        );
        connections::table
            .left_join(integration_credentials::table)
            .filter(connections::short_name.eq(name))
            .filter(connections::organization_id.eq(&current_user.organization_id))
            .select((
                connections::all_columns,
                integration_credentials::all_columns.nullable(),
            ))
            .order_by(connections::created_at)
            .load::<ConnectionWithCredential>(conn)
            .await
            .map_err(Into::into)
    }

    pub async fn get_connection(&self, uid: &str, org_id: &str) -> Result<Option<Connection>> {
        use crate::schema::connections::dsl::*;

        let conn = &mut self.get_db_conn().await?;
        connections
            .filter(id.eq(uid))
            .filter(organization_id.eq(org_id))
            .first::<Connection>(conn)
            .await
            .optional()
            .map_err(Into::into)
    }

    pub async fn create_connection(
        &self,
        params: &CreateConnectionParams,
        org_id: &str,
    ) -> Result<Connection> {
        use crate::schema::connections::dsl::*;

        let new_connection = Connection::new(params, org_id);
        let conn = &mut self.get_db_conn().await?;
        diesel::insert_into(connections)
            .values(&new_connection)
            .get_result::<Connection>(conn)
            .await
            .map_err(Into::into)
    }

    /// Returns the updated row, `None` when no connection matched
    pub async fn update_connection_status(
        &self,
        uid: &str,
        org_id: &str,
        new_status: ConnectionStatus,
    ) -> Result<Option<Connection>> {
        use crate::schema::connections::dsl::*;

        let conn = &mut self.get_db_conn().await?;
        diesel::update(connections)
            .filter(id.eq(uid))
            .filter(organization_id.eq(org_id))
            .set((
                status.eq(String::from(new_status)),
                modified_at.eq(chrono::Utc::now().naive_utc()),
            ))
            .get_result::<Connection>(conn)
            .await
            .optional()
            .map_err(Into::into)
    }

    /// Returns the deleted row, `None` when no connection matched
    pub async fn delete_connection(&self, uid: &str, org_id: &str) -> Result<Option<Connection>> {
        use crate::schema::connections::dsl::*;

        let conn = &mut self.get_db_conn().await?;
        diesel::delete(connections)
            .filter(id.eq(uid))
            .filter(organization_id.eq(org_id))
            .get_result::<Connection>(conn)
            .await
            .optional()
            .map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connection::tests::test_client;

    #[tokio::test]
    #[ignore = "requires TEST_DATABASE_URL and TEST_REDIS_URL"]
    async fn test_connection_lifecycle_is_organization_scoped() {
        let client = test_client();
        let params = CreateConnectionParams {
            name: "Lifecycle".to_string(),
            integration_type: IntegrationType::Source,
            short_name: "lifecycle_test".to_string(),
            integration_credential_id: None,
        };

        let created = client.create_connection(&params, "org-a").await.unwrap();
        assert!(client
            .get_connection(&created.id, "org-b")
            .await
            .unwrap()
            .is_none());

        let updated = client
            .update_connection_status(&created.id, "org-a", ConnectionStatus::Inactive)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.status, "inactive");

        let active = client
            .get_active_connections_by_integration_type(IntegrationType::Source, "org-a")
            .await
            .unwrap();
        assert!(active.iter().all(|(c, _)| c.id != created.id));

        let deleted = client.delete_connection(&created.id, "org-a").await.unwrap();
        assert!(deleted.is_some());
        assert!(client
            .get_connection(&created.id, "org-a")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    #[ignore = "requires TEST_DATABASE_URL and TEST_REDIS_URL"]
    async fn test_short_name_lookup_loads_credentials() {
        use crate::schema::integration_credentials::dsl as creds;

        let client = test_client();
        let suffix = uuid::Uuid::new_v4().to_string();
        let org = format!("org-{suffix}");
        let short = format!("join_{}", &suffix[..8]);
        let credential_id = format!("cred-{suffix}");

        let conn = &mut client.get_db_conn().await.unwrap();
        diesel::insert_into(creds::integration_credentials)
            .values((
                creds::id.eq(&credential_id),
                creds::name.eq("Workspace token"),
                creds::integration_short_name.eq(&short),
                creds::integration_type.eq("source"),
                creds::auth_type.eq("api_key"),
                creds::organization_id.eq(&org),
            ))
            .execute(conn)
            .await
            .unwrap();

        let with_credential = CreateConnectionParams {
            name: "With credential".to_string(),
            integration_type: IntegrationType::Source,
            short_name: short.clone(),
            integration_credential_id: Some(credential_id.clone()),
        };
        let without_credential = CreateConnectionParams {
            name: "Without credential".to_string(),
            integration_credential_id: None,
            ..with_credential.clone()
        };
        let first = client.create_connection(&with_credential, &org).await.unwrap();
        let second = client.create_connection(&without_credential, &org).await.unwrap();

        let user = User {
            id: suffix.clone(),
            email: format!("{suffix}@example.com"),
            full_name: None,
            organization_id: org.clone(),
            created_at: chrono::Utc::now().naive_utc(),
        };
        let rows = client.get_connections_by_short_name(&short, &user).await.unwrap();

        assert_eq!(rows.len(), 2);
        let loaded = rows.iter().find(|(c, _)| c.id == first.id).unwrap();
        assert_eq!(
            loaded.1.as_ref().map(|cred| cred.id.as_str()),
            Some(credential_id.as_str())
        );
        let bare = rows.iter().find(|(c, _)| c.id == second.id).unwrap();
        assert!(bare.1.is_none());

        let outsider = User {
            organization_id: "org-other".to_string(),
            ..user
        };
        let rows = client.get_connections_by_short_name(&short, &outsider).await.unwrap();
        assert!(rows.is_empty());

        for id in [&first.id, &second.id] {
            client.delete_connection(id, &org).await.unwrap();
        }
        diesel::delete(creds::integration_credentials)
            .filter(creds::id.eq(&credential_id))
            .execute(conn)
            .await
            .unwrap();
    }
}
