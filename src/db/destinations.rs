use super::DbClient;
use crate::db::models::Destination;
use crate::Result;
use diesel::{expression_methods::ExpressionMethods, query_dsl::QueryDsl, OptionalExtension};
use diesel_async::RunQueryDsl;
use tracing::{error, info};

const DESTINATIONS_CACHE_KEY: &str = "destinations:list";

/// DbClient helper functions for the destinations table
impl DbClient {
    /// Retrieves every registered destination, served from the cache when warm
    pub async fn get_destinations(&self) -> Result<Vec<Destination>> {
        use crate::schema::destinations::dsl::*;

        if let Some(cached) = self.get_cached_json(DESTINATIONS_CACHE_KEY).await {
            return Ok(cached);
        }

        let conn = &mut self.get_db_conn().await?;

        info!("Fetching list of destinations");
        let rows = destinations
            .order_by(name)
            .load::<Destination>(conn)
            .await
            .map_err(|e| {
                error!("Failed to fetch destinations: {}", e);
                e
            })?;

        self.put_cached_json(DESTINATIONS_CACHE_KEY, &rows).await;
        Ok(rows)
    }

    pub async fn get_destination_by_short_name(&self, name_: &str) -> Result<Option<Destination>> {
        use crate::schema::destinations::dsl::*;

        let conn = &mut self.get_db_conn().await?;
        destinations
            .filter(short_name.eq(name_))
            .first::<Destination>(conn)
            .await
            .optional()
            .map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use crate::db::connection::tests::test_client;

    #[tokio::test]
    #[ignore = "requires TEST_DATABASE_URL and TEST_REDIS_URL"]
    async fn test_get_destinations() {
        let client = test_client();
        let result = client.get_destinations().await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    #[ignore = "requires TEST_DATABASE_URL and TEST_REDIS_URL"]
    async fn test_missing_destination_is_none() {
        let client = test_client();
        let result = client
            .get_destination_by_short_name("no-such-destination")
            .await
            .unwrap();
        assert!(result.is_none());
    }
}
