use super::DbClient;
use crate::db::models::Source;
use crate::Result;
use diesel::{expression_methods::ExpressionMethods, query_dsl::QueryDsl, OptionalExtension};
use diesel_async::RunQueryDsl;
use tracing::{error, info};

const SOURCES_CACHE_KEY: &str = "sources:list";

/// DbClient helper functions for the sources table
impl DbClient {
    /// Retrieves every registered source, served from the cache when warm
    pub async fn get_sources(&self) -> Result<Vec<Source>> {
        use crate::schema::sources::dsl::*;

        if let Some(cached) = self.get_cached_json(SOURCES_CACHE_KEY).await {
            return Ok(cached);
        }

        let conn = &mut self.get_db_conn().await?;

        info!("Fetching list of sources");
        let rows = sources
            .order_by(name)
            .load::<Source>(conn)
            .await
            .map_err(|e| {
                error!("Failed to fetch sources: {}", e);
                e
            })?;

        self.put_cached_json(SOURCES_CACHE_KEY, &rows).await;
        Ok(rows)
    }

    pub async fn get_source_by_short_name(&self, name_: &str) -> Result<Option<Source>> {
        use crate::schema::sources::dsl::*;

        let conn = &mut self.get_db_conn().await?;
        sources
            .filter(short_name.eq(name_))
            .first::<Source>(conn)
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
    async fn test_get_sources() {
        let client = test_client();
        let result = client.get_sources().await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    #[ignore = "requires TEST_DATABASE_URL and TEST_REDIS_URL"]
    async fn test_missing_source_is_none() {
        let client = test_client();
        let result = client
            .get_source_by_short_name("no-such-source")
            .await
            .unwrap();
        assert!(result.is_none());
    }
}
