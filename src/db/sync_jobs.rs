use super::DbClient;
use crate::db::models::{Connection, SyncJob};
use crate::Result;
use diesel_async::RunQueryDsl;

impl DbClient {
    /// Records a pending sync job for `connection`
    pub async fn create_sync_job(&self, connection: &Connection) -> Result<SyncJob> {
        use crate::schema::sync_jobs::dsl::*;

        let job = SyncJob::pending_for(connection);
        let conn = &mut self.get_db_conn().await?;
        diesel::insert_into(sync_jobs)
            .values(&job)
            .get_result::<SyncJob>(conn)
            .await
            .map_err(Into::into)
    }
}
