use super::DbClient;
use crate::db::models::{ApiKey, User};
use crate::Result;
use diesel::{
    expression_methods::ExpressionMethods, query_dsl::QueryDsl, OptionalExtension,
    SelectableHelper,
};
use diesel_async::RunQueryDsl;

impl DbClient {
    pub async fn get_user_by_email(&self, user_email: &str) -> Result<Option<User>> {
        use crate::schema::users::dsl::*;

        let conn = &mut self.get_db_conn().await?;
        users
            .filter(email.eq(user_email))
            .first::<User>(conn)
            .await
            .optional()
            .map_err(Into::into)
    }

    /// Resolves the owner of a non-expired API key
    pub async fn get_user_by_api_key(&self, raw_key: &str) -> Result<Option<User>> {
        use crate::schema::{api_keys, users};

        let conn = &mut self.get_db_conn().await?;
        let row = api_keys::table
            .inner_join(users::table)
            .filter(api_keys::key.eq(raw_key))
            .select((ApiKey::as_select(), users::all_columns))
            .first::<(ApiKey, User)>(conn)
            .await
            .optional()?;

        let now = chrono::Utc::now().naive_utc();
        Ok(row.and_then(|(api_key, user)| {
            if api_key.is_expired(now) {
                tracing::warn!("Rejected expired API key for user {}", user.id);
                None
            } else {
                Some(user)
            }
        }))
    }
}
