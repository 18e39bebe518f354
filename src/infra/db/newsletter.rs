use async_trait::async_trait;
use time::OffsetDateTime;

use crate::application::repos::{NewsletterRepo, RepoError};
use crate::domain::entities::SubscriberRecord;

use super::SqliteRepositories;
use super::util::{map_sqlx_error, stored_timestamp};

#[derive(sqlx::FromRow)]
struct SubscriberRow {
    email: String,
    subscribed_at: OffsetDateTime,
    unsubscribed_at: Option<OffsetDateTime>,
}

impl From<SubscriberRow> for SubscriberRecord {
    fn from(row: SubscriberRow) -> Self {
        Self {
            email: row.email,
            subscribed_at: row.subscribed_at,
            unsubscribed_at: row.unsubscribed_at,
        }
    }
}

#[async_trait]
impl NewsletterRepo for SqliteRepositories {
    async fn find_subscriber(&self, email: &str) -> Result<Option<SubscriberRecord>, RepoError> {
        let row = sqlx::query_as::<_, SubscriberRow>(
            "SELECT email, subscribed_at, unsubscribed_at FROM newsletter_subscribers WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(SubscriberRecord::from))
    }

    async fn insert_subscriber(&self, email: &str, at: OffsetDateTime) -> Result<(), RepoError> {
        sqlx::query("INSERT INTO newsletter_subscribers (email, subscribed_at) VALUES (?, ?)")
            .bind(email)
            .bind(stored_timestamp(at)?)
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn resubscribe(&self, email: &str, at: OffsetDateTime) -> Result<(), RepoError> {
        sqlx::query(
            "UPDATE newsletter_subscribers SET unsubscribed_at = NULL, subscribed_at = ? WHERE email = ?",
        )
        .bind(stored_timestamp(at)?)
        .bind(email)
        .execute(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn unsubscribe(&self, email: &str, at: OffsetDateTime) -> Result<bool, RepoError> {
        let result =
            sqlx::query("UPDATE newsletter_subscribers SET unsubscribed_at = ? WHERE email = ?")
                .bind(stored_timestamp(at)?)
                .bind(email)
                .execute(self.pool())
                .await
                .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }
}
