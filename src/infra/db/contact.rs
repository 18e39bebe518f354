use async_trait::async_trait;

use crate::application::repos::{ContactRepo, RepoError};
use crate::domain::entities::NewContactSubmission;

use super::SqliteRepositories;
use super::util::{map_sqlx_error, stored_timestamp};

#[async_trait]
impl ContactRepo for SqliteRepositories {
    async fn insert_submission(&self, submission: &NewContactSubmission) -> Result<(), RepoError> {
        sqlx::query(
            r#"
            INSERT INTO contact_submissions (name, email, subject, message, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&submission.name)
        .bind(&submission.email)
        .bind(submission.subject.as_deref())
        .bind(&submission.message)
        .bind(stored_timestamp(submission.created_at)?)
        .execute(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }
}
