use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite};
use time::OffsetDateTime;

use crate::application::repos::{CommentsRepo, RepoError};
use crate::domain::entities::{CommentRecord, NewComment};
use crate::domain::slug::CanonicalSlug;

use super::SqliteRepositories;
use super::util::{map_sqlx_error, stored_timestamp};

#[derive(sqlx::FromRow)]
struct CommentRow {
    id: i64,
    slug: String,
    author: String,
    content: String,
    created_at: OffsetDateTime,
    approved: bool,
}

impl From<CommentRow> for CommentRecord {
    fn from(row: CommentRow) -> Self {
        Self {
            id: row.id,
            slug: row.slug,
            author: row.author,
            content: row.content,
            created_at: row.created_at,
            approved: row.approved,
        }
    }
}

#[derive(sqlx::FromRow)]
struct SlugCountRow {
    slug: String,
    total: i64,
}

#[async_trait]
impl CommentsRepo for SqliteRepositories {
    async fn insert_comment(&self, comment: &NewComment) -> Result<(), RepoError> {
        sqlx::query(
            "INSERT INTO comments (slug, author, content, created_at, approved) VALUES (?, ?, ?, ?, 1)",
        )
        .bind(comment.slug.as_str())
        .bind(&comment.author)
        .bind(&comment.content)
        .bind(stored_timestamp(comment.created_at)?)
        .execute(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn latest_comment(
        &self,
        slug: &CanonicalSlug,
    ) -> Result<Option<CommentRecord>, RepoError> {
        let row = sqlx::query_as::<_, CommentRow>(
            r#"
            SELECT id, slug, author, content, created_at, approved
            FROM comments
            WHERE slug = ?
            ORDER BY id DESC
            LIMIT 1
            "#,
        )
        .bind(slug.as_str())
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(CommentRecord::from))
    }

    async fn list_approved(&self, slug: &CanonicalSlug) -> Result<Vec<CommentRecord>, RepoError> {
        let rows = sqlx::query_as::<_, CommentRow>(
            r#"
            SELECT id, slug, author, content, created_at, approved
            FROM comments
            WHERE slug = ? AND approved = 1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(slug.as_str())
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(CommentRecord::from).collect())
    }

    async fn count_approved_for(
        &self,
        slugs: &[CanonicalSlug],
    ) -> Result<HashMap<String, u64>, RepoError> {
        if slugs.is_empty() {
            return Ok(HashMap::new());
        }

        let mut qb = QueryBuilder::<Sqlite>::new(
            "SELECT slug, COUNT(*) AS total FROM comments WHERE approved = 1 AND slug IN ",
        );
        Self::push_slug_list(&mut qb, slugs);
        qb.push(" GROUP BY slug");

        let rows = qb
            .build_query_as::<SlugCountRow>()
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        rows.into_iter()
            .map(|row| Ok((row.slug, Self::convert_count(row.total)?)))
            .collect()
    }
}
