use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite};
use time::OffsetDateTime;

use crate::application::repos::{LikesRepo, RepoError};
use crate::domain::slug::CanonicalSlug;

use super::SqliteRepositories;
use super::util::{map_sqlx_error, stored_timestamp};

#[derive(sqlx::FromRow)]
struct SlugCountRow {
    slug: String,
    total: i64,
}

#[async_trait]
impl LikesRepo for SqliteRepositories {
    async fn remove_like(
        &self,
        slug: &CanonicalSlug,
        visitor_id: &str,
    ) -> Result<bool, RepoError> {
        let result = sqlx::query("DELETE FROM post_likes WHERE slug = ? AND visitor_id = ?")
            .bind(slug.as_str())
            .bind(visitor_id)
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn insert_like(
        &self,
        slug: &CanonicalSlug,
        visitor_id: &str,
        created_at: OffsetDateTime,
    ) -> Result<bool, RepoError> {
        let result = sqlx::query(
            "INSERT OR IGNORE INTO post_likes (slug, visitor_id, created_at) VALUES (?, ?, ?)",
        )
        .bind(slug.as_str())
        .bind(visitor_id)
        .bind(stored_timestamp(created_at)?)
        .execute(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn count_likes(&self, slug: &CanonicalSlug) -> Result<u64, RepoError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM post_likes WHERE slug = ?")
            .bind(slug.as_str())
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Self::convert_count(total)
    }

    async fn has_liked(&self, slug: &CanonicalSlug, visitor_id: &str) -> Result<bool, RepoError> {
        let found: Option<i64> =
            sqlx::query_scalar("SELECT 1 FROM post_likes WHERE slug = ? AND visitor_id = ? LIMIT 1")
                .bind(slug.as_str())
                .bind(visitor_id)
                .fetch_optional(self.pool())
                .await
                .map_err(map_sqlx_error)?;

        Ok(found.is_some())
    }

    async fn count_likes_for(
        &self,
        slugs: &[CanonicalSlug],
    ) -> Result<HashMap<String, u64>, RepoError> {
        if slugs.is_empty() {
            return Ok(HashMap::new());
        }

        let mut qb = QueryBuilder::<Sqlite>::new(
            "SELECT slug, COUNT(*) AS total FROM post_likes WHERE slug IN ",
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
