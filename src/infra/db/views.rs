use async_trait::async_trait;
use time::OffsetDateTime;
use tracing::debug;

use crate::application::repos::{RepoError, ViewsRepo};
use crate::domain::entities::ViewCount;
use crate::domain::slug::CanonicalSlug;

use super::SqliteRepositories;
use super::util::{map_sqlx_error, stored_timestamp};

#[derive(sqlx::FromRow)]
struct ViewRow {
    slug: String,
    views: i64,
}

#[async_trait]
impl ViewsRepo for SqliteRepositories {
    async fn increment_view(
        &self,
        slug: &CanonicalSlug,
        at: OffsetDateTime,
    ) -> Result<u64, RepoError> {
        let views: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO page_views (slug, views, updated_at) VALUES (?, 1, ?)
            ON CONFLICT(slug) DO UPDATE SET
                views = views + 1,
                updated_at = excluded.updated_at
            RETURNING views
            "#,
        )
        .bind(slug.as_str())
        .bind(stored_timestamp(at)?)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Self::convert_count(views)
    }

    async fn list_view_rows(&self) -> Result<Vec<ViewCount>, RepoError> {
        let rows = sqlx::query_as::<_, ViewRow>("SELECT slug, views FROM page_views")
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        rows.into_iter()
            .map(|row| {
                Ok(ViewCount {
                    slug: row.slug,
                    views: Self::convert_count(row.views)?,
                })
            })
            .collect()
    }

    async fn merge_view_row(
        &self,
        legacy_slug: &str,
        canonical: &CanonicalSlug,
        at: OffsetDateTime,
    ) -> Result<(), RepoError> {
        let mut tx = self.begin().await.map_err(map_sqlx_error)?;

        // Write first so the transaction takes the write lock up front.
        sqlx::query(
            r#"
            INSERT INTO page_views (slug, views, updated_at)
            SELECT ?, views, ? FROM page_views WHERE slug = ?
            ON CONFLICT(slug) DO UPDATE SET
                views = views + excluded.views,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(canonical.as_str())
        .bind(stored_timestamp(at)?)
        .bind(legacy_slug)
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        let removed = sqlx::query("DELETE FROM page_views WHERE slug = ?")
            .bind(legacy_slug)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)?;

        debug!(
            target = "blog_edge::infra::db::views",
            legacy = legacy_slug,
            canonical = canonical.as_str(),
            removed = removed.rows_affected(),
            "merged legacy view row"
        );
        Ok(())
    }
}
