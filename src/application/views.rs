use std::sync::Arc;

use metrics::counter;
use time::OffsetDateTime;
use tracing::info;

use crate::application::error::ServiceError;
use crate::application::repos::ViewsRepo;
use crate::application::validation::{canonical_slug, present};
use crate::domain::entities::ViewCount;
use crate::domain::slug::CanonicalSlug;

pub const MSG_INVALID_SLUG: &str = "Invalid slug";

#[derive(Clone)]
pub struct ViewService {
    views: Arc<dyn ViewsRepo>,
}

impl ViewService {
    pub fn new(views: Arc<dyn ViewsRepo>) -> Self {
        Self { views }
    }

    /// Count one view and return the post-increment total.
    pub async fn record(&self, raw_slug: Option<&str>) -> Result<(CanonicalSlug, u64), ServiceError> {
        let raw_slug = present(raw_slug).ok_or(ServiceError::Validation(MSG_INVALID_SLUG))?;
        let slug = canonical_slug(raw_slug, MSG_INVALID_SLUG)?;

        let views = self
            .views
            .increment_view(&slug, OffsetDateTime::now_utc())
            .await?;
        counter!("blog_views_recorded_total").increment(1);

        Ok((slug, views))
    }

    /// Every counter, most viewed first, after folding legacy prefixed rows
    /// into their canonical row.
    pub async fn list(&self) -> Result<Vec<ViewCount>, ServiceError> {
        let rows = self.views.list_view_rows().await?;

        let mergeable: Vec<(String, CanonicalSlug)> = rows
            .iter()
            .filter(|row| CanonicalSlug::is_prefixed(&row.slug))
            .filter_map(|row| {
                let canonical = CanonicalSlug::normalize(&row.slug);
                (!canonical.is_empty()).then_some((row.slug.clone(), canonical))
            })
            .collect();

        if mergeable.is_empty() {
            return Ok(canonical_rows(rows));
        }

        let now = OffsetDateTime::now_utc();
        for (legacy, canonical) in &mergeable {
            self.views.merge_view_row(legacy, canonical, now).await?;
            counter!("blog_view_rows_reconciled_total").increment(1);
        }
        info!(
            target = "blog_edge::views",
            reconciled = mergeable.len(),
            "folded legacy view rows into canonical slugs"
        );

        Ok(canonical_rows(self.views.list_view_rows().await?))
    }
}

/// Rows with no canonical form (a bare `en/`) stay stored but are never listed.
fn canonical_rows(rows: Vec<ViewCount>) -> Vec<ViewCount> {
    sort_views(
        rows.into_iter()
            .filter(|row| !CanonicalSlug::is_prefixed(&row.slug))
            .collect(),
    )
}

fn sort_views(mut rows: Vec<ViewCount>) -> Vec<ViewCount> {
    rows.sort_by(|a, b| b.views.cmp(&a.views).then_with(|| a.slug.cmp(&b.slug)));
    rows
}
