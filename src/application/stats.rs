//! Batched like/comment totals for post listings.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::application::error::ServiceError;
use crate::application::repos::{CommentsRepo, LikesRepo};
use crate::application::validation::canonical_slug;
use crate::domain::entities::PostStats;
use crate::domain::slug::CanonicalSlug;
use crate::domain::text::MAX_STATS_BATCH;

pub const MSG_SLUGS_REQUIRED: &str = "slug or slugs parameter is required";
pub const MSG_TOO_MANY_SLUGS: &str = "Too many slugs (max 100)";
pub const MSG_INVALID_SLUG: &str = "Invalid slug";

/// Resolve the `slug` / `slugs` query parameters into a deduplicated list of
/// canonical slugs. `slug` wins when both are present.
pub fn parse_slug_query(
    slug: Option<&str>,
    slugs: Option<&str>,
) -> Result<Vec<CanonicalSlug>, ServiceError> {
    let raw: Vec<&str> = match (slug, slugs) {
        (Some(single), _) if !single.trim().is_empty() => vec![single],
        (_, Some(batch)) => batch.split(',').collect(),
        _ => Vec::new(),
    };

    let mut parsed: Vec<CanonicalSlug> = Vec::with_capacity(raw.len());
    for item in raw.into_iter().map(str::trim).filter(|item| !item.is_empty()) {
        let slug = canonical_slug(item, MSG_INVALID_SLUG)?;
        if parsed.contains(&slug) {
            continue;
        }
        if parsed.len() == MAX_STATS_BATCH {
            return Err(ServiceError::Validation(MSG_TOO_MANY_SLUGS));
        }
        parsed.push(slug);
    }

    if parsed.is_empty() {
        return Err(ServiceError::Validation(MSG_SLUGS_REQUIRED));
    }
    Ok(parsed)
}

#[derive(Clone)]
pub struct StatsService {
    likes: Arc<dyn LikesRepo>,
    comments: Arc<dyn CommentsRepo>,
}

impl StatsService {
    pub fn new(likes: Arc<dyn LikesRepo>, comments: Arc<dyn CommentsRepo>) -> Self {
        Self { likes, comments }
    }

    /// Two grouped queries regardless of batch size; every requested slug is
    /// present in the result, zero counts included.
    pub async fn stats(
        &self,
        slugs: &[CanonicalSlug],
    ) -> Result<BTreeMap<String, PostStats>, ServiceError> {
        if slugs.is_empty() {
            return Err(ServiceError::Validation(MSG_SLUGS_REQUIRED));
        }

        let likes = self.likes.count_likes_for(slugs).await?;
        let comments = self.comments.count_approved_for(slugs).await?;

        Ok(slugs
            .iter()
            .map(|slug| {
                let key = slug.as_str();
                (
                    key.to_string(),
                    PostStats {
                        slug: key.to_string(),
                        likes: likes.get(key).copied().unwrap_or(0),
                        comments: comments.get(key).copied().unwrap_or(0),
                    },
                )
            })
            .collect())
    }
}
