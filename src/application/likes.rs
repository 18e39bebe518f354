use std::sync::Arc;

use metrics::counter;
use time::OffsetDateTime;

use crate::application::error::ServiceError;
use crate::application::repos::LikesRepo;
use crate::application::validation::{canonical_slug, present};
use crate::domain::entities::LikeState;
use crate::domain::slug::CanonicalSlug;
use crate::domain::text::is_valid_visitor_id;

pub const MSG_TOGGLE_REQUIRED: &str = "slug and visitorId are required";
pub const MSG_SLUG_REQUIRED: &str = "slug is required";
pub const MSG_INVALID: &str = "Invalid slug or visitorId";

#[derive(Clone)]
pub struct LikeService {
    likes: Arc<dyn LikesRepo>,
}

impl LikeService {
    pub fn new(likes: Arc<dyn LikesRepo>) -> Self {
        Self { likes }
    }

    /// Flip the visitor's like for the slug and report the recounted total.
    pub async fn toggle(
        &self,
        raw_slug: Option<&str>,
        visitor_id: Option<&str>,
    ) -> Result<(CanonicalSlug, LikeState), ServiceError> {
        let (Some(raw_slug), Some(visitor_id)) = (present(raw_slug), present(visitor_id)) else {
            return Err(ServiceError::Validation(MSG_TOGGLE_REQUIRED));
        };
        let slug = canonical_slug(raw_slug, MSG_INVALID)?;
        if !is_valid_visitor_id(visitor_id) {
            return Err(ServiceError::Validation(MSG_INVALID));
        }

        let removed = self.likes.remove_like(&slug, visitor_id).await?;
        if !removed {
            // A concurrent toggle may have inserted the pair already; the like
            // exists either way.
            self.likes
                .insert_like(&slug, visitor_id, OffsetDateTime::now_utc())
                .await?;
        }
        let likes = self.likes.count_likes(&slug).await?;

        counter!("blog_likes_toggled_total", "liked" => if removed { "false" } else { "true" })
            .increment(1);

        Ok((
            slug,
            LikeState {
                likes,
                liked: !removed,
            },
        ))
    }

    pub async fn get(
        &self,
        raw_slug: Option<&str>,
        visitor_id: Option<&str>,
    ) -> Result<(CanonicalSlug, LikeState), ServiceError> {
        let Some(raw_slug) = present(raw_slug) else {
            return Err(ServiceError::Validation(MSG_SLUG_REQUIRED));
        };
        let slug = canonical_slug(raw_slug, MSG_INVALID)?;
        let visitor_id = present(visitor_id);
        if visitor_id.is_some_and(|id| !is_valid_visitor_id(id)) {
            return Err(ServiceError::Validation(MSG_INVALID));
        }

        let likes = self.likes.count_likes(&slug).await?;
        let liked = match visitor_id {
            Some(id) => self.likes.has_liked(&slug, id).await?,
            None => false,
        };

        Ok((slug, LikeState { likes, liked }))
    }
}
