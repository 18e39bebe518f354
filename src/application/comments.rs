use std::sync::Arc;

use metrics::counter;
use time::OffsetDateTime;

use crate::application::error::ServiceError;
use crate::application::repos::{CommentsRepo, RepoError};
use crate::application::validation::{canonical_slug, present};
use crate::domain::entities::{CommentRecord, NewComment};
use crate::domain::text::{MAX_AUTHOR_CHARS, MAX_COMMENT_CHARS, exceeds, sanitize_markup};

pub const MSG_SLUG_REQUIRED: &str = "slug is required";
pub const MSG_FIELDS_REQUIRED: &str = "slug, author, and content are required";
pub const MSG_AUTHOR_TOO_LONG: &str = "Author name too long (max 100)";
pub const MSG_CONTENT_TOO_LONG: &str = "Comment too long (max 2000)";
pub const MSG_INVALID_SLUG: &str = "Invalid slug";

#[derive(Debug, Clone, Default)]
pub struct AddCommentCommand {
    pub slug: Option<String>,
    pub author: Option<String>,
    pub content: Option<String>,
}

#[derive(Clone)]
pub struct CommentService {
    comments: Arc<dyn CommentsRepo>,
}

impl CommentService {
    pub fn new(comments: Arc<dyn CommentsRepo>) -> Self {
        Self { comments }
    }

    pub async fn list(&self, raw_slug: Option<&str>) -> Result<Vec<CommentRecord>, ServiceError> {
        let raw_slug = present(raw_slug).ok_or(ServiceError::Validation(MSG_SLUG_REQUIRED))?;
        let slug = canonical_slug(raw_slug, MSG_INVALID_SLUG)?;
        Ok(self.comments.list_approved(&slug).await?)
    }

    /// Bounds are checked on the text as submitted; the stored text is the
    /// escaped form.
    pub async fn add(&self, command: AddCommentCommand) -> Result<CommentRecord, ServiceError> {
        let (Some(raw_slug), Some(author), Some(content)) = (
            present(command.slug.as_deref()),
            present(command.author.as_deref()),
            present(command.content.as_deref()),
        ) else {
            return Err(ServiceError::Validation(MSG_FIELDS_REQUIRED));
        };

        if exceeds(author, MAX_AUTHOR_CHARS) {
            return Err(ServiceError::Validation(MSG_AUTHOR_TOO_LONG));
        }
        if exceeds(content, MAX_COMMENT_CHARS) {
            return Err(ServiceError::Validation(MSG_CONTENT_TOO_LONG));
        }
        let slug = canonical_slug(raw_slug, MSG_INVALID_SLUG)?;

        let comment = NewComment {
            slug,
            author: sanitize_markup(author),
            content: sanitize_markup(content),
            created_at: OffsetDateTime::now_utc(),
        };
        self.comments.insert_comment(&comment).await?;

        let created = self
            .comments
            .latest_comment(&comment.slug)
            .await?
            .ok_or(RepoError::NotFound)?;
        counter!("blog_comments_created_total").increment(1);

        Ok(created)
    }
}
