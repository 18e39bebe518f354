use serde::Serialize;
use time::OffsetDateTime;

use super::slug::CanonicalSlug;

/// Like total for a slug plus whether the asking visitor is among them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LikeState {
    pub likes: u64,
    pub liked: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentRecord {
    pub id: i64,
    pub slug: String,
    pub author: String,
    pub content: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(skip)]
    pub approved: bool,
}

/// Already sanitized comment ready for insertion.
#[derive(Debug, Clone)]
pub struct NewComment {
    pub slug: CanonicalSlug,
    pub author: String,
    pub content: String,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewCount {
    pub slug: String,
    pub views: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostStats {
    pub slug: String,
    pub likes: u64,
    pub comments: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriberRecord {
    pub email: String,
    pub subscribed_at: OffsetDateTime,
    pub unsubscribed_at: Option<OffsetDateTime>,
}

impl SubscriberRecord {
    pub fn is_active(&self) -> bool {
        self.unsubscribed_at.is_none()
    }
}

#[derive(Debug, Clone)]
pub struct NewContactSubmission {
    pub name: String,
    pub email: String,
    pub subject: Option<String>,
    pub message: String,
    pub created_at: OffsetDateTime,
}
