//! Repository traits describing persistence adapters.

use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;
use time::OffsetDateTime;

use crate::domain::entities::{
    CommentRecord, NewComment, NewContactSubmission, SubscriberRecord, ViewCount,
};
use crate::domain::slug::CanonicalSlug;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("duplicate record violates unique constraint `{constraint}`")]
    Duplicate { constraint: String },
    #[error("resource not found")]
    NotFound,
    #[error("integrity error: {message}")]
    Integrity { message: String },
    #[error("database timeout")]
    Timeout,
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

#[async_trait]
pub trait LikesRepo: Send + Sync {
    /// Returns `true` when a like existed and was removed.
    async fn remove_like(&self, slug: &CanonicalSlug, visitor_id: &str)
    -> Result<bool, RepoError>;

    /// Returns `true` when a new row was written; an existing pair is left alone.
    async fn insert_like(
        &self,
        slug: &CanonicalSlug,
        visitor_id: &str,
        created_at: OffsetDateTime,
    ) -> Result<bool, RepoError>;

    async fn count_likes(&self, slug: &CanonicalSlug) -> Result<u64, RepoError>;

    async fn has_liked(&self, slug: &CanonicalSlug, visitor_id: &str) -> Result<bool, RepoError>;

    /// One grouped query; slugs without likes are absent from the map.
    async fn count_likes_for(
        &self,
        slugs: &[CanonicalSlug],
    ) -> Result<HashMap<String, u64>, RepoError>;
}

#[async_trait]
pub trait ViewsRepo: Send + Sync {
    /// Atomically add one view, creating the row on first sight.
    async fn increment_view(
        &self,
        slug: &CanonicalSlug,
        at: OffsetDateTime,
    ) -> Result<u64, RepoError>;

    /// Every stored row, including legacy rows keyed by prefixed slugs.
    async fn list_view_rows(&self) -> Result<Vec<ViewCount>, RepoError>;

    /// Fold the legacy row into `canonical` and delete it, in one transaction.
    async fn merge_view_row(
        &self,
        legacy_slug: &str,
        canonical: &CanonicalSlug,
        at: OffsetDateTime,
    ) -> Result<(), RepoError>;
}

#[async_trait]
pub trait CommentsRepo: Send + Sync {
    async fn insert_comment(&self, comment: &NewComment) -> Result<(), RepoError>;

    /// Most recently inserted comment for the slug.
    async fn latest_comment(&self, slug: &CanonicalSlug)
    -> Result<Option<CommentRecord>, RepoError>;

    /// Approved comments, newest first.
    async fn list_approved(&self, slug: &CanonicalSlug) -> Result<Vec<CommentRecord>, RepoError>;

    /// One grouped query over approved comments; empty slugs are absent.
    async fn count_approved_for(
        &self,
        slugs: &[CanonicalSlug],
    ) -> Result<HashMap<String, u64>, RepoError>;
}

#[async_trait]
pub trait NewsletterRepo: Send + Sync {
    async fn find_subscriber(&self, email: &str) -> Result<Option<SubscriberRecord>, RepoError>;

    /// Fails with [`RepoError::Duplicate`] when the address already exists.
    async fn insert_subscriber(&self, email: &str, at: OffsetDateTime) -> Result<(), RepoError>;

    async fn resubscribe(&self, email: &str, at: OffsetDateTime) -> Result<(), RepoError>;

    /// Returns `true` when a row matched.
    async fn unsubscribe(&self, email: &str, at: OffsetDateTime) -> Result<bool, RepoError>;
}

#[async_trait]
pub trait ContactRepo: Send + Sync {
    async fn insert_submission(&self, submission: &NewContactSubmission) -> Result<(), RepoError>;
}
