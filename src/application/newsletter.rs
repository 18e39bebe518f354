use std::sync::Arc;

use time::OffsetDateTime;
use tracing::debug;

use crate::application::error::ServiceError;
use crate::application::repos::{NewsletterRepo, RepoError};
use crate::application::validation::present;
use crate::domain::text::{MAX_EMAIL_CHARS, exceeds, is_valid_email, normalize_email};

pub const MSG_VALID_EMAIL_REQUIRED: &str = "Valid email is required";
pub const MSG_EMAIL_REQUIRED: &str = "Email is required";
pub const MSG_SUBSCRIBED: &str = "Subscribed successfully";
pub const MSG_UNSUBSCRIBED: &str = "Unsubscribed successfully";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscribeOutcome {
    Created,
    Resubscribed,
    AlreadySubscribed,
}

impl SubscribeOutcome {
    pub fn is_new(self) -> bool {
        matches!(self, SubscribeOutcome::Created)
    }
}

#[derive(Clone)]
pub struct NewsletterService {
    subscribers: Arc<dyn NewsletterRepo>,
}

impl NewsletterService {
    pub fn new(subscribers: Arc<dyn NewsletterRepo>) -> Self {
        Self { subscribers }
    }

    pub async fn subscribe(&self, email: Option<&str>) -> Result<SubscribeOutcome, ServiceError> {
        let email = present(email)
            .map(normalize_email)
            .filter(|email| !exceeds(email, MAX_EMAIL_CHARS) && is_valid_email(email))
            .ok_or(ServiceError::Validation(MSG_VALID_EMAIL_REQUIRED))?;
        let now = OffsetDateTime::now_utc();

        if let Some(existing) = self.subscribers.find_subscriber(&email).await? {
            if existing.is_active() {
                return Ok(SubscribeOutcome::AlreadySubscribed);
            }
            self.subscribers.resubscribe(&email, now).await?;
            return Ok(SubscribeOutcome::Resubscribed);
        }

        match self.subscribers.insert_subscriber(&email, now).await {
            Ok(()) => Ok(SubscribeOutcome::Created),
            Err(RepoError::Duplicate { .. }) => {
                debug!(
                    target = "blog_edge::newsletter",
                    "subscriber inserted concurrently"
                );
                Ok(SubscribeOutcome::AlreadySubscribed)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Unknown addresses succeed silently so the endpoint cannot be used to
    /// enumerate subscribers.
    pub async fn unsubscribe(&self, email: Option<&str>) -> Result<(), ServiceError> {
        let email = present(email)
            .map(normalize_email)
            .ok_or(ServiceError::Validation(MSG_EMAIL_REQUIRED))?;

        let matched = self
            .subscribers
            .unsubscribe(&email, OffsetDateTime::now_utc())
            .await?;
        debug!(target = "blog_edge::newsletter", matched, "unsubscribe processed");
        Ok(())
    }
}
