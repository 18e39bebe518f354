use std::sync::Arc;

use time::OffsetDateTime;

use crate::application::error::ServiceError;
use crate::application::repos::ContactRepo;
use crate::application::validation::present;
use crate::domain::entities::NewContactSubmission;
use crate::domain::text::{
    MAX_CONTACT_MESSAGE_CHARS, MAX_CONTACT_NAME_CHARS, MAX_CONTACT_SUBJECT_CHARS, MAX_EMAIL_CHARS,
    exceeds, is_valid_email, normalize_email, sanitize_markup,
};

pub const MSG_FIELDS_REQUIRED: &str = "name, email, and message are required";
pub const MSG_INVALID_EMAIL: &str = "Invalid email format";
pub const MSG_NAME_TOO_LONG: &str = "Name too long (max 100)";
pub const MSG_SUBJECT_TOO_LONG: &str = "Subject too long (max 200)";
pub const MSG_MESSAGE_TOO_LONG: &str = "Message too long (max 5000)";
pub const MSG_SENT: &str = "Message sent successfully";

#[derive(Debug, Clone, Default)]
pub struct ContactCommand {
    pub name: Option<String>,
    pub email: Option<String>,
    pub subject: Option<String>,
    pub message: Option<String>,
}

#[derive(Clone)]
pub struct ContactService {
    submissions: Arc<dyn ContactRepo>,
}

impl ContactService {
    pub fn new(submissions: Arc<dyn ContactRepo>) -> Self {
        Self { submissions }
    }

    pub async fn submit(&self, command: ContactCommand) -> Result<(), ServiceError> {
        let (Some(name), Some(email), Some(message)) = (
            present(command.name.as_deref()),
            present(command.email.as_deref()),
            present(command.message.as_deref()),
        ) else {
            return Err(ServiceError::Validation(MSG_FIELDS_REQUIRED));
        };

        let email = normalize_email(email);
        if exceeds(&email, MAX_EMAIL_CHARS) || !is_valid_email(&email) {
            return Err(ServiceError::Validation(MSG_INVALID_EMAIL));
        }
        if exceeds(name, MAX_CONTACT_NAME_CHARS) {
            return Err(ServiceError::Validation(MSG_NAME_TOO_LONG));
        }
        if exceeds(message, MAX_CONTACT_MESSAGE_CHARS) {
            return Err(ServiceError::Validation(MSG_MESSAGE_TOO_LONG));
        }
        let subject = present(command.subject.as_deref());
        if subject.is_some_and(|subject| exceeds(subject, MAX_CONTACT_SUBJECT_CHARS)) {
            return Err(ServiceError::Validation(MSG_SUBJECT_TOO_LONG));
        }

        let submission = NewContactSubmission {
            name: sanitize_markup(name),
            email,
            subject: subject.map(sanitize_markup),
            message: sanitize_markup(message),
            created_at: OffsetDateTime::now_utc(),
        };
        self.submissions.insert_submission(&submission).await?;
        Ok(())
    }
}
