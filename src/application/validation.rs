//! Request field checks shared by the counter services. Every check runs
//! before any repository call.

use crate::domain::slug::CanonicalSlug;
use crate::domain::text::{MAX_SLUG_CHARS, exceeds};

use super::error::ServiceError;

/// Normalize a raw slug, rejecting oversize input and slugs that are nothing
/// but a locale prefix.
pub fn canonical_slug(raw: &str, invalid: &'static str) -> Result<CanonicalSlug, ServiceError> {
    if exceeds(raw, MAX_SLUG_CHARS) {
        return Err(ServiceError::Validation(invalid));
    }
    let slug = CanonicalSlug::normalize(raw.trim());
    if slug.is_empty() {
        return Err(ServiceError::Validation(invalid));
    }
    Ok(slug)
}

/// `None` and blank strings count as missing.
pub fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.trim().is_empty())
}
