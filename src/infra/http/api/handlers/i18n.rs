//! UI dictionary for client-side scripts.

use axum::extract::Path;
use axum::http::StatusCode;
use axum::response::Response;

use crate::domain::i18n::ClientDictionary;
use crate::domain::locale::Locale;

use super::cached_json;
use crate::infra::http::api::error::ApiError;

const MSG_UNSUPPORTED: &str = "Unsupported language";

pub async fn get_dictionary(Path(lang): Path<String>) -> Result<Response, ApiError> {
    let locale = lang
        .parse::<Locale>()
        .map_err(|_| ApiError::new(StatusCode::NOT_FOUND, MSG_UNSUPPORTED))?;
    Ok(cached_json(ClientDictionary::for_locale(locale)))
}
