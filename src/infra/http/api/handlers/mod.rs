//! API handlers organized by resource.
//!
//! Extraction helpers shared by every resource live here so each endpoint
//! answers malformed input with the same JSON error shape.

mod comments;
mod contact;
mod i18n;
mod likes;
mod newsletter;
mod stats;
mod views;

pub use comments::*;
pub use contact::*;
pub use i18n::*;
pub use likes::*;
pub use newsletter::*;
pub use stats::*;
pub use views::*;

use axum::Json;
use axum::extract::Query;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::{HeaderValue, header};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::debug;

use super::error::ApiError;

const MSG_INVALID_JSON: &str = "Invalid JSON body";
const MSG_INVALID_QUERY: &str = "Invalid query string";
const READ_CACHE_CONTROL: &str = "public, max-age=60";

fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload.map(|Json(body)| body).map_err(|rejection| {
        debug!(
            target = "blog_edge::api",
            reason = %rejection.body_text(),
            "rejected request body"
        );
        ApiError::bad_request(MSG_INVALID_JSON)
    })
}

fn query_params<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, ApiError> {
    query
        .map(|Query(params)| params)
        .map_err(|_| ApiError::bad_request(MSG_INVALID_QUERY))
}

/// JSON body with the short shared cache lifetime of read endpoints.
fn cached_json<T: Serialize>(body: T) -> Response {
    let mut response = Json(body).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static(READ_CACHE_CONTROL),
    );
    response
}

pub async fn api_not_found() -> ApiError {
    ApiError::not_found()
}
