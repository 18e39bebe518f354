//! Newsletter subscription lifecycle.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::newsletter::{MSG_SUBSCRIBED, MSG_UNSUBSCRIBED};

use super::json_body;
use crate::infra::http::api::error::ApiError;
use crate::infra::http::api::models::{MessageResponse, NewsletterRequest};
use crate::infra::http::api::state::ApiState;

const MSG_FAILURE: &str = "Internal server error";

/// `201` for a new address, `200` when it was already known.
pub async fn subscribe(
    State(state): State<ApiState>,
    payload: Result<Json<NewsletterRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let request = json_body(payload)?;
    let outcome = state
        .newsletter
        .subscribe(request.email.as_deref())
        .await
        .map_err(|err| ApiError::from_service(err, MSG_FAILURE))?;

    let status = if outcome.is_new() {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(MessageResponse::ok(MSG_SUBSCRIBED))))
}

pub async fn unsubscribe(
    State(state): State<ApiState>,
    payload: Result<Json<NewsletterRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let request = json_body(payload)?;
    state
        .newsletter
        .unsubscribe(request.email.as_deref())
        .await
        .map_err(|err| ApiError::from_service(err, MSG_FAILURE))?;

    Ok(Json(MessageResponse::ok(MSG_UNSUBSCRIBED)))
}
