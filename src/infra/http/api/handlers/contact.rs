//! Contact form submissions.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::contact::{ContactCommand, MSG_SENT};

use super::json_body;
use crate::infra::http::api::error::ApiError;
use crate::infra::http::api::models::{ContactRequest, MessageResponse};
use crate::infra::http::api::state::ApiState;

const MSG_FAILURE: &str = "Failed to send message";

pub async fn submit_contact(
    State(state): State<ApiState>,
    payload: Result<Json<ContactRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let request = json_body(payload)?;
    state
        .contact
        .submit(ContactCommand {
            name: request.name,
            email: request.email,
            subject: request.subject,
            message: request.message,
        })
        .await
        .map_err(|err| ApiError::from_service(err, MSG_FAILURE))?;

    Ok((StatusCode::CREATED, Json(MessageResponse::ok(MSG_SENT))))
}
