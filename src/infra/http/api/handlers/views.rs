//! View counters.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::response::{IntoResponse, Response};

use super::{cached_json, json_body};
use crate::infra::http::api::error::ApiError;
use crate::infra::http::api::models::{ViewRecordedResponse, ViewRequest};
use crate::infra::http::api::state::ApiState;

const MSG_LIST_FAILURE: &str = "Failed to get views";
const MSG_RECORD_FAILURE: &str = "Failed to track view";

pub async fn list_views(State(state): State<ApiState>) -> Result<Response, ApiError> {
    let views = state
        .views
        .list()
        .await
        .map_err(|err| ApiError::from_service(err, MSG_LIST_FAILURE))?;

    Ok(cached_json(views))
}

pub async fn record_view(
    State(state): State<ApiState>,
    payload: Result<Json<ViewRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let request = json_body(payload)?;
    let (slug, views) = state
        .views
        .record(request.slug.as_deref())
        .await
        .map_err(|err| ApiError::from_service(err, MSG_RECORD_FAILURE))?;

    Ok(Json(ViewRecordedResponse {
        success: true,
        slug: slug.into_inner(),
        views,
    }))
}
