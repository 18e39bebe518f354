//! Like toggling and lookup.

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::response::IntoResponse;

use crate::domain::entities::LikeState;
use crate::domain::slug::CanonicalSlug;

use super::{json_body, query_params};
use crate::infra::http::api::error::ApiError;
use crate::infra::http::api::models::{LikeRequest, LikeResponse, LikesQuery};
use crate::infra::http::api::state::ApiState;

const MSG_FAILURE: &str = "Internal server error";

pub async fn toggle_like(
    State(state): State<ApiState>,
    payload: Result<Json<LikeRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let request = json_body(payload)?;
    let (slug, like) = state
        .likes
        .toggle(request.slug.as_deref(), request.visitor_id.as_deref())
        .await
        .map_err(|err| ApiError::from_service(err, MSG_FAILURE))?;

    Ok(Json(like_response(slug, like)))
}

pub async fn get_likes(
    State(state): State<ApiState>,
    query: Result<Query<LikesQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let query = query_params(query)?;
    let (slug, like) = state
        .likes
        .get(query.slug.as_deref(), query.visitor_id.as_deref())
        .await
        .map_err(|err| ApiError::from_service(err, MSG_FAILURE))?;

    Ok(Json(like_response(slug, like)))
}

fn like_response(slug: CanonicalSlug, like: LikeState) -> LikeResponse {
    LikeResponse {
        slug: slug.into_inner(),
        likes: like.likes,
        liked: like.liked,
    }
}
