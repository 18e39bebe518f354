//! Visitor comments.

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::application::comments::AddCommentCommand;

use super::{cached_json, json_body, query_params};
use crate::infra::http::api::error::ApiError;
use crate::infra::http::api::models::{CommentCreatedResponse, CommentRequest, SlugQuery};
use crate::infra::http::api::state::ApiState;

const MSG_LIST_FAILURE: &str = "Failed to get comments";
const MSG_ADD_FAILURE: &str = "Failed to add comment";

pub async fn list_comments(
    State(state): State<ApiState>,
    query: Result<Query<SlugQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let query = query_params(query)?;
    let comments = state
        .comments
        .list(query.slug.as_deref())
        .await
        .map_err(|err| ApiError::from_service(err, MSG_LIST_FAILURE))?;

    Ok(cached_json(comments))
}

pub async fn add_comment(
    State(state): State<ApiState>,
    payload: Result<Json<CommentRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let request = json_body(payload)?;
    let comment = state
        .comments
        .add(AddCommentCommand {
            slug: request.slug,
            author: request.author,
            content: request.content,
        })
        .await
        .map_err(|err| ApiError::from_service(err, MSG_ADD_FAILURE))?;

    Ok((
        StatusCode::CREATED,
        Json(CommentCreatedResponse {
            success: true,
            comment,
        }),
    ))
}
