//! Batched like/comment totals.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::response::Response;

use crate::application::stats::parse_slug_query;

use super::{cached_json, query_params};
use crate::infra::http::api::error::ApiError;
use crate::infra::http::api::models::StatsQuery;
use crate::infra::http::api::state::ApiState;

const MSG_FAILURE: &str = "Failed to get stats";

pub async fn get_stats(
    State(state): State<ApiState>,
    query: Result<Query<StatsQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let query = query_params(query)?;
    let slugs = parse_slug_query(query.slug.as_deref(), query.slugs.as_deref())
        .map_err(|err| ApiError::from_service(err, MSG_FAILURE))?;

    let stats = state
        .stats
        .stats(&slugs)
        .await
        .map_err(|err| ApiError::from_service(err, MSG_FAILURE))?;

    Ok(cached_json(stats))
}
