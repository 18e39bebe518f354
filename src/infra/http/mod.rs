pub mod api;
mod edge;
mod middleware;
pub mod site;

pub use api::rate_limit::RateLimiter;
pub use api::{ApiState, build_api_router};
pub use site::SiteState;

use std::sync::Arc;

use axum::Router;
use axum::extract::{FromRef, State};
use axum::http::StatusCode;
use axum::middleware as axum_middleware;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use sqlx::Error as SqlxError;

use crate::application::error::ErrorReport;
use crate::config::EdgeSettings;
use crate::infra::db::SqliteRepositories;

use middleware::{log_responses, set_request_context};

#[derive(Clone)]
pub struct RouterState {
    pub api: ApiState,
    pub site: SiteState,
    pub edge: EdgeSettings,
    pub db: Arc<SqliteRepositories>,
}

impl FromRef<RouterState> for ApiState {
    fn from_ref(state: &RouterState) -> Self {
        state.api.clone()
    }
}

impl FromRef<RouterState> for SiteState {
    fn from_ref(state: &RouterState) -> Self {
        state.site.clone()
    }
}

/// Whole application: API, health probe and the static site, behind the
/// locale edge.
pub fn build_router(state: RouterState) -> Router {
    let edge_state = state.clone();

    Router::new()
        .route("/_health/db", get(db_health))
        .merge(build_api_router(state.clone()))
        .fallback(site::serve_site)
        .with_state(state)
        .layer(axum_middleware::from_fn_with_state(
            edge_state,
            edge::locale_edge,
        ))
        .layer(axum_middleware::from_fn(log_responses))
        .layer(axum_middleware::from_fn(set_request_context))
}

async fn db_health(State(state): State<RouterState>) -> Response {
    db_health_response(state.db.health_check().await)
}

fn db_health_response(result: Result<(), SqlxError>) -> Response {
    match result {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => {
            let mut response = StatusCode::SERVICE_UNAVAILABLE.into_response();
            ErrorReport::from_error(
                "infra::http::db_health",
                StatusCode::SERVICE_UNAVAILABLE,
                &err,
            )
            .attach(&mut response);
            response
        }
    }
}
