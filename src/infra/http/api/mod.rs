pub mod cors;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod rate_limit;
pub mod state;

pub use state::ApiState;

use axum::{
    Router, middleware as axum_middleware,
    routing::{any, get, post},
};

use crate::infra::http::RouterState;

pub fn build_api_router(state: RouterState) -> Router<RouterState> {
    let cors_state = state.api.clone();
    let rate_state = state.api.clone();

    Router::new()
        .route(
            "/api/comments",
            get(handlers::list_comments).post(handlers::add_comment),
        )
        .route("/api/contact", post(handlers::submit_contact))
        .route(
            "/api/likes",
            get(handlers::get_likes).post(handlers::toggle_like),
        )
        .route(
            "/api/newsletter",
            post(handlers::subscribe).delete(handlers::unsubscribe),
        )
        .route("/api/stats", get(handlers::get_stats))
        .route(
            "/api/views",
            get(handlers::list_views).post(handlers::record_view),
        )
        .route("/api/i18n/{lang}", get(handlers::get_dictionary))
        .route("/api/{*rest}", any(handlers::api_not_found))
        .layer(axum_middleware::from_fn_with_state(
            rate_state,
            middleware::api_rate_limit,
        ))
        .layer(axum_middleware::from_fn_with_state(
            cors_state,
            cors::api_cors,
        ))
}
