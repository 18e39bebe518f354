#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response};
use blog_edge::config::EdgeSettings;
use blog_edge::infra::db::SqliteRepositories;
use blog_edge::infra::http::api::cors::CorsPolicy;
use blog_edge::infra::http::{self, ApiState, RateLimiter, RouterState, SiteState};
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::SqlitePool;
use tempfile::TempDir;

pub const SITE_ORIGIN: &str = "https://blog.labjp.xyz";

/// A migrated database in a temporary directory; keep the `TempDir` alive
/// for as long as the pool is used.
pub async fn test_pool() -> (TempDir, SqlitePool) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let url = format!("sqlite://{}", dir.path().join("blog-edge.db").display());
    let pool = SqliteRepositories::connect(&url, 8)
        .await
        .expect("open sqlite database");
    SqliteRepositories::run_migrations(&pool)
        .await
        .expect("apply migrations");
    (dir, pool)
}

pub fn router_state(pool: SqlitePool, site_root: &Path, rate_limit: bool) -> RouterState {
    let repositories = Arc::new(SqliteRepositories::new(pool));
    let cors = CorsPolicy::new([SITE_ORIGIN, "https://labjp.xyz"], SITE_ORIGIN);
    RouterState {
        api: ApiState::from_repositories(
            repositories.clone(),
            cors,
            rate_limit.then(RateLimiter::new),
        ),
        site: SiteState::new(site_root),
        edge: EdgeSettings::default(),
        db: repositories,
    }
}

pub fn app(pool: SqlitePool, site_root: &Path) -> Router {
    http::build_router(router_state(pool, site_root, false))
}

pub fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("build request")
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("build request")
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("read body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("json body")
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("read body")
        .to_bytes();
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}
