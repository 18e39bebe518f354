mod common;

use std::collections::HashSet;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use blog_edge::infra::http;
use metrics_util::debugging::DebuggingRecorder;
use serde_json::json;
use tower::ServiceExt;

use common::{get, json_request, router_state, test_pool};

#[tokio::test]
async fn request_paths_emit_expected_metric_keys() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    recorder
        .install()
        .expect("debug metrics recorder should install in this test process");

    let (dir, pool) = test_pool().await;
    sqlx::query("INSERT INTO page_views (slug, views, updated_at) VALUES ('en/legacy', 2, '2024-01-01T00:00:00Z')")
        .execute(&pool)
        .await
        .expect("seed legacy view row");
    let app = http::build_router(router_state(pool, dir.path(), true));

    let requests = [
        json_request("POST", "/api/likes", json!({"slug": "a", "visitorId": "v"})),
        json_request("POST", "/api/views", json!({"slug": "a"})),
        json_request(
            "POST",
            "/api/comments",
            json!({"slug": "a", "author": "Ana", "content": "hola"}),
        ),
        get("/api/views"),
        Request::builder()
            .uri("/")
            .header("cf-ipcountry", "ES")
            .body(Body::empty())
            .expect("request should build"),
    ];
    for request in requests {
        let response = app.clone().oneshot(request).await.expect("router should respond");
        assert!(
            response.status().is_success() || response.status() == StatusCode::FOUND,
            "unexpected status {}",
            response.status()
        );
    }

    let mut throttled = false;
    for _ in 0..4 {
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/comments",
                json!({"slug": "a", "author": "Ana", "content": "again"}),
            ))
            .await
            .expect("router should respond");
        throttled |= response.status() == StatusCode::TOO_MANY_REQUESTS;
    }
    assert!(throttled, "comment bucket should throttle");

    let names: HashSet<String> = snapshotter
        .snapshot()
        .into_vec()
        .into_iter()
        .map(|(composite_key, _, _, _)| composite_key.key().name().to_string())
        .collect();

    let expected = [
        "blog_likes_toggled_total",
        "blog_views_recorded_total",
        "blog_view_rows_reconciled_total",
        "blog_comments_created_total",
        "blog_locale_redirects_total",
        "blog_rate_limited_total",
    ];

    for metric in expected {
        assert!(names.contains(metric), "missing metric: {metric}");
    }
}
