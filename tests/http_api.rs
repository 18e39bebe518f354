mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use blog_edge::infra::http;
use serde_json::json;
use tower::ServiceExt;

use common::{SITE_ORIGIN, app, body_json, get, json_request, router_state, test_pool};

#[tokio::test]
async fn like_toggle_round_trip_over_http() {
    let (dir, pool) = test_pool().await;
    let app = app(pool, dir.path());

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/likes",
            json!({"slug": "en/hello", "visitorId": "v-1"}),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        SITE_ORIGIN
    );
    assert!(response.headers().get(header::CACHE_CONTROL).is_none());
    assert_eq!(
        body_json(response).await,
        json!({"slug": "hello", "likes": 1, "liked": true})
    );

    let response = app
        .oneshot(get("/api/likes?slug=es/hello&visitorId=v-1"))
        .await
        .expect("response");
    assert_eq!(
        body_json(response).await,
        json!({"slug": "hello", "likes": 1, "liked": true})
    );
}

#[tokio::test]
async fn validation_failures_are_json_400s() {
    let (dir, pool) = test_pool().await;
    let app = app(pool, dir.path());

    let cases = [
        (
            json_request("POST", "/api/likes", json!({"slug": "x"})),
            "slug and visitorId are required",
        ),
        (get("/api/likes"), "slug is required"),
        (get("/api/comments"), "slug is required"),
        (get("/api/stats"), "slug or slugs parameter is required"),
        (
            json_request("POST", "/api/views", json!({"slug": ""})),
            "Invalid slug",
        ),
        (
            json_request("POST", "/api/newsletter", json!({"email": "nope"})),
            "Valid email is required",
        ),
        (
            json_request("DELETE", "/api/newsletter", json!({})),
            "Email is required",
        ),
        (
            json_request(
                "POST",
                "/api/contact",
                json!({"name": "Ana", "email": "bad", "message": "hi"}),
            ),
            "Invalid email format",
        ),
    ];

    for (request, message) in cases {
        let uri = request.uri().to_string();
        let response = app.clone().oneshot(request).await.expect("response");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body_json(response).await, json!({"error": message}), "{uri}");
    }
}

#[tokio::test]
async fn malformed_json_is_rejected() {
    let (dir, pool) = test_pool().await;
    let request = Request::builder()
        .method("POST")
        .uri("/api/comments")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .expect("request");

    let response = app(pool, dir.path()).oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await,
        json!({"error": "Invalid JSON body"})
    );
}

#[tokio::test]
async fn comment_flow_returns_created_and_cached_list() {
    let (dir, pool) = test_pool().await;
    let app = app(pool, dir.path());

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/comments",
            json!({"slug": "es/post", "author": "Ana", "content": "<b>hola</b>"}),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["comment"]["slug"], json!("post"));
    assert_eq!(body["comment"]["content"], json!("&lt;b&gt;hola&lt;/b&gt;"));
    assert!(body["comment"]["created_at"].is_string());
    assert!(body["comment"].get("approved").is_none());

    let response = app
        .oneshot(get("/api/comments?slug=post"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CACHE_CONTROL],
        "public, max-age=60"
    );
    let listed = body_json(response).await;
    assert_eq!(listed.as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn views_and_stats_endpoints() {
    let (dir, pool) = test_pool().await;
    let app = app(pool, dir.path());

    for slug in ["en/a", "a", "b"] {
        let response = app
            .clone()
            .oneshot(json_request("POST", "/api/views", json!({"slug": slug})))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app.clone().oneshot(get("/api/views")).await.expect("response");
    assert_eq!(
        response.headers()[header::CACHE_CONTROL],
        "public, max-age=60"
    );
    assert_eq!(
        body_json(response).await,
        json!([{"slug": "a", "views": 2}, {"slug": "b", "views": 1}])
    );

    let response = app
        .oneshot(get("/api/stats?slugs=a,en/a,es/b"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({
            "a": {"slug": "a", "likes": 0, "comments": 0},
            "b": {"slug": "b", "likes": 0, "comments": 0}
        })
    );
}

#[tokio::test]
async fn newsletter_status_distinguishes_new_subscribers() {
    let (dir, pool) = test_pool().await;
    let app = app(pool, dir.path());
    let subscribe = || json_request("POST", "/api/newsletter", json!({"email": "A@B.io"}));

    let first = app.clone().oneshot(subscribe()).await.expect("response");
    assert_eq!(first.status(), StatusCode::CREATED);
    let second = app.clone().oneshot(subscribe()).await.expect("response");
    assert_eq!(second.status(), StatusCode::OK);
    assert_eq!(
        body_json(second).await,
        json!({"success": true, "message": "Subscribed successfully"})
    );

    let response = app
        .oneshot(json_request(
            "DELETE",
            "/api/newsletter",
            json!({"email": "a@b.io"}),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({"success": true, "message": "Unsubscribed successfully"})
    );
}

#[tokio::test]
async fn contact_submission_is_created() {
    let (dir, pool) = test_pool().await;
    let response = app(pool, dir.path())
        .oneshot(json_request(
            "POST",
            "/api/contact",
            json!({"name": "Ana", "email": "ana@example.com", "subject": "Hi", "message": "Hola"}),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(
        body_json(response).await,
        json!({"success": true, "message": "Message sent successfully"})
    );
}

#[tokio::test]
async fn preflight_answers_with_cors_headers() {
    let (dir, pool) = test_pool().await;
    let request = Request::builder()
        .method("OPTIONS")
        .uri("/api/newsletter")
        .header(header::ORIGIN, "https://labjp.xyz")
        .body(Body::empty())
        .expect("request");

    let response = app(pool, dir.path()).oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "https://labjp.xyz");
    assert_eq!(
        headers[header::ACCESS_CONTROL_ALLOW_METHODS],
        "GET, POST, DELETE, OPTIONS"
    );
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_HEADERS], "Content-Type");
}

#[tokio::test]
async fn unknown_api_paths_are_json_404s() {
    let (dir, pool) = test_pool().await;
    let response = app(pool, dir.path())
        .oneshot(get("/api/unknown"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        SITE_ORIGIN
    );
    assert_eq!(body_json(response).await, json!({"error": "Not found"}));
}

#[tokio::test]
async fn store_failures_hide_the_cause() {
    let (dir, pool) = test_pool().await;
    let app = app(pool.clone(), dir.path());
    pool.close().await;

    let response = app
        .clone()
        .oneshot(get("/api/stats?slug=a"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(response).await,
        json!({"error": "Failed to get stats"})
    );

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/likes",
            json!({"slug": "a", "visitorId": "v"}),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(response).await,
        json!({"error": "Internal server error"})
    );

    let response = app.oneshot(get("/_health/db")).await.expect("response");
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn throttling_applies_only_when_enabled() {
    let (dir, pool) = test_pool().await;
    let limited = http::build_router(router_state(pool.clone(), dir.path(), true));
    let request = || {
        let mut request = json_request("POST", "/api/newsletter", json!({"email": "x@y.io"}));
        request
            .headers_mut()
            .insert("cf-connecting-ip", "203.0.113.9".parse().expect("header"));
        request
    };

    for _ in 0..2 {
        let response = limited.clone().oneshot(request()).await.expect("response");
        assert!(response.status().is_success());
    }
    let response = limited.clone().oneshot(request()).await.expect("response");
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(response.headers().contains_key(header::RETRY_AFTER));
    assert!(
        response
            .headers()
            .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN)
    );

    let reads = limited
        .oneshot(get("/api/comments?slug=a"))
        .await
        .expect("response");
    assert_eq!(reads.status(), StatusCode::OK);

    let open = app(pool, dir.path());
    for _ in 0..3 {
        let response = open.clone().oneshot(request()).await.expect("response");
        assert!(response.status().is_success());
    }
}

#[tokio::test]
async fn dictionary_endpoint_serves_each_locale() {
    let (dir, pool) = test_pool().await;
    let app = app(pool, dir.path());

    let response = app.clone().oneshot(get("/api/i18n/en")).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["lang"], json!("en"));
    assert_eq!(body["name"], json!("English"));
    assert_eq!(body["locale"], json!("en-US"));
    assert!(body["t"].as_object().is_some_and(|t| !t.is_empty()));

    let response = app.oneshot(get("/api/i18n/fr")).await.expect("response");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
