mod common;

use std::fs;
use std::path::Path;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use blog_edge::application::edge::SECURITY_HEADERS;
use tower::ServiceExt;

use common::{app, body_text, get, test_pool};

fn write_site(root: &Path) {
    let pages = [
        ("en/index.html", "<h1>home</h1>"),
        ("en/blog/foo/index.html", "<h1>foo</h1>"),
        ("es/about.html", "<h1>sobre</h1>"),
        ("404.html", "<h1>missing</h1>"),
        ("_astro/app.js", "console.log(1)"),
    ];
    for (path, contents) in pages {
        let path = root.join(path);
        fs::create_dir_all(path.parent().expect("parent dir")).expect("create dirs");
        fs::write(path, contents).expect("write page");
    }
}

fn with_header(uri: &str, name: &'static str, value: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(name, value)
        .body(Body::empty())
        .expect("build request")
}

fn assert_security_headers(headers: &axum::http::HeaderMap) {
    for (name, value) in SECURITY_HEADERS {
        assert_eq!(headers[name], value, "{name}");
    }
}

#[tokio::test]
async fn spanish_speaking_country_redirects_and_remembers() {
    let (dir, pool) = test_pool().await;
    let response = app(pool, dir.path())
        .oneshot(with_header("/", "cf-ipcountry", "MX"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::FOUND);
    let headers = response.headers();
    assert_eq!(headers[header::LOCATION], "/es/");
    assert_eq!(
        headers[header::SET_COOKIE],
        "lang_preference=es; Path=/; Max-Age=31536000; SameSite=Strict; Secure"
    );
    assert_security_headers(headers);
}

#[tokio::test]
async fn other_countries_land_on_english() {
    let (dir, pool) = test_pool().await;
    let response = app(pool, dir.path())
        .oneshot(with_header("/blog?page=2", "cf-ipcountry", "DE"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(response.headers()[header::LOCATION], "/en/blog?page=2");
}

#[tokio::test]
async fn stored_preference_wins_without_new_cookie() {
    let (dir, pool) = test_pool().await;
    let request = Request::builder()
        .uri("/about")
        .header(header::COOKIE, "theme=dark; lang_preference=es")
        .header("cf-ipcountry", "US")
        .body(Body::empty())
        .expect("build request");

    let response = app(pool, dir.path()).oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(response.headers()[header::LOCATION], "/es/about");
    assert!(response.headers().get(header::SET_COOKIE).is_none());
}

#[tokio::test]
async fn localized_pages_are_served_with_security_headers() {
    let (_dir, pool) = test_pool().await;
    let site = tempfile::tempdir().expect("site dir");
    write_site(site.path());
    let app = app(pool, site.path());

    let response = app
        .clone()
        .oneshot(with_header("/en/blog/foo", "cf-ipcountry", "MX"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert_security_headers(response.headers());
    assert_eq!(
        response.headers()[header::CACHE_CONTROL],
        "public, max-age=0, must-revalidate"
    );
    assert_eq!(body_text(response).await, "<h1>foo</h1>");

    let response = app.clone().oneshot(get("/es/about")).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "<h1>sobre</h1>");

    let response = app.oneshot(get("/_astro/app.js")).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response.headers()[header::CACHE_CONTROL]
            .to_str()
            .expect("ascii header")
            .contains("immutable")
    );
    assert_security_headers(response.headers());
}

#[tokio::test]
async fn missing_pages_use_the_site_404() {
    let (_dir, pool) = test_pool().await;
    let site = tempfile::tempdir().expect("site dir");
    write_site(site.path());

    let response = app(pool, site.path())
        .oneshot(get("/en/nowhere"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_security_headers(response.headers());
    assert_eq!(body_text(response).await, "<h1>missing</h1>");
}

#[tokio::test]
async fn api_responses_carry_no_security_headers() {
    let (dir, pool) = test_pool().await;
    let response = app(pool, dir.path())
        .oneshot(with_header("/api/views", "cf-ipcountry", "MX"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    for (name, _) in SECURITY_HEADERS {
        assert!(response.headers().get(name).is_none(), "{name}");
    }
}

#[tokio::test]
async fn path_traversal_is_not_served() {
    let (_dir, pool) = test_pool().await;
    let site = tempfile::tempdir().expect("site dir");
    write_site(site.path());

    let response = app(pool, site.path())
        .oneshot(get("/en/..%2F..%2Fetc/passwd"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn every_response_carries_a_request_id() {
    let (dir, pool) = test_pool().await;
    let router = app(pool, dir.path());

    let redirect = router
        .clone()
        .oneshot(with_header("/", "cf-ipcountry", "MX"))
        .await
        .expect("response");
    assert_eq!(redirect.status(), StatusCode::FOUND);
    let minted = redirect.headers()["x-request-id"]
        .to_str()
        .expect("ascii id");
    assert!(uuid::Uuid::parse_str(minted).is_ok(), "{minted}");

    let api = router
        .oneshot(get("/api/views"))
        .await
        .expect("response");
    assert!(api.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn upstream_request_id_is_echoed_when_usable() {
    let (dir, pool) = test_pool().await;
    let router = app(pool, dir.path());

    let kept = router
        .clone()
        .oneshot(with_header("/api/views", "x-request-id", "edge-7f3a.01"))
        .await
        .expect("response");
    assert_eq!(kept.headers()["x-request-id"], "edge-7f3a.01");

    let replaced = router
        .oneshot(with_header("/api/views", "x-request-id", "two words"))
        .await
        .expect("response");
    let id = replaced.headers()["x-request-id"]
        .to_str()
        .expect("ascii id");
    assert_ne!(id, "two words");
    assert!(uuid::Uuid::parse_str(id).is_ok(), "{id}");
}
