use std::net::IpAddr;

use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, Method, Request};
use axum::middleware::Next;
use axum::response::Response;
use metrics::counter;
use tracing::debug;

use super::super::middleware::Throttled;
use super::error::ApiError;
use super::rate_limit::{Bucket, RateLimiter};
use super::state::ApiState;

const CLIENT_IP_HEADER: &str = "cf-connecting-ip";
const FORWARDED_FOR_HEADER: &str = "x-forwarded-for";
const UNKNOWN_CLIENT: &str = "unknown";

/// Throttles writes per client address when a limiter is configured.
pub async fn api_rate_limit(
    State(state): State<ApiState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let Some(limiter) = state.rate_limiter.as_ref() else {
        return next.run(request).await;
    };
    if !matches!(*request.method(), Method::POST | Method::DELETE) {
        return next.run(request).await;
    }
    let Some(bucket) = Bucket::for_path(request.uri().path()) else {
        return next.run(request).await;
    };

    let client = client_key(request.headers());
    let key = format!("{client}:{}", bucket.as_str());

    if let Err(wait) = limiter.check(&key, bucket.limit()) {
        counter!("blog_rate_limited_total", "bucket" => bucket.as_str()).increment(1);
        debug!(
            target = "blog_edge::api::ratelimit",
            bucket = bucket.as_str(),
            client = %client,
            "request throttled"
        );
        let mut response = ApiError::rate_limited(RateLimiter::retry_after_secs(wait));
        response.extensions_mut().insert(Throttled {
            bucket: bucket.as_str(),
        });
        return response;
    }

    next.run(request).await
}

/// Client address as reported by the edge, falling back to the first
/// `X-Forwarded-For` hop.
fn client_key(headers: &HeaderMap) -> String {
    let from_edge = headers
        .get(CLIENT_IP_HEADER)
        .and_then(|value| value.to_str().ok());
    let forwarded = headers
        .get(FORWARDED_FOR_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next());

    from_edge
        .or(forwarded)
        .and_then(|raw| raw.trim().parse::<IpAddr>().ok())
        .map(|ip| ip.to_string())
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn edge_address_wins_over_forwarded_chain() {
        let mut headers = HeaderMap::new();
        headers.insert(CLIENT_IP_HEADER, HeaderValue::from_static("203.0.113.7"));
        headers.insert(
            FORWARDED_FOR_HEADER,
            HeaderValue::from_static("198.51.100.1, 10.0.0.1"),
        );
        assert_eq!(client_key(&headers), "203.0.113.7");

        headers.remove(CLIENT_IP_HEADER);
        assert_eq!(client_key(&headers), "198.51.100.1");
    }

    #[test]
    fn garbage_addresses_share_one_key() {
        let mut headers = HeaderMap::new();
        headers.insert(CLIENT_IP_HEADER, HeaderValue::from_static("not-an-ip"));
        assert_eq!(client_key(&headers), UNKNOWN_CLIENT);
        assert_eq!(client_key(&HeaderMap::new()), UNKNOWN_CLIENT);
    }
}
