//! Cross-origin headers for the JSON API.

use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue, Method, Request, StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use super::state::ApiState;

const ALLOW_METHODS: &str = "GET, POST, DELETE, OPTIONS";
const ALLOW_HEADERS: &str = "Content-Type";

/// Origins allowed to call the API; the first is the site's primary origin.
#[derive(Debug, Clone)]
pub struct CorsPolicy {
    primary: HeaderValue,
    allowed: Vec<HeaderValue>,
}

impl CorsPolicy {
    /// Origins that are not valid header values are skipped; with none left
    /// the policy answers with `fallback`.
    pub fn new<I, S>(origins: I, fallback: &'static str) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let allowed: Vec<HeaderValue> = origins
            .into_iter()
            .filter_map(|origin| HeaderValue::from_str(origin.as_ref()).ok())
            .collect();
        let primary = allowed
            .first()
            .cloned()
            .unwrap_or_else(|| HeaderValue::from_static(fallback));
        Self { primary, allowed }
    }

    /// The request's `Origin` when it is allowed, the primary origin otherwise.
    pub fn allow_origin(&self, request_origin: Option<&HeaderValue>) -> HeaderValue {
        request_origin
            .filter(|origin| self.allowed.contains(origin))
            .cloned()
            .unwrap_or_else(|| self.primary.clone())
    }

    pub fn apply(&self, headers: &mut HeaderMap, request_origin: Option<&HeaderValue>) {
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            self.allow_origin(request_origin),
        );
        headers.append(header::VARY, HeaderValue::from_static("Origin"));
    }

    pub fn apply_preflight(&self, headers: &mut HeaderMap, request_origin: Option<&HeaderValue>) {
        self.apply(headers, request_origin);
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOW_METHODS),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOW_HEADERS),
        );
    }
}

/// Answers `OPTIONS` directly and stamps CORS headers on everything else.
pub async fn api_cors(State(state): State<ApiState>, request: Request<Body>, next: Next) -> Response {
    let origin = request.headers().get(header::ORIGIN).cloned();

    if request.method() == Method::OPTIONS {
        let mut response = StatusCode::OK.into_response();
        state
            .cors
            .apply_preflight(response.headers_mut(), origin.as_ref());
        return response;
    }

    let mut response = next.run(request).await;
    state.cors.apply(response.headers_mut(), origin.as_ref());
    response
}
