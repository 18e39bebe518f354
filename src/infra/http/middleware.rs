//! Request ids and the log line that closes every request.
//!
//! Inner middlewares describe what they did through response extensions
//! ([`EdgeOutcome`], [`Throttled`], [`ErrorReport`]); [`log_responses`] turns
//! them into one structured event.

use std::time::Instant;

use axum::{
    body::Body,
    http::{HeaderName, HeaderValue, Request, header},
    middleware::Next,
    response::Response,
};
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::application::error::ErrorReport;
use crate::domain::locale::Locale;

pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");
const MAX_REQUEST_ID_LEN: usize = 64;

#[derive(Debug, Clone)]
pub struct RequestContext {
    pub request_id: String,
}

/// What the locale edge did with a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeOutcome {
    Passthrough,
    Forwarded,
    Redirected {
        locale: Locale,
        signal: &'static str,
    },
}

impl EdgeOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            EdgeOutcome::Passthrough => "passthrough",
            EdgeOutcome::Forwarded => "forward",
            EdgeOutcome::Redirected { .. } => "redirect",
        }
    }
}

/// Throttle bucket that rejected a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Throttled {
    pub bucket: &'static str,
}

/// Keep an upstream id when it is short and printable, otherwise mint one.
/// The id is echoed back in `x-request-id`.
pub async fn set_request_context(mut request: Request<Body>, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(&REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| is_usable_request_id(value))
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    request.extensions_mut().insert(RequestContext {
        request_id: request_id.clone(),
    });

    let mut response = next.run(request).await;
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

fn is_usable_request_id(value: &str) -> bool {
    !value.is_empty()
        && value.len() <= MAX_REQUEST_ID_LEN
        && value
            .bytes()
            .all(|byte| byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_' | b'.'))
}

pub async fn log_responses(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let request_id = request
        .extensions()
        .get::<RequestContext>()
        .map(|ctx| ctx.request_id.clone())
        .unwrap_or_default();
    let start = Instant::now();

    let mut response = next.run(request).await;
    let status = response.status();
    let elapsed_ms = start.elapsed().as_millis();

    let edge = response
        .extensions_mut()
        .remove::<EdgeOutcome>()
        .unwrap_or(EdgeOutcome::Passthrough);
    let bucket = response
        .extensions_mut()
        .remove::<Throttled>()
        .map(|throttled| throttled.bucket);

    if status.is_client_error() || status.is_server_error() {
        let (source, messages) = match response.extensions_mut().remove::<ErrorReport>() {
            Some(report) => (report.source, report.messages),
            None => ("unknown", Vec::new()),
        };
        let detail = messages.first().map(String::as_str).unwrap_or("-");

        if status.is_server_error() {
            error!(
                target = "blog_edge::http::response",
                status = status.as_u16(),
                method = %method,
                path = %path,
                elapsed_ms,
                edge = edge.as_str(),
                source,
                detail,
                chain = ?messages,
                request_id = %request_id,
                "request failed"
            );
        } else {
            warn!(
                target = "blog_edge::http::response",
                status = status.as_u16(),
                method = %method,
                path = %path,
                elapsed_ms,
                edge = edge.as_str(),
                bucket,
                source,
                detail,
                request_id = %request_id,
                "request rejected"
            );
        }
        return response;
    }

    if let EdgeOutcome::Redirected { locale, signal } = edge {
        let location = response
            .headers()
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("");
        debug!(
            target = "blog_edge::http::response",
            path = %path,
            location,
            locale = locale.code(),
            signal,
            request_id = %request_id,
            "locale redirect"
        );
    }

    response
}
