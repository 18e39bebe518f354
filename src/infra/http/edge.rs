//! Locale redirects and security headers in front of every route.

use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderValue, Request, StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::CookieJar;
use metrics::counter;
use tracing::warn;

use crate::application::edge::{
    EdgeDecision, EdgeRequest, LANG_COOKIE, apply_security_headers, decide, preference_cookie,
};
use crate::domain::locale::{Locale, locale_prefix};

use super::RouterState;
use super::middleware::EdgeOutcome;

pub async fn locale_edge(
    State(state): State<RouterState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let decision = {
        let jar = CookieJar::from_headers(request.headers());
        let cookie = jar.get(LANG_COOKIE).map(|cookie| cookie.value());
        let country = request
            .headers()
            .get(&state.edge.country_header)
            .and_then(|value| value.to_str().ok());

        decide(&EdgeRequest {
            path: request.uri().path(),
            query: request.uri().query(),
            cookie,
            country,
        })
    };

    match decision {
        EdgeDecision::Passthrough => next.run(request).await,
        EdgeDecision::Forward => forward(request, next).await,
        EdgeDecision::Redirect { location, persist } => {
            match redirect_response(&location, persist) {
                Some(mut response) => {
                    let signal = if persist.is_some() { "country" } else { "cookie" };
                    counter!("blog_locale_redirects_total", "signal" => signal).increment(1);
                    response.extensions_mut().insert(EdgeOutcome::Redirected {
                        locale: target_locale(&location, persist),
                        signal,
                    });
                    response
                }
                None => {
                    warn!(
                        target = "blog_edge::http::edge",
                        location = %location,
                        "redirect target is not a valid header value; serving unredirected"
                    );
                    forward(request, next).await
                }
            }
        }
    }
}

async fn forward(request: Request<Body>, next: Next) -> Response {
    let mut response = next.run(request).await;
    apply_security_headers(response.headers_mut());
    response.extensions_mut().insert(EdgeOutcome::Forwarded);
    response
}

/// Locale a redirect lands on: the persisted one, else read off the target.
fn target_locale(location: &str, persist: Option<Locale>) -> Locale {
    persist
        .or_else(|| locale_prefix(location))
        .unwrap_or_default()
}

fn redirect_response(location: &str, persist: Option<Locale>) -> Option<Response> {
    let location = HeaderValue::from_str(location).ok()?;
    let mut response = StatusCode::FOUND.into_response();
    let headers = response.headers_mut();
    headers.insert(header::LOCATION, location);
    if let Some(locale) = persist {
        let cookie = HeaderValue::from_str(&preference_cookie(locale)).ok()?;
        headers.insert(header::SET_COOKIE, cookie);
    }
    apply_security_headers(headers);
    Some(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redirect_locale_prefers_the_persisted_choice() {
        assert_eq!(target_locale("/es/blog", Some(Locale::En)), Locale::En);
        assert_eq!(target_locale("/en/blog?page=2", None), Locale::En);
        assert_eq!(target_locale("/es/", None), Locale::Es);
    }
}
