//! Per-request locale policy applied in front of the static site.
//!
//! A request is classified by path, a locale is resolved from the
//! `lang_preference` cookie or the edge country header, and the outcome is
//! one terminal [`EdgeDecision`]. Nothing here touches I/O.

use axum::http::{HeaderMap, HeaderName, HeaderValue};

use crate::domain::locale::{Locale, locale_prefix};

pub const LANG_COOKIE: &str = "lang_preference";
pub const LANG_COOKIE_MAX_AGE_SECS: i64 = 31_536_000;

const API_PREFIX: &str = "/api/";
const INTERNAL_PREFIX: &str = "/_";
const ENTRY_PATHS: [&str; 3] = ["/", "/blog", "/about"];
const CATEGORY_PREFIX: &str = "/category/";

const CONTENT_SECURITY_POLICY: &str = "default-src 'self'; \
script-src 'self' 'unsafe-inline' https://fonts.googleapis.com https://static.cloudflareinsights.com; \
style-src 'self' 'unsafe-inline' https://fonts.googleapis.com; \
font-src 'self' https://fonts.gstatic.com data:; \
img-src 'self' data: https: blob:; \
connect-src 'self' https://blog.labjp.xyz https://fonts.googleapis.com https://cloudflareinsights.com; \
frame-ancestors 'self'; \
form-action 'self'; \
base-uri 'self'; \
object-src 'none'; \
upgrade-insecure-requests";

const PERMISSIONS_POLICY: &str = "accelerometer=(), ambient-light-sensor=(), autoplay=(), \
battery=(), camera=(), cross-origin-isolated=(), display-capture=(), document-domain=(), \
encrypted-media=(), execution-while-not-rendered=(), execution-while-out-of-viewport=(), \
fullscreen=(self), geolocation=(), gyroscope=(), keyboard-map=(), magnetometer=(), \
microphone=(), midi=(), navigation-override=(), payment=(), picture-in-picture=(), \
publickey-credentials-get=(), screen-wake-lock=(), sync-xhr=(), usb=(), web-share=(self), \
xr-spatial-tracking=()";

/// Protective headers set on every non-API response, redirects included.
pub const SECURITY_HEADERS: [(&str, &str); 12] = [
    ("x-frame-options", "SAMEORIGIN"),
    ("x-content-type-options", "nosniff"),
    ("x-xss-protection", "1; mode=block"),
    ("referrer-policy", "strict-origin-when-cross-origin"),
    (
        "strict-transport-security",
        "max-age=63072000; includeSubDomains; preload",
    ),
    ("content-security-policy", CONTENT_SECURITY_POLICY),
    ("permissions-policy", PERMISSIONS_POLICY),
    ("cross-origin-opener-policy", "same-origin"),
    ("cross-origin-resource-policy", "same-origin"),
    ("x-dns-prefetch-control", "on"),
    ("x-download-options", "noopen"),
    ("x-permitted-cross-domain-policies", "none"),
];

/// Insert (or overwrite) the security header set. Other headers are kept.
pub fn apply_security_headers(headers: &mut HeaderMap) {
    for (name, value) in SECURITY_HEADERS {
        headers.insert(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        );
    }
}

/// Platform-neutral view of the request signals the policy reads.
#[derive(Debug, Clone, Copy, Default)]
pub struct EdgeRequest<'a> {
    pub path: &'a str,
    pub query: Option<&'a str>,
    /// Raw `lang_preference` cookie value, if sent.
    pub cookie: Option<&'a str>,
    /// Two-letter country code from the edge network.
    pub country: Option<&'a str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathClass {
    /// `/api/*`: owns its own headers, left untouched.
    Api,
    /// Already localized, an asset, or framework-internal.
    Deferred,
    /// Site root, archive, about, and category pages.
    Entry,
    Other,
}

pub fn classify(path: &str) -> PathClass {
    if path.starts_with(API_PREFIX) {
        return PathClass::Api;
    }
    if locale_prefix(path).is_some() || path.starts_with(INTERNAL_PREFIX) || path.contains('.') {
        return PathClass::Deferred;
    }
    if ENTRY_PATHS.contains(&path) || path.starts_with(CATEGORY_PREFIX) {
        return PathClass::Entry;
    }
    PathClass::Other
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocaleSource {
    Cookie,
    Country,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedLocale {
    pub locale: Locale,
    pub source: LocaleSource,
}

/// `None` means resolution is deferred: the path already names a locale or
/// is not a page.
pub fn resolve_locale(request: &EdgeRequest<'_>) -> Option<ResolvedLocale> {
    if matches!(classify(request.path), PathClass::Api | PathClass::Deferred) {
        return None;
    }

    if let Some(locale) = request.cookie.and_then(|value| Locale::from_code(value.trim())) {
        return Some(ResolvedLocale {
            locale,
            source: LocaleSource::Cookie,
        });
    }

    Some(ResolvedLocale {
        locale: Locale::from_country(request.country),
        source: LocaleSource::Country,
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EdgeDecision {
    /// Hand the request on without adding anything.
    Passthrough,
    /// Serve the request and decorate the response with security headers.
    Forward,
    /// 302 to the localized path; `persist` carries the locale to store in
    /// the preference cookie when the choice came from geolocation.
    Redirect {
        location: String,
        persist: Option<Locale>,
    },
}

pub fn decide(request: &EdgeRequest<'_>) -> EdgeDecision {
    match classify(request.path) {
        PathClass::Api => EdgeDecision::Passthrough,
        PathClass::Deferred | PathClass::Other => EdgeDecision::Forward,
        PathClass::Entry => {
            let Some(resolved) = resolve_locale(request) else {
                return EdgeDecision::Forward;
            };
            EdgeDecision::Redirect {
                location: redirect_location(request.path, request.query, resolved.locale),
                persist: (resolved.source == LocaleSource::Country).then_some(resolved.locale),
            }
        }
    }
}

/// `/<code>/` for the root, `/<code><path>` otherwise; the query survives.
pub fn redirect_location(path: &str, query: Option<&str>, locale: Locale) -> String {
    let mut location = format!("/{}{}", locale.code(), path);
    if let Some(query) = query.filter(|query| !query.is_empty()) {
        location.push('?');
        location.push_str(query);
    }
    location
}

/// `Set-Cookie` value recording the locale decision for a year.
pub fn preference_cookie(locale: Locale) -> String {
    format!(
        "{LANG_COOKIE}={}; Path=/; Max-Age={LANG_COOKIE_MAX_AGE_SECS}; SameSite=Strict; Secure",
        locale.code()
    )
}
