//! Static site served from the build output directory.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{HeaderValue, Method, StatusCode, Uri, header},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use mime_guess::Mime;
use tracing::error;

use crate::application::error::ErrorReport;

const SOURCE: &str = "infra::http::site";
const INDEX_FILE: &str = "index.html";
const NOT_FOUND_FILE: &str = "404.html";
const HASHED_ASSET_PREFIX: &str = "_astro/";
const HTML_CACHE_CONTROL: &str = "public, max-age=0, must-revalidate";
const ASSET_CACHE_CONTROL: &str = "public, max-age=3600";
const IMMUTABLE_CACHE_CONTROL: &str = "public, max-age=31536000, immutable";

#[derive(Clone)]
pub struct SiteState {
    root: Arc<PathBuf>,
}

impl SiteState {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Arc::new(root.into()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

pub async fn serve_site(State(state): State<SiteState>, method: Method, uri: Uri) -> Response {
    if method != Method::GET && method != Method::HEAD {
        let mut response = StatusCode::METHOD_NOT_ALLOWED.into_response();
        ErrorReport::from_message(SOURCE, StatusCode::METHOD_NOT_ALLOWED, "Site is read-only")
            .attach(&mut response);
        return response;
    }

    let Some(relative) = relative_path(uri.path()) else {
        return not_found(&state, "Site request rejected").await;
    };

    for candidate in candidates(&relative) {
        let path = state.root().join(&candidate);
        match read_file(&path).await {
            Ok(Some(bytes)) => {
                return file_response(StatusCode::OK, bytes, &candidate, method == Method::HEAD);
            }
            Ok(None) => continue,
            Err(err) => {
                error!(
                    target = "blog_edge::http::site",
                    path = %path.display(),
                    error = %err,
                    "failed to read site file"
                );
                let mut response = StatusCode::INTERNAL_SERVER_ERROR.into_response();
                ErrorReport::from_error(SOURCE, StatusCode::INTERNAL_SERVER_ERROR, &err)
                    .attach(&mut response);
                return response;
            }
        }
    }

    not_found(&state, "Site file not found").await
}

/// Path below the site root, or `None` when it tries to leave it.
fn relative_path(request_path: &str) -> Option<String> {
    let trimmed = request_path.trim_start_matches('/');
    let escapes = trimmed
        .split('/')
        .any(|segment| segment == ".." || segment == "." || segment.contains('\\'));
    if escapes || trimmed.contains('\0') {
        return None;
    }
    Some(trimmed.to_string())
}

/// Files tried in order: the path itself, its `index.html`, then `<path>.html`.
fn candidates(relative: &str) -> Vec<String> {
    if relative.is_empty() {
        return vec![INDEX_FILE.to_string()];
    }
    if let Some(dir) = relative.strip_suffix('/') {
        return vec![format!("{dir}/{INDEX_FILE}")];
    }
    vec![
        relative.to_string(),
        format!("{relative}/{INDEX_FILE}"),
        format!("{relative}.html"),
    ]
}

async fn read_file(path: &Path) -> std::io::Result<Option<Bytes>> {
    match tokio::fs::metadata(path).await {
        Ok(meta) if meta.is_file() => tokio::fs::read(path).await.map(|bytes| Some(bytes.into())),
        Ok(_) => Ok(None),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(err) if err.kind() == std::io::ErrorKind::NotADirectory => Ok(None),
        Err(err) => Err(err),
    }
}

async fn not_found(state: &SiteState, message: &'static str) -> Response {
    let page = read_file(&state.root().join(NOT_FOUND_FILE))
        .await
        .ok()
        .flatten();
    let mut response = match page {
        Some(bytes) => file_response(StatusCode::NOT_FOUND, bytes, NOT_FOUND_FILE, false),
        None => StatusCode::NOT_FOUND.into_response(),
    };
    ErrorReport::from_message(SOURCE, StatusCode::NOT_FOUND, message).attach(&mut response);
    response
}

fn file_response(status: StatusCode, bytes: Bytes, name: &str, head: bool) -> Response {
    let mime: Mime = mime_guess::from_path(name).first_or_octet_stream();
    let len = bytes.len();
    let body = if head { Body::empty() } else { Body::from(bytes) };

    let mut response = Response::new(body);
    *response.status_mut() = status;

    let headers = response.headers_mut();
    if let Ok(value) = HeaderValue::from_str(mime.as_ref()) {
        headers.insert(header::CONTENT_TYPE, value);
    }
    if let Ok(value) = HeaderValue::from_str(&len.to_string()) {
        headers.insert(header::CONTENT_LENGTH, value);
    }
    headers.insert(header::CACHE_CONTROL, cache_control(name, &mime));

    response
}

fn cache_control(name: &str, mime: &Mime) -> HeaderValue {
    if name.starts_with(HASHED_ASSET_PREFIX) {
        HeaderValue::from_static(IMMUTABLE_CACHE_CONTROL)
    } else if mime.subtype() == mime_guess::mime::HTML {
        HeaderValue::from_static(HTML_CACHE_CONTROL)
    } else {
        HeaderValue::from_static(ASSET_CACHE_CONTROL)
    }
}
