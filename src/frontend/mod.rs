//! Embedded single-page UI

use axum::http::{StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};

const INDEX_HTML: &str = include_str!("assets/index.html");
const STYLE_CSS: &str = include_str!("assets/style.css");
const APP_JS: &str = include_str!("assets/app.js");

/// Resolve a non-API path to an embedded asset.
///
/// Unknown `/static/` and `/api/` paths are 404; anything else gets the page.
pub fn asset(path: &str) -> Option<(&'static str, &'static str)> {
    match path {
        "/static/css/style.css" => Some(("text/css; charset=utf-8", STYLE_CSS)),
        "/static/js/app.js" => Some(("application/javascript; charset=utf-8", APP_JS)),
        p if p.starts_with("/static/") || p.starts_with("/api/") => None,
        _ => Some(("text/html; charset=utf-8", INDEX_HTML)),
    }
}

/// Router fallback
pub async fn serve(uri: Uri) -> Response {
    match asset(uri.path()) {
        Some((content_type, body)) => ([(header::CONTENT_TYPE, content_type)], body).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
