//! Pages API endpoint.
//!
//! Renders a page and returns a JSON response with metadata, the navigation
//! menu and HTML content.

use std::sync::Arc;
use std::time::SystemTime;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::header::HeaderName;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{AppendHeaders, IntoResponse, Response};
use chrono::{DateTime, Utc};
use docu_site::{MenuEntry, RenderedPage};
use md5::{Digest, Md5};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::ServerError;
use crate::handlers::{to_url_path, with_site};
use crate::state::AppState;

/// Response for GET /api/pages/{path}.
#[derive(Serialize)]
struct PageResponse {
    /// Page metadata.
    meta: PageMeta,
    /// Navigation menu.
    menu: Vec<MenuEntry>,
    /// Rendered HTML content.
    content: String,
}

/// Page metadata.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PageMeta {
    /// Page title (from the `title` front matter key).
    title: Option<String>,
    /// URL path.
    path: String,
    /// Source file path.
    source_file: String,
    /// Last modification time (ISO 8601).
    #[serde(skip_serializing_if = "Option::is_none")]
    last_modified: Option<String>,
    /// Front matter, passed through untouched.
    #[serde(skip_serializing_if = "Map::is_empty")]
    front_matter: Map<String, Value>,
}

/// Handle GET /api/pages/ (root page).
pub(crate) async fn get_root_page(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, ServerError> {
    get_page_impl(String::new(), state, headers).await
}

/// Handle GET /api/pages/{path}.
pub(crate) async fn get_page(
    Path(path): Path<String>,
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, ServerError> {
    get_page_impl(path, state, headers).await
}

/// Shared implementation for page rendering.
#[allow(clippy::needless_pass_by_value)]
async fn get_page_impl(
    path: String,
    state: Arc<AppState>,
    headers: HeaderMap,
) -> Result<Response, ServerError> {
    let page = with_site(&state, path, |site, path| site.render(path)).await?;

    let etag = compute_etag(&state.version, &page.html);

    if let Some(if_none_match) = headers.get(header::IF_NONE_MATCH)
        && if_none_match.as_bytes() == etag.as_bytes()
    {
        return Ok(StatusCode::NOT_MODIFIED.into_response());
    }

    let last_modified = page.modified.map(DateTime::<Utc>::from);

    let mut response_headers: Vec<(HeaderName, String)> = vec![
        (header::ETAG, etag),
        (header::CACHE_CONTROL, "private, max-age=60".to_owned()),
    ];
    if let Some(last_modified) = last_modified {
        response_headers.push((header::LAST_MODIFIED, http_date(last_modified)));
    }

    Ok((
        AppendHeaders(response_headers),
        Json(page_response(page, last_modified)),
    )
        .into_response())
}

fn page_response(page: RenderedPage, last_modified: Option<DateTime<Utc>>) -> PageResponse {
    let title = page
        .metadata
        .get("title")
        .and_then(Value::as_str)
        .map(str::to_owned);

    PageResponse {
        meta: PageMeta {
            title,
            path: to_url_path(&page.path),
            source_file: page.source_path.display().to_string(),
            last_modified: last_modified.map(|t| t.to_rfc3339()),
            front_matter: page.metadata,
        },
        menu: page.menu,
        content: page.html,
    }
}

/// Format a timestamp as an HTTP date.
pub(crate) fn http_date(time: DateTime<Utc>) -> String {
    time.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Format an optional modification time as an HTTP date.
pub(crate) fn last_modified_header(modified: Option<SystemTime>) -> Option<String> {
    modified.map(|t| http_date(t.into()))
}

/// Compute `ETag` from version and content.
///
/// Uses MD5 hash truncated to 64 bits (16 hex chars).
pub(crate) fn compute_etag(version: &str, content: &str) -> String {
    let hash = Md5::digest(format!("{version}:{content}").as_bytes());
    format!("\"{}\"", &hex::encode(hash)[..16])
}
