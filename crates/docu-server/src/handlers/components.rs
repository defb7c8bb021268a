//! Compiled MDX components.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::header::HeaderName;
use axum::http::header;
use axum::response::{AppendHeaders, IntoResponse, Response};

use crate::error::ServerError;
use crate::handlers::pages::{compute_etag, last_modified_header};
use crate::handlers::with_site;
use crate::state::AppState;

/// Handle GET /api/components/{path}.
pub(crate) async fn get_component(
    Path(path): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, ServerError> {
    let component = with_site(&state, path, |site, path| site.compile_component(path)).await?;

    let mut headers: Vec<(HeaderName, String)> = vec![
        (
            header::CONTENT_TYPE,
            "text/javascript; charset=utf-8".to_owned(),
        ),
        (header::ETAG, compute_etag(&state.version, &component.code)),
    ];
    if let Some(last_modified) = last_modified_header(component.modified) {
        headers.push((header::LAST_MODIFIED, last_modified));
    }

    Ok((AppendHeaders(headers), component.code).into_response())
}
