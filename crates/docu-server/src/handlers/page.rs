//! Full HTML pages.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use serde_json::Value;

use crate::error::ServerError;
use crate::handlers::with_site;
use crate::layout;
use crate::state::AppState;

/// Handle GET / (index page).
pub(crate) async fn get_root_page(State(state): State<Arc<AppState>>) -> Response {
    render_page(state, String::new()).await
}

/// Handle GET /{path}.
pub(crate) async fn get_page(
    Path(path): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Response {
    render_page(state, path).await
}

#[allow(clippy::needless_pass_by_value)]
async fn render_page(state: Arc<AppState>, path: String) -> Response {
    match with_site(&state, path, |site, path| site.render(path)).await {
        Ok(page) => {
            let title = page.metadata.get("title").and_then(Value::as_str);
            Html(layout::page(&state.title, title, &page.menu, &page.html)).into_response()
        }
        Err(ServerError::PageNotFound(_)) => {
            let menu = with_site(&state, String::new(), |site, _| site.menu())
                .await
                .unwrap_or_default();
            (
                StatusCode::NOT_FOUND,
                Html(layout::not_found(&state.title, &menu)),
            )
                .into_response()
        }
        Err(e) => e.into_response(),
    }
}
