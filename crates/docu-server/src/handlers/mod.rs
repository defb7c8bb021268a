//! HTTP request handlers.

pub(crate) mod components;
pub(crate) mod navigation;
pub(crate) mod page;
pub(crate) mod pages;

use std::sync::Arc;

use docu_site::{Site, SiteError};

use crate::error::ServerError;
use crate::state::AppState;

/// Convert internal path (without leading slash) to URL path (with leading slash).
pub(crate) fn to_url_path(path: &str) -> String {
    if path.is_empty() {
        "/".to_owned()
    } else {
        format!("/{path}")
    }
}

/// Run site work for a request path on the blocking pool.
///
/// Every site error is logged and reported as [`ServerError::PageNotFound`].
pub(crate) async fn with_site<T, F>(
    state: &Arc<AppState>,
    path: String,
    work: F,
) -> Result<T, ServerError>
where
    T: Send + 'static,
    F: FnOnce(&Site, &str) -> Result<T, SiteError> + Send + 'static,
{
    let state = Arc::clone(state);
    let (path, result) = tokio::task::spawn_blocking(move || {
        let result = work(&state.site, &path);
        (path, result)
    })
    .await?;

    result.map_err(|error| {
        tracing::error!(path = %path, error = %error, "Failed to serve page");
        ServerError::PageNotFound(path)
    })
}
