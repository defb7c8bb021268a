//! Application state.
//!
//! Shared state for all request handlers.

use docu_site::Site;

/// Application state shared across all handlers.
#[derive(Debug)]
pub struct AppState {
    /// Content lookup, menu and pipelines.
    pub(crate) site: Site,
    /// Site title for the sidebar heading.
    pub(crate) title: String,
    /// Application version for cache invalidation.
    pub(crate) version: String,
}

impl AppState {
    /// Create state for a site.
    #[must_use]
    pub fn new(site: Site, title: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            site,
            title: title.into(),
            version: version.into(),
        }
    }
}
