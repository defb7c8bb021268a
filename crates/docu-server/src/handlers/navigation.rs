//! Navigation API endpoint.
//!
//! Returns the flat navigation menu for the documentation site.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use docu_site::MenuEntry;
use serde::Serialize;

use crate::error::ServerError;
use crate::handlers::with_site;
use crate::state::AppState;

/// Response for GET /api/navigation.
#[derive(Serialize)]
pub(crate) struct NavigationResponse {
    /// Menu entries, depth-first.
    items: Vec<MenuEntry>,
}

/// Handle GET /api/navigation.
pub(crate) async fn get_navigation(
    State(state): State<Arc<AppState>>,
) -> Result<Json<NavigationResponse>, ServerError> {
    let items = with_site(&state, String::new(), |site, _| site.menu()).await?;
    Ok(Json(NavigationResponse { items }))
}
