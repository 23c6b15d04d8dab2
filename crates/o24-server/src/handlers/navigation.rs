//! Navigation API endpoint.
//!
//! Returns the merged static and dynamic page tree.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use o24_site::PageNode;
use serde::Serialize;

use crate::state::AppState;

/// Response for GET /api/navigation.
#[derive(Serialize)]
pub(crate) struct NavigationResponse {
    /// Navigation tree items.
    items: Vec<PageNode>,
}

/// Handle GET /api/navigation.
pub(crate) async fn get_navigation(State(state): State<Arc<AppState>>) -> Json<NavigationResponse> {
    let items = state.site.navigation().await.into_tree();
    Json(NavigationResponse { items })
}
