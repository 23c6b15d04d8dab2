//! Server-rendered documentation pages.
//!
//! Unknown paths render the not-found view with status 404; store failures
//! degrade to the same view.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use o24_site::{Resolution, RouteOrigin, segments_route};

use crate::handlers::path_segments;
use crate::state::AppState;
use crate::templates;

/// Handle GET /.
pub(crate) async fn get_root_view(State(state): State<Arc<AppState>>) -> Response {
    render_view("", &state).await
}

/// Handle GET /{path}.
pub(crate) async fn get_view(
    Path(path): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Response {
    render_view(&path, &state).await
}

async fn render_view(path: &str, state: &AppState) -> Response {
    let segments = path_segments(path);
    let route = segments_route(&segments);

    let resolution = state.site.resolve(&segments).await;
    let nav = state.site.navigation().await;

    match resolution {
        Resolution::StaticHit { page } => {
            log_resolution(state, &route, RouteOrigin::Static);
            Html(
                templates::page(state, nav.tree(), &route, &page.title, &page.html, &page.toc)
                    .into_string(),
            )
            .into_response()
        }
        Resolution::DynamicHit { document } => {
            log_resolution(state, &route, RouteOrigin::Dynamic);
            let rendered = state.site.render_document(&document);
            Html(
                templates::page(
                    state,
                    nav.tree(),
                    &route,
                    &rendered.title,
                    &rendered.html,
                    &rendered.toc,
                )
                .into_string(),
            )
            .into_response()
        }
        Resolution::NotFound => {
            tracing::debug!(route = %route, "Page not found");
            (
                StatusCode::NOT_FOUND,
                Html(templates::not_found(state, nav.tree(), &route).into_string()),
            )
                .into_response()
        }
    }
}

fn log_resolution(state: &AppState, route: &str, origin: RouteOrigin) {
    if state.verbose {
        tracing::info!(route, origin = %origin, "Resolved page");
    }
}
