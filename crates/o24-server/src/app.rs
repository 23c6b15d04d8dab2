//! Router construction.
//!
//! Builds the axum router with all routes and middleware.

use std::sync::Arc;

use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::get;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware::{auth, security};
use crate::state::AppState;

/// Create the application router.
///
/// # Arguments
///
/// * `state` - Shared application state
pub(crate) fn create_router(state: Arc<AppState>) -> Router {
    // API routes
    let api_routes = Router::new()
        .route("/api/navigation", get(handlers::navigation::get_navigation))
        .route("/api/pages/", get(handlers::pages::get_root_page))
        .route("/api/pages/{*path}", get(handlers::pages::get_page))
        .route(
            "/api/docs",
            get(handlers::docs::list_documents).post(handlers::docs::create_document),
        )
        .route(
            "/api/docs/{slug}",
            get(handlers::docs::get_document)
                .put(handlers::docs::update_document)
                .delete(handlers::docs::delete_document),
        );

    // HTML pages
    let view_routes = Router::new()
        .route(
            auth::LOGIN_PATH,
            get(handlers::login::get_login).post(handlers::login::post_login),
        )
        .route("/", get(handlers::views::get_root_view))
        .route("/{*path}", get(handlers::views::get_view));

    Router::new()
        .merge(api_routes)
        .merge(view_routes)
        .layer(from_fn_with_state(Arc::clone(&state), auth::require_access))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(security::csp_layer())
                .layer(security::content_type_options_layer())
                .layer(security::frame_options_layer()),
        )
        .with_state(state)
}
