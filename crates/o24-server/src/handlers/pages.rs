//! Pages API endpoint.
//!
//! Resolves a path against static pages and dynamic documents and returns
//! JSON with metadata, table of contents, and HTML content.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use md5::{Digest, Md5};
use o24_renderer::TocEntry;
use o24_site::{Resolution, RouteOrigin, segments_route};
use serde::Serialize;

use crate::error::ServerError;
use crate::handlers::path_segments;
use crate::state::AppState;

/// Response for GET /api/pages/{path}.
#[derive(Serialize)]
struct PageResponse {
    /// Whether the page is compiled or a stored document.
    source: RouteOrigin,
    /// Page metadata.
    meta: PageMeta,
    /// Table of contents entries.
    toc: Vec<TocEntry>,
    /// Rendered HTML content.
    content: String,
}

/// Page metadata.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PageMeta {
    title: String,
    /// URL path.
    path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    /// Document category (dynamic pages only).
    #[serde(skip_serializing_if = "Option::is_none")]
    category: Option<String>,
    /// Last update time, RFC 3339 (dynamic pages only).
    #[serde(skip_serializing_if = "Option::is_none")]
    updated_at: Option<String>,
}

/// Handle GET /api/pages/ (root page).
pub(crate) async fn get_root_page(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, ServerError> {
    get_page_impl("", &state, &headers).await
}

/// Handle GET /api/pages/{path}.
pub(crate) async fn get_page(
    Path(path): Path<String>,
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, ServerError> {
    get_page_impl(&path, &state, &headers).await
}

/// Shared implementation for page resolution.
async fn get_page_impl(
    path: &str,
    state: &AppState,
    headers: &HeaderMap,
) -> Result<Response, ServerError> {
    let segments = path_segments(path);
    let route = segments_route(&segments);

    let response = match state.site.resolve(&segments).await {
        Resolution::StaticHit { page } => PageResponse {
            source: RouteOrigin::Static,
            meta: PageMeta {
                title: page.title.clone(),
                path: route,
                description: page.description.clone(),
                category: None,
                updated_at: None,
            },
            toc: page.toc.clone(),
            content: page.html.clone(),
        },
        Resolution::DynamicHit { document } => {
            let rendered = state.site.render_document(&document);
            PageResponse {
                source: RouteOrigin::Dynamic,
                meta: PageMeta {
                    title: rendered.title,
                    path: route,
                    description: rendered.description,
                    category: Some(document.category),
                    updated_at: Some(document.updated_at.to_rfc3339()),
                },
                toc: rendered.toc,
                content: rendered.html,
            }
        }
        Resolution::NotFound => return Err(ServerError::PageNotFound(route)),
    };

    let etag = compute_etag(&state.version, &response.content);

    // Check If-None-Match header for conditional request
    if let Some(if_none_match) = headers.get(header::IF_NONE_MATCH)
        && if_none_match.as_bytes() == etag.as_bytes()
    {
        return Ok(StatusCode::NOT_MODIFIED.into_response());
    }

    Ok((
        [
            (header::ETAG, etag),
            (header::CACHE_CONTROL, "private, no-cache".to_owned()),
        ],
        Json(response),
    )
        .into_response())
}

/// Compute `ETag` from version and content.
///
/// Uses MD5 hash truncated to 64 bits (16 hex chars).
pub(crate) fn compute_etag(version: &str, content: &str) -> String {
    let hash = Md5::digest(format!("{version}:{content}").as_bytes());
    format!("\"{}\"", &hex::encode(hash)[..16])
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_compute_etag_includes_version() {
        let etag1 = compute_etag("1.0.0", "content");
        let etag2 = compute_etag("1.0.1", "content");

        assert_ne!(etag1, etag2);
    }

    #[test]
    fn test_compute_etag_includes_content() {
        let etag1 = compute_etag("1.0.0", "content1");
        let etag2 = compute_etag("1.0.0", "content2");

        assert_ne!(etag1, etag2);
    }

    #[test]
    fn test_compute_etag_format() {
        let etag = compute_etag("1.0.0", "content");

        assert!(etag.starts_with('"'));
        assert!(etag.ends_with('"'));
        assert_eq!(etag.len(), 18);
    }

    #[test]
    fn test_page_response_serialization() {
        let response = PageResponse {
            source: RouteOrigin::Dynamic,
            meta: PageMeta {
                title: "Intro".to_owned(),
                path: "/docs/intro".to_owned(),
                description: None,
                category: Some("general".to_owned()),
                updated_at: Some("2025-01-01T00:00:00+00:00".to_owned()),
            },
            toc: vec![],
            content: "<h1>Intro</h1>".to_owned(),
        };

        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["source"], "dynamic");
        assert_eq!(json["meta"]["title"], "Intro");
        assert_eq!(json["meta"]["updatedAt"], "2025-01-01T00:00:00+00:00");
        assert!(json["meta"].get("description").is_none());
    }
}
