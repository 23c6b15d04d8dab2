//! Route merging, resolution and document rendering for O24DOC.
//!
//! The site has two content sources:
//! - a static page tree compiled once from markdown files ([`StaticSource`])
//! - dynamic documents read from a [`DocumentStore`](o24_store::DocumentStore) on every request
//!
//! This crate unifies them:
//! - [`MergedRouteSpace`]: one navigation tree, static routes winning collisions
//! - [`Resolver`]: request path to [`Resolution`] (static page, document, or not found)
//! - [`render_document`]: document to displayable [`RenderedDoc`]
//! - [`Site`]: facade tying the pieces together
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use o24_site::{FsPageSource, Site, SiteConfig};
//! use o24_store::SqliteStore;
//!
//! let source = Arc::new(FsPageSource::load("docs"));
//! let store = Arc::new(SqliteStore::connect("sqlite://documents.db", 5).await?);
//! let site = Site::new(source, store, SiteConfig::default());
//!
//! let nav = site.navigation().await;
//! let page = site.resolve(&["docs", "intro"]).await;
//! ```

mod merge;
mod page_map;
mod renderer;
mod resolver;
mod site;
mod static_source;

pub use merge::{MergedRouteSpace, RouteOrigin};
pub use page_map::{
    NavGroup, PageKind, PageNode, dynamic_page_map, find_route, normalize_route, segments_route,
    visit_nodes,
};
pub use renderer::{RenderedDoc, render_document};
pub use resolver::{Resolution, Resolver};
pub use site::{Site, SiteConfig};
pub use static_source::{FsPageSource, MemorySource, StaticPage, StaticPageError, StaticSource};

// Re-export TocEntry from o24-renderer for convenience
pub use o24_renderer::TocEntry;
