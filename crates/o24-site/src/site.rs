//! Site facade combining the static source and the document store.

use std::sync::Arc;

use o24_store::{Document, DocumentStore};

use crate::merge::MergedRouteSpace;
use crate::page_map::{NavGroup, dynamic_page_map};
use crate::renderer::{RenderedDoc, render_document};
use crate::resolver::{Resolution, Resolver};
use crate::static_source::StaticSource;

/// Navigation settings.
#[derive(Clone, Debug)]
pub struct SiteConfig {
    /// Name of the top-level static folder that receives dynamic entries.
    pub mount_point: String,
    /// Category folders for dynamic documents.
    pub groups: Vec<NavGroup>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            mount_point: "docs".to_owned(),
            groups: Vec::new(),
        }
    }
}

/// Documentation site over a static source and a document store.
///
/// Holds no per-request state: navigation is rebuilt and documents are
/// re-read on every call.
pub struct Site {
    source: Arc<dyn StaticSource>,
    store: Arc<dyn DocumentStore>,
    resolver: Resolver,
    config: SiteConfig,
}

impl Site {
    pub fn new(
        source: Arc<dyn StaticSource>,
        store: Arc<dyn DocumentStore>,
        config: SiteConfig,
    ) -> Self {
        let resolver = Resolver::new(Arc::clone(&source), Arc::clone(&store));
        Self {
            source,
            store,
            resolver,
            config,
        }
    }

    /// Merged navigation for one render.
    ///
    /// A failing store yields the static tree alone.
    pub async fn navigation(&self) -> MergedRouteSpace {
        let dynamic = match self.store.list_documents().await {
            Ok(summaries) => dynamic_page_map(&summaries, &self.mount_route(), &self.config.groups),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to list documents, navigation shows static pages only");
                Vec::new()
            }
        };
        MergedRouteSpace::merge(
            self.source.page_map(),
            dynamic,
            self.config.mount_point.trim_matches('/'),
        )
    }

    /// Resolve request path segments.
    pub async fn resolve(&self, segments: &[&str]) -> Resolution {
        self.resolver.resolve(segments).await
    }

    pub fn render_document(&self, document: &Document) -> RenderedDoc {
        render_document(document)
    }

    /// Route of the mount folder, e.g. `/docs`.
    #[must_use]
    pub fn mount_route(&self) -> String {
        format!("/{}", self.config.mount_point.trim_matches('/'))
    }

    /// Document store for the write path.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use o24_store::{MockStore, NewDocument};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::merge::RouteOrigin;
    use crate::page_map::PageNode;
    use crate::static_source::MemorySource;

    fn source() -> MemorySource {
        MemorySource::new(vec![
            PageNode::page("index", "/", "Home"),
            PageNode::folder(
                "docs",
                "/docs",
                "Docs",
                vec![PageNode::page("overview", "/docs/overview", "Overview")],
            ),
        ])
        .with_page("/", "# Home\n")
        .with_page("/docs/overview", "# Overview\n")
    }

    fn srs_config() -> SiteConfig {
        SiteConfig {
            mount_point: "docs".to_owned(),
            groups: vec![NavGroup {
                category: "srs".to_owned(),
                name: "srs".to_owned(),
                title: "Requirements".to_owned(),
            }],
        }
    }

    #[tokio::test]
    async fn test_navigation_merges_documents() {
        let store = MockStore::new()
            .with_document(NewDocument::new("Overview Copy", "overview"))
            .with_document(NewDocument::new("Login", "login").with_category("srs"))
            .with_document(NewDocument::new("Intro", "intro"));
        let site = Site::new(Arc::new(source()), Arc::new(store), srs_config());

        let nav = site.navigation().await;

        let docs = &nav.tree()[1];
        let routes: Vec<&str> = docs.children.iter().map(|n| n.route.as_str()).collect();
        assert_eq!(routes, vec!["/docs/overview", "/docs/srs", "/docs/intro"]);
        assert_eq!(nav.origin("/docs/overview"), Some(RouteOrigin::Static));
        assert_eq!(nav.origin("/docs/srs/login"), Some(RouteOrigin::Dynamic));
        assert_eq!(docs.children[0].title, "Overview");
    }

    #[tokio::test]
    async fn test_navigation_with_failing_store() {
        let site = Site::new(
            Arc::new(source()),
            Arc::new(MockStore::failing()),
            SiteConfig::default(),
        );

        let nav = site.navigation().await;

        assert_eq!(nav.tree(), source().page_map());
    }

    #[tokio::test]
    async fn test_resolve_through_site() {
        let store = MockStore::new().with_document(NewDocument::new("Login", "login").with_category("srs"));
        let site = Site::new(Arc::new(source()), Arc::new(store), srs_config());

        assert!(matches!(site.resolve(&[]).await, Resolution::StaticHit { .. }));
        assert!(matches!(
            site.resolve(&["docs", "srs", "login"]).await,
            Resolution::DynamicHit { .. }
        ));
        assert!(site.resolve(&["docs", "missing"]).await.is_not_found());
    }

    #[test]
    fn test_mount_route() {
        let site = Site::new(
            Arc::new(MemorySource::default()),
            Arc::new(MockStore::new()),
            SiteConfig {
                mount_point: "/guides/".to_owned(),
                groups: Vec::new(),
            },
        );

        assert_eq!(site.mount_route(), "/guides");
    }
}
