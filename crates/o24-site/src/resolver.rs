//! Request path resolution.
//!
//! Order of precedence for a path:
//! 1. a static page whose route matches the full path
//! 2. a dynamic document whose slug matches the last segment
//! 3. not found
//!
//! Static always wins, independently of the merge that already filtered
//! colliding dynamic routes out of the navigation tree.

use std::sync::Arc;

use o24_store::{Document, DocumentStore};

use crate::page_map::{find_route, segments_route};
use crate::static_source::{StaticPage, StaticSource};

/// Outcome of resolving a request path.
#[derive(Clone, Debug)]
pub enum Resolution {
    /// Compiled static page.
    StaticHit { page: Arc<StaticPage> },
    /// Document fetched from the store.
    DynamicHit { document: Document },
    /// Neither source has the path.
    NotFound,
}

impl Resolution {
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }
}

/// Resolves path segments against the static source, then the store.
pub struct Resolver {
    source: Arc<dyn StaticSource>,
    store: Arc<dyn DocumentStore>,
}

impl Resolver {
    pub fn new(source: Arc<dyn StaticSource>, store: Arc<dyn DocumentStore>) -> Self {
        Self { source, store }
    }

    /// Resolve path segments (`[]` for the root).
    ///
    /// Store failures resolve to [`Resolution::NotFound`] and are logged.
    pub async fn resolve(&self, segments: &[&str]) -> Resolution {
        if self.static_route_exists(segments) {
            match self.source.import_page(segments) {
                Ok(page) => return Resolution::StaticHit { page },
                // Folders without an index page land here on every visit.
                Err(e) => {
                    tracing::debug!(
                        route = %segments_route(segments),
                        error = %e,
                        "Static route has no page, trying documents"
                    );
                }
            }
        }

        let Some(slug) = segments.last() else {
            return Resolution::NotFound;
        };

        match self.store.get_document(slug).await {
            Ok(Some(document)) => Resolution::DynamicHit { document },
            Ok(None) => Resolution::NotFound,
            Err(e) => {
                tracing::warn!(slug, error = %e, "Document lookup failed, treating as not found");
                Resolution::NotFound
            }
        }
    }

    /// The root always exists; any other path must be in the static tree.
    fn static_route_exists(&self, segments: &[&str]) -> bool {
        segments.is_empty() || find_route(self.source.page_map(), &segments_route(segments)).is_some()
    }
}

#[cfg(test)]
mod tests {
    use o24_store::{MockStore, NewDocument};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::page_map::PageNode;
    use crate::static_source::{FsPageSource, MemorySource};

    fn docs_tree() -> Vec<PageNode> {
        vec![PageNode::folder(
            "docs",
            "/docs",
            "Docs",
            vec![PageNode::page("overview", "/docs/overview", "Overview")],
        )]
    }

    fn resolver(source: MemorySource, store: MockStore) -> Resolver {
        Resolver::new(Arc::new(source), Arc::new(store))
    }

    #[tokio::test]
    async fn test_static_wins_over_dynamic() {
        let source = MemorySource::new(docs_tree()).with_page("/docs/overview", "# Static Overview\n");
        let store = MockStore::new().with_document(NewDocument::new("Dynamic Overview", "overview"));

        let result = resolver(source, store).resolve(&["docs", "overview"]).await;

        match result {
            Resolution::StaticHit { page } => assert_eq!(page.title, "Static Overview"),
            other => panic!("expected static hit, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_dynamic_fallback() {
        let store = MockStore::new().with_document(NewDocument::new("Intro", "intro"));

        let result = resolver(MemorySource::default(), store)
            .resolve(&["docs", "intro"])
            .await;

        match result {
            Resolution::DynamicHit { document } => {
                assert_eq!(document.slug, "intro");
                assert_eq!(document.title, "Intro");
            }
            other => panic!("expected dynamic hit, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_not_found() {
        let result = resolver(MemorySource::default(), MockStore::new())
            .resolve(&["nope"])
            .await;

        assert!(result.is_not_found());
    }

    #[tokio::test]
    async fn test_uses_last_segment_only() {
        let store = MockStore::new().with_document(NewDocument::new("Login", "login"));

        let result = resolver(MemorySource::default(), store)
            .resolve(&["docs", "srs", "login"])
            .await;

        assert!(matches!(result, Resolution::DynamicHit { document } if document.slug == "login"));
    }

    #[tokio::test]
    async fn test_import_failure_falls_back_to_store() {
        // Route listed in the tree but never compiled.
        let source = MemorySource::new(docs_tree());
        let store = MockStore::new().with_document(NewDocument::new("Overview", "overview"));

        let result = resolver(source, store).resolve(&["docs", "overview"]).await;

        assert!(matches!(result, Resolution::DynamicHit { .. }));
    }

    #[tokio::test]
    async fn test_folder_without_index_falls_back_to_store() {
        let temp = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(temp.path().join("guides")).unwrap();
        std::fs::write(temp.path().join("guides/setup.md"), "# Setup\n").unwrap();
        let source: Arc<dyn StaticSource> = Arc::new(FsPageSource::load(temp.path()));

        let empty = Resolver::new(Arc::clone(&source), Arc::new(MockStore::new()));
        assert!(empty.resolve(&["guides"]).await.is_not_found());
        assert!(matches!(
            empty.resolve(&["guides", "setup"]).await,
            Resolution::StaticHit { .. }
        ));

        let store = MockStore::new().with_document(NewDocument::new("Guides", "guides"));
        let result = Resolver::new(source, Arc::new(store)).resolve(&["guides"]).await;
        assert!(matches!(result, Resolution::DynamicHit { document } if document.slug == "guides"));
    }

    #[tokio::test]
    async fn test_store_failure_is_not_found() {
        let result = resolver(MemorySource::default(), MockStore::failing())
            .resolve(&["docs", "intro"])
            .await;

        assert!(result.is_not_found());
    }

    #[tokio::test]
    async fn test_root_static() {
        let source = MemorySource::new(vec![PageNode::page("index", "/", "Home")]).with_page("/", "# Home\n");

        let result = resolver(source, MockStore::new()).resolve(&[]).await;

        assert!(matches!(result, Resolution::StaticHit { page } if page.title == "Home"));
    }

    #[tokio::test]
    async fn test_root_without_page_is_not_found() {
        let store = MockStore::new().with_document(NewDocument::new("Intro", "intro"));

        let result = resolver(MemorySource::default(), store).resolve(&[]).await;

        assert!(result.is_not_found());
    }

    #[tokio::test]
    async fn test_trailing_slash_routes_match() {
        let tree = vec![PageNode::page("guide", "/guide/", "Guide")];
        let source = MemorySource::new(tree).with_page("/guide", "# Guide\n");

        let result = resolver(source, MockStore::new()).resolve(&["guide"]).await;

        assert!(matches!(result, Resolution::StaticHit { .. }));
    }

    #[tokio::test]
    async fn test_new_document_visible_immediately() {
        let store: Arc<dyn DocumentStore> = Arc::new(MockStore::new());
        let resolver = Resolver::new(Arc::new(MemorySource::default()), Arc::clone(&store));
        assert!(resolver.resolve(&["fresh"]).await.is_not_found());

        store
            .create_document(NewDocument::new("Fresh", "fresh"))
            .await
            .unwrap();

        assert!(matches!(
            resolver.resolve(&["fresh"]).await,
            Resolution::DynamicHit { .. }
        ));
    }
}
