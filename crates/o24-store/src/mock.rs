//! Mock store implementation for testing.
//!
//! Provides [`MockStore`] for unit testing without a database.

use std::sync::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::document::{Document, DocumentSummary, DocumentUpdate, NewDocument, timestamp_now};
use crate::store::{DocumentStore, StoreError, StoreErrorKind};

const BACKEND: &str = "Mock";

/// In-memory store with the same semantics as the real backends.
///
/// # Example
///
/// ```ignore
/// use o24_store::{DocumentStore, MockStore, NewDocument};
///
/// let store = MockStore::new()
///     .with_document(NewDocument::new("Intro", "intro").with_content("# Intro"));
///
/// let doc = store.get_document("intro").await?;
/// ```
#[derive(Debug, Default)]
pub struct MockStore {
    documents: RwLock<Vec<Document>>,
    next_id: AtomicUsize,
    failing: bool,
}

impl MockStore {
    /// Create a new empty mock store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store whose every operation fails with [`StoreErrorKind::Unavailable`].
    #[must_use]
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    /// Add a document.
    ///
    /// # Panics
    ///
    /// Panics if the payload is invalid or the slug is already present.
    #[must_use]
    pub fn with_document(self, new: NewDocument) -> Self {
        self.insert(new).expect("valid mock document");
        self
    }

    /// Number of stored documents.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.read().unwrap().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.failing {
            return Err(StoreError::new(StoreErrorKind::Unavailable)
                .with_backend(BACKEND)
                .with_message("connection refused"));
        }
        Ok(())
    }

    fn insert(&self, new: NewDocument) -> Result<Document, StoreError> {
        new.validate()?;
        let mut documents = self.documents.write().unwrap();
        if documents.iter().any(|d| d.slug == new.slug) {
            return Err(StoreError::already_exists(new.slug).with_backend(BACKEND));
        }
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let doc = new.into_document(format!("mock-{id}"), timestamp_now());
        documents.push(doc.clone());
        Ok(doc)
    }
}

#[async_trait]
impl DocumentStore for MockStore {
    async fn list_documents(&self) -> Result<Vec<DocumentSummary>, StoreError> {
        self.check_available()?;
        let documents = self.documents.read().unwrap();
        let mut summaries: Vec<DocumentSummary> =
            documents.iter().map(DocumentSummary::from).collect();
        // Stable sort keeps insertion order for equal keys.
        summaries.sort_by_key(|d| (d.display_order, d.created_at));
        Ok(summaries)
    }

    async fn get_document(&self, slug: &str) -> Result<Option<Document>, StoreError> {
        self.check_available()?;
        let documents = self.documents.read().unwrap();
        Ok(documents.iter().find(|d| d.slug == slug).cloned())
    }

    async fn create_document(&self, new: NewDocument) -> Result<Document, StoreError> {
        self.check_available()?;
        self.insert(new)
    }

    async fn update_document(
        &self,
        slug: &str,
        update: DocumentUpdate,
    ) -> Result<Document, StoreError> {
        self.check_available()?;
        update.validate()?;
        let mut documents = self.documents.write().unwrap();
        let doc = documents
            .iter_mut()
            .find(|d| d.slug == slug)
            .ok_or_else(|| StoreError::not_found(slug).with_backend(BACKEND))?;
        update.apply(doc, timestamp_now());
        Ok(doc.clone())
    }

    async fn delete_document(&self, slug: &str) -> Result<(), StoreError> {
        self.check_available()?;
        let mut documents = self.documents.write().unwrap();
        let before = documents.len();
        documents.retain(|d| d.slug != slug);
        if documents.len() == before {
            return Err(StoreError::not_found(slug).with_backend(BACKEND));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[tokio::test]
    async fn test_builder_and_get() {
        let store = MockStore::new().with_document(NewDocument::new("Intro", "intro"));

        let doc = store.get_document("intro").await.unwrap().unwrap();

        assert_eq!(doc.id, "mock-1");
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_slug() {
        let store = MockStore::new().with_document(NewDocument::new("Intro", "intro"));

        let err = store
            .create_document(NewDocument::new("Other", "intro"))
            .await
            .unwrap_err();

        assert!(err.is_duplicate());
        assert_eq!(store.get_document("intro").await.unwrap().unwrap().title, "Intro");
    }

    #[tokio::test]
    async fn test_list_order() {
        let store = MockStore::new()
            .with_document(NewDocument::new("B", "b").with_display_order(2))
            .with_document(NewDocument::new("A", "a").with_display_order(1))
            .with_document(NewDocument::new("C", "c").with_display_order(2));

        let slugs: Vec<String> = store
            .list_documents()
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.slug)
            .collect();

        assert_eq!(slugs, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_failing_store() {
        let store = MockStore::failing();

        let err = store.get_document("intro").await.unwrap_err();

        assert_eq!(err.kind, StoreErrorKind::Unavailable);
        assert!(store.list_documents().await.is_err());
    }

    #[tokio::test]
    async fn test_update_and_delete_missing() {
        let store = MockStore::new();

        assert!(
            store
                .update_document("x", DocumentUpdate::default())
                .await
                .unwrap_err()
                .is_not_found()
        );
        assert!(store.delete_document("x").await.unwrap_err().is_not_found());
    }
}
