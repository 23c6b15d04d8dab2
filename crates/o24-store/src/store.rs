//! Store trait and error types.
//!
//! All operations address documents by slug. Implementations enforce slug
//! uniqueness and report missing slugs on update/delete as
//! [`StoreErrorKind::NotFound`].

use async_trait::async_trait;

use crate::document::{Document, DocumentSummary, DocumentUpdate, NewDocument};

/// Semantic error categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum StoreErrorKind {
    /// No document with the given slug.
    NotFound,
    /// A document with the slug already exists.
    AlreadyExists,
    /// Payload failed validation.
    InvalidInput,
    /// Backend cannot be reached (pool exhausted, connection failure).
    Unavailable,
    /// Other/unknown error category.
    Other,
}

/// Store error with semantic kind and backend-specific source.
#[derive(Debug)]
pub struct StoreError {
    /// Semantic error category.
    pub kind: StoreErrorKind,
    /// Slug context (if applicable).
    pub slug: Option<String>,
    /// Backend identifier (e.g., "Sqlite", "Mock").
    pub backend: Option<&'static str>,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl StoreError {
    /// Create a new store error.
    #[must_use]
    pub fn new(kind: StoreErrorKind) -> Self {
        Self {
            kind,
            slug: None,
            backend: None,
            source: None,
        }
    }

    /// Attach slug context.
    #[must_use]
    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }

    /// Attach backend identifier.
    #[must_use]
    pub fn with_backend(mut self, backend: &'static str) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Attach the underlying error source.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Attach a plain message as the source.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        let message: String = message.into();
        self.source = Some(message.into());
        self
    }

    /// Downcast the source error to a concrete type.
    #[must_use]
    pub fn downcast_source<E: std::error::Error + 'static>(&self) -> Option<&E> {
        self.source.as_ref()?.downcast_ref()
    }

    /// Create a not found error for a slug.
    #[must_use]
    pub fn not_found(slug: impl Into<String>) -> Self {
        Self::new(StoreErrorKind::NotFound).with_slug(slug)
    }

    /// Create a duplicate slug error.
    #[must_use]
    pub fn already_exists(slug: impl Into<String>) -> Self {
        Self::new(StoreErrorKind::AlreadyExists).with_slug(slug)
    }

    /// Create a validation error.
    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(StoreErrorKind::InvalidInput).with_message(message)
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.kind == StoreErrorKind::NotFound
    }

    #[must_use]
    pub fn is_duplicate(&self) -> bool {
        self.kind == StoreErrorKind::AlreadyExists
    }
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Format: "[Backend] Kind: message (slug: foo)"
        if let Some(backend) = self.backend {
            write!(f, "[{backend}] ")?;
        }

        let kind_str = match self.kind {
            StoreErrorKind::NotFound => "Not found",
            StoreErrorKind::AlreadyExists => "Already exists",
            StoreErrorKind::InvalidInput => "Invalid input",
            StoreErrorKind::Unavailable => "Unavailable",
            StoreErrorKind::Other => "Error",
        };

        write!(f, "{kind_str}")?;

        if let Some(source) = &self.source {
            write!(f, ": {source}")?;
        }

        if let Some(slug) = &self.slug {
            write!(f, " (slug: {slug})")?;
        }

        Ok(())
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|s| s.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Persistent document storage keyed by slug.
///
/// Reads are point-in-time snapshots; nothing is cached between calls, so a
/// saved document is visible to the very next read.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// List all documents without content, ordered by display order
    /// ascending, then creation time.
    async fn list_documents(&self) -> Result<Vec<DocumentSummary>, StoreError>;

    /// Fetch one document. `Ok(None)` when the slug is unknown.
    async fn get_document(&self, slug: &str) -> Result<Option<Document>, StoreError>;

    /// Insert a new document.
    ///
    /// # Errors
    ///
    /// - [`StoreErrorKind::InvalidInput`] when title or slug is missing
    /// - [`StoreErrorKind::AlreadyExists`] when the slug is taken
    async fn create_document(&self, new: NewDocument) -> Result<Document, StoreError>;

    /// Apply a partial update and bump `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreErrorKind::NotFound`] when the slug is unknown.
    async fn update_document(
        &self,
        slug: &str,
        update: DocumentUpdate,
    ) -> Result<Document, StoreError>;

    /// Remove a document.
    ///
    /// # Errors
    ///
    /// Returns [`StoreErrorKind::NotFound`] when the slug is unknown.
    async fn delete_document(&self, slug: &str) -> Result<(), StoreError>;
}
