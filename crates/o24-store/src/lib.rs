//! Document store abstraction for O24DOC.
//!
//! Dynamic documents live in a relational backend and are edited at runtime.
//! This crate provides:
//!
//! - [`DocumentStore`] trait with list/get/create/update/delete by slug
//! - [`SqliteStore`] backed by `sqlx` with the schema created on connect
//! - [`MockStore`] for testing (behind `mock` feature flag)
//!
//! Slugs are unique: creating a document with a taken slug fails with
//! [`StoreErrorKind::AlreadyExists`] and leaves the existing record untouched.
//!
//! # Example
//!
//! ```ignore
//! use o24_store::{DocumentStore, NewDocument, SqliteStore};
//!
//! let store = SqliteStore::connect("sqlite://docs.db", 5).await?;
//! store.create_document(NewDocument::new("Intro", "intro")).await?;
//! let doc = store.get_document("intro").await?;
//! ```

mod document;
#[cfg(feature = "mock")]
mod mock;
mod sqlite;
mod store;

pub use document::{DEFAULT_CATEGORY, Document, DocumentSummary, DocumentUpdate, NewDocument};
#[cfg(feature = "mock")]
pub use mock::MockStore;
pub use sqlite::SqliteStore;
pub use store::{DocumentStore, StoreError, StoreErrorKind};
