//! SQLite document store.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::Row;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};

use crate::document::{Document, DocumentSummary, DocumentUpdate, NewDocument, timestamp_now};
use crate::store::{DocumentStore, StoreError, StoreErrorKind};

const BACKEND: &str = "Sqlite";

const SCHEMA: &str = r"
CREATE TABLE IF NOT EXISTS documents (
    id TEXT PRIMARY KEY NOT NULL,
    title TEXT NOT NULL,
    slug TEXT NOT NULL UNIQUE,
    description TEXT NOT NULL DEFAULT '',
    category TEXT NOT NULL DEFAULT 'general',
    content TEXT NOT NULL DEFAULT '',
    display_order INTEGER NOT NULL DEFAULT 0,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_documents_order ON documents(display_order, created_at);
";

const SUMMARY_COLUMNS: &str =
    "id, title, slug, description, category, display_order, created_at, updated_at";
const DOCUMENT_COLUMNS: &str =
    "id, title, slug, description, category, content, display_order, created_at, updated_at";

/// Document store on a SQLite connection pool.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Connect to `url` (e.g. `sqlite://path/to/documents.db`), creating the
    /// database file and schema when missing.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(map_sqlx_error)?
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .map_err(map_sqlx_error)?;
        tracing::debug!(url, "Connected to document database");
        Self::from_pool(pool).await
    }

    /// Private in-memory database, kept alive by a single pinned connection.
    pub async fn in_memory() -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:").map_err(map_sqlx_error)?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(map_sqlx_error)?;
        Self::from_pool(pool).await
    }

    /// Wrap an existing pool, creating the schema if needed.
    pub async fn from_pool(pool: SqlitePool) -> Result<Self, StoreError> {
        sqlx::raw_sql(SCHEMA)
            .execute(&pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(Self { pool })
    }

    /// Close all pooled connections.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl DocumentStore for SqliteStore {
    async fn list_documents(&self) -> Result<Vec<DocumentSummary>, StoreError> {
        let sql = format!(
            "SELECT {SUMMARY_COLUMNS} FROM documents ORDER BY display_order, created_at, rowid"
        );
        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        rows.iter().map(row_to_summary).collect()
    }

    async fn get_document(&self, slug: &str) -> Result<Option<Document>, StoreError> {
        let sql = format!("SELECT {DOCUMENT_COLUMNS} FROM documents WHERE slug = ?");
        let row = sqlx::query(&sql)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(e).with_slug(slug))?;
        row.as_ref().map(row_to_document).transpose()
    }

    async fn create_document(&self, new: NewDocument) -> Result<Document, StoreError> {
        new.validate()?;
        let doc = new.into_document(uuid::Uuid::new_v4().to_string(), timestamp_now());

        sqlx::query(
            "INSERT INTO documents \
             (id, title, slug, description, category, content, display_order, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&doc.id)
        .bind(&doc.title)
        .bind(&doc.slug)
        .bind(&doc.description)
        .bind(&doc.category)
        .bind(&doc.content)
        .bind(doc.display_order)
        .bind(doc.created_at.timestamp_millis())
        .bind(doc.updated_at.timestamp_millis())
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e).with_slug(&doc.slug))?;

        tracing::info!(slug = %doc.slug, id = %doc.id, "Created document");
        Ok(doc)
    }

    async fn update_document(
        &self,
        slug: &str,
        update: DocumentUpdate,
    ) -> Result<Document, StoreError> {
        update.validate()?;
        let sql = format!(
            "UPDATE documents SET \
             title = COALESCE(?, title), \
             description = COALESCE(?, description), \
             category = COALESCE(?, category), \
             content = COALESCE(?, content), \
             display_order = COALESCE(?, display_order), \
             updated_at = ? \
             WHERE slug = ? \
             RETURNING {DOCUMENT_COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(update.title.as_deref().map(str::trim))
            .bind(update.description)
            .bind(update.category)
            .bind(update.content)
            .bind(update.display_order)
            .bind(timestamp_now().timestamp_millis())
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(e).with_slug(slug))?
            .ok_or_else(|| StoreError::not_found(slug).with_backend(BACKEND))?;

        tracing::info!(slug, "Updated document");
        row_to_document(&row)
    }

    async fn delete_document(&self, slug: &str) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM documents WHERE slug = ?")
            .bind(slug)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(e).with_slug(slug))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found(slug).with_backend(BACKEND));
        }
        tracing::info!(slug, "Deleted document");
        Ok(())
    }
}

fn row_to_summary(row: &SqliteRow) -> Result<DocumentSummary, StoreError> {
    Ok(DocumentSummary {
        id: row.try_get("id").map_err(map_sqlx_error)?,
        title: row.try_get("title").map_err(map_sqlx_error)?,
        slug: row.try_get("slug").map_err(map_sqlx_error)?,
        description: row.try_get("description").map_err(map_sqlx_error)?,
        category: row.try_get("category").map_err(map_sqlx_error)?,
        display_order: row.try_get("display_order").map_err(map_sqlx_error)?,
        created_at: timestamp_column(row, "created_at")?,
        updated_at: timestamp_column(row, "updated_at")?,
    })
}

fn row_to_document(row: &SqliteRow) -> Result<Document, StoreError> {
    let summary = row_to_summary(row)?;
    Ok(Document {
        id: summary.id,
        title: summary.title,
        slug: summary.slug,
        description: summary.description,
        category: summary.category,
        content: row.try_get("content").map_err(map_sqlx_error)?,
        display_order: summary.display_order,
        created_at: summary.created_at,
        updated_at: summary.updated_at,
    })
}

fn timestamp_column(row: &SqliteRow, column: &str) -> Result<DateTime<Utc>, StoreError> {
    let millis: i64 = row.try_get(column).map_err(map_sqlx_error)?;
    DateTime::from_timestamp_millis(millis).ok_or_else(|| {
        StoreError::new(StoreErrorKind::Other)
            .with_backend(BACKEND)
            .with_message(format!("{column} out of range: {millis}"))
    })
}

fn map_sqlx_error(err: sqlx::Error) -> StoreError {
    let kind = match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => StoreErrorKind::AlreadyExists,
        sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => StoreErrorKind::Unavailable,
        _ => StoreErrorKind::Other,
    };
    StoreError::new(kind).with_backend(BACKEND).with_source(err)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    async fn store() -> SqliteStore {
        SqliteStore::in_memory().await.unwrap()
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let store = store().await;
        let created = store
            .create_document(
                NewDocument::new("Intro", "intro")
                    .with_content("# Intro\n\nHello")
                    .with_description("First steps"),
            )
            .await
            .unwrap();

        let fetched = store.get_document("intro").await.unwrap().unwrap();

        assert_eq!(fetched, created);
        assert_eq!(fetched.category, "general");
        assert_eq!(fetched.content, "# Intro\n\nHello");
    }

    #[tokio::test]
    async fn test_get_missing_is_none() {
        let store = store().await;

        assert!(store.get_document("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_slug_rejected() {
        let store = store().await;
        store
            .create_document(NewDocument::new("Original", "intro").with_content("original"))
            .await
            .unwrap();

        let err = store
            .create_document(NewDocument::new("Copy", "intro").with_content("copy"))
            .await
            .unwrap_err();

        assert!(err.is_duplicate());
        let kept = store.get_document("intro").await.unwrap().unwrap();
        assert_eq!(kept.title, "Original");
        assert_eq!(kept.content, "original");
    }

    #[tokio::test]
    async fn test_create_validates() {
        let store = store().await;

        let err = store
            .create_document(NewDocument::new("  ", "intro"))
            .await
            .unwrap_err();

        assert_eq!(err.kind, StoreErrorKind::InvalidInput);
        assert!(store.list_documents().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_ordered_by_display_order() {
        let store = store().await;
        for (slug, order) in [("c", 2), ("a", 0), ("b", 1), ("a2", 0)] {
            store
                .create_document(NewDocument::new(slug, slug).with_display_order(order))
                .await
                .unwrap();
        }

        let slugs: Vec<String> = store
            .list_documents()
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.slug)
            .collect();

        assert_eq!(slugs, vec!["a", "a2", "b", "c"]);
    }

    #[tokio::test]
    async fn test_partial_update() {
        let store = store().await;
        let created = store
            .create_document(NewDocument::new("Intro", "intro").with_content("old"))
            .await
            .unwrap();

        let updated = store
            .update_document(
                "intro",
                DocumentUpdate {
                    content: Some("new".to_owned()),
                    display_order: Some(4),
                    ..DocumentUpdate::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.title, "Intro");
        assert_eq!(updated.content, "new");
        assert_eq!(updated.display_order, 4);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at >= created.updated_at);
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let store = store().await;

        let err = store
            .update_document("ghost", DocumentUpdate::default())
            .await
            .unwrap_err();

        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_delete() {
        let store = store().await;
        store
            .create_document(NewDocument::new("Intro", "intro"))
            .await
            .unwrap();

        store.delete_document("intro").await.unwrap();

        assert!(store.get_document("intro").await.unwrap().is_none());
        assert!(store.delete_document("intro").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_connect_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("documents.db").display());

        let store = SqliteStore::connect(&url, 2).await.unwrap();
        store
            .create_document(NewDocument::new("Intro", "intro"))
            .await
            .unwrap();
        store.close().await;

        let reopened = SqliteStore::connect(&url, 2).await.unwrap();
        assert!(reopened.get_document("intro").await.unwrap().is_some());
        reopened.close().await;
    }
}
