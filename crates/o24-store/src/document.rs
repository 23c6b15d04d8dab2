//! Document records and write payloads.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::store::StoreError;

/// Category assigned when none is given.
pub const DEFAULT_CATEGORY: &str = "general";

/// A persisted document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Store-assigned identifier.
    pub id: String,
    pub title: String,
    /// Unique key, last segment of the document's route.
    pub slug: String,
    pub description: String,
    pub category: String,
    /// Raw markdown with embedded HTML.
    pub content: String,
    /// Sort key for navigation, ascending.
    pub display_order: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Document without its content, as returned by listings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSummary {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub category: String,
    pub display_order: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Document> for DocumentSummary {
    fn from(doc: &Document) -> Self {
        Self {
            id: doc.id.clone(),
            title: doc.title.clone(),
            slug: doc.slug.clone(),
            description: doc.description.clone(),
            category: doc.category.clone(),
            display_order: doc.display_order,
            created_at: doc.created_at,
            updated_at: doc.updated_at,
        }
    }
}

/// Payload for creating a document.
///
/// Missing `title`/`slug` deserialize as empty strings and are rejected by
/// [`validate`](Self::validate).
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDocument {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub slug: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub content: Option<String>,
    #[serde(alias = "displayorder")]
    pub display_order: Option<i64>,
}

impl NewDocument {
    /// Create a payload with the required fields.
    #[must_use]
    pub fn new(title: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            slug: slug.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    #[must_use]
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    #[must_use]
    pub fn with_display_order(mut self, order: i64) -> Self {
        self.display_order = Some(order);
        self
    }

    /// Check required fields and slug shape.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.title.trim().is_empty() {
            return Err(StoreError::invalid_input("title is required"));
        }
        validate_slug(&self.slug)
    }

    /// Build the stored record, filling defaults.
    pub(crate) fn into_document(self, id: String, now: DateTime<Utc>) -> Document {
        Document {
            id,
            title: self.title.trim().to_owned(),
            slug: self.slug,
            description: self.description.unwrap_or_default(),
            category: self
                .category
                .filter(|c| !c.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_CATEGORY.to_owned()),
            content: self.content.unwrap_or_default(),
            display_order: self.display_order.unwrap_or(0),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update. Absent fields keep their stored value; the slug never changes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub content: Option<String>,
    #[serde(alias = "displayorder")]
    pub display_order: Option<i64>,
}

impl DocumentUpdate {
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
            return Err(StoreError::invalid_input("title must not be empty"));
        }
        Ok(())
    }

    pub(crate) fn apply(self, doc: &mut Document, now: DateTime<Utc>) {
        if let Some(title) = self.title {
            doc.title = title.trim().to_owned();
        }
        if let Some(description) = self.description {
            doc.description = description;
        }
        if let Some(category) = self.category {
            doc.category = category;
        }
        if let Some(content) = self.content {
            doc.content = content;
        }
        if let Some(order) = self.display_order {
            doc.display_order = order;
        }
        doc.updated_at = now;
    }
}

fn validate_slug(slug: &str) -> Result<(), StoreError> {
    if slug.is_empty() {
        return Err(StoreError::invalid_input("slug is required"));
    }
    if slug.contains('/') || slug.chars().any(char::is_whitespace) {
        return Err(StoreError::invalid_input(format!(
            "slug must not contain '/' or whitespace: {slug:?}"
        )));
    }
    Ok(())
}

/// Current time at the millisecond precision the backends persist.
pub(crate) fn timestamp_now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::StoreErrorKind;

    #[test]
    fn test_into_document_defaults() {
        let now = timestamp_now();
        let doc = NewDocument::new(" Intro ", "intro").into_document("1".to_owned(), now);

        assert_eq!(doc.title, "Intro");
        assert_eq!(doc.description, "");
        assert_eq!(doc.category, DEFAULT_CATEGORY);
        assert_eq!(doc.content, "");
        assert_eq!(doc.display_order, 0);
        assert_eq!(doc.created_at, doc.updated_at);
    }

    #[test]
    fn test_validate_requires_title_and_slug() {
        let err = NewDocument::new("", "intro").validate().unwrap_err();
        assert_eq!(err.kind, StoreErrorKind::InvalidInput);

        let err = NewDocument::new("Intro", "").validate().unwrap_err();
        assert_eq!(err.kind, StoreErrorKind::InvalidInput);

        assert!(NewDocument::new("Intro", "intro").validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_slug() {
        assert!(NewDocument::new("A", "a/b").validate().is_err());
        assert!(NewDocument::new("A", "a b").validate().is_err());
    }

    #[test]
    fn test_deserialize_new_document() {
        let json = r#"{"title": "Intro", "slug": "intro", "displayOrder": 3}"#;
        let new: NewDocument = serde_json::from_str(json).unwrap();

        assert_eq!(new, NewDocument::new("Intro", "intro").with_display_order(3));
    }

    #[test]
    fn test_deserialize_lowercase_display_order() {
        let json = r#"{"displayorder": 7}"#;
        let update: DocumentUpdate = serde_json::from_str(json).unwrap();

        assert_eq!(update.display_order, Some(7));
    }

    #[test]
    fn test_deserialize_missing_title() {
        let new: NewDocument = serde_json::from_str(r#"{"slug": "x"}"#).unwrap();

        assert_eq!(new.title, "");
        assert!(new.validate().is_err());
    }

    #[test]
    fn test_apply_update_keeps_absent_fields() {
        let created = timestamp_now();
        let mut doc = NewDocument::new("Intro", "intro")
            .with_content("body")
            .into_document("1".to_owned(), created);
        let later = created + chrono::Duration::seconds(5);

        DocumentUpdate {
            title: Some("Introduction".to_owned()),
            ..DocumentUpdate::default()
        }
        .apply(&mut doc, later);

        assert_eq!(doc.title, "Introduction");
        assert_eq!(doc.content, "body");
        assert_eq!(doc.slug, "intro");
        assert_eq!(doc.created_at, created);
        assert_eq!(doc.updated_at, later);
    }

    #[test]
    fn test_document_serializes_camel_case() {
        let doc = NewDocument::new("Intro", "intro").into_document("1".to_owned(), timestamp_now());
        let value = serde_json::to_value(&doc).unwrap();

        assert!(value.get("displayOrder").is_some());
        assert!(value.get("createdAt").is_some());
        assert!(value.get("display_order").is_none());
    }
}
