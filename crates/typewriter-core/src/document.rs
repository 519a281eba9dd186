//! Documents and the persistence seam.
//!
//! The store itself is an external collaborator. The core only produces a
//! [`SaveSnapshot`] synchronously from a span model and hands it over; what
//! the store does with it (and when) is its own business.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::font::FontCatalog;
use crate::format::{ContentCodec, ContentFormat, FormatSelector};
use crate::parser::html_to_text;
use crate::span::SpanModel;

/// A persisted book.
///
/// With `format == Html` the `formatted_text` is the content and
/// `plain_text` is a tag-stripped copy kept for older readers.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub cover_reference: Option<String>,
    #[serde(default)]
    pub plain_text: String,
    #[serde(default)]
    pub formatted_text: Option<String>,
    #[serde(default)]
    pub format: ContentFormat,
    pub last_edited: DateTime<Utc>,
    pub created: DateTime<Utc>,
}

impl Document {
    /// An empty plain-text document.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            title: title.into(),
            subtitle: None,
            cover_reference: None,
            plain_text: String::new(),
            formatted_text: None,
            format: ContentFormat::PlainText,
            last_edited: now,
            created: now,
        }
    }

    /// Formatted text when the document is HTML and has some, plain text
    /// otherwise.
    pub fn display_content(&self) -> &str {
        match (&self.format, &self.formatted_text) {
            (ContentFormat::Html, Some(html)) if !html.is_empty() => html,
            _ => &self.plain_text,
        }
    }

    pub fn has_formatting(&self) -> bool {
        self.format == ContentFormat::Html
            && self.formatted_text.as_deref().is_some_and(|t| !t.is_empty())
    }

    /// Text with any markup removed.
    pub fn text(&self) -> String {
        if self.has_formatting() {
            html_to_text(self.display_content())
        } else {
            self.plain_text.clone()
        }
    }

    pub fn word_count(&self) -> usize {
        self.text().split_whitespace().count()
    }

    pub fn char_count(&self) -> usize {
        self.text().chars().filter(|c| !c.is_whitespace()).count()
    }

    /// Build the span model for an edit session.
    ///
    /// Formatted documents go through the HTML parser; everything else is
    /// read as plain text. Indents are recomputed either way.
    pub fn open(&self, fonts: &FontCatalog, indent_width: f32) -> SpanModel {
        let selector = FormatSelector::new(fonts).with_indent_width(indent_width);
        let mut model = if self.has_formatting() {
            selector.codec(ContentFormat::Html).decode(self.display_content())
        } else {
            selector
                .codec(ContentFormat::PlainText)
                .decode(&self.plain_text)
        };
        model.recompute_paragraph_indents();
        model
    }

    /// Take over the content of `snapshot` and bump `last_edited`.
    pub fn apply_snapshot(&mut self, snapshot: &SaveSnapshot) {
        self.plain_text.clone_from(&snapshot.plain_text);
        self.formatted_text.clone_from(&snapshot.formatted_text);
        self.format = snapshot.format;
        self.last_edited = Utc::now();
    }

    pub fn stored_content(&self) -> StoredContent {
        StoredContent {
            plain_text: self.plain_text.clone(),
            formatted_text: self.formatted_text.clone(),
            format: self.format,
        }
    }
}

/// Content of one document at the moment of saving.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SaveSnapshot {
    pub document_id: String,
    pub plain_text: String,
    pub formatted_text: Option<String>,
    pub format: ContentFormat,
}

impl SaveSnapshot {
    /// Snapshot an HTML document from an already serialized fragment.
    pub fn html(document_id: impl Into<String>, model: &SpanModel, fragment: String) -> Self {
        Self {
            document_id: document_id.into(),
            plain_text: model.text().to_string(),
            formatted_text: Some(fragment),
            format: ContentFormat::Html,
        }
    }
}

/// Content as a store returns it.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StoredContent {
    pub plain_text: String,
    pub formatted_text: Option<String>,
    pub format: ContentFormat,
}

/// Where documents are persisted.
pub trait DocumentStore {
    fn save(&mut self, snapshot: &SaveSnapshot) -> Result<(), StoreError>;

    fn load(&self, id: &str) -> Result<StoredContent, StoreError>;
}

/// In-memory [`DocumentStore`].
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    documents: HashMap<String, Document>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, document: Document) {
        self.documents.insert(document.id.clone(), document);
    }

    pub fn get(&self, id: &str) -> Option<&Document> {
        self.documents.get(id)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl DocumentStore for MemoryStore {
    fn save(&mut self, snapshot: &SaveSnapshot) -> Result<(), StoreError> {
        let document = self
            .documents
            .get_mut(&snapshot.document_id)
            .ok_or_else(|| StoreError::NotFound(snapshot.document_id.clone()))?;
        document.apply_snapshot(snapshot);
        tracing::debug!(id = %snapshot.document_id, "saved document");
        Ok(())
    }

    fn load(&self, id: &str) -> Result<StoredContent, StoreError> {
        self.documents
            .get(id)
            .map(Document::stored_content)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }
}
