//! EditSession - one open document.
//!
//! The session owns the span model for as long as the document is open. The
//! font catalog and image resolver are borrowed once at open and used for
//! every action and save until the session ends.

use crate::actions::{EditorAction, HeadingPresets};
use crate::document::{Document, DocumentStore, SaveSnapshot};
use crate::error::{SpanError, StoreError};
use crate::font::FontCatalog;
use crate::render::ImageResolver;
use crate::span::SpanModel;
use crate::types::{Attribute, FontId, Selection};
use crate::writer::HtmlWriter;

pub struct EditSession<'a, R = ()> {
    document_id: String,
    model: SpanModel,
    selection: Selection,
    fonts: &'a FontCatalog,
    images: R,
    presets: HeadingPresets,
    /// Font picked with nothing selected, applied to text typed next.
    typing_font: Option<FontId>,
    dirty: bool,
}

impl<'a> EditSession<'a, ()> {
    /// Open `document` for editing.
    #[tracing::instrument(level = "debug", skip_all, fields(id = %document.id))]
    pub fn open(document: &Document, fonts: &'a FontCatalog, indent_width: f32) -> Self {
        let model = document.open(fonts, indent_width);
        tracing::debug!(len = model.len(), ranges = model.ranges().len(), "opened");
        Self {
            document_id: document.id.clone(),
            selection: Selection::collapsed(model.len()),
            model,
            fonts,
            images: (),
            presets: HeadingPresets::default(),
            typing_font: None,
            dirty: false,
        }
    }
}

impl<'a, R: ImageResolver> EditSession<'a, R> {
    pub fn with_image_resolver<R2: ImageResolver>(self, images: R2) -> EditSession<'a, R2> {
        EditSession {
            document_id: self.document_id,
            model: self.model,
            selection: self.selection,
            fonts: self.fonts,
            images,
            presets: self.presets,
            typing_font: self.typing_font,
            dirty: self.dirty,
        }
    }

    pub fn with_heading_presets(mut self, presets: HeadingPresets) -> Self {
        self.presets = presets;
        self
    }

    pub fn document_id(&self) -> &str {
        &self.document_id
    }

    pub fn model(&self) -> &SpanModel {
        &self.model
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn select(&mut self, selection: Selection) {
        self.selection = selection;
    }

    /// Unsaved changes since open or the last snapshot.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Apply `action` at the current selection.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn execute(&mut self, action: EditorAction) -> Result<(), SpanError> {
        let before = self.selection;
        if let EditorAction::SetFont(id) = &action {
            if before.is_collapsed() {
                self.typing_font = (id.as_str() != "0").then(|| id.clone());
                return Ok(());
            }
        }

        self.selection = action.apply(&mut self.model, before, &self.presets)?;

        if let (EditorAction::InsertText(_), Some(font)) = (&action, &self.typing_font) {
            let start = before.start();
            let end = self.selection.end();
            if start < end {
                self.model
                    .apply_value(Attribute::CustomFont(font.clone()), start, end)?;
            }
        }
        if action.edits_text() {
            self.model.recompute_paragraph_indents();
        }
        self.dirty = true;
        Ok(())
    }

    /// Serialize the current state.
    ///
    /// Everything the store needs is copied out here, so the snapshot can be
    /// written after the session has moved on.
    pub fn snapshot(&mut self) -> SaveSnapshot {
        let fragment = HtmlWriter::new(&self.model, self.fonts)
            .with_image_resolver(&self.images)
            .run();
        self.dirty = false;
        SaveSnapshot::html(self.document_id.clone(), &self.model, fragment)
    }

    pub fn save(&mut self, store: &mut impl DocumentStore) -> Result<(), StoreError> {
        let snapshot = self.snapshot();
        store.save(&snapshot)
    }
}
