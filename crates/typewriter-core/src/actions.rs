//! Editor actions applied to a span model.
//!
//! Each toolbar button or keystroke of the editing surface maps to one
//! [`EditorAction`], applied against the current selection.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::error::SpanError;
use crate::span::{IMAGE_PLACEHOLDER, SpanModel};
use crate::text::utf16_len;
use crate::types::{Alignment, Attribute, FontId, Selection};

/// Named size presets offered by the heading picker.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum HeadingStyle {
    Body,
    Title,
    Subtitle,
    Chapter,
}

impl HeadingStyle {
    pub const ALL: [HeadingStyle; 4] = [
        HeadingStyle::Body,
        HeadingStyle::Title,
        HeadingStyle::Subtitle,
        HeadingStyle::Chapter,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            HeadingStyle::Body => "Body",
            HeadingStyle::Title => "Title",
            HeadingStyle::Subtitle => "Subtitle",
            HeadingStyle::Chapter => "Chapter",
        }
    }

    /// Case-insensitive lookup by display name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|style| style.name().eq_ignore_ascii_case(name.trim()))
    }
}

/// Relative size factor for each heading style.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(default)]
pub struct HeadingPresets {
    pub body: f32,
    pub title: f32,
    pub subtitle: f32,
    pub chapter: f32,
}

impl Default for HeadingPresets {
    fn default() -> Self {
        Self {
            body: 1.0,
            title: 2.0,
            subtitle: 1.5,
            chapter: 1.75,
        }
    }
}

impl HeadingPresets {
    pub fn size_of(&self, style: HeadingStyle) -> f32 {
        match style {
            HeadingStyle::Body => self.body,
            HeadingStyle::Title => self.title,
            HeadingStyle::Subtitle => self.subtitle,
            HeadingStyle::Chapter => self.chapter,
        }
    }
}

/// One editing operation against a selection.
#[derive(Clone, Debug, PartialEq)]
pub enum EditorAction {
    ToggleBold,
    ToggleItalic,
    SetFont(FontId),
    SetHeading(HeadingStyle),
    SetSize(f32),
    Align(Alignment),
    InsertImage(SmolStr),
    /// Replace the selection with text.
    InsertText(String),
    /// Delete the selection, or the character before a collapsed cursor.
    Delete,
}

impl EditorAction {
    /// Whether the action changes the text, and so moves paragraph bounds.
    pub fn edits_text(&self) -> bool {
        matches!(
            self,
            EditorAction::InsertImage(_) | EditorAction::InsertText(_) | EditorAction::Delete
        )
    }

    /// Apply to `model`, returning the selection after the edit.
    pub fn apply(
        &self,
        model: &mut SpanModel,
        selection: Selection,
        presets: &HeadingPresets,
    ) -> Result<Selection, SpanError> {
        let (start, end) = (selection.start(), selection.end());
        match self {
            EditorAction::ToggleBold => model.apply_toggle(Attribute::Bold, start, end)?,
            EditorAction::ToggleItalic => model.apply_toggle(Attribute::Italic, start, end)?,
            EditorAction::SetFont(id) => {
                model.apply_value(Attribute::CustomFont(id.clone()), start, end)?
            }
            EditorAction::SetHeading(style) => model.apply_value(
                Attribute::RelativeSize(presets.size_of(*style)),
                start,
                end,
            )?,
            EditorAction::SetSize(factor) => {
                model.apply_value(Attribute::RelativeSize(*factor), start, end)?
            }
            EditorAction::Align(alignment) => {
                model.apply_paragraph_alignment(*alignment, start, end)?
            }
            EditorAction::InsertImage(source) => {
                model.delete(start, end)?;
                model.insert_image(source.clone(), start)?;
                return Ok(Selection::collapsed(start + utf16_len(IMAGE_PLACEHOLDER)));
            }
            EditorAction::InsertText(text) => {
                model.delete(start, end)?;
                model.insert_text(start, text)?;
                return Ok(Selection::collapsed(start + utf16_len(text)));
            }
            EditorAction::Delete => {
                if !selection.is_collapsed() {
                    model.delete(start, end)?;
                    return Ok(Selection::collapsed(start));
                }
                if start == 0 {
                    return Ok(selection);
                }
                let before = model.text().utf16_to_char(start);
                let prev = model.text().char_to_utf16(before.saturating_sub(1));
                model.delete(prev, start)?;
                return Ok(Selection::collapsed(prev));
            }
        }
        Ok(selection)
    }
}
