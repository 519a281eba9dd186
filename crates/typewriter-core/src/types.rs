//! Core editor types: selection, attributes, attribute ranges, and edit tracking.
//!
//! All offsets in this crate are UTF-16 code units, matching the offsets an
//! editor surface reports for its selection.

use std::ops::Range;

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// Identifier of a font in the [`FontCatalog`](crate::font::FontCatalog).
///
/// Numeric in practice (`"0"` is the default typeface), but kept as a string so
/// ids written by other builds survive a round trip untouched.
pub type FontId = SmolStr;

/// Text selection with anchor and head positions.
///
/// The anchor is where the selection started, the head is where the cursor is now.
/// They may be in any order - use `start()` and `end()` for ordered bounds.
#[derive(Clone, Debug, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    /// Where selection started
    pub anchor: usize,
    /// Where cursor is now
    pub head: usize,
}

impl Selection {
    /// Create a new selection.
    pub fn new(anchor: usize, head: usize) -> Self {
        Self { anchor, head }
    }

    /// Create a collapsed selection (cursor position).
    pub fn collapsed(offset: usize) -> Self {
        Self {
            anchor: offset,
            head: offset,
        }
    }

    /// Get the start (lower bound) of the selection.
    pub fn start(&self) -> usize {
        self.anchor.min(self.head)
    }

    /// Get the end (upper bound) of the selection.
    pub fn end(&self) -> usize {
        self.anchor.max(self.head)
    }

    /// Check if the selection is collapsed (empty, cursor only).
    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.head
    }

    /// Get the selection length.
    pub fn len(&self) -> usize {
        self.end() - self.start()
    }

    /// Check if empty (same as is_collapsed).
    pub fn is_empty(&self) -> bool {
        self.is_collapsed()
    }

    /// Convert to a Range<usize> (ordered).
    pub fn to_range(&self) -> Range<usize> {
        self.start()..self.end()
    }
}

/// Paragraph alignment. `Left` is the implicit default and is never stored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

impl Alignment {
    /// Value written to `data-alignment`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
            Alignment::Justify => "justify",
        }
    }

    /// Parse a `data-alignment` value. Unknown values yield `None`.
    pub fn from_attr(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "left" | "normal" | "start" => Some(Alignment::Left),
            "center" | "centre" => Some(Alignment::Center),
            "right" | "opposite" | "end" => Some(Alignment::Right),
            "justify" => Some(Alignment::Justify),
            _ => None,
        }
    }
}

/// Payload-free discriminant of an [`Attribute`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AttributeKind {
    Bold,
    Italic,
    CustomFont,
    RelativeSize,
    Alignment,
    FirstLineIndent,
    EmbeddedImage,
}

impl AttributeKind {
    /// Nesting priority; lower values are opened first (outermost).
    ///
    /// Alignment, then font, then size, then bold, then italic. Indents and
    /// images never become wrapping tags and sort last.
    pub fn priority(&self) -> u8 {
        match self {
            AttributeKind::Alignment => 0,
            AttributeKind::CustomFont => 1,
            AttributeKind::RelativeSize => 2,
            AttributeKind::Bold => 3,
            AttributeKind::Italic => 4,
            AttributeKind::FirstLineIndent => 5,
            AttributeKind::EmbeddedImage => 6,
        }
    }

    /// Whether ranges of this kind are snapped to paragraph boundaries.
    pub fn is_paragraph_scoped(&self) -> bool {
        matches!(self, AttributeKind::Alignment | AttributeKind::FirstLineIndent)
    }

    /// Kinds written as a wrapping inline element.
    pub fn is_inline(&self) -> bool {
        matches!(
            self,
            AttributeKind::Bold
                | AttributeKind::Italic
                | AttributeKind::CustomFont
                | AttributeKind::RelativeSize
        )
    }
}

/// A formatting attribute: kind plus payload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum Attribute {
    Bold,
    Italic,
    CustomFont(FontId),
    /// Size factor relative to the body size; must be positive.
    RelativeSize(f32),
    Alignment(Alignment),
    /// First-line indent width in inches.
    FirstLineIndent(f32),
    /// Source reference of the embedded image (a path, a key, or a `data:` URI).
    EmbeddedImage(SmolStr),
}

impl Attribute {
    pub fn kind(&self) -> AttributeKind {
        match self {
            Attribute::Bold => AttributeKind::Bold,
            Attribute::Italic => AttributeKind::Italic,
            Attribute::CustomFont(_) => AttributeKind::CustomFont,
            Attribute::RelativeSize(_) => AttributeKind::RelativeSize,
            Attribute::Alignment(_) => AttributeKind::Alignment,
            Attribute::FirstLineIndent(_) => AttributeKind::FirstLineIndent,
            Attribute::EmbeddedImage(_) => AttributeKind::EmbeddedImage,
        }
    }

    /// True when applying this value means "reset to default".
    pub fn is_neutral(&self) -> bool {
        match self {
            Attribute::RelativeSize(f) => (*f - 1.0).abs() < f32::EPSILON || *f <= 0.0,
            Attribute::CustomFont(id) => id.bytes().all(|b| b == b'0'),
            Attribute::FirstLineIndent(w) => *w <= 0.0,
            Attribute::Alignment(a) => *a == Alignment::Left,
            Attribute::Bold | Attribute::Italic | Attribute::EmbeddedImage(_) => false,
        }
    }
}

/// One attribute over the half-open UTF-16 interval `[start, end)`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AttributeRange {
    pub attribute: Attribute,
    pub start: usize,
    pub end: usize,
}

impl AttributeRange {
    pub fn new(attribute: Attribute, start: usize, end: usize) -> Self {
        Self {
            attribute,
            start,
            end,
        }
    }

    pub fn kind(&self) -> AttributeKind {
        self.attribute.kind()
    }

    pub fn is_paragraph_scoped(&self) -> bool {
        self.kind().is_paragraph_scoped()
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Half-open overlap test against `[start, end)`.
    pub fn intersects(&self, start: usize, end: usize) -> bool {
        self.start < end && self.end > start
    }

    pub fn contains(&self, offset: usize) -> bool {
        offset >= self.start && offset < self.end
    }

    /// Key of the canonical range order: start, nesting priority, end.
    pub(crate) fn sort_key(&self) -> (usize, u8, usize) {
        (self.start, self.kind().priority(), self.end)
    }
}
