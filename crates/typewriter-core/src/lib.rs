//! typewriter-core: rich-text span model and its HTML round trip.
//!
//! This crate provides:
//! - `SpanModel` - plain text plus attribute ranges in UTF-16 offsets
//! - `HtmlWriter` - serializes a model to the stored HTML fragment
//! - `HtmlParser` - rebuilds a model from a fragment, never failing
//! - `FormatSelector` - picks the codec for a document's content format
//! - `EditSession` / `EditorAction` - applying edits and taking save snapshots

pub mod actions;
pub mod document;
pub mod error;
pub mod escape;
pub mod font;
pub mod format;
pub mod import;
pub mod paragraph;
pub mod parser;
pub mod render;
pub mod session;
pub mod span;
pub mod text;
pub mod types;
pub mod writer;

pub use actions::{EditorAction, HeadingPresets, HeadingStyle};
pub use document::{Document, DocumentStore, MemoryStore, SaveSnapshot, StoredContent};
pub use error::{ImportError, ParseError, ParseErrorKind, SpanError, StoreError};
pub use font::{FontCatalog, FontEntry, format_font_name};
pub use format::{Codec, ContentCodec, ContentFormat, FormatSelector, HtmlCodec, PlainTextCodec};
pub use import::import_document;
pub use paragraph::Paragraph;
pub use parser::{HtmlParser, MAX_NESTING_DEPTH, html_to_text, parse_html};
pub use render::{FileImageResolver, ImageResolver};
pub use session::EditSession;
pub use smol_str::SmolStr;
pub use span::{DEFAULT_INDENT_WIDTH, IMAGE_PLACEHOLDER, SpanModel};
pub use text::{EditorRope, Utf16Tracker};
pub use types::{Alignment, Attribute, AttributeKind, AttributeRange, FontId, Selection};
pub use writer::{HtmlWriter, INDENTED_PARAGRAPH_CLASS, to_html};
