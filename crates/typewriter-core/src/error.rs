//! Error types for the typewriter core.
//!
//! Content-shape problems (malformed markup, text that cannot be located)
//! never surface as errors; the parser degrades instead. What remains here
//! are contract violations on the span model, the diagnostic the structured
//! parser hands to its fallback, and persistence failures.

use miette::{Diagnostic, NamedSource, SourceSpan};

/// Contract violation on a [`SpanModel`](crate::SpanModel) operation.
#[derive(thiserror::Error, Debug, Diagnostic, Clone, PartialEq, Eq)]
pub enum SpanError {
    #[error("invalid range: start {start} is after end {end}")]
    #[diagnostic(
        code(typewriter::span::invalid_range),
        help("ranges are half-open [start, end) with start <= end")
    )]
    InvalidRange { start: usize, end: usize },

    #[error("offset {offset} is not a character boundary in text of length {len}")]
    #[diagnostic(code(typewriter::span::invalid_offset))]
    InvalidOffset { offset: usize, len: usize },

    #[error("font id {id:?} is not numeric")]
    #[diagnostic(
        code(typewriter::span::invalid_font_id),
        help("font ids are written as decimal digits in stored markup")
    )]
    InvalidFontId { id: crate::types::FontId },
}

/// Structured HTML parse failure, pointing into the markup.
#[derive(thiserror::Error, Debug, Diagnostic)]
#[error("html parse error: {kind}")]
#[diagnostic(code(typewriter::parse))]
pub struct ParseError {
    #[diagnostic_source]
    kind: ParseErrorKind,
    #[source_code]
    src: NamedSource<String>,
    #[label("here")]
    err_location: SourceSpan,
    #[help]
    advice: Option<String>,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, source: &str, offset: usize, len: usize) -> Self {
        Self {
            kind,
            src: NamedSource::new("formatted_text", source.to_owned()),
            err_location: SourceSpan::new(offset.min(source.len()).into(), len),
            advice: None,
        }
    }

    pub fn with_advice(mut self, advice: impl Into<String>) -> Self {
        self.advice = Some(advice.into());
        self
    }

    pub fn kind(&self) -> &ParseErrorKind {
        &self.kind
    }

    /// Byte offset into the markup where the failure was detected.
    pub fn offset(&self) -> usize {
        self.err_location.offset()
    }
}

#[derive(thiserror::Error, Debug, Diagnostic)]
#[non_exhaustive]
pub enum ParseErrorKind {
    #[error("tags nested deeper than {limit}")]
    #[diagnostic(code(typewriter::parse::nesting))]
    NestingTooDeep { limit: usize },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Span(#[from] SpanError),
}

/// Persistence failure behind a [`DocumentStore`](crate::document::DocumentStore).
#[derive(thiserror::Error, Debug, Diagnostic)]
pub enum StoreError {
    #[error("document {0} not found")]
    #[diagnostic(code(typewriter::store::not_found))]
    NotFound(String),

    #[error(transparent)]
    #[diagnostic(code(typewriter::store::io))]
    Io(#[from] std::io::Error),

    #[error("store backend error: {0}")]
    #[diagnostic(code(typewriter::store::backend))]
    Backend(String),
}

/// A file the import conversions do not understand.
#[derive(thiserror::Error, Debug, Diagnostic)]
pub enum ImportError {
    #[error("unsupported file type: {0}")]
    #[diagnostic(
        code(typewriter::import::unsupported),
        help("documents can be imported from .txt, .rtf, .html and .htm files")
    )]
    Unsupported(String),
}
