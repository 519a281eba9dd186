//! HtmlParser - rebuilds a span model from a stored HTML fragment.
//!
//! Parsing runs in stages: document structure is stripped, a base parse
//! turns markup into text with bold/italic/image ranges, span attributes and
//! paragraph indents are then located in that text and reapplied, and
//! finally touching ranges are merged back together.
//!
//! [`HtmlParser::parse`] never fails. When the structured parse gives up the
//! input goes through a plain tag strip, and failing that is taken verbatim
//! as text.

mod base;
mod custom;
mod strip;

pub use strip::{minimal_text, strip_structure};

use crate::error::ParseError;
use crate::font::FontCatalog;
use crate::span::{DEFAULT_INDENT_WIDTH, SpanModel};

/// Deepest element nesting the structured parse accepts.
pub const MAX_NESTING_DEPTH: usize = 256;

/// Text content of an HTML fragment, with paragraphs as line feeds.
pub fn html_to_text(html: &str) -> String {
    base::inner_text(&strip_structure(html))
}

#[derive(Debug, Clone, Copy)]
pub struct HtmlParser<'a> {
    fonts: &'a FontCatalog,
    indent_width: f32,
}

impl<'a> HtmlParser<'a> {
    pub fn new(fonts: &'a FontCatalog) -> Self {
        Self {
            fonts,
            indent_width: DEFAULT_INDENT_WIDTH,
        }
    }

    /// Width given to restored first-line indents.
    pub fn with_indent_width(mut self, width: f32) -> Self {
        self.indent_width = width;
        self
    }

    /// Parse `html`, degrading rather than failing.
    #[tracing::instrument(level = "debug", skip_all, fields(len = html.len()))]
    pub fn parse(&self, html: &str) -> SpanModel {
        match self.parse_structured(html) {
            Ok(model) => model,
            Err(err) => {
                tracing::warn!(
                    error = ?miette::Report::new(err),
                    "structured parse failed, falling back to tag strip"
                );
                let text = match minimal_text(html) {
                    Some(text) => text,
                    None => {
                        tracing::warn!("tag strip failed, keeping raw text");
                        html.to_string()
                    }
                };
                SpanModel::new(&text).with_indent_width(self.indent_width)
            }
        }
    }

    /// The structured parse on its own.
    pub fn parse_structured(&self, html: &str) -> Result<SpanModel, ParseError> {
        let body = strip_structure(html);
        let doc = base::parse_base(&body, MAX_NESTING_DEPTH)?;
        let mut model = SpanModel::from_parts(&doc.text, doc.ranges)
            .map_err(|e| ParseError::new(e.into(), &body, 0, 0))?
            .with_indent_width(self.indent_width);
        custom::reapply(&mut model, &body, self.fonts)?;
        model.merge_adjacent();
        Ok(model)
    }
}

/// Parse `html` with the default indent width.
pub fn parse_html(html: &str, fonts: &FontCatalog) -> SpanModel {
    HtmlParser::new(fonts).parse(html)
}
