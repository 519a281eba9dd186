//! Content format selection.
//!
//! A stored document says how its content is encoded. [`FormatSelector`]
//! maps that tag to the codec that turns stored content into a span model and
//! back. `Json` was reserved but never implemented; it is read as plain text.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::escape::escape_html;
use crate::font::FontCatalog;
use crate::parser::{HtmlParser, strip_structure};
use crate::span::{DEFAULT_INDENT_WIDTH, SpanModel};
use crate::writer::to_html;

static BLANK_LINES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n(?:[ \t]*\n)+").unwrap());

/// How a document's content is stored.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContentFormat {
    #[default]
    PlainText,
    Html,
    Json,
}

impl ContentFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentFormat::PlainText => "PLAIN_TEXT",
            ContentFormat::Html => "HTML",
            ContentFormat::Json => "JSON",
        }
    }
}

impl std::fmt::Display for ContentFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Conversion between stored content and a span model.
pub trait ContentCodec {
    /// The format this codec writes.
    fn format(&self) -> ContentFormat;

    /// Build a span model from stored content. Never fails.
    fn decode(&self, stored: &str) -> SpanModel;

    /// Stored form of `model`.
    fn encode(&self, model: &SpanModel) -> String;

    /// HTML fragment for embedding stored content in a page.
    fn to_fragment(&self, stored: &str) -> String;
}

/// Plain text: paragraphs separated by blank lines.
#[derive(Debug, Clone, Copy)]
pub struct PlainTextCodec {
    indent_width: f32,
}

impl Default for PlainTextCodec {
    fn default() -> Self {
        Self {
            indent_width: DEFAULT_INDENT_WIDTH,
        }
    }
}

impl PlainTextCodec {
    pub fn new(indent_width: f32) -> Self {
        Self { indent_width }
    }

    fn paragraphs(stored: &str) -> impl Iterator<Item = &str> {
        BLANK_LINES
            .split(stored)
            .map(|p| p.trim_matches(['\n', '\r']))
            .filter(|p| !p.trim().is_empty())
    }
}

impl ContentCodec for PlainTextCodec {
    fn format(&self) -> ContentFormat {
        ContentFormat::PlainText
    }

    /// Blank-line separated paragraphs become one line each.
    fn decode(&self, stored: &str) -> SpanModel {
        let stored = stored.replace("\r\n", "\n");
        let text = Self::paragraphs(&stored).collect::<Vec<_>>().join("\n");
        let mut model = SpanModel::new(&text).with_indent_width(self.indent_width);
        model.recompute_paragraph_indents();
        model
    }

    /// Non-blank lines joined by blank lines. Formatting is dropped.
    fn encode(&self, model: &SpanModel) -> String {
        model
            .text()
            .to_string()
            .split('\n')
            .filter(|line| !line.trim().is_empty())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    fn to_fragment(&self, stored: &str) -> String {
        let stored = stored.replace("\r\n", "\n");
        let mut out = String::new();
        for para in Self::paragraphs(&stored) {
            out.push_str("<p>");
            out.push_str(&escape_html(para.trim()));
            out.push_str("</p>");
        }
        if out.is_empty() {
            out.push_str("<p></p>");
        }
        out
    }
}

/// The HTML fragment written by [`HtmlWriter`](crate::writer::HtmlWriter).
#[derive(Debug, Clone, Copy)]
pub struct HtmlCodec<'a> {
    fonts: &'a FontCatalog,
    indent_width: f32,
}

impl<'a> HtmlCodec<'a> {
    pub fn new(fonts: &'a FontCatalog, indent_width: f32) -> Self {
        Self {
            fonts,
            indent_width,
        }
    }
}

impl ContentCodec for HtmlCodec<'_> {
    fn format(&self) -> ContentFormat {
        ContentFormat::Html
    }

    fn decode(&self, stored: &str) -> SpanModel {
        HtmlParser::new(self.fonts)
            .with_indent_width(self.indent_width)
            .parse(stored)
    }

    fn encode(&self, model: &SpanModel) -> String {
        to_html(model, self.fonts)
    }

    fn to_fragment(&self, stored: &str) -> String {
        let body = strip_structure(stored);
        if body.is_empty() {
            "<p></p>".to_string()
        } else {
            body
        }
    }
}

/// Either codec, chosen by [`FormatSelector::codec`].
#[derive(Debug, Clone, Copy)]
pub enum Codec<'a> {
    PlainText(PlainTextCodec),
    Html(HtmlCodec<'a>),
}

impl ContentCodec for Codec<'_> {
    fn format(&self) -> ContentFormat {
        match self {
            Codec::PlainText(c) => c.format(),
            Codec::Html(c) => c.format(),
        }
    }

    fn decode(&self, stored: &str) -> SpanModel {
        match self {
            Codec::PlainText(c) => c.decode(stored),
            Codec::Html(c) => c.decode(stored),
        }
    }

    fn encode(&self, model: &SpanModel) -> String {
        match self {
            Codec::PlainText(c) => c.encode(model),
            Codec::Html(c) => c.encode(model),
        }
    }

    fn to_fragment(&self, stored: &str) -> String {
        match self {
            Codec::PlainText(c) => c.to_fragment(stored),
            Codec::Html(c) => c.to_fragment(stored),
        }
    }
}

/// Stateless lookup from [`ContentFormat`] to codec.
#[derive(Debug, Clone, Copy)]
pub struct FormatSelector<'a> {
    fonts: &'a FontCatalog,
    indent_width: f32,
}

impl<'a> FormatSelector<'a> {
    pub fn new(fonts: &'a FontCatalog) -> Self {
        Self {
            fonts,
            indent_width: DEFAULT_INDENT_WIDTH,
        }
    }

    pub fn with_indent_width(mut self, width: f32) -> Self {
        self.indent_width = width;
        self
    }

    pub fn codec(&self, format: ContentFormat) -> Codec<'a> {
        match format {
            ContentFormat::Html => Codec::Html(HtmlCodec::new(self.fonts, self.indent_width)),
            ContentFormat::PlainText => Codec::PlainText(PlainTextCodec::new(self.indent_width)),
            ContentFormat::Json => {
                tracing::debug!("json content is not implemented, reading as plain text");
                Codec::PlainText(PlainTextCodec::new(self.indent_width))
            }
        }
    }
}
