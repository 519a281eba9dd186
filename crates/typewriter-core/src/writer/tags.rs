//! Tag mapping for HtmlWriter.
//!
//! | attribute        | element                                                      |
//! |------------------|--------------------------------------------------------------|
//! | `Bold`           | `<b>`                                                        |
//! | `Italic`         | `<i>`                                                        |
//! | `CustomFont(id)` | `<span data-font-resource-id="id" data-font-name="name">`    |
//! | `RelativeSize(f)`| `<span style="font-size: {f}em;">`                           |
//! | `Alignment(a)`   | `<span data-alignment="center\|right\|justify">`              |
//!
//! Inline tags may also carry `data-breaks-before`/`data-breaks-after`.

use crate::escape::push_escaped;
use crate::font::FontCatalog;
use crate::types::Attribute;

/// Line feeds an inline range covers outside the paragraph being written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(super) struct Breaks {
    pub before: usize,
    pub after: usize,
}

impl Breaks {
    fn push(self, out: &mut String) {
        if self.before > 0 {
            out.push_str(" data-breaks-before=\"");
            out.push_str(&self.before.to_string());
            out.push('"');
        }
        if self.after > 0 {
            out.push_str(" data-breaks-after=\"");
            out.push_str(&self.after.to_string());
            out.push('"');
        }
    }
}

pub(super) fn push_open_tag(
    out: &mut String,
    attribute: &Attribute,
    fonts: &FontCatalog,
    breaks: Breaks,
) {
    match attribute {
        Attribute::Bold => {
            out.push_str("<b");
            breaks.push(out);
            out.push('>');
        }
        Attribute::Italic => {
            out.push_str("<i");
            breaks.push(out);
            out.push('>');
        }
        Attribute::CustomFont(id) => {
            let name = fonts
                .resolve_font(id)
                .map(|f| f.name.as_str())
                .unwrap_or_default();
            out.push_str("<span data-font-resource-id=\"");
            push_escaped(out, id);
            out.push_str("\" data-font-name=\"");
            push_escaped(out, name);
            out.push('"');
            breaks.push(out);
            out.push('>');
        }
        Attribute::RelativeSize(factor) => {
            out.push_str("<span style=\"font-size: ");
            out.push_str(&factor.to_string());
            out.push_str("em;\"");
            breaks.push(out);
            out.push('>');
        }
        Attribute::Alignment(alignment) => {
            out.push_str("<span data-alignment=\"");
            out.push_str(alignment.as_str());
            out.push_str("\">");
        }
        Attribute::FirstLineIndent(_) | Attribute::EmbeddedImage(_) => {
            tracing::warn!(?attribute, "attribute has no wrapping tag");
        }
    }
}

pub(super) fn close_tag(attribute: &Attribute) -> &'static str {
    match attribute {
        Attribute::Bold => "</b>",
        Attribute::Italic => "</i>",
        Attribute::CustomFont(_) | Attribute::RelativeSize(_) | Attribute::Alignment(_) => {
            "</span>"
        }
        Attribute::FirstLineIndent(_) | Attribute::EmbeddedImage(_) => "",
    }
}
