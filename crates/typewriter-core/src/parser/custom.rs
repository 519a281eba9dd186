//! Reapplication of the attributes the base parse cannot see.
//!
//! Fonts, sizes and alignment live on `<span>` attributes and first-line
//! indents on a paragraph class. None of them carry offsets, so each
//! element's text content is searched for in the parsed text, moving a cursor
//! forward past every hit. There is one cursor per attribute so that a miss
//! for one attribute cannot desynchronize the others.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::ParseError;
use crate::font::FontCatalog;
use crate::paragraph;
use crate::span::SpanModel;
use crate::text::{Utf16Tracker, utf16_len};
use crate::types::{Alignment, Attribute, AttributeKind, AttributeRange};

use super::base::{inner_text, line_breaks};

static SPAN_OPEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<span\b([^>]*)>").unwrap());
static SPAN_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<span\b[^>]*>|</span\s*>").unwrap());
static FONT_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"data-font-resource-id\s*=\s*"(\d+)""#).unwrap());
static FONT_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"data-font-name\s*=\s*"([^"]+)""#).unwrap());
static ALIGNMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"data-alignment\s*=\s*"(\w+)""#).unwrap());
static FONT_SIZE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"font-size:\s*([\d.]+)em").unwrap());
static INDENT_WIDTH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"data-indent\s*=\s*"([\d.]+)""#).unwrap());
static INDENTED_P: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<p\b[^>]*\bclass\s*=\s*"[^"]*\bindented-paragraph\b[^"]*"[^>]*>"#).unwrap()
});
static PARAGRAPH_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</p\s*>|<p\b").unwrap());

/// A `<span>` element: its attribute string, its text content and where its
/// opening tag sits in the markup.
struct SpanElement<'h> {
    attrs: &'h str,
    content: String,
    tag_start: usize,
    tag_len: usize,
}

impl SpanElement<'_> {
    /// Widen a located interval over the line feeds the tag marks, staying
    /// inside the text.
    fn widen(&self, (start, end): (usize, usize), len: usize) -> (usize, usize) {
        let (before, after) = line_breaks(self.attrs);
        (start.saturating_sub(before), end.saturating_add(after).min(len))
    }
}

/// Forward search over the parsed text.
struct Cursor<'t> {
    text: &'t str,
    byte: usize,
    utf16: Utf16Tracker<'t>,
}

impl<'t> Cursor<'t> {
    fn new(text: &'t str) -> Self {
        Self {
            text,
            byte: 0,
            utf16: Utf16Tracker::new(text),
        }
    }

    /// Next occurrence of `needle` at or after the cursor, as a UTF-16
    /// interval. Advances past it.
    fn locate(&mut self, needle: &str) -> Option<(usize, usize)> {
        if needle.is_empty() {
            return None;
        }
        let pos = self.byte + self.text[self.byte..].find(needle)?;
        let start = self.utf16.utf16_at(pos);
        self.byte = pos + needle.len();
        Some((start, start + utf16_len(needle)))
    }

    /// Like [`locate`](Self::locate), but only accepts a hit at the start of
    /// a line.
    fn locate_line_start(&mut self, needle: &str) -> Option<usize> {
        if needle.is_empty() {
            return None;
        }
        let mut from = self.byte;
        while from <= self.text.len() {
            let pos = from + self.text[from..].find(needle)?;
            if pos == 0 || self.text[..pos].ends_with('\n') {
                let start = self.utf16.utf16_at(pos);
                self.byte = pos + needle.len();
                return Some(start);
            }
            from = pos + self.text[pos..].chars().next().map_or(1, char::len_utf8);
        }
        None
    }
}

/// Reapply span attributes and paragraph indents found in `html` onto
/// `model`, whose text came from the base parse of the same markup.
pub(crate) fn reapply(
    model: &mut SpanModel,
    html: &str,
    fonts: &FontCatalog,
) -> Result<(), ParseError> {
    let text = model.text().to_string();
    let len = model.len();
    let spans = span_elements(html);
    tracing::trace!(spans = spans.len(), "reapplying span attributes");

    let mut cursor = Cursor::new(&text);
    for span in &spans {
        let Some(caps) = FONT_ID.captures(span.attrs) else {
            continue;
        };
        let id = &caps[1];
        if id.bytes().all(|b| b == b'0') {
            tracing::debug!("skipping default font id");
            continue;
        }
        if let Some(found) = cursor.locate(&span.content) {
            let (start, end) = span.widen(found, len);
            add_unless_present(model, Attribute::CustomFont(id.into()), start, end, html, span)?;
        }
    }

    let mut cursor = Cursor::new(&text);
    for span in &spans {
        let Some(caps) = FONT_NAME.captures(span.attrs) else {
            continue;
        };
        let Some(found) = cursor.locate(&span.content) else {
            continue;
        };
        let (start, end) = span.widen(found, len);
        let name = crate::escape::decode_entities(&caps[1]);
        match fonts.find_by_name(&name) {
            Some(font) => {
                let attr = Attribute::CustomFont(font.id.clone());
                add_unless_present(model, attr, start, end, html, span)?;
            }
            None => tracing::debug!(%name, "font name not in catalog"),
        }
    }

    let mut cursor = Cursor::new(&text);
    for span in &spans {
        let Some(caps) = ALIGNMENT.captures(span.attrs) else {
            continue;
        };
        let Some((start, end)) = cursor.locate(&span.content) else {
            continue;
        };
        let alignment = match Alignment::from_attr(&caps[1]) {
            Some(Alignment::Left) => continue,
            Some(a) => a,
            None => {
                tracing::debug!(value = &caps[1], "unknown alignment");
                continue;
            }
        };
        for para in paragraph::paragraphs_overlapping(text.chars(), start, end) {
            add_unless_present(
                model,
                Attribute::Alignment(alignment),
                para.start,
                para.end,
                html,
                span,
            )?;
        }
    }

    let mut cursor = Cursor::new(&text);
    for span in &spans {
        let Some(caps) = FONT_SIZE.captures(span.attrs) else {
            continue;
        };
        let Some(found) = cursor.locate(&span.content) else {
            continue;
        };
        let (start, end) = span.widen(found, len);
        match caps[1].parse::<f32>() {
            Ok(factor) if factor.is_finite() && factor > 0.0 && factor != 1.0 => {
                let attr = Attribute::RelativeSize(factor);
                add_unless_present(model, attr, start, end, html, span)?;
            }
            _ => tracing::debug!(value = &caps[1], "ignoring font size"),
        }
    }

    restore_indents(model, &text, html)
}

/// Restore first-line indents from `indented-paragraph` elements, at the
/// width the element names or else the model's.
fn restore_indents(model: &mut SpanModel, text: &str, html: &str) -> Result<(), ParseError> {
    let default_width = model.indent_width();
    let mut cursor = Cursor::new(text);
    for open in INDENTED_P.find_iter(html) {
        let width = INDENT_WIDTH
            .captures(open.as_str())
            .and_then(|c| c[1].parse::<f32>().ok())
            .filter(|w| w.is_finite())
            .unwrap_or(default_width);
        let rest = &html[open.end()..];
        let content_end = PARAGRAPH_END.find(rest).map_or(rest.len(), |m| m.start());
        let content = inner_text(&rest[..content_end]);
        let Some(start) = cursor.locate_line_start(&content) else {
            tracing::debug!(%content, "indented paragraph not found in text");
            continue;
        };
        let start_byte = cursor.byte - content.len();
        let end = match text[start_byte..].find('\n') {
            Some(nl) => start + utf16_len(&text[start_byte..start_byte + nl]) + 1,
            None => start + utf16_len(&text[start_byte..]),
        };
        if model
            .ranges_of(AttributeKind::FirstLineIndent)
            .any(|r| r.intersects(start, end))
        {
            continue;
        }
        model
            .push_range(AttributeRange::new(
                Attribute::FirstLineIndent(width),
                start,
                end,
            ))
            .map_err(|e| ParseError::new(e.into(), html, open.start(), open.len()))?;
    }
    Ok(())
}

fn add_unless_present(
    model: &mut SpanModel,
    attribute: Attribute,
    start: usize,
    end: usize,
    html: &str,
    span: &SpanElement<'_>,
) -> Result<(), ParseError> {
    let kind = attribute.kind();
    // An equal attribute that only overlaps is a continuation and gets merged
    // afterwards.
    let skip = model.ranges_of(kind).any(|r| {
        r.intersects(start, end)
            && (r.attribute != attribute || (r.start <= start && end <= r.end))
    });
    if skip {
        tracing::trace!(?kind, start, end, "interval already carries this attribute");
        return Ok(());
    }
    model
        .push_range(AttributeRange::new(attribute, start, end))
        .map(|_| ())
        .map_err(|e| ParseError::new(e.into(), html, span.tag_start, span.tag_len))
}

/// Every `<span>` in document order, with its content found by balancing
/// nested spans. An unclosed span runs to the end of the markup.
fn span_elements(html: &str) -> Vec<SpanElement<'_>> {
    SPAN_OPEN
        .captures_iter(html)
        .filter_map(|caps| {
            let tag = caps.get(0)?;
            let attrs = caps.get(1).map_or("", |m| m.as_str());
            let body = &html[tag.end()..];
            let mut depth = 1usize;
            let mut content_end = body.len();
            for m in SPAN_TAG.find_iter(body) {
                if m.as_str().starts_with("</") {
                    depth -= 1;
                    if depth == 0 {
                        content_end = m.start();
                        break;
                    }
                } else {
                    depth += 1;
                }
            }
            Some(SpanElement {
                attrs,
                content: inner_text(&body[..content_end]),
                tag_start: tag.start(),
                tag_len: tag.len(),
            })
        })
        .collect()
}
