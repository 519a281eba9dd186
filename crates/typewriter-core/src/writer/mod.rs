//! HtmlWriter - serializes a span model to the persisted HTML fragment.
//!
//! Every line of text becomes one `<p>`; a model with n line feeds yields
//! n + 1 paragraphs, so empty text is `<p></p>`. Inside a paragraph the
//! writer keeps a stack of open wrapping tags equal to the ranges active at
//! the current character, sorted outermost first. When that set changes the
//! stack is closed back to the common prefix and reopened, which splits
//! ranges that would otherwise overlap improperly.
//!
//! An inline range that runs over line feeds is written once per paragraph.
//! Its tags carry `data-breaks-before`/`data-breaks-after` with the number of
//! line feeds it covers on either side of the paragraph's content, so the
//! parser can join the pieces back into one range.

mod embed;
mod tags;

#[cfg(test)]
mod tests;

use std::cmp::Reverse;

use crate::escape::push_escaped;
use crate::font::FontCatalog;
use crate::render::ImageResolver;
use crate::span::SpanModel;
use crate::text::utf16_len;
use crate::types::{Alignment, Attribute, AttributeKind, AttributeRange};

/// Class marking a paragraph that carries a first-line indent.
pub const INDENTED_PARAGRAPH_CLASS: &str = "indented-paragraph";

/// Content bounds of the paragraph being written, and where the content of
/// its nearest non-blank neighbours ends and starts.
#[derive(Debug, Clone, Copy, Default)]
struct Line {
    start: usize,
    end: usize,
    prev_end: usize,
    next_start: usize,
}

impl Line {
    /// Line feeds `range` covers just before and just after this line.
    fn breaks(&self, range: &AttributeRange) -> tags::Breaks {
        if !range.kind().is_inline() {
            return tags::Breaks::default();
        }
        tags::Breaks {
            before: if range.start < self.start {
                self.start - range.start.max(self.prev_end)
            } else {
                0
            },
            after: if range.end > self.end {
                range.end.min(self.next_start) - self.end
            } else {
                0
            },
        }
    }
}

/// Every paragraph's content bounds with its non-blank neighbours filled in.
fn lines(text: &str) -> Vec<Line> {
    let mut lines = Vec::new();
    let mut start = 0;
    for para in text.split('\n') {
        let end = start + utf16_len(para);
        lines.push(Line {
            start,
            end,
            ..Line::default()
        });
        start = end + 1;
    }
    let total = start - 1;

    let mut prev_end = 0;
    for line in &mut lines {
        line.prev_end = prev_end;
        if line.start < line.end {
            prev_end = line.end;
        }
    }
    let mut next_start = total;
    for line in lines.iter_mut().rev() {
        line.next_start = next_start;
        if line.start < line.end {
            next_start = line.start;
        }
    }
    lines
}

/// HTML writer for a [`SpanModel`].
///
/// Generic over:
/// - `R`: Image resolver (optional)
pub struct HtmlWriter<'a, R = ()> {
    model: &'a SpanModel,
    fonts: &'a FontCatalog,
    images: R,

    out: String,
    /// Indices into `model.ranges()` of the currently open wrapping tags.
    open: Vec<usize>,
    line: Line,
}

impl<'a> HtmlWriter<'a, ()> {
    pub fn new(model: &'a SpanModel, fonts: &'a FontCatalog) -> Self {
        Self {
            model,
            fonts,
            images: (),
            out: String::new(),
            open: Vec::new(),
            line: Line::default(),
        }
    }
}

impl<'a, R: ImageResolver> HtmlWriter<'a, R> {
    /// Resolve non-`data:` image references through `images`.
    pub fn with_image_resolver<R2: ImageResolver>(self, images: R2) -> HtmlWriter<'a, R2> {
        HtmlWriter {
            model: self.model,
            fonts: self.fonts,
            images,
            out: self.out,
            open: self.open,
            line: self.line,
        }
    }

    /// Serialize the whole model.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn run(mut self) -> String {
        let model = self.model;
        let text = model.text().to_string();
        let ranges = model.ranges();
        tracing::trace!(len = model.len(), ranges = ranges.len(), "serializing");
        for (para, line) in text.split('\n').zip(lines(&text)) {
            self.line = line;
            let (para_start, para_end) = (line.start, line.end);

            // Wrapping ranges that touch this paragraph's content.
            let local: Vec<usize> = ranges
                .iter()
                .enumerate()
                .filter(|(_, r)| is_wrapper(r) && r.intersects(para_start, para_end))
                .map(|(i, _)| i)
                .collect();
            let images: Vec<&AttributeRange> = ranges
                .iter()
                .filter(|r| {
                    r.kind() == AttributeKind::EmbeddedImage && r.intersects(para_start, para_end)
                })
                .collect();

            let indent = if para_start < para_end {
                ranges.iter().find_map(|r| match r.attribute {
                    Attribute::FirstLineIndent(width) if r.contains(para_start) => Some(width),
                    _ => None,
                })
            } else {
                None
            };
            match indent {
                Some(width) => {
                    self.out.push_str("<p class=\"");
                    self.out.push_str(INDENTED_PARAGRAPH_CLASS);
                    self.out.push('"');
                    // The parser falls back to its configured width.
                    if width != model.indent_width() {
                        self.out.push_str(" data-indent=\"");
                        self.out.push_str(&width.to_string());
                        self.out.push('"');
                    }
                    self.out.push('>');
                }
                None => self.out.push_str("<p>"),
            }

            let mut pos = para_start;
            let mut buf = [0u8; 4];
            for c in para.chars() {
                let desired = desired_stack(ranges, &local, pos);
                self.sync_stack(&desired);

                match images.iter().find(|r| r.start == pos) {
                    Some(image) => {
                        if let Attribute::EmbeddedImage(source) = &image.attribute {
                            self.write_image(source);
                        }
                    }
                    None => push_escaped(&mut self.out, c.encode_utf8(&mut buf)),
                }
                pos += c.len_utf16();
            }

            self.sync_stack(&[]);
            self.out.push_str("</p>");
        }

        self.out
    }

    /// Close tags back to the common prefix with `desired`, then open the rest.
    fn sync_stack(&mut self, desired: &[usize]) {
        let common = self
            .open
            .iter()
            .zip(desired)
            .take_while(|(a, b)| a == b)
            .count();
        let model = self.model;
        let ranges = model.ranges();
        while self.open.len() > common {
            if let Some(idx) = self.open.pop() {
                self.out.push_str(tags::close_tag(&ranges[idx].attribute));
            }
        }
        for &idx in &desired[common..] {
            let breaks = self.line.breaks(&ranges[idx]);
            tags::push_open_tag(&mut self.out, &ranges[idx].attribute, self.fonts, breaks);
            self.open.push(idx);
        }
    }
}

/// Serialize `model` with no image resolution.
pub fn to_html(model: &SpanModel, fonts: &FontCatalog) -> String {
    HtmlWriter::new(model, fonts).run()
}

/// Ranges written as wrapping tags; left alignment has no wrapper.
fn is_wrapper(range: &AttributeRange) -> bool {
    match range.attribute {
        Attribute::Alignment(a) => a != Alignment::Left,
        ref attr => attr.kind().is_inline(),
    }
}

/// Wrapping ranges active at `pos`, outermost first: by nesting priority,
/// then longer-running first, then earlier start.
fn desired_stack(ranges: &[AttributeRange], local: &[usize], pos: usize) -> Vec<usize> {
    let mut active: Vec<usize> = local
        .iter()
        .copied()
        .filter(|&i| ranges[i].contains(pos))
        .collect();
    active.sort_by_key(|&i| {
        let r = &ranges[i];
        (r.kind().priority(), Reverse(r.end), r.start, i)
    });
    active
}
