//! Base parse: markup to text plus generic bold/italic/image ranges.
//!
//! Understands paragraphs (`<p>`, `<div>`, headings, list items), `<br>`,
//! `<b>`/`<strong>`, `<i>`/`<em>` and inline `<img src="data:...">`. Every
//! other tag is dropped and its text kept.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{ParseError, ParseErrorKind};
use crate::escape::decode_entities;
use crate::types::{Attribute, AttributeRange};

static TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<!--.*?-->|<![^>]*>|<(/?)([a-zA-Z][a-zA-Z0-9]*)\b([^>]*)>").unwrap()
});
static IMG_SRC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)\bsrc\s*=\s*(?:"([^"]*)"|'([^']*)')"#).unwrap());
static BREAKS_BEFORE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"data-breaks-before\s*=\s*"(\d+)""#).unwrap());
static BREAKS_AFTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"data-breaks-after\s*=\s*"(\d+)""#).unwrap());

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];
const BLOCK_ELEMENTS: &[&str] = &[
    "p", "div", "h1", "h2", "h3", "h4", "h5", "h6", "li", "blockquote", "pre", "tr",
];

/// Text and generic ranges recovered from markup.
#[derive(Debug, Default)]
pub(crate) struct BaseDocument {
    pub text: String,
    pub ranges: Vec<AttributeRange>,
}

/// Convert markup to a [`BaseDocument`].
///
/// Fails only when element nesting goes deeper than `depth_limit`.
pub(crate) fn parse_base(html: &str, depth_limit: usize) -> Result<BaseDocument, ParseError> {
    let mut builder = Builder::default();
    let mut depth = 0usize;
    let mut last = 0;

    for caps in TOKEN.captures_iter(html) {
        let Some(whole) = caps.get(0) else { continue };
        builder.text(&html[last..whole.start()]);
        last = whole.end();

        let Some(name) = caps.get(2) else {
            // Comment or declaration.
            continue;
        };
        let name = name.as_str().to_ascii_lowercase();
        let closing = caps.get(1).is_some_and(|m| !m.as_str().is_empty());
        let attrs = caps.get(3).map_or("", |m| m.as_str());
        let self_closing = attrs.trim_end().ends_with('/');

        if !closing && !self_closing && !VOID_ELEMENTS.contains(&name.as_str()) {
            depth += 1;
            if depth > depth_limit {
                return Err(ParseError::new(
                    ParseErrorKind::NestingTooDeep { limit: depth_limit },
                    html,
                    whole.start(),
                    whole.len(),
                )
                .with_advice("the document was probably not written by this editor"));
            }
        } else if closing {
            depth = depth.saturating_sub(1);
        }

        builder.tag(&name, closing, attrs);
    }
    builder.text(&html[last..]);

    Ok(builder.finish())
}

/// Line feeds an inline element's range covers before and after its content.
pub(crate) fn line_breaks(attrs: &str) -> (usize, usize) {
    let count = |re: &Regex| {
        re.captures(attrs)
            .and_then(|c| c[1].parse().ok())
            .unwrap_or(0)
    };
    (count(&BREAKS_BEFORE), count(&BREAKS_AFTER))
}

/// Text content of a fragment, with the same whitespace and break rules as
/// the base parse.
pub(crate) fn inner_text(fragment: &str) -> String {
    match parse_base(fragment, usize::MAX) {
        Ok(doc) => doc.text,
        Err(_) => super::strip::strip_tags(fragment),
    }
}

/// An open `<b>` or `<i>`.
#[derive(Debug, Clone, Copy)]
struct OpenInline {
    start: usize,
    before: usize,
    after: usize,
}

#[derive(Debug, Default)]
struct Builder {
    text: String,
    utf16: usize,
    ranges: Vec<AttributeRange>,
    bold: Vec<OpenInline>,
    italic: Vec<OpenInline>,
    /// Collapsed whitespace waiting for following content on the same line.
    pending_space: bool,
    /// A block was closed since the last line feed.
    block_closed: bool,
    in_paragraph: bool,
}

impl Builder {
    fn push_str(&mut self, s: &str) {
        self.text.push_str(s);
        self.utf16 += s.chars().map(char::len_utf16).sum::<usize>();
    }

    fn push_char(&mut self, c: char) {
        self.text.push(c);
        self.utf16 += c.len_utf16();
    }

    fn at_line_start(&self) -> bool {
        self.text.is_empty() || self.text.ends_with('\n')
    }

    /// Emit whatever break or space is owed before new content.
    fn flush(&mut self) {
        if self.block_closed {
            self.block_closed = false;
            self.pending_space = false;
            if !self.at_line_start() {
                self.push_char('\n');
            }
        }
        if self.pending_space {
            self.pending_space = false;
            if !self.at_line_start() {
                self.push_char(' ');
            }
        }
    }

    fn text(&mut self, raw: &str) {
        if raw.is_empty() {
            return;
        }
        if raw.chars().all(is_html_space)
            && !self.in_paragraph
            && (self.block_closed || self.at_line_start())
        {
            return;
        }

        // Whitespace collapses as written; references are decoded after, so
        // `&#13;` stays a character.
        for run in runs(raw) {
            if run.starts_with(is_html_space) {
                if run.contains(['\n', '\r']) {
                    if !self.at_line_start() {
                        self.pending_space = true;
                    }
                } else {
                    self.flush();
                    self.push_str(run);
                }
            } else {
                self.flush();
                self.push_str(&decode_entities(run));
            }
        }
    }

    fn open_block(&mut self) {
        if self.block_closed || !self.at_line_start() {
            self.push_char('\n');
        }
        self.block_closed = false;
        self.pending_space = false;
        self.in_paragraph = true;
    }

    fn close_block(&mut self) {
        self.block_closed = true;
        self.pending_space = false;
        self.in_paragraph = false;
    }

    fn tag(&mut self, name: &str, closing: bool, attrs: &str) {
        match (name, closing) {
            (n, false) if BLOCK_ELEMENTS.contains(&n) => self.open_block(),
            (n, true) if BLOCK_ELEMENTS.contains(&n) => self.close_block(),
            ("br", _) => {
                self.push_char('\n');
                self.pending_space = false;
                self.block_closed = false;
            }
            ("b" | "strong", false) => {
                let open = self.open_inline(attrs);
                self.bold.push(open);
            }
            ("b" | "strong", true) => {
                if let Some(open) = self.bold.pop() {
                    self.close_range(Attribute::Bold, open);
                }
            }
            ("i" | "em", false) => {
                let open = self.open_inline(attrs);
                self.italic.push(open);
            }
            ("i" | "em", true) => {
                if let Some(open) = self.italic.pop() {
                    self.close_range(Attribute::Italic, open);
                }
            }
            ("img", false) => self.image(attrs),
            _ => {}
        }
    }

    fn image(&mut self, attrs: &str) {
        let src = IMG_SRC
            .captures(attrs)
            .and_then(|c| c.get(1).or_else(|| c.get(2)))
            .map(|m| m.as_str().trim());
        match src {
            Some(src) if src.starts_with("data:image") => {
                self.flush();
                let start = self.utf16;
                self.push_char(' ');
                self.ranges.push(AttributeRange::new(
                    Attribute::EmbeddedImage(decode_entities(src).as_ref().into()),
                    start,
                    start + 1,
                ));
            }
            other => tracing::debug!(src = ?other, "skipping image without inline data"),
        }
    }

    fn open_inline(&mut self, attrs: &str) -> OpenInline {
        self.flush();
        let (before, after) = line_breaks(attrs);
        OpenInline {
            start: self.utf16,
            before,
            after,
        }
    }

    /// Close an inline element, widening it over the line feeds it marks.
    fn close_range(&mut self, attribute: Attribute, open: OpenInline) {
        if self.utf16 > open.start {
            self.ranges.push(AttributeRange::new(
                attribute,
                open.start.saturating_sub(open.before),
                self.utf16.saturating_add(open.after),
            ));
        }
    }

    fn finish(mut self) -> BaseDocument {
        // Unclosed inline tags run to end of text.
        while let Some(open) = self.bold.pop() {
            self.close_range(Attribute::Bold, open);
        }
        while let Some(open) = self.italic.pop() {
            self.close_range(Attribute::Italic, open);
        }
        let len = self.utf16;
        for range in &mut self.ranges {
            range.end = range.end.min(len);
        }
        self.ranges.retain(|r| r.start < r.end);
        BaseDocument {
            text: self.text,
            ranges: self.ranges,
        }
    }
}

fn is_html_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0c')
}

/// Alternating runs of whitespace and other characters.
fn runs(s: &str) -> impl Iterator<Item = &str> + '_ {
    let mut rest = s;
    std::iter::from_fn(move || {
        let space = is_html_space(rest.chars().next()?);
        let end = rest
            .find(|c| is_html_space(c) != space)
            .unwrap_or(rest.len());
        let (run, tail) = rest.split_at(end);
        rest = tail;
        Some(run)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(html: &str) -> BaseDocument {
        parse_base(html, 256).unwrap()
    }

    fn spans(doc: &BaseDocument) -> Vec<(Attribute, usize, usize)> {
        doc.ranges
            .iter()
            .map(|r| (r.attribute.clone(), r.start, r.end))
            .collect()
    }

    #[test]
    fn test_paragraphs_join_with_newline() {
        assert_eq!(parse("<p>Hello.</p><p>World.</p>").text, "Hello.\nWorld.");
        assert_eq!(parse("<p></p>").text, "");
        assert_eq!(parse("<p>a</p><p></p>").text, "a\n");
        assert_eq!(parse("<p></p><p></p><p></p>").text, "\n\n");
    }

    #[test]
    fn test_plain_text_and_breaks() {
        assert_eq!(parse("just text").text, "just text");
        assert_eq!(parse("one<br>two<br/>three").text, "one\ntwo\nthree");
    }

    #[test]
    fn test_hand_written_whitespace() {
        let html = "<div>\n  <p>\n    first line\n    continues\n  </p>\n  <p>second</p>\n</div>\n";
        assert_eq!(parse(html).text, "first line continues\nsecond");
    }

    #[test]
    fn test_spaces_inside_paragraph_are_kept() {
        assert_eq!(parse("<p> </p><p>  indented</p>").text, " \n  indented");
    }

    #[test]
    fn test_bold_italic_ranges() {
        let doc = parse("<p><b><i>ab</i></b>c<strong>d</strong><em>e</em></p>");
        assert_eq!(doc.text, "abcde");
        assert_eq!(
            spans(&doc),
            vec![
                (Attribute::Italic, 0, 2),
                (Attribute::Bold, 0, 2),
                (Attribute::Bold, 3, 4),
                (Attribute::Italic, 4, 5),
            ]
        );
    }

    #[test]
    fn test_unclosed_bold_runs_to_end() {
        let doc = parse("<p>a<b>bc</p>");
        assert_eq!(spans(&doc), vec![(Attribute::Bold, 1, 3)]);
    }

    #[test]
    fn test_stray_close_ignored() {
        let doc = parse("a</b>b");
        assert_eq!(doc.text, "ab");
        assert!(doc.ranges.is_empty());
    }

    #[test]
    fn test_entities_decoded() {
        assert_eq!(parse("<p>a &lt;b&gt; &amp; &quot;c&quot;</p>").text, "a <b> & \"c\"");
    }

    #[test]
    fn test_inline_image() {
        let doc = parse(r#"<p>a</p><p><img src="data:image/png;base64,AAAA"></p><p>b</p>"#);
        assert_eq!(doc.text, "a\n \nb");
        assert_eq!(
            spans(&doc),
            vec![(
                Attribute::EmbeddedImage("data:image/png;base64,AAAA".into()),
                2,
                3
            )]
        );
    }

    #[test]
    fn test_remote_image_skipped() {
        let doc = parse(r#"<p>x<img src="https://example.com/a.png">y</p>"#);
        assert_eq!(doc.text, "xy");
        assert!(doc.ranges.is_empty());
    }

    #[test]
    fn test_unknown_tags_keep_text() {
        let doc = parse(r#"<p><span data-font-resource-id="abc">text</span></p>"#);
        assert_eq!(doc.text, "text");
        assert!(doc.ranges.is_empty());
    }

    #[test]
    fn test_escaped_carriage_return_kept() {
        assert_eq!(parse("<p>a&#13;b</p>").text, "a\rb");
        assert_eq!(parse("<p>a\r\nb</p>").text, "a b");
    }

    #[test]
    fn test_break_marks_widen_ranges() {
        let doc = parse(
            r#"<p><b data-breaks-after="1">a</b></p><p><b data-breaks-before="1">b</b></p>"#,
        );
        assert_eq!(doc.text, "a\nb");
        assert_eq!(
            spans(&doc),
            vec![(Attribute::Bold, 0, 2), (Attribute::Bold, 1, 3)]
        );

        // Marks past the end of the text are clamped.
        let doc = parse(r#"<p><i data-breaks-after="4">a</i></p>"#);
        assert_eq!(spans(&doc), vec![(Attribute::Italic, 0, 1)]);
    }

    #[test]
    fn test_literal_angle_bracket() {
        assert_eq!(parse("a < b").text, "a < b");
    }

    #[test]
    fn test_utf16_offsets() {
        let doc = parse("<p>🌍<b>x</b></p>");
        assert_eq!(spans(&doc), vec![(Attribute::Bold, 2, 3)]);
    }

    #[test]
    fn test_nesting_limit() {
        let html = "<b>".repeat(10);
        let err = parse_base(&html, 5).unwrap_err();
        assert!(matches!(err.kind(), ParseErrorKind::NestingTooDeep { limit: 5 }));
        assert_eq!(err.offset(), 15);
    }

    #[test]
    fn test_inner_text() {
        assert_eq!(inner_text("<b>bold</b> and &amp; <i>more</i>"), "bold and & more");
    }
}
