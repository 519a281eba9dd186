//! Paragraph boundaries.
//!
//! A paragraph runs from its first character through its terminating `\n`
//! inclusive, or to end of text when no line feed follows. This is the span
//! paragraph-scoped attributes (alignment, first-line indent) are snapped to.

use std::ops::Range;

/// One paragraph, in UTF-16 offsets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Paragraph {
    pub start: usize,
    /// End of the paragraph content, excluding the line feed.
    pub content_end: usize,
    /// End including the terminating line feed, if any.
    pub end: usize,
}

impl Paragraph {
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// A paragraph holding nothing but its line feed (or nothing at all).
    pub fn is_blank(&self) -> bool {
        self.content_end == self.start
    }

    pub fn intersects(&self, start: usize, end: usize) -> bool {
        self.start < end && self.end > start
    }
}

/// Split text into paragraphs, inclusive of each terminating `\n`.
///
/// Text ending in `\n` has no trailing empty paragraph; empty text has none.
pub fn paragraphs(chars: impl IntoIterator<Item = char>) -> Vec<Paragraph> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut offset = 0;
    for c in chars {
        offset += c.len_utf16();
        if c == '\n' {
            out.push(Paragraph {
                start,
                content_end: offset - 1,
                end: offset,
            });
            start = offset;
        }
    }
    if offset > start {
        out.push(Paragraph {
            start,
            content_end: offset,
            end: offset,
        });
    }
    out
}

/// The paragraph containing `offset`.
///
/// An offset at the very end of text belongs to the last paragraph, unless
/// the text ends in a line feed, in which case it sits in the (empty)
/// paragraph after it.
pub fn paragraph_at(chars: impl IntoIterator<Item = char>, offset: usize) -> Paragraph {
    let all = paragraphs(chars);
    if let Some(p) = all.iter().find(|p| offset >= p.start && offset < p.end) {
        return *p;
    }
    match all.last() {
        Some(last) if last.end == last.content_end && offset == last.end => *last,
        Some(last) => Paragraph {
            start: last.end,
            content_end: last.end,
            end: last.end,
        },
        None => Paragraph {
            start: 0,
            content_end: 0,
            end: 0,
        },
    }
}

/// Paragraphs intersecting the half-open interval `[start, end)`.
pub fn paragraphs_overlapping(
    chars: impl IntoIterator<Item = char>,
    start: usize,
    end: usize,
) -> Vec<Paragraph> {
    paragraphs(chars)
        .into_iter()
        .filter(|p| p.intersects(start, end))
        .collect()
}
