//! The span model: a text buffer plus the attribute ranges laid over it.
//!
//! Ranges are kept in canonical order (start, nesting priority, end) after
//! every mutation, so two models holding the same attributes compare equal
//! regardless of the order the attributes were applied in.

use smol_str::SmolStr;

use crate::error::SpanError;
use crate::paragraph::{self, Paragraph};
use crate::text::{EditorRope, utf16_len};
use crate::types::{Alignment, Attribute, AttributeKind, AttributeRange};

/// Default first-line indent width, in inches.
pub const DEFAULT_INDENT_WIDTH: f32 = 0.25;

/// Placeholder sequence inserted for an embedded image: the image occupies
/// the space between two line feeds.
pub const IMAGE_PLACEHOLDER: &str = "\n \n";

/// Formatted text: plain text plus attribute ranges in UTF-16 offsets.
#[derive(Clone, Debug)]
pub struct SpanModel {
    text: EditorRope,
    ranges: Vec<AttributeRange>,
    indent_width: f32,
}

impl Default for SpanModel {
    fn default() -> Self {
        Self {
            text: EditorRope::new(),
            ranges: Vec::new(),
            indent_width: DEFAULT_INDENT_WIDTH,
        }
    }
}

impl PartialEq for SpanModel {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text && self.ranges == other.ranges
    }
}

impl SpanModel {
    /// Unformatted text with no ranges.
    pub fn new(text: &str) -> Self {
        Self {
            text: EditorRope::from_str(text),
            ..Self::default()
        }
    }

    /// Build a model from text and ranges, dropping ranges that are empty,
    /// out of bounds, or split a surrogate pair.
    pub fn from_parts(
        text: &str,
        ranges: impl IntoIterator<Item = AttributeRange>,
    ) -> Result<Self, SpanError> {
        let mut model = Self::new(text);
        for range in ranges {
            model.push_range(range)?;
        }
        Ok(model)
    }

    /// Width used by [`recompute_paragraph_indents`](Self::recompute_paragraph_indents).
    pub fn with_indent_width(mut self, width: f32) -> Self {
        self.indent_width = width;
        self
    }

    pub fn indent_width(&self) -> f32 {
        self.indent_width
    }

    pub fn text(&self) -> &EditorRope {
        &self.text
    }

    /// Length in UTF-16 code units.
    pub fn len(&self) -> usize {
        self.text.len_utf16()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn ranges(&self) -> &[AttributeRange] {
        &self.ranges
    }

    /// Ranges of one kind, in canonical order.
    pub fn ranges_of(&self, kind: AttributeKind) -> impl Iterator<Item = &AttributeRange> {
        self.ranges.iter().filter(move |r| r.kind() == kind)
    }

    /// Attributes covering the character at `offset`.
    pub fn attributes_at(&self, offset: usize) -> impl Iterator<Item = &Attribute> {
        self.ranges
            .iter()
            .filter(move |r| r.contains(offset))
            .map(|r| &r.attribute)
    }

    /// Alignment of the paragraph containing `offset`; `Left` when none is set.
    pub fn alignment_at(&self, offset: usize) -> Alignment {
        let para = self.paragraph_at(offset);
        if para.start == para.end {
            return Alignment::Left;
        }
        self.ranges
            .iter()
            .find_map(|r| match r.attribute {
                Attribute::Alignment(a) if r.contains(para.start) => Some(a),
                _ => None,
            })
            .unwrap_or_default()
    }

    pub fn paragraphs(&self) -> Vec<Paragraph> {
        paragraph::paragraphs(self.text.chars())
    }

    pub fn paragraph_at(&self, offset: usize) -> Paragraph {
        paragraph::paragraph_at(self.text.chars(), offset)
    }

    /// Add a range as-is.
    ///
    /// `start > end` is a contract violation and errors. Ranges that are
    /// empty, run past the text, cut a surrogate pair, or cover nothing but
    /// line feeds are dropped and `Ok(false)` is returned.
    pub fn push_range(&mut self, range: AttributeRange) -> Result<bool, SpanError> {
        if range.start > range.end {
            return Err(SpanError::InvalidRange {
                start: range.start,
                end: range.end,
            });
        }
        if range.start == range.end
            || !self.text.is_char_boundary(range.start)
            || !self.text.is_char_boundary(range.end)
            || covers_only_breaks(&self.text, range.start, range.end)
        {
            tracing::trace!(?range, len = self.len(), "dropping invalid range");
            return Ok(false);
        }
        self.ranges.push(range);
        self.normalize();
        Ok(true)
    }

    /// Toggle `attribute` over `[start, end)`.
    ///
    /// Any range of the same kind touching the selection is removed; if none
    /// did, one new range covering exactly the selection is added. A collapsed
    /// selection does nothing.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn apply_toggle(
        &mut self,
        attribute: Attribute,
        start: usize,
        end: usize,
    ) -> Result<(), SpanError> {
        self.check_selection(start, end)?;
        if start == end {
            return Ok(());
        }
        let kind = attribute.kind();
        if kind == AttributeKind::EmbeddedImage {
            tracing::warn!("images are inserted, not toggled");
            return Ok(());
        }
        let before = self.ranges.len();
        self.ranges
            .retain(|r| !(r.kind() == kind && r.intersects(start, end)));
        if self.ranges.len() == before {
            self.push_range(AttributeRange::new(attribute, start, end))?;
        }
        Ok(())
    }

    /// Set a value-bearing attribute over `[start, end)`.
    ///
    /// Existing ranges of the same kind intersecting the selection are
    /// removed; the new range is added unless the value is the kind's neutral
    /// default. Alignment is routed to
    /// [`apply_paragraph_alignment`](Self::apply_paragraph_alignment),
    /// indents are snapped to whole paragraphs and font ids must be numeric.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn apply_value(
        &mut self,
        attribute: Attribute,
        start: usize,
        end: usize,
    ) -> Result<(), SpanError> {
        self.check_selection(start, end)?;
        match attribute {
            Attribute::Alignment(alignment) => {
                return self.apply_paragraph_alignment(alignment, start, end);
            }
            Attribute::EmbeddedImage(_) => {
                tracing::warn!("images are inserted, not applied to a selection");
                return Ok(());
            }
            Attribute::CustomFont(ref id) if !id.bytes().all(|b| b.is_ascii_digit()) => {
                return Err(SpanError::InvalidFontId { id: id.clone() });
            }
            Attribute::FirstLineIndent(_) => {
                for para in self.selected_paragraphs(start, end) {
                    self.ranges.retain(|r| {
                        !(r.kind() == AttributeKind::FirstLineIndent
                            && r.intersects(para.start, para.end))
                    });
                    if !attribute.is_neutral() && !para.is_blank() {
                        self.push_range(AttributeRange::new(
                            attribute.clone(),
                            para.start,
                            para.end,
                        ))?;
                    }
                }
                return Ok(());
            }
            _ => {}
        }
        if start == end {
            return Ok(());
        }
        let kind = attribute.kind();
        self.ranges
            .retain(|r| !(r.kind() == kind && r.intersects(start, end)));
        if !attribute.is_neutral() {
            self.push_range(AttributeRange::new(attribute, start, end))?;
        }
        Ok(())
    }

    /// Align every paragraph touched by the selection.
    ///
    /// A collapsed selection aligns the paragraph holding the cursor. `Left`
    /// removes alignment without adding a range, and blank paragraphs are
    /// only cleared.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn apply_paragraph_alignment(
        &mut self,
        alignment: Alignment,
        start: usize,
        end: usize,
    ) -> Result<(), SpanError> {
        self.check_selection(start, end)?;
        for para in self.selected_paragraphs(start, end) {
            self.ranges.retain(|r| {
                !(r.kind() == AttributeKind::Alignment && r.intersects(para.start, para.end))
            });
            if alignment != Alignment::Left && !para.is_blank() {
                self.push_range(AttributeRange::new(
                    Attribute::Alignment(alignment),
                    para.start,
                    para.end,
                ))?;
            }
        }
        Ok(())
    }

    /// Insert text at `at`.
    ///
    /// Ranges starting at or after `at` shift right; ranges strictly spanning
    /// `at` grow. A range ending exactly at `at` is not extended.
    pub fn insert_text(&mut self, at: usize, text: &str) -> Result<(), SpanError> {
        self.check_offset(at)?;
        if text.is_empty() {
            return Ok(());
        }
        let n = utf16_len(text);
        self.text.insert(at, text);
        for r in &mut self.ranges {
            if r.start >= at {
                r.start += n;
                r.end += n;
            } else if r.end > at {
                r.end += n;
            }
        }
        self.normalize();
        Ok(())
    }

    /// Embed an image at `at`: inserts `"\n \n"` and marks the space.
    pub fn insert_image(&mut self, source: impl Into<SmolStr>, at: usize) -> Result<(), SpanError> {
        self.insert_text(at, IMAGE_PLACEHOLDER)?;
        self.push_range(AttributeRange::new(
            Attribute::EmbeddedImage(source.into()),
            at + 1,
            at + 2,
        ))?;
        Ok(())
    }

    /// Delete `[start, end)`, shrinking ranges over it and dropping any left
    /// empty or holding only line feeds.
    pub fn delete(&mut self, start: usize, end: usize) -> Result<(), SpanError> {
        self.check_selection(start, end)?;
        if start == end {
            return Ok(());
        }
        let n = end - start;
        let shrink = |x: usize| {
            if x <= start {
                x
            } else if x >= end {
                x - n
            } else {
                start
            }
        };
        self.text.delete(start..end);
        for r in &mut self.ranges {
            r.start = shrink(r.start);
            r.end = shrink(r.end);
        }
        let text = &self.text;
        self.ranges
            .retain(|r| !r.is_empty() && !covers_only_breaks(text, r.start, r.end));
        self.normalize();
        Ok(())
    }

    /// Replace every first-line indent with one per non-blank paragraph.
    ///
    /// Idempotent; other ranges are untouched.
    pub fn recompute_paragraph_indents(&mut self) {
        self.ranges
            .retain(|r| r.kind() != AttributeKind::FirstLineIndent);
        let indent = Attribute::FirstLineIndent(self.indent_width);
        if indent.is_neutral() {
            return;
        }
        for para in self.paragraphs() {
            if !para.is_blank() {
                self.ranges.push(AttributeRange::new(
                    indent.clone(),
                    para.start,
                    para.end,
                ));
            }
        }
        self.normalize();
    }

    /// Merge touching or overlapping inline ranges with equal attributes.
    pub fn merge_adjacent(&mut self) {
        let mut ranges = std::mem::take(&mut self.ranges);
        ranges.sort_by_key(|r| (r.kind().priority(), r.start, r.end));
        let mut merged: Vec<AttributeRange> = Vec::with_capacity(ranges.len());
        for r in ranges {
            if let Some(last) = merged.last_mut() {
                if r.kind().is_inline() && last.attribute == r.attribute && r.start <= last.end {
                    last.end = last.end.max(r.end);
                    continue;
                }
            }
            merged.push(r);
        }
        self.ranges = merged;
        self.normalize();
    }

    fn selected_paragraphs(&self, start: usize, end: usize) -> Vec<Paragraph> {
        if start == end {
            vec![self.paragraph_at(start)]
        } else {
            paragraph::paragraphs_overlapping(self.text.chars(), start, end)
        }
    }

    fn check_selection(&self, start: usize, end: usize) -> Result<(), SpanError> {
        if start > end {
            return Err(SpanError::InvalidRange { start, end });
        }
        self.check_offset(start)?;
        self.check_offset(end)
    }

    fn check_offset(&self, offset: usize) -> Result<(), SpanError> {
        if self.text.is_char_boundary(offset) {
            Ok(())
        } else {
            Err(SpanError::InvalidOffset {
                offset,
                len: self.len(),
            })
        }
    }

    fn normalize(&mut self) {
        self.ranges.sort_by_key(AttributeRange::sort_key);
    }
}

/// A range over line feeds alone has nothing to render.
fn covers_only_breaks(text: &EditorRope, start: usize, end: usize) -> bool {
    text.slice(start..end)
        .is_some_and(|s| s.chars().all(|c| c == '\n'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spans(model: &SpanModel, kind: AttributeKind) -> Vec<(usize, usize)> {
        model.ranges_of(kind).map(|r| (r.start, r.end)).collect()
    }

    #[test]
    fn test_push_range_validation() {
        let mut model = SpanModel::new("abc");
        assert_eq!(
            model.push_range(AttributeRange::new(Attribute::Bold, 2, 1)),
            Err(SpanError::InvalidRange { start: 2, end: 1 })
        );
        assert_eq!(
            model.push_range(AttributeRange::new(Attribute::Bold, 1, 1)),
            Ok(false)
        );
        assert_eq!(
            model.push_range(AttributeRange::new(Attribute::Bold, 1, 9)),
            Ok(false)
        );
        assert_eq!(
            model.push_range(AttributeRange::new(Attribute::Bold, 0, 3)),
            Ok(true)
        );
        assert_eq!(model.ranges().len(), 1);
    }

    #[test]
    fn test_push_range_rejects_split_surrogate() {
        let mut model = SpanModel::new("a🌍b");
        assert_eq!(
            model.push_range(AttributeRange::new(Attribute::Italic, 0, 2)),
            Ok(false)
        );
        assert_eq!(
            model.push_range(AttributeRange::new(Attribute::Italic, 1, 3)),
            Ok(true)
        );
    }

    #[test]
    fn test_toggle_on_off() {
        let mut model = SpanModel::new("hello world");
        model.apply_toggle(Attribute::Bold, 0, 5).unwrap();
        assert_eq!(spans(&model, AttributeKind::Bold), vec![(0, 5)]);

        // Any intersecting selection toggles the whole range off.
        model.apply_toggle(Attribute::Bold, 3, 8).unwrap();
        assert!(spans(&model, AttributeKind::Bold).is_empty());
    }

    #[test]
    fn test_toggle_twice_restores_state() {
        let mut model = SpanModel::new("one two three");
        model.apply_toggle(Attribute::Italic, 0, 3).unwrap();
        model
            .apply_value(Attribute::RelativeSize(1.5), 4, 7)
            .unwrap();
        model.recompute_paragraph_indents();
        let before = model.clone();

        model.apply_toggle(Attribute::Bold, 2, 9).unwrap();
        assert_ne!(model, before);
        model.apply_toggle(Attribute::Bold, 2, 9).unwrap();
        assert_eq!(model, before);
        assert_eq!(model.ranges(), before.ranges());
    }

    #[test]
    fn test_collapsed_toggle_is_noop() {
        let mut model = SpanModel::new("abc");
        model.apply_toggle(Attribute::Bold, 1, 1).unwrap();
        assert!(model.ranges().is_empty());
    }

    #[test]
    fn test_reversed_selection_is_contract_violation() {
        let mut model = SpanModel::new("abc");
        assert_eq!(
            model.apply_toggle(Attribute::Bold, 2, 1),
            Err(SpanError::InvalidRange { start: 2, end: 1 })
        );
        assert!(matches!(
            model.apply_toggle(Attribute::Bold, 0, 7),
            Err(SpanError::InvalidOffset { offset: 7, len: 3 })
        ));
    }

    #[test]
    fn test_apply_value_replaces_and_resets() {
        let mut model = SpanModel::new("some sized text");
        model
            .apply_value(Attribute::RelativeSize(2.0), 0, 9)
            .unwrap();
        model
            .apply_value(Attribute::RelativeSize(1.5), 5, 15)
            .unwrap();
        let sizes: Vec<_> = model
            .ranges_of(AttributeKind::RelativeSize)
            .map(|r| (r.attribute.clone(), r.start, r.end))
            .collect();
        assert_eq!(sizes, vec![(Attribute::RelativeSize(1.5), 5, 15)]);

        // Neutral value removes without adding.
        model
            .apply_value(Attribute::RelativeSize(1.0), 0, 15)
            .unwrap();
        assert!(spans(&model, AttributeKind::RelativeSize).is_empty());
    }

    #[test]
    fn test_default_font_clears() {
        let mut model = SpanModel::new("typeface");
        model
            .apply_value(Attribute::CustomFont("12".into()), 0, 4)
            .unwrap();
        assert_eq!(spans(&model, AttributeKind::CustomFont), vec![(0, 4)]);
        model
            .apply_value(Attribute::CustomFont("0".into()), 0, 8)
            .unwrap();
        assert!(spans(&model, AttributeKind::CustomFont).is_empty());
    }

    #[test]
    fn test_font_ids_are_numeric() {
        let mut model = SpanModel::new("typeface");
        let err = model
            .apply_value(Attribute::CustomFont("serif".into()), 0, 4)
            .unwrap_err();
        assert_eq!(err, SpanError::InvalidFontId { id: "serif".into() });

        model
            .apply_value(Attribute::CustomFont("007".into()), 0, 4)
            .unwrap();
        let fonts: Vec<_> = model
            .ranges_of(AttributeKind::CustomFont)
            .map(|r| r.attribute.clone())
            .collect();
        assert_eq!(fonts, vec![Attribute::CustomFont("007".into())]);
    }

    #[test]
    fn test_alignment_scoped_to_paragraphs() {
        let mut model = SpanModel::new("first\nsecond\nthird");
        model
            .apply_paragraph_alignment(Alignment::Center, 3, 8)
            .unwrap();
        assert_eq!(spans(&model, AttributeKind::Alignment), vec![(0, 6), (6, 13)]);
        assert_eq!(model.alignment_at(9), Alignment::Center);
        assert_eq!(model.alignment_at(14), Alignment::Left);
    }

    #[test]
    fn test_alignment_collapsed_uses_cursor_paragraph() {
        let mut model = SpanModel::new("first\nsecond");
        model
            .apply_paragraph_alignment(Alignment::Right, 8, 8)
            .unwrap();
        assert_eq!(spans(&model, AttributeKind::Alignment), vec![(6, 12)]);
        // Cursor at end of text still reads the last paragraph.
        assert_eq!(model.alignment_at(12), Alignment::Right);
    }

    #[test]
    fn test_left_alignment_removes_range() {
        let mut model = SpanModel::new("centered\nplain");
        model
            .apply_paragraph_alignment(Alignment::Center, 0, 0)
            .unwrap();
        assert_eq!(model.alignment_at(0), Alignment::Center);

        model
            .apply_paragraph_alignment(Alignment::Left, 2, 2)
            .unwrap();
        assert!(spans(&model, AttributeKind::Alignment).is_empty());
        assert_eq!(model.alignment_at(0), Alignment::Left);
    }

    #[test]
    fn test_alignment_skips_blank_paragraph() {
        let mut model = SpanModel::new("a\n\nb");
        model
            .apply_paragraph_alignment(Alignment::Center, 2, 2)
            .unwrap();
        assert!(spans(&model, AttributeKind::Alignment).is_empty());

        model
            .apply_paragraph_alignment(Alignment::Right, 0, 4)
            .unwrap();
        assert_eq!(spans(&model, AttributeKind::Alignment), vec![(0, 2), (3, 4)]);
    }

    #[test]
    fn test_line_feed_only_ranges_dropped() {
        let mut model = SpanModel::new("a\n\nb");
        assert!(!model
            .push_range(AttributeRange::new(Attribute::Bold, 1, 3))
            .unwrap());
        model.apply_toggle(Attribute::Italic, 1, 4).unwrap();
        assert_eq!(spans(&model, AttributeKind::Italic), vec![(1, 4)]);

        // Deleting the letter leaves italic over line feeds alone.
        model.delete(3, 4).unwrap();
        assert!(spans(&model, AttributeKind::Italic).is_empty());
    }

    #[test]
    fn test_apply_value_routes_alignment() {
        let mut model = SpanModel::new("ab\ncd");
        model
            .apply_value(Attribute::Alignment(Alignment::Justify), 4, 5)
            .unwrap();
        assert_eq!(spans(&model, AttributeKind::Alignment), vec![(3, 5)]);
    }

    #[test]
    fn test_insert_image_shifts_and_extends() {
        let mut model = SpanModel::new("ab");
        model.apply_toggle(Attribute::Bold, 0, 2).unwrap();
        model.insert_image("images/cover.png", 1).unwrap();

        assert_eq!(model.text().to_string(), "a\n \nb");
        assert_eq!(spans(&model, AttributeKind::Bold), vec![(0, 5)]);
        assert_eq!(spans(&model, AttributeKind::EmbeddedImage), vec![(2, 3)]);
    }

    #[test]
    fn test_insert_text_boundaries() {
        let mut model = SpanModel::new("abcd");
        model.apply_toggle(Attribute::Bold, 0, 2).unwrap();
        model.apply_toggle(Attribute::Italic, 2, 4).unwrap();

        model.insert_text(2, "XY").unwrap();
        // Bold ends at the insertion point and is not extended; italic shifts.
        assert_eq!(spans(&model, AttributeKind::Bold), vec![(0, 2)]);
        assert_eq!(spans(&model, AttributeKind::Italic), vec![(4, 6)]);

        assert!(model.insert_text(9, "!").is_err());
    }

    #[test]
    fn test_delete_shrinks_ranges() {
        let mut model = SpanModel::new("hello brave world");
        model.apply_toggle(Attribute::Bold, 0, 11).unwrap();
        model.apply_toggle(Attribute::Italic, 6, 11).unwrap();
        model.apply_toggle(Attribute::Italic, 12, 17).unwrap();

        model.delete(5, 11).unwrap();
        assert_eq!(model.text().to_string(), "hello world");
        assert_eq!(spans(&model, AttributeKind::Bold), vec![(0, 5)]);
        assert_eq!(spans(&model, AttributeKind::Italic), vec![(6, 11)]);
    }

    #[test]
    fn test_delete_image_placeholder_drops_image() {
        let mut model = SpanModel::new("ab");
        model.insert_image("data:image/png;base64,AAAA", 1).unwrap();
        model.delete(1, 4).unwrap();
        assert_eq!(model.text().to_string(), "ab");
        assert!(spans(&model, AttributeKind::EmbeddedImage).is_empty());
    }

    #[test]
    fn test_recompute_indents() {
        let mut model = SpanModel::new("Hello.\n\nWorld.");
        model.apply_toggle(Attribute::Bold, 0, 5).unwrap();
        model.recompute_paragraph_indents();
        assert_eq!(
            spans(&model, AttributeKind::FirstLineIndent),
            vec![(0, 7), (8, 14)]
        );

        let once = model.clone();
        model.recompute_paragraph_indents();
        assert_eq!(model, once);
        assert_eq!(spans(&model, AttributeKind::Bold), vec![(0, 5)]);
    }

    #[test]
    fn test_indent_width_zero_disables_indents() {
        let mut model = SpanModel::new("a\nb").with_indent_width(0.0);
        model.recompute_paragraph_indents();
        assert!(model.ranges().is_empty());
    }

    #[test]
    fn test_apply_indent_value_snaps() {
        let mut model = SpanModel::new("one\n\ntwo");
        model
            .apply_value(Attribute::FirstLineIndent(0.5), 1, 6)
            .unwrap();
        let indents: Vec<_> = model
            .ranges_of(AttributeKind::FirstLineIndent)
            .map(|r| (r.attribute.clone(), r.start, r.end))
            .collect();
        assert_eq!(
            indents,
            vec![
                (Attribute::FirstLineIndent(0.5), 0, 4),
                (Attribute::FirstLineIndent(0.5), 5, 8),
            ]
        );
    }

    #[test]
    fn test_merge_adjacent() {
        let mut model = SpanModel::from_parts(
            "abcdef",
            [
                AttributeRange::new(Attribute::Bold, 0, 2),
                AttributeRange::new(Attribute::Bold, 2, 4),
                AttributeRange::new(Attribute::RelativeSize(1.5), 0, 3),
                AttributeRange::new(Attribute::RelativeSize(2.0), 3, 6),
                AttributeRange::new(Attribute::Alignment(Alignment::Center), 0, 3),
                AttributeRange::new(Attribute::Alignment(Alignment::Center), 3, 6),
            ],
        )
        .unwrap();
        model.merge_adjacent();
        assert_eq!(spans(&model, AttributeKind::Bold), vec![(0, 4)]);
        assert_eq!(spans(&model, AttributeKind::RelativeSize), vec![(0, 3), (3, 6)]);
        assert_eq!(spans(&model, AttributeKind::Alignment), vec![(0, 3), (3, 6)]);
    }

    #[test]
    fn test_attributes_at() {
        let mut model = SpanModel::new("abc");
        model.apply_toggle(Attribute::Bold, 0, 2).unwrap();
        model.apply_toggle(Attribute::Italic, 1, 3).unwrap();
        let at_one: Vec<_> = model.attributes_at(1).cloned().collect();
        assert_eq!(at_one, vec![Attribute::Bold, Attribute::Italic]);
        let at_two: Vec<_> = model.attributes_at(2).cloned().collect();
        assert_eq!(at_two, vec![Attribute::Italic]);
    }
}
