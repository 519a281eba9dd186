//! Text storage for the span model.
//!
//! `EditorRope` wraps a ropey rope and exposes every offset in UTF-16 code
//! units, the unit editor surfaces report selections in. The free functions
//! at the bottom do the same conversions over plain `&str` for code (the
//! parser) that builds its text as a `String` first.

use std::ops::Range;

use smol_str::{SmolStr, ToSmolStr};

/// Ropey-backed text buffer addressed in UTF-16 code units.
///
/// Provides O(log n) editing operations and offset conversions.
#[derive(Clone, Debug, Default)]
pub struct EditorRope {
    rope: ropey::Rope,
}

impl EditorRope {
    /// Create a new empty rope.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from string.
    pub fn from_str(s: &str) -> Self {
        Self {
            rope: ropey::Rope::from_str(s),
        }
    }

    /// Total length in UTF-16 code units.
    pub fn len_utf16(&self) -> usize {
        self.rope.len_utf16_cu()
    }

    /// Total length in chars (Unicode scalar values).
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// Convert a UTF-16 offset to a char index. Offsets inside a surrogate
    /// pair round down to the char that owns them.
    pub fn utf16_to_char(&self, utf16_offset: usize) -> usize {
        self.rope
            .utf16_cu_to_char(utf16_offset.min(self.rope.len_utf16_cu()))
    }

    /// Convert a char index to a UTF-16 offset.
    pub fn char_to_utf16(&self, char_offset: usize) -> usize {
        self.rope
            .char_to_utf16_cu(char_offset.min(self.rope.len_chars()))
    }

    /// True if `utf16_offset` is within the text and not inside a surrogate pair.
    pub fn is_char_boundary(&self, utf16_offset: usize) -> bool {
        if utf16_offset > self.len_utf16() {
            return false;
        }
        self.char_to_utf16(self.utf16_to_char(utf16_offset)) == utf16_offset
    }

    /// Insert text at a UTF-16 offset.
    ///
    /// The offset must be a char boundary; callers validate it first.
    pub fn insert(&mut self, utf16_offset: usize, text: &str) {
        debug_assert!(self.is_char_boundary(utf16_offset));
        let char_offset = self.utf16_to_char(utf16_offset);
        self.rope.insert(char_offset, text);
    }

    /// Delete a UTF-16 range. Both ends must be char boundaries.
    pub fn delete(&mut self, utf16_range: Range<usize>) {
        debug_assert!(self.is_char_boundary(utf16_range.start));
        debug_assert!(self.is_char_boundary(utf16_range.end));
        let char_range = self.utf16_to_char(utf16_range.start)..self.utf16_to_char(utf16_range.end);
        self.rope.remove(char_range);
    }

    /// Get a slice as SmolStr. Returns None if range is invalid.
    pub fn slice(&self, utf16_range: Range<usize>) -> Option<SmolStr> {
        if utf16_range.start > utf16_range.end
            || !self.is_char_boundary(utf16_range.start)
            || !self.is_char_boundary(utf16_range.end)
        {
            return None;
        }
        let char_range = self.utf16_to_char(utf16_range.start)..self.utf16_to_char(utf16_range.end);
        Some(self.rope.slice(char_range).to_smolstr())
    }

    /// Iterate over all chars.
    pub fn chars(&self) -> ropey::iter::Chars<'_> {
        self.rope.chars()
    }
}

impl std::fmt::Display for EditorRope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for chunk in self.rope.chunks() {
            f.write_str(chunk)?;
        }
        Ok(())
    }
}

impl PartialEq for EditorRope {
    fn eq(&self, other: &Self) -> bool {
        self.rope == other.rope
    }
}

impl From<&str> for EditorRope {
    fn from(s: &str) -> Self {
        Self::from_str(s)
    }
}

impl From<String> for EditorRope {
    fn from(s: String) -> Self {
        Self::from_str(&s)
    }
}

/// Length of `s` in UTF-16 code units.
pub fn utf16_len(s: &str) -> usize {
    s.chars().map(char::len_utf16).sum()
}

/// Forward-moving byte to UTF-16 converter over one string.
///
/// Lookups at or after the previous one cost only the distance walked;
/// looking backwards restarts from zero.
#[derive(Debug, Clone)]
pub struct Utf16Tracker<'a> {
    text: &'a str,
    byte: usize,
    utf16: usize,
}

impl<'a> Utf16Tracker<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            byte: 0,
            utf16: 0,
        }
    }

    /// UTF-16 offset of `byte_offset`, which must be a char boundary.
    pub fn utf16_at(&mut self, byte_offset: usize) -> usize {
        let byte_offset = byte_offset.min(self.text.len());
        if byte_offset < self.byte {
            self.byte = 0;
            self.utf16 = 0;
        }
        self.utf16 += utf16_len(&self.text[self.byte..byte_offset]);
        self.byte = byte_offset;
        self.utf16
    }
}
