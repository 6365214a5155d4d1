//! Read-only text analysis over an edit buffer.
//!
//! Document wraps a borrowed [`EditBuffer`] and answers the word and logical
//! line questions that cursor navigation needs. Offsets are code-unit indexes
//! and every result lies in `[0, len]`.

use crate::buffer::EditBuffer;
use crate::line_break::NEWLINE;

/// A borrowed, immutable view of an edit buffer.
#[derive(Debug, Clone, Copy)]
pub struct Document<'a, B: EditBuffer + ?Sized> {
    buffer: &'a B,
}

impl<'a, B: EditBuffer + ?Sized> Document<'a, B> {
    /// Create a document over `buffer`.
    ///
    /// # Examples
    ///
    /// ```
    /// use wrapedit_core::buffer::CharBuffer;
    /// use wrapedit_core::document::Document;
    ///
    /// let buffer = CharBuffer::from_text("hello world");
    /// let doc = Document::new(&buffer);
    /// assert_eq!(doc.next_word_start(0), 6);
    /// assert_eq!(doc.previous_word_start(11), 6);
    /// ```
    pub fn new(buffer: &'a B) -> Self {
        Document { buffer }
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.len() == 0
    }

    fn is_space(&self, offset: usize) -> bool {
        self.buffer
            .char_at(offset)
            .map(char::is_whitespace)
            .unwrap_or(false)
    }

    /// Whether a word starts at `offset`.
    ///
    /// Offset 0 is always a boundary; otherwise a boundary is a non-space unit
    /// preceded by a space.
    pub fn is_word_boundary(&self, offset: usize) -> bool {
        if offset == 0 {
            return true;
        }
        if offset >= self.len() {
            return false;
        }
        self.is_space(offset - 1) && !self.is_space(offset)
    }

    /// Start of the word before `offset`.
    pub fn previous_word_start(&self, offset: usize) -> usize {
        let mut c = offset.min(self.len()).saturating_sub(1);
        while c > 0 && !self.is_word_boundary(c) {
            c -= 1;
        }
        c
    }

    /// Start of the word after `offset`, or the end of the buffer.
    pub fn next_word_start(&self, offset: usize) -> usize {
        let len = self.len();
        let mut c = offset.saturating_add(1);
        while c < len && !self.is_word_boundary(c) {
            c += 1;
        }
        c.min(len)
    }

    /// Start of the logical line containing `offset`.
    pub fn line_start(&self, offset: usize) -> usize {
        let mut c = offset.min(self.len());
        while c > 0 && self.buffer.char_at(c - 1) != Some(NEWLINE) {
            c -= 1;
        }
        c
    }

    /// End of the logical line containing `offset`, before its newline.
    pub fn line_end(&self, offset: usize) -> usize {
        let len = self.len();
        let mut c = offset.min(len);
        while c < len && self.buffer.char_at(c) != Some(NEWLINE) {
            c += 1;
        }
        c
    }

    /// Number of logical lines (newline count plus one).
    pub fn line_count(&self) -> usize {
        1 + (0..self.len())
            .filter(|&i| self.buffer.char_at(i) == Some(NEWLINE))
            .count()
    }
}
