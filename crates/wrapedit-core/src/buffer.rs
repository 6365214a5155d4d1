//! Text buffer abstraction consumed by the edit session.
//!
//! The edit session never owns text storage conceptually: it reads and mutates
//! the hosting widget's buffer through the [`EditBuffer`] trait. Offsets are in
//! code units (`char`s), and every valid offset lies in `[0, len()]`.
//!
//! [`CharBuffer`] is the default `Vec<char>` backed implementation.

/// Storage capability the edit session mutates.
///
/// Implementations report refusal (for instance when a size limit would be
/// exceeded) by returning `false`; the session then leaves its cursor,
/// selection and history untouched.
pub trait EditBuffer {
    /// Number of code units in the buffer.
    fn len(&self) -> usize;

    /// Code unit at `offset`, or `None` when `offset >= len()`.
    fn char_at(&self, offset: usize) -> Option<char>;

    /// Insert `units` before `offset`. Returns `false` if the buffer refused.
    fn insert(&mut self, offset: usize, units: &[char]) -> bool;

    /// Remove `count` units starting at `offset`. Returns `false` if the buffer refused.
    fn remove(&mut self, offset: usize, count: usize) -> bool;

    /// Whether the buffer holds no code units.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy the units in `start..end` (clamped to the buffer) into a vector.
    fn slice(&self, start: usize, end: usize) -> Vec<char> {
        let end = end.min(self.len());
        (start.min(end)..end).filter_map(|i| self.char_at(i)).collect()
    }

    /// Collect the whole buffer into a `String`.
    fn to_text(&self) -> String {
        (0..self.len()).filter_map(|i| self.char_at(i)).collect()
    }
}

/// A growable `Vec<char>` buffer with an optional size limit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CharBuffer {
    units: Vec<char>,
    limit: Option<usize>,
}

impl CharBuffer {
    /// Create a new empty buffer.
    ///
    /// # Examples
    ///
    /// ```
    /// use wrapedit_core::buffer::{CharBuffer, EditBuffer};
    ///
    /// let buffer = CharBuffer::new();
    /// assert!(buffer.is_empty());
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a buffer that refuses inserts growing it beyond `limit` units.
    pub fn with_limit(limit: usize) -> Self {
        CharBuffer {
            units: Vec::new(),
            limit: Some(limit),
        }
    }

    /// Create a buffer holding the characters of `text`.
    ///
    /// # Examples
    ///
    /// ```
    /// use wrapedit_core::buffer::{CharBuffer, EditBuffer};
    ///
    /// let buffer = CharBuffer::from_text("héllo");
    /// assert_eq!(buffer.len(), 5);
    /// assert_eq!(buffer.char_at(1), Some('é'));
    /// ```
    pub fn from_text(text: &str) -> Self {
        CharBuffer {
            units: text.chars().collect(),
            limit: None,
        }
    }

    /// Borrow the stored code units.
    pub fn as_chars(&self) -> &[char] {
        &self.units
    }

    /// Maximum number of units this buffer accepts, if limited.
    pub fn limit(&self) -> Option<usize> {
        self.limit
    }
}

impl EditBuffer for CharBuffer {
    fn len(&self) -> usize {
        self.units.len()
    }

    fn char_at(&self, offset: usize) -> Option<char> {
        self.units.get(offset).copied()
    }

    fn insert(&mut self, offset: usize, units: &[char]) -> bool {
        if offset > self.units.len() {
            return false;
        }
        if let Some(limit) = self.limit {
            if self.units.len() + units.len() > limit {
                return false;
            }
        }
        self.units.splice(offset..offset, units.iter().copied());
        true
    }

    fn remove(&mut self, offset: usize, count: usize) -> bool {
        let Some(end) = offset.checked_add(count) else {
            return false;
        };
        if end > self.units.len() {
            return false;
        }
        self.units.drain(offset..end);
        true
    }

    fn to_text(&self) -> String {
        self.units.iter().collect()
    }
}
