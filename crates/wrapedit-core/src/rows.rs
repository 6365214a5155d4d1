//! Row index: the bounded list of wrapped visual rows produced by layout.
//!
//! Rows are fully recomputed on every layout pass. Descriptors are offset
//! ordered and contiguous, so `row[i].end() == row[i + 1].offset`.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One wrapped visual line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RowDescriptor {
    /// Buffer offset of the first code unit in the row.
    pub offset: u32,
    /// Number of code units in the row, including a trailing newline.
    pub length: u16,
    /// Accumulated pixel width of the row.
    pub pixel_width: u16,
}

impl RowDescriptor {
    pub fn new(offset: u32, length: u16, pixel_width: u16) -> Self {
        RowDescriptor {
            offset,
            length,
            pixel_width,
        }
    }

    /// Offset one past the last code unit in the row.
    pub fn end(&self) -> usize {
        self.offset as usize + self.length as usize
    }

    /// Whether `offset` falls inside `[offset, end)`.
    pub fn contains(&self, offset: usize) -> bool {
        offset >= self.offset as usize && offset < self.end()
    }
}

/// Fixed-capacity array of row descriptors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowIndex {
    rows: Vec<RowDescriptor>,
    capacity: usize,
    overflowed: bool,
}

impl RowIndex {
    /// Create an empty index holding at most `capacity` rows (at least one).
    ///
    /// # Examples
    ///
    /// ```
    /// use wrapedit_core::rows::{RowDescriptor, RowIndex};
    ///
    /// let mut rows = RowIndex::new(2);
    /// assert!(rows.push(RowDescriptor::new(0, 3, 30)));
    /// assert!(rows.push(RowDescriptor::new(3, 2, 20)));
    /// assert!(!rows.push(RowDescriptor::new(5, 1, 10)));
    /// assert_eq!(rows.len(), 2);
    /// ```
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        RowIndex {
            rows: Vec::with_capacity(capacity),
            capacity,
            overflowed: false,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Change the capacity. Rows beyond the new capacity are dropped.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity.max(1);
        if self.rows.len() > self.capacity {
            self.rows.truncate(self.capacity);
            self.overflowed = true;
        }
    }

    /// Remove all rows and reset the overflow flag.
    pub fn clear(&mut self) {
        self.rows.clear();
        self.overflowed = false;
    }

    /// Append a row. Returns `false` without storing it when the index is full.
    pub fn push(&mut self, row: RowDescriptor) -> bool {
        if self.is_full() {
            return false;
        }
        self.rows.push(row);
        true
    }

    pub fn is_full(&self) -> bool {
        self.rows.len() >= self.capacity
    }

    /// Record that layout stopped at capacity with buffer content left over.
    pub fn mark_overflowed(&mut self) {
        self.overflowed = true;
    }

    /// Whether the last layout pass left buffer content without rows.
    pub fn overflowed(&self) -> bool {
        self.overflowed
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&RowDescriptor> {
        self.rows.get(index)
    }

    pub fn last(&self) -> Option<&RowDescriptor> {
        self.rows.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RowDescriptor> {
        self.rows.iter()
    }

    pub fn as_slice(&self) -> &[RowDescriptor] {
        &self.rows
    }

    /// Offset one past the last laid-out code unit.
    pub fn end_offset(&self) -> usize {
        self.rows.last().map(|r| r.end()).unwrap_or(0)
    }

    /// Widest row in pixels.
    pub fn max_pixel_width(&self) -> u16 {
        self.rows.iter().map(|r| r.pixel_width).max().unwrap_or(0)
    }

    /// Index of the row displaying `offset`.
    ///
    /// An offset shared by two rows (a wrap point) belongs to the later row.
    /// Offsets at or past the end of the laid-out text map to the last row.
    pub fn row_containing(&self, offset: usize) -> Option<usize> {
        if self.rows.is_empty() {
            return None;
        }
        // Rows are sorted by offset, so a binary search finds the candidate.
        let idx = self
            .rows
            .partition_point(|r| (r.offset as usize) <= offset)
            .saturating_sub(1);
        let row = &self.rows[idx];
        if row.contains(offset) || idx + 1 == self.rows.len() {
            Some(idx)
        } else {
            None
        }
    }

    /// Row descriptor displaying `offset`, see [`RowIndex::row_containing`].
    pub fn find_by_offset(&self, offset: usize) -> Option<&RowDescriptor> {
        self.row_containing(offset).and_then(|i| self.rows.get(i))
    }
}

impl Default for RowIndex {
    fn default() -> Self {
        Self::new(1)
    }
}

impl<'a> IntoIterator for &'a RowIndex {
    type Item = &'a RowDescriptor;
    type IntoIter = std::slice::Iter<'a, RowDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
