//! Cursor, selection and insert-mode state of an edit session.

use crate::history::SelectionSnapshot;

/// Whether typed characters push text right or replace the unit under the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InsertMode {
    #[default]
    Insert,
    Overwrite,
}

impl InsertMode {
    pub fn toggled(self) -> Self {
        match self {
            InsertMode::Insert => InsertMode::Overwrite,
            InsertMode::Overwrite => InsertMode::Insert,
        }
    }
}

/// Cursor and selection.
///
/// `select_start` and `select_end` may be in either order; the anchor is
/// `select_start` while dragging. Use [`EditState::selection`] for the
/// normalized range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EditState {
    pub cursor: usize,
    pub select_start: usize,
    pub select_end: usize,
    pub insert_mode: InsertMode,
    /// Horizontal goal for consecutive up/down moves.
    pub preferred_x: Option<i32>,
}

impl EditState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a non-empty selection exists.
    pub fn has_selection(&self) -> bool {
        self.select_start != self.select_end
    }

    /// The selection as an ordered `(min, max)` pair.
    ///
    /// # Examples
    ///
    /// ```
    /// use wrapedit_core::state::EditState;
    ///
    /// let mut state = EditState::new();
    /// state.select_start = 7;
    /// state.select_end = 2;
    /// assert_eq!(state.selection(), (2, 7));
    /// ```
    pub fn selection(&self) -> (usize, usize) {
        (
            self.select_start.min(self.select_end),
            self.select_start.max(self.select_end),
        )
    }

    /// Move the cursor to `offset` and collapse the selection onto it.
    pub fn collapse_to(&mut self, offset: usize) {
        self.cursor = offset;
        self.select_start = offset;
        self.select_end = offset;
    }

    /// Start a shift-extended selection at the cursor if none is active.
    ///
    /// With an active selection the cursor is moved onto its moving end.
    pub fn prepare_extend(&mut self) {
        if self.has_selection() {
            self.cursor = self.select_end;
        } else {
            self.select_start = self.cursor;
            self.select_end = self.cursor;
        }
    }

    /// Clamp every offset into `[0, len]`.
    pub fn clamp(&mut self, len: usize) {
        self.select_start = self.select_start.min(len);
        self.select_end = self.select_end.min(len);
        if self.select_start == self.select_end {
            self.cursor = self.select_start;
        }
        self.cursor = self.cursor.min(len);
    }

    pub fn snapshot(&self) -> SelectionSnapshot {
        SelectionSnapshot {
            cursor: self.cursor,
            select_start: self.select_start,
            select_end: self.select_end,
        }
    }

    pub fn restore(&mut self, snapshot: SelectionSnapshot) {
        self.cursor = snapshot.cursor;
        self.select_start = snapshot.select_start;
        self.select_end = snapshot.select_end;
        self.preferred_x = None;
    }
}
