//! Bounded undo/redo history of buffer deltas.
//!
//! Each record stores the replaced span (`deleted`) and its replacement
//! (`inserted`) at `start`, plus the cursor and selection on either side of
//! the edit. The history only stores records; the edit session applies them
//! to the buffer so a refused mutation can put the record back untouched.

pub const DEFAULT_MAX_RECORDS: usize = 99;
pub const DEFAULT_MAX_UNITS: usize = 999;

/// Cursor and selection captured alongside an edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SelectionSnapshot {
    pub cursor: usize,
    pub select_start: usize,
    pub select_end: usize,
}

/// One reversible buffer edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditRecord {
    pub start: usize,
    pub deleted: Vec<char>,
    pub inserted: Vec<char>,
    pub before: SelectionSnapshot,
    pub after: SelectionSnapshot,
}

impl EditRecord {
    /// Units held for undoing. Inserted units come back from the buffer
    /// when the record is undone, so only the deleted span is charged.
    fn units(&self) -> usize {
        self.deleted.len()
    }
}

/// Undo and redo stacks with record-count and code-unit limits.
#[derive(Debug, Clone)]
pub struct UndoHistory {
    undo: Vec<EditRecord>,
    redo: Vec<EditRecord>,
    undo_units: usize,
    max_records: usize,
    max_units: usize,
}

impl Default for UndoHistory {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RECORDS, DEFAULT_MAX_UNITS)
    }
}

impl UndoHistory {
    pub fn new(max_records: usize, max_units: usize) -> Self {
        UndoHistory {
            undo: Vec::new(),
            redo: Vec::new(),
            undo_units: 0,
            max_records,
            max_units,
        }
    }

    /// Record a new edit. Any redo records are discarded.
    ///
    /// The oldest records are dropped while either limit is exceeded. The
    /// record just added is always kept, even if it alone exceeds the unit
    /// limit.
    pub fn record(&mut self, edit: EditRecord) {
        if edit.deleted.is_empty() && edit.inserted.is_empty() {
            return;
        }
        self.redo.clear();
        self.undo_units = self.undo_units.saturating_add(edit.units());
        self.undo.push(edit);
        self.trim_undo();
    }

    fn trim_undo(&mut self) {
        while self.undo.len() > self.max_records || self.undo_units > self.max_units {
            if self.undo.len() <= 1 {
                break;
            }
            let removed = self.undo.remove(0);
            self.undo_units = self.undo_units.saturating_sub(removed.units());
            log::debug!("dropped oldest undo record at offset {}", removed.start);
        }
    }

    /// Take the most recent edit for undoing.
    ///
    /// Hand it back with [`UndoHistory::undone`] once applied, or with
    /// [`UndoHistory::restore_undo`] if the buffer refused it.
    pub fn take_undo(&mut self) -> Option<EditRecord> {
        let edit = self.undo.pop()?;
        self.undo_units = self.undo_units.saturating_sub(edit.units());
        Some(edit)
    }

    /// Move an applied undo onto the redo stack.
    pub fn undone(&mut self, edit: EditRecord) {
        self.redo.push(edit);
    }

    /// Put back an undo record that could not be applied.
    pub fn restore_undo(&mut self, edit: EditRecord) {
        self.undo_units = self.undo_units.saturating_add(edit.units());
        self.undo.push(edit);
    }

    /// Take the most recently undone edit for redoing.
    pub fn take_redo(&mut self) -> Option<EditRecord> {
        self.redo.pop()
    }

    /// Move an applied redo back onto the undo stack without clearing redo.
    pub fn redone(&mut self, edit: EditRecord) {
        self.undo_units = self.undo_units.saturating_add(edit.units());
        self.undo.push(edit);
        self.trim_undo();
    }

    /// Put back a redo record that could not be applied.
    pub fn restore_redo(&mut self, edit: EditRecord) {
        self.redo.push(edit);
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
        self.undo_units = 0;
    }
}
