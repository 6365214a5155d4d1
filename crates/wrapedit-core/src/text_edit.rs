//! The edit session: cursor, selection, undo/redo and layout for one widget.
//!
//! `TextEdit` owns the edit state, the undo history and the row index, and is
//! generic over the hosting widget's [`EditBuffer`]. Every public operation
//! leaves the session consistent before it returns: offsets are clamped into
//! the buffer, the rows and caret are recomputed, and the viewport has been
//! scrolled to keep the caret visible.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::buffer::EditBuffer;
use crate::canvas::{Canvas, Clipboard, MemoryClipboard, TextMeasure};
use crate::config::EditConfig;
use crate::document::Document;
use crate::error::{EditError, EditResult};
use crate::history::{EditRecord, SelectionSnapshot, UndoHistory};
use crate::key::KeyEvent;
use crate::key_handler::{EditCommand, KeyHandler, KeyResult};
use crate::layout::{layout, offset_at_point, unit_width, CaretPosition, LayoutInfo, LayoutParams, Margins};
use crate::line_break::NEWLINE;
use crate::renderer::Renderer;
use crate::rows::RowIndex;
use crate::scroll::scroll_to_caret;
use crate::state::{EditState, InsertMode};

/// Bulk cursor and selection snapshot exchanged with the hosting widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EditInfo {
    pub cursor: usize,
    pub select_start: usize,
    pub select_end: usize,
    /// The newline code unit used by the buffer
    pub newline: char,
    pub char_spacing: u32,
    /// Line height in pixels, 0 until a measurer is installed
    pub line_height: u32,
}

/// Text-edit engine for a single widget.
pub struct TextEdit<B: EditBuffer> {
    buffer: B,
    config: EditConfig,
    state: EditState,
    history: UndoHistory,
    rows: RowIndex,
    caret: CaretPosition,
    info: LayoutInfo,
    measure: Option<Box<dyn TextMeasure>>,
    clipboard: Box<dyn Clipboard>,
    key_handler: KeyHandler,
    single_line: bool,
    wrap_word: bool,
}

impl<B: EditBuffer> std::fmt::Debug for TextEdit<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextEdit")
            .field("len", &self.buffer.len())
            .field("state", &self.state)
            .field("rows", &self.rows.len())
            .field("caret", &self.caret)
            .field("single_line", &self.single_line)
            .finish()
    }
}

impl<B: EditBuffer> TextEdit<B> {
    /// Create a session over `buffer` with the default configuration.
    ///
    /// # Arguments
    ///
    /// * `buffer` - Storage owned by the hosting widget
    /// * `single_line` - Keep a single row, ignore newline input and scroll horizontally
    ///
    /// # Examples
    ///
    /// ```
    /// use wrapedit_core::buffer::CharBuffer;
    /// use wrapedit_core::text_edit::TextEdit;
    ///
    /// let edit = TextEdit::new(CharBuffer::from_text("hello"), false);
    /// assert_eq!(edit.get_info().cursor, 0);
    /// assert_eq!(edit.get_info().newline, '\n');
    /// ```
    pub fn new(buffer: B, single_line: bool) -> Self {
        Self::with_config(buffer, single_line, EditConfig::default())
    }

    /// Create a session with an explicit configuration.
    pub fn with_config(buffer: B, single_line: bool, config: EditConfig) -> Self {
        let capacity = if single_line { 1 } else { config.max_rows };
        let mut info = LayoutInfo::default();
        info.update_geometry(0, 0, config.margins);

        TextEdit {
            buffer,
            state: EditState::new(),
            history: UndoHistory::new(config.undo_limit, config.undo_char_limit),
            rows: RowIndex::new(capacity),
            caret: CaretPosition::default(),
            info,
            measure: None,
            clipboard: Box::new(MemoryClipboard::new()),
            key_handler: KeyHandler::new(config.key_bindings.clone()),
            wrap_word: config.wrap_word && !single_line,
            single_line,
            config,
        }
    }

    // Collaborators and geometry

    /// Install the text measurement collaborator and lay the buffer out.
    pub fn set_canvas(&mut self, measure: Box<dyn TextMeasure>) {
        self.measure = Some(measure);
        self.relayout();
    }

    /// Replace the clipboard collaborator.
    pub fn set_clipboard(&mut self, clipboard: Box<dyn Clipboard>) {
        self.clipboard = clipboard;
    }

    /// Update the widget size in pixels.
    pub fn set_size(&mut self, width: i32, height: i32) {
        let margins = self.info.margins;
        self.info.update_geometry(width, height, margins);
        self.relayout();
    }

    /// Override the margins between the widget border and the text.
    pub fn set_margins(&mut self, margins: Margins) {
        self.config.margins = margins;
        self.info
            .update_geometry(self.info.widget_w, self.info.widget_h, margins);
        self.relayout();
    }

    /// Set the multi-line row capacity.
    ///
    /// Returns `BadParams` unless `rows > 1`. Single-line sessions accept the
    /// value but keep their single row.
    pub fn set_max_rows(&mut self, rows: usize) -> EditResult<()> {
        if rows <= 1 {
            return Err(EditError::bad_params("max_rows must be greater than 1"));
        }
        self.config.max_rows = rows;
        if !self.single_line {
            self.rows.set_capacity(rows);
        }
        self.relayout();
        Ok(())
    }

    /// Toggle word-aware wrapping.
    pub fn set_wrap_word(&mut self, enabled: bool) {
        self.wrap_word = enabled;
        self.relayout();
    }

    /// Mutable access to the key binding table.
    pub fn key_handler_mut(&mut self) -> &mut KeyHandler {
        &mut self.key_handler
    }

    // Accessors

    pub fn buffer(&self) -> &B {
        &self.buffer
    }

    /// Consume the session and hand the buffer back.
    pub fn into_buffer(self) -> B {
        self.buffer
    }

    /// Buffer content as a `String`.
    pub fn text(&self) -> String {
        self.buffer.to_text()
    }

    pub fn state(&self) -> &EditState {
        &self.state
    }

    pub fn rows(&self) -> &RowIndex {
        &self.rows
    }

    pub fn caret(&self) -> CaretPosition {
        self.caret
    }

    pub fn layout_info(&self) -> &LayoutInfo {
        &self.info
    }

    pub fn history(&self) -> &UndoHistory {
        &self.history
    }

    pub fn config(&self) -> &EditConfig {
        &self.config
    }

    pub fn is_single_line(&self) -> bool {
        self.single_line
    }

    pub fn wrap_word(&self) -> bool {
        self.wrap_word
    }

    pub fn insert_mode(&self) -> InsertMode {
        self.state.insert_mode
    }

    pub fn set_insert_mode(&mut self, mode: InsertMode) {
        self.state.insert_mode = mode;
    }

    /// Line height in pixels for the installed measurer, 0 without one.
    pub fn line_height(&self) -> u32 {
        self.measure
            .as_deref()
            .map(|m| self.config.line_height(m.font_size()))
            .unwrap_or(0)
    }

    /// Bulk snapshot of cursor, selection and text metrics.
    pub fn get_info(&self) -> EditInfo {
        EditInfo {
            cursor: self.state.cursor,
            select_start: self.state.select_start,
            select_end: self.state.select_end,
            newline: NEWLINE,
            char_spacing: self.config.char_spacing,
            line_height: self.line_height(),
        }
    }

    /// Apply the cursor and selection of `info`. Metrics fields are read-only.
    pub fn set_info(&mut self, info: &EditInfo) {
        self.state.cursor = info.cursor;
        self.state.select_start = info.select_start;
        self.state.select_end = info.select_end;
        self.state.preferred_x = None;
        self.finish();
    }

    // Programmatic setters

    /// Move the cursor to `offset` (clamped) and collapse the selection.
    pub fn set_cursor(&mut self, offset: usize) {
        let offset = offset.min(self.buffer.len());
        self.state.collapse_to(offset);
        self.state.preferred_x = None;
        self.finish();
    }

    /// Select `start..end` (clamped, either order) with the cursor on `end`.
    pub fn set_select(&mut self, start: usize, end: usize) {
        let len = self.buffer.len();
        self.state.select_start = start.min(len);
        self.state.select_end = end.min(len);
        self.state.cursor = self.state.select_end;
        self.state.preferred_x = None;
        self.finish();
    }

    /// Replace the whole buffer, move the cursor to the end and clear history.
    pub fn reset_text(&mut self, units: &[char]) -> EditResult<()> {
        let len = self.buffer.len();
        self.apply_replace(0, len, units)?;
        self.history.clear();
        self.state.collapse_to(units.len());
        self.state.preferred_x = None;
        self.finish();
        Ok(())
    }

    // Pointer gestures

    /// Place the cursor at widget-local `(x, y)` and collapse the selection.
    pub fn click(&mut self, x: i32, y: i32) {
        let offset = self.locate(x, y);
        self.state.collapse_to(offset);
        self.state.preferred_x = None;
        self.finish();
    }

    /// Extend the selection to widget-local `(x, y)`, keeping the anchor.
    pub fn drag(&mut self, x: i32, y: i32) {
        let offset = self.locate(x, y);
        if !self.state.has_selection() {
            self.state.select_start = self.state.cursor;
        }
        self.state.cursor = offset;
        self.state.select_end = offset;
        self.state.preferred_x = None;
        self.finish();
    }

    fn locate(&self, x: i32, y: i32) -> usize {
        let Some(measure) = self.measure.as_deref() else {
            return self.state.cursor.min(self.buffer.len());
        };
        let cx = x.saturating_sub(self.info.margins.left).saturating_add(self.info.ox);
        let cy = y.saturating_sub(self.info.margins.top).saturating_add(self.info.oy);
        offset_at_point(
            &self.buffer,
            measure,
            &self.rows,
            self.config.char_spacing,
            self.config.line_height(measure.font_size()),
            self.single_line,
            cx,
            cy,
        )
    }

    // Keyboard input and text insertion

    /// Translate a key event through the binding table and apply it.
    ///
    /// Modifier-only, non-printable and unbound keys return `Ignored`.
    pub fn key_down(&mut self, event: &KeyEvent) -> EditResult<KeyResult> {
        match self.key_handler.translate(event) {
            Some(command) => {
                self.apply_command(command)?;
                Ok(KeyResult::Handled)
            }
            None => Ok(KeyResult::Ignored),
        }
    }

    /// Replace the selection with the first `count` units of `text`.
    ///
    /// Returns `BadParams` if `count` exceeds `text.len()`.
    pub fn paste(&mut self, text: &[char], count: usize) -> EditResult<()> {
        let Some(units) = text.get(..count) else {
            return Err(EditError::bad_params("paste count exceeds text length"));
        };
        let result = self.replace_selection(units);
        self.finish();
        result
    }

    /// Paste UTF-8 text, converting `\r\n` and `\r` to the buffer newline.
    pub fn paste_str(&mut self, text: &str) -> EditResult<()> {
        let units = normalize_newlines(text);
        self.paste(&units, units.len())
    }

    /// Insert text committed by an input method.
    pub fn commit_text(&mut self, text: &str) -> EditResult<()> {
        self.paste_str(text)
    }

    /// Apply a logical edit command.
    ///
    /// On error the buffer, cursor, selection and history are unchanged.
    pub fn apply_command(&mut self, command: EditCommand) -> EditResult<()> {
        log::trace!("apply {command:?}");
        if !is_vertical(command) {
            self.state.preferred_x = None;
        }
        self.state.clamp(self.buffer.len());
        let result = self.dispatch(command);
        self.finish();
        result
    }

    fn dispatch(&mut self, command: EditCommand) -> EditResult<()> {
        let len = self.buffer.len();
        match command {
            EditCommand::MoveLeft { extend: false } => {
                if self.state.has_selection() {
                    self.collapse_to_first();
                } else {
                    let cursor = self.state.cursor.saturating_sub(1);
                    self.state.collapse_to(cursor);
                }
            }
            EditCommand::MoveRight { extend: false } => {
                if self.state.has_selection() {
                    self.collapse_to_last();
                } else {
                    let cursor = (self.state.cursor + 1).min(len);
                    self.state.collapse_to(cursor);
                }
            }
            EditCommand::MoveLeft { extend: true } => {
                self.extend_to(|_, end| end.saturating_sub(1));
            }
            EditCommand::MoveRight { extend: true } => {
                self.extend_to(|edit, end| (end + 1).min(edit.buffer.len()));
            }
            EditCommand::MoveWordLeft { extend: false } => {
                if self.state.has_selection() {
                    self.collapse_to_first();
                } else {
                    let cursor = Document::new(&self.buffer).previous_word_start(self.state.cursor);
                    self.state.collapse_to(cursor);
                }
            }
            EditCommand::MoveWordRight { extend: false } => {
                if self.state.has_selection() {
                    self.collapse_to_last();
                } else {
                    let cursor = Document::new(&self.buffer).next_word_start(self.state.cursor);
                    self.state.collapse_to(cursor);
                }
            }
            EditCommand::MoveWordLeft { extend: true } => {
                self.extend_to(|edit, end| Document::new(&edit.buffer).previous_word_start(end));
            }
            EditCommand::MoveWordRight { extend: true } => {
                self.extend_to(|edit, end| Document::new(&edit.buffer).next_word_start(end));
            }
            EditCommand::MoveLineStart { extend } => {
                if !extend {
                    self.collapse_to_first();
                }
                self.extend_or_move(extend, |edit, from| edit.line_start(from));
            }
            EditCommand::MoveLineEnd { extend } => {
                if !extend {
                    self.collapse_to_first();
                }
                self.extend_or_move(extend, |edit, from| edit.line_end(from));
            }
            EditCommand::MoveTextStart { extend } => {
                self.extend_or_move(extend, |_, _| 0);
            }
            EditCommand::MoveTextEnd { extend } => {
                self.extend_or_move(extend, |edit, _| edit.buffer.len());
            }
            EditCommand::MoveUp { extend } | EditCommand::MoveDown { extend }
                if self.single_line =>
            {
                let left = matches!(command, EditCommand::MoveUp { .. });
                return self.dispatch(if left {
                    EditCommand::MoveLeft { extend }
                } else {
                    EditCommand::MoveRight { extend }
                });
            }
            EditCommand::MoveUp { extend } => self.move_vertical(extend, -1, false),
            EditCommand::MoveDown { extend } => self.move_vertical(extend, 1, false),
            EditCommand::PageUp { extend } => {
                let page = self.rows_per_page() as isize;
                self.move_vertical(extend, -page, true);
            }
            EditCommand::PageDown { extend } => {
                let page = self.rows_per_page() as isize;
                self.move_vertical(extend, page, true);
            }
            EditCommand::DeleteBackward => {
                if self.state.has_selection() {
                    self.delete_selection()?;
                } else if self.state.cursor > 0 {
                    self.edit(self.state.cursor - 1, 1, &[])?;
                }
            }
            EditCommand::DeleteForward => {
                if self.state.has_selection() {
                    self.delete_selection()?;
                } else if self.state.cursor < len {
                    self.edit(self.state.cursor, 1, &[])?;
                }
            }
            EditCommand::InsertNewline => {
                if !self.single_line {
                    self.insert_char(NEWLINE)?;
                }
            }
            EditCommand::InsertChar(ch) => {
                if ch != NEWLINE || !self.single_line {
                    self.insert_char(ch)?;
                }
            }
            EditCommand::ToggleInsertMode => {
                self.state.insert_mode = self.state.insert_mode.toggled();
            }
            EditCommand::Undo => {
                self.apply_undo()?;
            }
            EditCommand::Redo => {
                self.apply_redo()?;
            }
            EditCommand::SelectAll => {
                self.state.select_start = 0;
                self.state.select_end = len;
                self.state.cursor = len;
            }
            EditCommand::Copy => {
                if let Some(text) = self.selected_text() {
                    self.clipboard.set_text(&text);
                }
            }
            EditCommand::Cut => {
                if let Some(text) = self.selected_text() {
                    self.delete_selection()?;
                    self.clipboard.set_text(&text);
                }
            }
            EditCommand::Paste => {
                if let Some(text) = self.clipboard.get_text() {
                    log::debug!("pasting {} bytes from clipboard", text.len());
                    let units = normalize_newlines(&text);
                    self.replace_selection(&units)?;
                }
            }
        }
        Ok(())
    }

    // Cursor movement helpers

    fn collapse_to_first(&mut self) {
        if self.state.has_selection() {
            let (first, _) = self.state.selection();
            self.state.collapse_to(first);
        }
    }

    fn collapse_to_last(&mut self) {
        if self.state.has_selection() {
            let (_, last) = self.state.selection();
            self.state.collapse_to(last);
        }
    }

    /// Move the selection's moving end to `target(self, select_end)`.
    fn extend_to(&mut self, target: impl FnOnce(&Self, usize) -> usize) {
        self.state.prepare_extend();
        let end = target(self, self.state.select_end);
        self.state.select_end = end;
        self.state.cursor = end;
    }

    fn extend_or_move(&mut self, extend: bool, target: impl FnOnce(&Self, usize) -> usize) {
        if extend {
            self.extend_to(target);
        } else {
            let offset = target(self, self.state.cursor);
            self.state.collapse_to(offset);
        }
    }

    fn line_start(&self, from: usize) -> usize {
        if self.single_line {
            0
        } else {
            Document::new(&self.buffer).line_start(from)
        }
    }

    fn line_end(&self, from: usize) -> usize {
        if self.single_line {
            self.buffer.len()
        } else {
            Document::new(&self.buffer).line_end(from)
        }
    }

    fn rows_per_page(&self) -> usize {
        let line_height = self.line_height();
        if line_height == 0 {
            return 1;
        }
        (self.info.h.max(0) as usize / line_height as usize).max(1)
    }

    fn move_vertical(&mut self, extend: bool, delta: isize, page: bool) {
        let from = if extend {
            self.state.prepare_extend();
            self.state.select_end
        } else {
            if delta < 0 {
                self.collapse_to_first();
            } else {
                self.collapse_to_last();
            }
            self.state.cursor
        };

        let Some((target, goal_x)) = self.vertical_target(from, delta, page) else {
            return;
        };
        if extend {
            self.state.select_end = target;
            self.state.cursor = target;
        } else {
            self.state.collapse_to(target);
        }
        self.state.preferred_x = goal_x;
    }

    /// Offset `delta` rows away from `from` that is closest to the goal x.
    ///
    /// Moving up from the first row yields `None` (or the text start for page
    /// moves); moving down from the last row yields the text end.
    fn vertical_target(&self, from: usize, delta: isize, page: bool) -> Option<(usize, Option<i32>)> {
        let measure = self.measure.as_deref()?;
        let row_idx = self.rows.row_containing(from)?;
        let last = self.rows.len() - 1;
        let wanted = row_idx as isize + delta;

        let target_row = if wanted < 0 {
            if row_idx == 0 {
                return page.then_some((0, None));
            }
            0
        } else if wanted as usize > last {
            if row_idx == last {
                return Some((self.buffer.len(), None));
            }
            last
        } else {
            wanted as usize
        };

        let goal_x = self
            .state
            .preferred_x
            .unwrap_or_else(|| self.x_of_offset(measure, from));

        let row = self.rows.get(target_row)?;
        let mut x: i32 = 0;
        let mut target = row.offset as usize;
        for k in row.offset as usize..row.end() {
            let Some(ch) = self.buffer.char_at(k) else {
                break;
            };
            if ch == NEWLINE {
                break;
            }
            x = x.saturating_add(unit_width(measure, ch, self.config.char_spacing) as i32);
            if x > goal_x {
                break;
            }
            target = k + 1;
        }
        // The end of a wrapped row displays at the start of the next one.
        if target == row.end() && target_row < last && row.length > 0 {
            target -= 1;
        }
        Some((target, Some(goal_x)))
    }

    fn x_of_offset<M: TextMeasure + ?Sized>(&self, measure: &M, offset: usize) -> i32 {
        let Some(row) = self.rows.find_by_offset(offset) else {
            return 0;
        };
        (row.offset as usize..offset.min(row.end()))
            .filter_map(|k| self.buffer.char_at(k))
            .map(|ch| unit_width(measure, ch, self.config.char_spacing) as i32)
            .sum()
    }

    // Buffer mutation

    fn insert_char(&mut self, ch: char) -> EditResult<()> {
        if self.state.has_selection() {
            return self.replace_selection(&[ch]);
        }
        let cursor = self.state.cursor;
        if self.state.insert_mode == InsertMode::Overwrite && cursor < self.buffer.len() {
            self.edit(cursor, 1, &[ch])
        } else {
            self.edit(cursor, 0, &[ch])
        }
    }

    fn replace_selection(&mut self, units: &[char]) -> EditResult<()> {
        self.state.clamp(self.buffer.len());
        let (start, end) = self.state.selection();
        if start == end && units.is_empty() {
            return Ok(());
        }
        self.edit(start, end - start, units)
    }

    fn delete_selection(&mut self) -> EditResult<()> {
        self.replace_selection(&[])
    }

    fn selected_text(&self) -> Option<String> {
        if !self.state.has_selection() {
            return None;
        }
        let (start, end) = self.state.selection();
        log::debug!("copying {} units to clipboard", end - start);
        Some(self.buffer.slice(start, end).into_iter().collect())
    }

    /// Replace `count` units at `start` with `units` as one undoable edit.
    fn edit(&mut self, start: usize, count: usize, units: &[char]) -> EditResult<()> {
        let before = self.state.snapshot();
        let deleted = self.apply_replace(start, count, units)?;
        self.state.collapse_to(start + units.len());
        let after = self.state.snapshot();
        self.history.record(EditRecord {
            start,
            deleted,
            inserted: units.to_vec(),
            before,
            after,
        });
        Ok(())
    }

    /// Remove then insert, restoring the removed units if the insert is refused.
    ///
    /// Returns the removed units.
    fn apply_replace(&mut self, start: usize, count: usize, units: &[char]) -> EditResult<Vec<char>> {
        let deleted = self.buffer.slice(start, start + count);
        if count > 0 && !self.buffer.remove(start, count) {
            log::warn!("buffer refused removing {count} units at {start}");
            return Err(EditError::remove_rejected(start, count));
        }
        if !units.is_empty() && !self.buffer.insert(start, units) {
            log::warn!("buffer refused inserting {} units at {start}", units.len());
            if !deleted.is_empty() && !self.buffer.insert(start, &deleted) {
                log::warn!("could not restore {} removed units at {start}", deleted.len());
            }
            return Err(EditError::insert_rejected(start, units.len()));
        }
        Ok(deleted)
    }

    /// Undo the most recent edit. Returns `false` if there was nothing to undo.
    pub fn undo(&mut self) -> EditResult<bool> {
        self.state.preferred_x = None;
        let result = self.apply_undo();
        self.finish();
        result
    }

    /// Redo the most recently undone edit. Returns `false` if there was nothing to redo.
    pub fn redo(&mut self) -> EditResult<bool> {
        self.state.preferred_x = None;
        let result = self.apply_redo();
        self.finish();
        result
    }

    fn apply_undo(&mut self) -> EditResult<bool> {
        let Some(edit) = self.history.take_undo() else {
            return Ok(false);
        };
        match self.apply_replace(edit.start, edit.inserted.len(), &edit.deleted) {
            Ok(_) => {
                log::debug!("undo at offset {}", edit.start);
                self.restore_selection(edit.before);
                self.history.undone(edit);
                Ok(true)
            }
            Err(err) => {
                self.history.restore_undo(edit);
                Err(err)
            }
        }
    }

    fn apply_redo(&mut self) -> EditResult<bool> {
        let Some(edit) = self.history.take_redo() else {
            return Ok(false);
        };
        match self.apply_replace(edit.start, edit.deleted.len(), &edit.inserted) {
            Ok(_) => {
                log::debug!("redo at offset {}", edit.start);
                self.restore_selection(edit.after);
                self.history.redone(edit);
                Ok(true)
            }
            Err(err) => {
                self.history.restore_redo(edit);
                Err(err)
            }
        }
    }

    fn restore_selection(&mut self, snapshot: SelectionSnapshot) {
        self.state.restore(snapshot);
        self.state.clamp(self.buffer.len());
    }

    // Layout and painting

    /// Clamp offsets and recompute layout after an operation.
    fn finish(&mut self) {
        self.state.clamp(self.buffer.len());
        self.relayout();
    }

    /// Recompute rows, caret and scroll offset with the installed measurer.
    pub fn relayout(&mut self) {
        match self.measure.take() {
            Some(measure) => {
                self.relayout_with(&*measure);
                self.measure = Some(measure);
            }
            None => {
                self.rows.clear();
                self.caret = CaretPosition::default();
            }
        }
    }

    fn relayout_with<M: TextMeasure + ?Sized>(&mut self, measure: &M) {
        let line_height = self.config.line_height(measure.font_size());
        let params = LayoutParams {
            width: (!self.single_line).then_some(self.info.w.max(0) as u32),
            cursor: self.state.cursor,
            wrap_word: self.wrap_word,
            char_spacing: self.config.char_spacing,
            line_height,
        };
        self.caret = layout(&self.buffer, measure, &params, &mut self.rows);
        self.info.update_virtual_size(&self.rows, line_height);
        scroll_to_caret(&mut self.info, self.caret, line_height);
    }

    /// Draw the session onto `canvas`.
    ///
    /// Without an installed measurer the canvas measures for this pass.
    pub fn paint(&mut self, canvas: &mut dyn Canvas) {
        if self.measure.is_none() {
            self.relayout_with(&*canvas);
        }
        let line_height = self.config.line_height(canvas.font_size());
        Renderer {
            buffer: &self.buffer,
            rows: &self.rows,
            state: &self.state,
            info: &self.info,
            caret: self.caret,
            style: &self.config.paint,
            char_spacing: self.config.char_spacing,
            line_height,
        }
        .render(canvas);
    }
}

fn is_vertical(command: EditCommand) -> bool {
    matches!(
        command,
        EditCommand::MoveUp { .. }
            | EditCommand::MoveDown { .. }
            | EditCommand::PageUp { .. }
            | EditCommand::PageDown { .. }
    )
}

/// Convert `\r\n` and lone `\r` to the buffer newline.
pub fn normalize_newlines(text: &str) -> Vec<char> {
    let mut units = Vec::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '\r' {
            if chars.peek() == Some(&'\n') {
                chars.next();
            }
            units.push(NEWLINE);
        } else {
            units.push(ch);
        }
    }
    units
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::CharBuffer;
    use crate::key::{Key, Modifiers};
    use crate::rows::RowDescriptor;

    /// Every unit is 9px wide and the font is 16px, giving 10px advances
    /// and 20px rows with the default configuration.
    struct FixedMeasure;

    impl TextMeasure for FixedMeasure {
        fn measure_text(&self, units: &[char]) -> u32 {
            units.len() as u32 * 9
        }

        fn font_size(&self) -> u32 {
            16
        }
    }

    /// 100px of content width and 60px (three rows) of content height.
    fn session(text: &str) -> TextEdit<CharBuffer> {
        let mut edit = TextEdit::new(CharBuffer::from_text(text), false);
        edit.set_canvas(Box::new(FixedMeasure));
        edit.set_size(124, 88);
        edit
    }

    fn press(edit: &mut TextEdit<CharBuffer>, key: Key, modifiers: Modifiers) -> KeyResult {
        edit.key_down(&KeyEvent::new(key, modifiers)).unwrap()
    }

    fn type_text(edit: &mut TextEdit<CharBuffer>, text: &str) {
        for ch in text.chars() {
            let event = match ch {
                '\n' => KeyEvent::simple(Key::Return),
                _ => KeyEvent::char(ch),
            };
            edit.key_down(&event).unwrap();
        }
    }

    /// Refuses single-unit inserts, so typing fails but restoring a removed
    /// selection succeeds.
    struct NoTypingBuffer(CharBuffer);

    impl EditBuffer for NoTypingBuffer {
        fn len(&self) -> usize {
            self.0.len()
        }
        fn char_at(&self, offset: usize) -> Option<char> {
            self.0.char_at(offset)
        }
        fn insert(&mut self, offset: usize, units: &[char]) -> bool {
            units.len() != 1 && self.0.insert(offset, units)
        }
        fn remove(&mut self, offset: usize, count: usize) -> bool {
            self.0.remove(offset, count)
        }
    }

    /// Refuses every removal.
    struct NoRemoveBuffer(CharBuffer);

    impl EditBuffer for NoRemoveBuffer {
        fn len(&self) -> usize {
            self.0.len()
        }
        fn char_at(&self, offset: usize) -> Option<char> {
            self.0.char_at(offset)
        }
        fn insert(&mut self, offset: usize, units: &[char]) -> bool {
            self.0.insert(offset, units)
        }
        fn remove(&mut self, _offset: usize, _count: usize) -> bool {
            false
        }
    }

    #[test]
    fn test_paste_replaces_selection() {
        let mut edit = session("hello");
        edit.set_select(1, 2);
        let text: Vec<char> = "123".chars().collect();
        edit.paste(&text, 3).unwrap();
        assert_eq!(edit.text(), "h123llo");
        assert_eq!(edit.get_info().cursor, 4);
    }

    #[test]
    fn test_paste_bad_count() {
        let mut edit = session("abc");
        let err = edit.paste(&['x'], 2).unwrap_err();
        assert!(matches!(err, EditError::BadParams(_)));
        assert_eq!(edit.text(), "abc");
        assert!(!edit.history().can_undo());
    }

    #[test]
    fn test_paste_prefix_of_text() {
        let mut edit = session("");
        let text: Vec<char> = "abcdef".chars().collect();
        edit.paste(&text, 2).unwrap();
        assert_eq!(edit.text(), "ab");
        assert_eq!(edit.get_info().cursor, 2);
    }

    #[test]
    fn test_set_max_rows_validation() {
        let mut edit = session("abc");
        assert!(matches!(edit.set_max_rows(1), Err(EditError::BadParams(_))));
        assert!(matches!(edit.set_max_rows(0), Err(EditError::BadParams(_))));
        assert!(edit.set_max_rows(2).is_ok());
        assert_eq!(edit.rows().capacity(), 2);
    }

    #[test]
    fn test_set_cursor_clamps() {
        let mut edit = session("abc");
        edit.set_cursor(2);
        assert_eq!(edit.get_info().cursor, 2);
        edit.set_cursor(99);
        assert_eq!(edit.get_info().cursor, 3);
        assert_eq!(edit.get_info().select_start, 3);
    }

    #[test]
    fn test_set_select_clamps_and_keeps_order() {
        let mut edit = session("abcdef");
        edit.set_select(5, 1);
        let info = edit.get_info();
        assert_eq!((info.select_start, info.select_end, info.cursor), (5, 1, 1));

        edit.set_select(2, 50);
        let info = edit.get_info();
        assert_eq!((info.select_start, info.select_end, info.cursor), (2, 6, 6));
    }

    #[test]
    fn test_get_and_set_info() {
        let mut edit = session("hello world");
        let info = edit.get_info();
        assert_eq!(info.newline, '\n');
        assert_eq!(info.char_spacing, 1);
        assert_eq!(info.line_height, 20);

        edit.set_info(&EditInfo {
            cursor: 8,
            select_start: 6,
            select_end: 8,
            ..info
        });
        assert_eq!(edit.state().selection(), (6, 8));
        assert_eq!(edit.get_info().cursor, 8);
    }

    #[test]
    fn test_line_height_without_measure() {
        let edit = TextEdit::new(CharBuffer::from_text("abc"), false);
        assert_eq!(edit.get_info().line_height, 0);
        assert!(edit.rows().is_empty());
    }

    #[test]
    fn test_typing_and_backspace() {
        let mut edit = session("");
        type_text(&mut edit, "abc");
        assert_eq!(edit.text(), "abc");
        assert_eq!(edit.get_info().cursor, 3);

        press(&mut edit, Key::Backspace, Modifiers::NONE);
        assert_eq!(edit.text(), "ab");

        press(&mut edit, Key::Home, Modifiers::NONE);
        press(&mut edit, Key::Delete, Modifiers::NONE);
        assert_eq!(edit.text(), "b");
        assert_eq!(edit.get_info().cursor, 0);

        // Backspace at the start does nothing.
        press(&mut edit, Key::Backspace, Modifiers::NONE);
        assert_eq!(edit.text(), "b");
    }

    #[test]
    fn test_typing_replaces_selection() {
        let mut edit = session("hello world");
        edit.set_select(0, 5);
        type_text(&mut edit, "J");
        assert_eq!(edit.text(), "J world");
        assert_eq!(edit.get_info().cursor, 1);

        // One undo restores the replaced selection.
        edit.undo().unwrap();
        assert_eq!(edit.text(), "hello world");
        assert_eq!(edit.state().selection(), (0, 5));
    }

    #[test]
    fn test_overwrite_mode() {
        let mut edit = session("abc");
        press(&mut edit, Key::Insert, Modifiers::NONE);
        assert_eq!(edit.insert_mode(), InsertMode::Overwrite);
        type_text(&mut edit, "xyzw");
        assert_eq!(edit.text(), "xyzw");

        press(&mut edit, Key::Insert, Modifiers::NONE);
        assert_eq!(edit.insert_mode(), InsertMode::Insert);
    }

    #[test]
    fn test_arrow_keys_collapse_selection() {
        let mut edit = session("abcdef");
        edit.set_select(1, 4);
        press(&mut edit, Key::Left, Modifiers::NONE);
        assert_eq!(edit.get_info().cursor, 1);
        assert!(!edit.state().has_selection());

        edit.set_select(1, 4);
        press(&mut edit, Key::Right, Modifiers::NONE);
        assert_eq!(edit.get_info().cursor, 4);

        press(&mut edit, Key::Right, Modifiers::NONE);
        assert_eq!(edit.get_info().cursor, 5);
    }

    #[test]
    fn test_shift_arrows_extend_selection() {
        let mut edit = session("abcdef");
        edit.set_cursor(2);
        press(&mut edit, Key::Right, Modifiers::SHIFT);
        press(&mut edit, Key::Right, Modifiers::SHIFT);
        let info = edit.get_info();
        assert_eq!((info.select_start, info.select_end, info.cursor), (2, 4, 4));

        press(&mut edit, Key::Left, Modifiers::SHIFT);
        press(&mut edit, Key::Left, Modifiers::SHIFT);
        press(&mut edit, Key::Left, Modifiers::SHIFT);
        let info = edit.get_info();
        assert_eq!((info.select_start, info.select_end, info.cursor), (2, 1, 1));
        assert_eq!(edit.state().selection(), (1, 2));
    }

    #[test]
    fn test_word_navigation_keys() {
        let mut edit = session("one two three");
        press(&mut edit, Key::Right, Modifiers::CTRL);
        assert_eq!(edit.get_info().cursor, 4);
        press(&mut edit, Key::Right, Modifiers::CTRL_SHIFT);
        assert_eq!(edit.state().selection(), (4, 8));
        press(&mut edit, Key::Left, Modifiers::CTRL);
        assert_eq!(edit.get_info().cursor, 4);
    }

    #[test]
    fn test_home_end_use_logical_lines() {
        let mut edit = session("ab\ncdef\ng");
        edit.set_cursor(5);
        press(&mut edit, Key::Home, Modifiers::NONE);
        assert_eq!(edit.get_info().cursor, 3);
        press(&mut edit, Key::End, Modifiers::NONE);
        assert_eq!(edit.get_info().cursor, 7);
        press(&mut edit, Key::Home, Modifiers::SHIFT);
        assert_eq!(edit.state().selection(), (3, 7));

        press(&mut edit, Key::End, Modifiers::CTRL);
        assert_eq!(edit.get_info().cursor, 9);
        press(&mut edit, Key::Home, Modifiers::CTRL_SHIFT);
        assert_eq!(edit.state().selection(), (0, 9));
    }

    #[test]
    fn test_up_down_keep_goal_column() {
        let mut edit = session("abcdef\nab\nabcdef");
        edit.set_cursor(5);
        press(&mut edit, Key::Down, Modifiers::NONE);
        // Second line is shorter: stop before its newline.
        assert_eq!(edit.get_info().cursor, 9);
        press(&mut edit, Key::Down, Modifiers::NONE);
        // The goal column survives the short line.
        assert_eq!(edit.get_info().cursor, 15);
        press(&mut edit, Key::Up, Modifiers::NONE);
        press(&mut edit, Key::Up, Modifiers::NONE);
        assert_eq!(edit.get_info().cursor, 5);

        // First row: up is a no-op. Last row: down goes to the end.
        press(&mut edit, Key::Up, Modifiers::NONE);
        assert_eq!(edit.get_info().cursor, 5);
        edit.set_cursor(12);
        press(&mut edit, Key::Down, Modifiers::NONE);
        assert_eq!(edit.get_info().cursor, 16);
    }

    #[test]
    fn test_shift_down_extends() {
        let mut edit = session("abc\ndef");
        edit.set_cursor(1);
        press(&mut edit, Key::Down, Modifiers::SHIFT);
        let info = edit.get_info();
        assert_eq!((info.select_start, info.select_end), (1, 5));
    }

    #[test]
    fn test_page_down_moves_by_visible_rows() {
        let mut edit = session("a\nb\nc\nd\ne\nf\ng");
        press(&mut edit, Key::PageDown, Modifiers::NONE);
        assert_eq!(edit.get_info().cursor, 6);
        press(&mut edit, Key::PageDown, Modifiers::NONE);
        assert_eq!(edit.get_info().cursor, 12);
        press(&mut edit, Key::PageDown, Modifiers::NONE);
        assert_eq!(edit.get_info().cursor, 13);
        // From the end of "g" the goal x lands after "d".
        press(&mut edit, Key::PageUp, Modifiers::NONE);
        assert_eq!(edit.get_info().cursor, 7);
        press(&mut edit, Key::PageUp, Modifiers::NONE);
        assert_eq!(edit.get_info().cursor, 1);
        press(&mut edit, Key::PageUp, Modifiers::NONE);
        assert_eq!(edit.get_info().cursor, 0);
    }

    #[test]
    fn test_select_all_copy_cut_paste() {
        let mut edit = session("hello");
        press(&mut edit, Key::Char('a'), Modifiers::CTRL);
        assert_eq!(edit.state().selection(), (0, 5));

        press(&mut edit, Key::Char('x'), Modifiers::CTRL);
        assert_eq!(edit.text(), "");

        press(&mut edit, Key::Char('v'), Modifiers::CTRL);
        press(&mut edit, Key::Char('v'), Modifiers::CTRL);
        assert_eq!(edit.text(), "hellohello");
        assert_eq!(edit.get_info().cursor, 10);
    }

    #[test]
    fn test_copy_without_selection_keeps_clipboard() {
        let mut edit = session("abc");
        edit.set_clipboard(Box::new(MemoryClipboard::with_text("keep")));
        press(&mut edit, Key::Char('c'), Modifiers::CTRL);
        press(&mut edit, Key::Char('x'), Modifiers::CTRL);
        assert_eq!(edit.text(), "abc");
        press(&mut edit, Key::Char('v'), Modifiers::CTRL);
        assert_eq!(edit.text(), "keepabc");
    }

    #[test]
    fn test_clipboard_newlines_are_normalized() {
        let mut edit = session("");
        edit.set_clipboard(Box::new(MemoryClipboard::with_text("a\r\nb\rc")));
        press(&mut edit, Key::Char('v'), Modifiers::CTRL);
        assert_eq!(edit.text(), "a\nb\nc");
    }

    #[test]
    fn test_undo_redo_restore_buffer_and_cursor() {
        let mut edit = session("base");
        edit.set_cursor(4);
        type_text(&mut edit, "12");
        press(&mut edit, Key::Backspace, Modifiers::NONE);
        edit.set_select(0, 2);
        press(&mut edit, Key::Delete, Modifiers::NONE);
        let end_text = edit.text();
        let end_cursor = edit.get_info().cursor;

        while press(&mut edit, Key::Char('z'), Modifiers::CTRL) == KeyResult::Handled
            && edit.history().can_undo()
        {}
        assert_eq!(edit.text(), "base");
        assert_eq!(edit.get_info().cursor, 4);

        while edit.redo().unwrap() {}
        assert_eq!(edit.text(), end_text);
        assert_eq!(edit.get_info().cursor, end_cursor);
    }

    #[test]
    fn test_direct_undo_redo_update_layout() {
        let mut edit = session("");
        type_text(&mut edit, "ab\ncd");

        assert!(edit.undo().unwrap());
        assert_eq!(edit.text(), "ab\nc");
        let rows = edit.rows().clone();
        let caret = edit.caret();
        assert_eq!(
            rows.as_slice(),
            &[RowDescriptor::new(0, 3, 20), RowDescriptor::new(3, 1, 10)]
        );
        assert_eq!(caret, CaretPosition::new(10, 20));
        edit.relayout();
        assert_eq!(edit.rows().as_slice(), rows.as_slice());
        assert_eq!(edit.caret(), caret);

        assert!(edit.redo().unwrap());
        assert_eq!(edit.rows().last(), Some(&RowDescriptor::new(3, 2, 20)));
        assert_eq!(edit.caret(), CaretPosition::new(20, 20));
    }

    #[test]
    fn test_large_edits_stay_undoable() {
        let mut edit = session("");
        type_text(&mut edit, "a");
        edit.paste_str(&"x".repeat(1000)).unwrap();
        assert_eq!(edit.history().undo_len(), 2);

        assert!(edit.undo().unwrap());
        assert_eq!(edit.text(), "a");
        assert!(edit.redo().unwrap());
        assert_eq!(edit.buffer().len(), 1001);

        press(&mut edit, Key::Char('a'), Modifiers::CTRL);
        press(&mut edit, Key::Char('x'), Modifiers::CTRL);
        assert_eq!(edit.text(), "");
        // The cut alone exceeds the unit budget, so it is the only record left.
        assert!(edit.undo().unwrap());
        assert_eq!(edit.buffer().len(), 1001);
        assert!(!edit.history().can_undo());
    }

    #[test]
    fn test_undo_with_empty_history() {
        let mut edit = session("abc");
        assert!(!edit.undo().unwrap());
        assert!(!edit.redo().unwrap());
        assert_eq!(
            press(&mut edit, Key::Char('z'), Modifiers::CTRL),
            KeyResult::Handled
        );
    }

    #[test]
    fn test_new_edit_clears_redo() {
        let mut edit = session("");
        type_text(&mut edit, "ab");
        edit.undo().unwrap();
        assert!(edit.history().can_redo());
        type_text(&mut edit, "c");
        assert!(!edit.history().can_redo());
        assert_eq!(edit.text(), "ac");
    }

    #[test]
    fn test_ignored_keys() {
        let mut edit = session("abc");
        assert_eq!(press(&mut edit, Key::Shift, Modifiers::SHIFT), KeyResult::Ignored);
        assert_eq!(press(&mut edit, Key::F(2), Modifiers::NONE), KeyResult::Ignored);
        assert_eq!(press(&mut edit, Key::Char('q'), Modifiers::CTRL), KeyResult::Ignored);
        assert_eq!(edit.text(), "abc");
    }

    #[test]
    fn test_single_line_ignores_newline() {
        let mut edit = TextEdit::new(CharBuffer::from_text("ab"), true);
        edit.set_canvas(Box::new(FixedMeasure));
        edit.set_size(124, 88);
        edit.set_cursor(2);
        press(&mut edit, Key::Return, Modifiers::NONE);
        assert_eq!(edit.text(), "ab");
        assert_eq!(edit.rows().capacity(), 1);

        press(&mut edit, Key::Up, Modifiers::NONE);
        assert_eq!(edit.get_info().cursor, 1);
        press(&mut edit, Key::Down, Modifiers::NONE);
        assert_eq!(edit.get_info().cursor, 2);
    }

    #[test]
    fn test_single_line_scrolls_horizontally() {
        let mut edit = TextEdit::new(CharBuffer::new(), true);
        edit.set_canvas(Box::new(FixedMeasure));
        edit.set_size(124, 88);
        type_text(&mut edit, "abcdefghijklmno");
        assert_eq!(edit.rows().len(), 1);
        assert_eq!(edit.caret(), CaretPosition::new(150, 0));
        assert_eq!(edit.layout_info().ox, 51);
    }

    #[test]
    fn test_multi_line_scrolls_vertically() {
        let mut edit = session("");
        type_text(&mut edit, "a\nb\nc\nd");
        assert_eq!(edit.caret(), CaretPosition::new(10, 60));
        assert_eq!(edit.layout_info().oy, 20);

        press(&mut edit, Key::Home, Modifiers::CTRL);
        assert_eq!(edit.layout_info().oy, 0);
    }

    #[test]
    fn test_click_and_drag() {
        let mut edit = session("hello\nworld");
        // Margins are 16 left and 23 top.
        edit.click(16 + 21, 23 + 5);
        assert_eq!(edit.get_info().cursor, 2);

        edit.drag(16 + 31, 23 + 25);
        let info = edit.get_info();
        assert_eq!((info.select_start, info.select_end, info.cursor), (2, 9, 9));

        edit.drag(16, 23);
        assert_eq!(edit.state().selection(), (0, 2));

        edit.click(500, 500);
        assert_eq!(edit.get_info().cursor, 11);
        assert!(!edit.state().has_selection());
    }

    #[test]
    fn test_mutation_rejected_keeps_state() {
        let mut edit = TextEdit::new(NoTypingBuffer(CharBuffer::from_text("abc")), false);
        edit.set_canvas(Box::new(FixedMeasure));
        edit.set_size(124, 88);
        edit.set_select(0, 2);

        let err = edit.key_down(&KeyEvent::char('x')).unwrap_err();
        assert_eq!(err, EditError::insert_rejected(0, 1));
        assert_eq!(edit.text(), "abc");
        assert_eq!(edit.state().selection(), (0, 2));
        assert!(!edit.history().can_undo());
    }

    #[test]
    fn test_rejected_cut_keeps_clipboard() {
        let mut edit = TextEdit::new(NoRemoveBuffer(CharBuffer::from_text("abc")), false);
        edit.set_canvas(Box::new(FixedMeasure));
        edit.set_clipboard(Box::new(MemoryClipboard::with_text("keep")));
        edit.set_select(0, 2);

        let err = edit.key_down(&KeyEvent::ctrl(Key::Char('x'))).unwrap_err();
        assert_eq!(err, EditError::remove_rejected(0, 2));
        assert_eq!(edit.text(), "abc");

        edit.set_cursor(3);
        edit.key_down(&KeyEvent::ctrl(Key::Char('v'))).unwrap();
        assert_eq!(edit.text(), "abckeep");
    }

    #[test]
    fn test_reset_text() {
        let mut edit = session("old");
        type_text(&mut edit, "x");
        let units: Vec<char> = "brand new".chars().collect();
        edit.reset_text(&units).unwrap();
        assert_eq!(edit.text(), "brand new");
        assert_eq!(edit.get_info().cursor, 9);
        assert!(!edit.history().can_undo());
    }

    #[test]
    fn test_commit_text_is_not_truncated() {
        let mut edit = session("");
        let long: String = "ime".repeat(40);
        edit.commit_text(&long).unwrap();
        assert_eq!(edit.buffer().len(), 120);
    }

    #[test]
    fn test_set_wrap_word_relayouts() {
        let mut edit = session("");
        edit.set_size(74, 88);
        type_text(&mut edit, "ab cd");
        assert_eq!(edit.rows().get(0).map(|r| r.length), Some(3));
        edit.set_wrap_word(false);
        assert_eq!(edit.rows().get(0).map(|r| r.length), Some(5));
    }

    #[test]
    fn test_normalize_newlines() {
        assert_eq!(normalize_newlines("a\r\nb"), vec!['a', '\n', 'b']);
        assert_eq!(normalize_newlines("\r\r"), vec!['\n', '\n']);
        assert_eq!(normalize_newlines("plain"), "plain".chars().collect::<Vec<_>>());
    }
}
