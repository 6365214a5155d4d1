//! Collaborator backends for wrapedit sessions.
//!
//! Provides concrete implementations of the core collaborator traits:
//! - [`MonospaceMeasure`] (cell-grid measurement via `unicode-width`)
//! - [`SharedClipboard`] (in-process clipboard observable by the host)
//! - [`RecordingCanvas`] (records draw calls for tests and debugging)

use unicode_width::UnicodeWidthChar;
use wrapedit_core::EditBuffer;

// Re-export core types and traits
pub use wrapedit_core::{
    Canvas, CharBuffer, Clipboard, Color, EditConfig, EditResult, KeyEvent, MemoryClipboard,
    TextEdit, TextMeasure,
};

pub mod mock;

pub use mock::{DrawOp, RecordingCanvas, SharedClipboard};

/// Default cell width in pixels.
pub const DEFAULT_CELL_WIDTH: u32 = 8;
/// Default font size in pixels.
pub const DEFAULT_FONT_SIZE: u32 = 16;

/// Measures text on a fixed cell grid.
///
/// Each code unit takes as many cells as its display width: one for most
/// characters, two for East Asian wide characters and emoji, none for control
/// characters and combining marks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonospaceMeasure {
    cell_width: u32,
    font_size: u32,
}

impl Default for MonospaceMeasure {
    fn default() -> Self {
        Self::new(DEFAULT_CELL_WIDTH, DEFAULT_FONT_SIZE)
    }
}

impl MonospaceMeasure {
    /// Create a measurer with `cell_width` pixels per cell.
    ///
    /// # Examples
    ///
    /// ```
    /// use wrapedit_io::{MonospaceMeasure, TextMeasure};
    ///
    /// let measure = MonospaceMeasure::new(8, 16);
    /// assert_eq!(measure.measure_text(&['a', 'b']), 16);
    /// assert_eq!(measure.measure_text(&['あ']), 16);
    /// ```
    pub fn new(cell_width: u32, font_size: u32) -> Self {
        Self {
            cell_width,
            font_size,
        }
    }

    pub fn cell_width(&self) -> u32 {
        self.cell_width
    }

    /// Number of cells `ch` occupies.
    pub fn cells(ch: char) -> u32 {
        ch.width().unwrap_or(0) as u32
    }
}

impl TextMeasure for MonospaceMeasure {
    fn measure_text(&self, units: &[char]) -> u32 {
        units
            .iter()
            .map(|&ch| Self::cells(ch))
            .sum::<u32>()
            .saturating_mul(self.cell_width)
    }

    fn font_size(&self) -> u32 {
        self.font_size
    }
}

/// Create a recording canvas backed by the default monospace measurer.
pub fn create_mock_canvas() -> RecordingCanvas {
    RecordingCanvas::new(MonospaceMeasure::default())
}

/// Create an edit session over `text` with a monospace measurer installed
/// and a shared clipboard the caller can inspect.
///
/// # Examples
///
/// ```
/// use wrapedit_io::create_edit_session;
///
/// let (mut edit, clipboard) = create_edit_session("hello", false);
/// edit.set_select(0, 5);
/// edit.apply_command(wrapedit_core::EditCommand::Copy).unwrap();
/// assert_eq!(clipboard.contents().as_deref(), Some("hello"));
/// ```
pub fn create_edit_session(text: &str, single_line: bool) -> (TextEdit<CharBuffer>, SharedClipboard) {
    let mut edit = TextEdit::new(CharBuffer::from_text(text), single_line);
    let clipboard = SharedClipboard::new();
    edit.set_clipboard(Box::new(clipboard.clone()));
    edit.set_canvas(Box::new(MonospaceMeasure::default()));
    log::debug!(
        "created {} session with {} units",
        if single_line { "single-line" } else { "multi-line" },
        edit.buffer().len()
    );
    (edit, clipboard)
}
