//! Wrapedit Core Library
//!
//! This crate provides the engine behind an editable text widget: line-break
//! classification, a greedy pixel-width wrap layout, a bounded row index,
//! cursor and selection editing with undo/redo and clipboard, viewport
//! scrolling, and a paint adapter that emits draw calls to an abstract canvas.
//!
//! Nothing here talks to a window system. Hosts supply a [`TextMeasure`] or
//! [`Canvas`] implementation and feed [`KeyEvent`]s and pointer coordinates
//! into a [`TextEdit`] session.

// Text storage and analysis
pub mod buffer;
pub mod document;
pub mod error;
pub mod line_break;

// Layout
pub mod layout;
pub mod rows;
pub mod scroll;

// Editing
pub mod history;
pub mod state;
pub mod text_edit;
pub mod property;

// Key handling
pub mod key;
pub mod key_handler;

// Rendering
pub mod canvas;
pub mod renderer;

pub mod config;
pub mod prelude;

// Re-export commonly used types for convenience
pub use buffer::{CharBuffer, EditBuffer};
pub use document::Document;
pub use error::{BufferOp, EditError, EditResult};
pub use line_break::{classify_line_break, classify_word_break, LineBreak, WordBreak};

pub use layout::{layout, offset_at_point, CaretPosition, LayoutInfo, LayoutParams, Margins};
pub use rows::{RowDescriptor, RowIndex};
pub use scroll::scroll_to_caret;

pub use history::{EditRecord, SelectionSnapshot, UndoHistory};
pub use property::{EditProperty, PropertyValue};
pub use state::{EditState, InsertMode};
pub use text_edit::{normalize_newlines, EditInfo, TextEdit};

pub use key::{Key, KeyEvent, Modifiers};
pub use key_handler::{EditCommand, KeyBinding, KeyHandler, KeyResult};

pub use canvas::{Canvas, Clipboard, Color, MemoryClipboard, TextMeasure};
pub use renderer::Renderer;

pub use config::{EditConfig, PaintStyle, DEFAULT_MAX_ROWS};
