//! # Wrapedit: Text-Edit Engine for Editable Text Widgets
//!
//! Wrapedit lays text out into pixel-wrapped rows, tracks a cursor and
//! selection, applies keyboard and pointer editing with undo/redo and
//! clipboard, keeps the caret scrolled into view and paints through an
//! abstract canvas.
//!
//! ## Architecture
//!
//! - **Engine** (`wrapedit-core`): layout, rows, editing, history, key bindings, painting
//! - **Backends** (`wrapedit-io`): monospace measurement, clipboard, recording canvas
//!
//! ```rust
//! use wrapedit::prelude::*;
//!
//! let (mut edit, _clipboard) = wrapedit::io::create_edit_session("", false);
//! edit.set_size(200, 100);
//! edit.key_down(&KeyEvent::char('h')).unwrap();
//! edit.key_down(&KeyEvent::char('i')).unwrap();
//! assert_eq!(edit.text(), "hi");
//! ```

pub use wrapedit_core as core;
pub use wrapedit_io as io;

pub use wrapedit_core::prelude;
pub use wrapedit_io::{create_edit_session, create_mock_canvas, MonospaceMeasure};
