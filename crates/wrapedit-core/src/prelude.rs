//! Convenient re-exports for common usage patterns
//!
//! Hosts embedding an edit session usually need the session itself, a buffer,
//! the host-side traits and the key types. Import them all with
//! `use wrapedit_core::prelude::*;`.
//!
//! # Examples
//!
//! ```
//! use wrapedit_core::prelude::*;
//!
//! let mut edit = TextEdit::new(CharBuffer::new(), true);
//! edit.key_down(&KeyEvent::char('a')).unwrap();
//! assert_eq!(edit.text(), "a");
//! ```

// Session and storage
pub use crate::buffer::{CharBuffer, EditBuffer};
pub use crate::config::EditConfig;
pub use crate::text_edit::{EditInfo, TextEdit};

// Host integration
pub use crate::canvas::{Canvas, Clipboard, Color, MemoryClipboard, TextMeasure};

// Key input handling
pub use crate::key::{Key, KeyEvent, Modifiers};
pub use crate::key_handler::{EditCommand, KeyResult};

// Error handling
pub use crate::error::{EditError, EditResult};
