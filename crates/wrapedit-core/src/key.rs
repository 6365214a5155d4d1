//! Key definitions and key event structures delivered by the hosting widget.
//!
//! Platform key codes are translated by the host into [`Key`] plus a
//! [`Modifiers`] set. The edit session never sees raw key codes: the
//! [`KeyHandler`](crate::key_handler::KeyHandler) turns events into logical
//! [`EditCommand`](crate::key_handler::EditCommand)s.

/// A logical key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// A character-producing key. Letters are reported lowercase when a
    /// control modifier is held.
    Char(char),

    // Editing keys
    Return,
    Tab,
    Escape,
    Backspace,
    Delete,
    Insert,

    // Navigation keys
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    PageUp,
    PageDown,

    // Modifier-only keys
    Shift,
    Control,
    Alt,
    Command,
    Menu,
    CapsLock,

    /// Function keys F1-F24
    F(u8),

    /// Unrecognized key
    NotDefined,
}

impl Key {
    /// Whether this key only changes modifier state.
    pub fn is_modifier(&self) -> bool {
        matches!(
            self,
            Key::Shift | Key::Control | Key::Alt | Key::Command | Key::Menu | Key::CapsLock
        )
    }

    /// The character produced by this key, if it is printable.
    pub fn printable(&self) -> Option<char> {
        match self {
            Key::Char(c) if !c.is_control() => Some(*c),
            _ => None,
        }
    }
}

/// Modifier keys held during a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    /// The platform command key (Cmd on macOS, Super elsewhere).
    pub command: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        command: false,
    };
    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        ..Modifiers::NONE
    };
    pub const CTRL: Modifiers = Modifiers {
        ctrl: true,
        ..Modifiers::NONE
    };
    pub const CTRL_SHIFT: Modifiers = Modifiers {
        shift: true,
        ctrl: true,
        ..Modifiers::NONE
    };

    pub fn is_empty(&self) -> bool {
        !self.shift && !self.ctrl && !self.alt && !self.command
    }

    /// The same modifier set without shift.
    pub fn without_shift(self) -> Self {
        Modifiers {
            shift: false,
            ..self
        }
    }
}

/// A key press with its modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// Create a new KeyEvent with the specified key and modifiers
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    /// Create a KeyEvent with no modifiers held
    pub fn simple(key: Key) -> Self {
        Self::new(key, Modifiers::NONE)
    }

    /// Create a KeyEvent for typing `ch`
    ///
    /// # Examples
    ///
    /// ```
    /// use wrapedit_core::key::{Key, KeyEvent};
    ///
    /// let event = KeyEvent::char('a');
    /// assert_eq!(event.key, Key::Char('a'));
    /// assert!(event.modifiers.is_empty());
    /// ```
    pub fn char(ch: char) -> Self {
        Self::simple(Key::Char(ch))
    }

    /// Create a KeyEvent with the control modifier held
    pub fn ctrl(key: Key) -> Self {
        Self::new(key, Modifiers::CTRL)
    }

    /// Create a KeyEvent with the shift modifier held
    pub fn shift(key: Key) -> Self {
        Self::new(key, Modifiers::SHIFT)
    }
}

impl Default for KeyEvent {
    fn default() -> Self {
        Self::simple(Key::NotDefined)
    }
}
