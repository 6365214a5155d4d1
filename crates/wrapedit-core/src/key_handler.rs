//! Key event translation into logical edit commands.
//!
//! This module provides the KeyHandler struct that maps key events to
//! [`EditCommand`]s. It carries a default binding table for common editing
//! operations and supports custom key binding registration that overrides it.
//! Printable characters without a binding fall through to
//! [`EditCommand::InsertChar`].

use crate::key::{Key, KeyEvent, Modifiers};
use std::collections::HashMap;

/// A logical editing operation, independent of the key that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditCommand {
    MoveLeft { extend: bool },
    MoveRight { extend: bool },
    MoveUp { extend: bool },
    MoveDown { extend: bool },
    MoveWordLeft { extend: bool },
    MoveWordRight { extend: bool },
    MoveLineStart { extend: bool },
    MoveLineEnd { extend: bool },
    MoveTextStart { extend: bool },
    MoveTextEnd { extend: bool },
    PageUp { extend: bool },
    PageDown { extend: bool },
    DeleteBackward,
    DeleteForward,
    InsertChar(char),
    InsertNewline,
    ToggleInsertMode,
    Undo,
    Redo,
    SelectAll,
    Copy,
    Cut,
    Paste,
}

impl EditCommand {
    /// Whether this command may change buffer content.
    pub fn is_mutating(&self) -> bool {
        matches!(
            self,
            EditCommand::DeleteBackward
                | EditCommand::DeleteForward
                | EditCommand::InsertChar(_)
                | EditCommand::InsertNewline
                | EditCommand::Undo
                | EditCommand::Redo
                | EditCommand::Cut
                | EditCommand::Paste
        )
    }
}

/// Result of processing a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyResult {
    /// The key produced an edit command that was applied
    Handled,
    /// The key has no meaning for the edit session
    Ignored,
}

/// A custom binding from a key event to a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyBinding {
    pub event: KeyEvent,
    pub command: EditCommand,
}

/// Translates key events into edit commands.
#[derive(Debug, Clone)]
pub struct KeyHandler {
    /// Custom key bindings that override defaults
    custom_bindings: HashMap<KeyEvent, EditCommand>,
    /// Default key bindings for common operations
    default_bindings: HashMap<KeyEvent, EditCommand>,
}

impl Default for KeyHandler {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl KeyHandler {
    /// Create a new KeyHandler with the specified custom key bindings.
    ///
    /// # Arguments
    ///
    /// * `custom_bindings` - Vector of custom key bindings that will override defaults
    ///
    /// # Examples
    ///
    /// ```
    /// use wrapedit_core::key::{Key, KeyEvent};
    /// use wrapedit_core::key_handler::{EditCommand, KeyBinding, KeyHandler};
    ///
    /// let handler = KeyHandler::new(vec![KeyBinding {
    ///     event: KeyEvent::ctrl(Key::Char('e')),
    ///     command: EditCommand::MoveLineEnd { extend: false },
    /// }]);
    ///
    /// assert_eq!(
    ///     handler.translate(&KeyEvent::ctrl(Key::Char('e'))),
    ///     Some(EditCommand::MoveLineEnd { extend: false })
    /// );
    /// ```
    pub fn new(custom_bindings: Vec<KeyBinding>) -> Self {
        let mut custom_map = HashMap::new();
        for binding in custom_bindings {
            custom_map.insert(binding.event, binding.command);
        }

        KeyHandler {
            custom_bindings: custom_map,
            default_bindings: Self::create_default_bindings(),
        }
    }

    /// Create default key bindings for basic editing operations.
    fn create_default_bindings() -> HashMap<KeyEvent, EditCommand> {
        let mut bindings = HashMap::new();

        // Navigation keys, each with a shift variant that extends the selection
        let navigation: [(Key, Modifiers, fn(bool) -> EditCommand); 10] = [
            (Key::Left, Modifiers::NONE, |extend| EditCommand::MoveLeft { extend }),
            (Key::Right, Modifiers::NONE, |extend| EditCommand::MoveRight { extend }),
            (Key::Up, Modifiers::NONE, |extend| EditCommand::MoveUp { extend }),
            (Key::Down, Modifiers::NONE, |extend| EditCommand::MoveDown { extend }),
            (Key::Home, Modifiers::NONE, |extend| EditCommand::MoveLineStart { extend }),
            (Key::End, Modifiers::NONE, |extend| EditCommand::MoveLineEnd { extend }),
            (Key::PageUp, Modifiers::NONE, |extend| EditCommand::PageUp { extend }),
            (Key::PageDown, Modifiers::NONE, |extend| EditCommand::PageDown { extend }),
            (Key::Left, Modifiers::CTRL, |extend| EditCommand::MoveWordLeft { extend }),
            (Key::Right, Modifiers::CTRL, |extend| EditCommand::MoveWordRight { extend }),
        ];
        for (key, modifiers, command) in navigation {
            bindings.insert(KeyEvent::new(key, modifiers), command(false));
            let extended = Modifiers {
                shift: true,
                ..modifiers
            };
            bindings.insert(KeyEvent::new(key, extended), command(true));
        }

        // Document jumps
        bindings.insert(KeyEvent::ctrl(Key::Home), EditCommand::MoveTextStart { extend: false });
        bindings.insert(KeyEvent::ctrl(Key::End), EditCommand::MoveTextEnd { extend: false });
        bindings.insert(
            KeyEvent::new(Key::Home, Modifiers::CTRL_SHIFT),
            EditCommand::MoveTextStart { extend: true },
        );
        bindings.insert(
            KeyEvent::new(Key::End, Modifiers::CTRL_SHIFT),
            EditCommand::MoveTextEnd { extend: true },
        );

        // Editing keys
        bindings.insert(KeyEvent::simple(Key::Backspace), EditCommand::DeleteBackward);
        bindings.insert(KeyEvent::shift(Key::Backspace), EditCommand::DeleteBackward);
        bindings.insert(KeyEvent::simple(Key::Delete), EditCommand::DeleteForward);
        bindings.insert(KeyEvent::simple(Key::Return), EditCommand::InsertNewline);
        bindings.insert(KeyEvent::shift(Key::Return), EditCommand::InsertNewline);
        bindings.insert(KeyEvent::simple(Key::Insert), EditCommand::ToggleInsertMode);

        // Clipboard and history, on both control and the platform command key
        let command_key = Modifiers {
            command: true,
            ..Modifiers::NONE
        };
        for modifiers in [Modifiers::CTRL, command_key] {
            let chord = |c: char| KeyEvent::new(Key::Char(c), modifiers);
            bindings.insert(chord('z'), EditCommand::Undo);
            bindings.insert(chord('y'), EditCommand::Redo);
            bindings.insert(chord('a'), EditCommand::SelectAll);
            bindings.insert(chord('c'), EditCommand::Copy);
            bindings.insert(chord('x'), EditCommand::Cut);
            bindings.insert(chord('v'), EditCommand::Paste);
            let shifted = Modifiers {
                shift: true,
                ..modifiers
            };
            bindings.insert(KeyEvent::new(Key::Char('z'), shifted), EditCommand::Redo);
        }

        bindings
    }

    /// Translate a key event into an edit command.
    ///
    /// This method first checks for custom key bindings, then falls back to default
    /// bindings. If no binding is found, printable characters typed without a
    /// control or command modifier become [`EditCommand::InsertChar`].
    ///
    /// # Returns
    ///
    /// `None` for modifier-only, non-printable and unbound keys.
    pub fn translate(&self, key_event: &KeyEvent) -> Option<EditCommand> {
        if key_event.key.is_modifier() {
            return None;
        }

        // Check for custom bindings first
        if let Some(command) = self.custom_bindings.get(key_event) {
            return Some(*command);
        }

        // Check for default bindings
        if let Some(command) = self.default_bindings.get(key_event) {
            return Some(*command);
        }

        // Control chords that are not bound must not type their letter
        if key_event.modifiers.ctrl || key_event.modifiers.command {
            return None;
        }

        key_event.key.printable().map(EditCommand::InsertChar)
    }

    /// Register a custom binding, replacing any previous one for the same event.
    pub fn register_binding(&mut self, binding: KeyBinding) {
        self.custom_bindings.insert(binding.event, binding.command);
    }

    /// Remove a custom binding. Returns the command it was bound to.
    pub fn remove_binding(&mut self, event: &KeyEvent) -> Option<EditCommand> {
        self.custom_bindings.remove(event)
    }

    /// Get all custom bindings.
    pub fn custom_bindings(&self) -> &HashMap<KeyEvent, EditCommand> {
        &self.custom_bindings
    }

    /// Get all default bindings.
    pub fn default_bindings(&self) -> &HashMap<KeyEvent, EditCommand> {
        &self.default_bindings
    }
}
