//! Configuration for edit sessions.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::canvas::Color;
use crate::history::{DEFAULT_MAX_RECORDS, DEFAULT_MAX_UNITS};
use crate::key_handler::KeyBinding;
use crate::layout::Margins;

/// Default number of wrapped rows kept by a multi-line session.
pub const DEFAULT_MAX_ROWS: usize = 100;

/// Colors used by the paint pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PaintStyle {
    pub text_color: Color,
    pub selected_text_color: Color,
    pub selected_bg_color: Color,
    pub caret_color: Color,
}

impl Default for PaintStyle {
    fn default() -> Self {
        PaintStyle {
            text_color: Color::BLACK,
            selected_text_color: Color::BLACK,
            selected_bg_color: Color::rgb(0xf0, 0xf0, 0xf0),
            caret_color: Color::rgb(0, 0xff, 0),
        }
    }
}

/// Configuration for an edit session.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EditConfig {
    /// Space between the widget border and the text
    pub margins: Margins,
    /// Extra pixels after every code unit
    pub char_spacing: u32,
    /// Line height as a multiple of the font size
    pub line_height_scale: f32,
    /// Row capacity in multi-line mode (single-line sessions always use 1)
    pub max_rows: usize,
    /// Whether multi-line sessions wrap at word boundaries
    pub wrap_word: bool,
    /// Maximum number of undo records
    pub undo_limit: usize,
    /// Maximum number of code units held across undo records
    pub undo_char_limit: usize,
    pub paint: PaintStyle,
    /// Custom key bindings for the session
    #[cfg_attr(feature = "serde", serde(skip))]
    pub key_bindings: Vec<KeyBinding>,
}

impl Default for EditConfig {
    fn default() -> Self {
        EditConfig {
            margins: Margins::default(),
            char_spacing: 1,
            line_height_scale: 1.25,
            max_rows: DEFAULT_MAX_ROWS,
            wrap_word: true,
            undo_limit: DEFAULT_MAX_RECORDS,
            undo_char_limit: DEFAULT_MAX_UNITS,
            paint: PaintStyle::default(),
            key_bindings: Vec::new(),
        }
    }
}

impl EditConfig {
    /// Line height in pixels for `font_size`.
    pub fn line_height(&self, font_size: u32) -> u32 {
        (font_size as f32 * self.line_height_scale).round().max(0.0) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EditConfig::default();
        assert_eq!(config.margins, Margins::new(16, 23, 8, 5));
        assert_eq!(config.char_spacing, 1);
        assert_eq!(config.max_rows, 100);
        assert_eq!(config.undo_limit, 99);
        assert_eq!(config.undo_char_limit, 999);
        assert_eq!(config.paint.selected_bg_color, Color::rgb(0xf0, 0xf0, 0xf0));
    }

    #[test]
    fn test_line_height() {
        let config = EditConfig::default();
        assert_eq!(config.line_height(16), 20);
        assert_eq!(config.line_height(18), 23);
        assert_eq!(config.line_height(0), 0);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_config_serde_roundtrip() {
        let config = EditConfig {
            max_rows: 12,
            margins: Margins::uniform(4),
            ..EditConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let parsed: EditConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);

        let partial: EditConfig = serde_json::from_str(r#"{"char_spacing": 0}"#).unwrap();
        assert_eq!(partial.char_spacing, 0);
        assert_eq!(partial.max_rows, 100);
    }
}
