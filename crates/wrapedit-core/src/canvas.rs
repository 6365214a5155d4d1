//! Collaborator traits for text measurement, drawing and the clipboard.
//!
//! The edit session is backend agnostic. Hosts provide:
//! - a [`TextMeasure`] so layout can turn code units into pixel widths
//! - a [`Canvas`] (which also measures) for the paint pass
//! - a [`Clipboard`] for cut, copy and paste
//!
//! All collaborator calls are synchronous and receive no handle back into the
//! session, so they cannot re-enter it.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Pixel width measurement for runs of code units.
pub trait TextMeasure {
    /// Width in pixels of `units` rendered with the current font.
    fn measure_text(&self, units: &[char]) -> u32;

    /// Current font size in pixels. Line height derives from it.
    fn font_size(&self) -> u32;
}

/// Drawing surface used by the paint adapter.
///
/// Coordinates are widget-local pixels and may be negative for content
/// scrolled partially out of view.
pub trait Canvas: TextMeasure {
    /// Set the color for subsequent [`Canvas::draw_text`] calls.
    fn set_text_color(&mut self, color: Color);

    /// Set the color for subsequent [`Canvas::fill_rect`] calls.
    fn set_fill_color(&mut self, color: Color);

    /// Set the color for subsequent [`Canvas::draw_vline`] calls.
    fn set_stroke_color(&mut self, color: Color);

    /// Fill a rectangle.
    fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32);

    /// Draw a run of code units with its top-left corner at `(x, y)`.
    fn draw_text(&mut self, units: &[char], x: i32, y: i32);

    /// Draw a vertical line of height `h` starting at `(x, y)`.
    fn draw_vline(&mut self, x: i32, y: i32, h: u32);
}

/// Source and sink of UTF-8 text for cut, copy and paste.
pub trait Clipboard {
    /// Replace the clipboard contents.
    fn set_text(&mut self, text: &str);

    /// Current clipboard contents, if any.
    fn get_text(&self) -> Option<String>;
}

/// RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(0xff, 0xff, 0xff);

    /// Opaque color from red, green and blue components.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b, a: 0xff }
    }

    /// Color with an explicit alpha component.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Color { r, g, b, a }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)?;
        if self.a != 0xff {
            write!(f, "{:02x}", self.a)?;
        }
        Ok(())
    }
}

/// In-process clipboard. The default for new edit sessions.
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    text: Option<String>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a clipboard already holding `text`.
    pub fn with_text(text: &str) -> Self {
        MemoryClipboard {
            text: Some(text.to_string()),
        }
    }
}

impl Clipboard for MemoryClipboard {
    fn set_text(&mut self, text: &str) {
        self.text = Some(text.to_string());
    }

    fn get_text(&self) -> Option<String> {
        self.text.clone()
    }
}
