//! Mock collaborators for testing

use std::fmt;
use std::sync::{Arc, Mutex};

use wrapedit_core::{Canvas, Clipboard, Color, TextMeasure};

use crate::MonospaceMeasure;

/// A single recorded canvas call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawOp {
    TextColor(Color),
    FillColor(Color),
    StrokeColor(Color),
    FillRect { x: i32, y: i32, w: u32, h: u32 },
    Text { text: String, x: i32, y: i32 },
    VLine { x: i32, y: i32, h: u32 },
}

impl fmt::Display for DrawOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DrawOp::TextColor(color) => write!(f, "text-color {color}"),
            DrawOp::FillColor(color) => write!(f, "fill-color {color}"),
            DrawOp::StrokeColor(color) => write!(f, "stroke-color {color}"),
            DrawOp::FillRect { x, y, w, h } => write!(f, "rect {x},{y} {w}x{h}"),
            DrawOp::Text { text, x, y } => write!(f, "text {text:?} {x},{y}"),
            DrawOp::VLine { x, y, h } => write!(f, "vline {x},{y} h={h}"),
        }
    }
}

/// Canvas that records every call for later inspection.
///
/// Measurement is delegated to a [`MonospaceMeasure`].
#[derive(Debug, Clone)]
pub struct RecordingCanvas {
    measure: MonospaceMeasure,
    ops: Vec<DrawOp>,
}

impl Default for RecordingCanvas {
    fn default() -> Self {
        Self::new(MonospaceMeasure::default())
    }
}

impl RecordingCanvas {
    pub fn new(measure: MonospaceMeasure) -> Self {
        Self {
            measure,
            ops: Vec::new(),
        }
    }

    /// Recorded calls in order
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Clear recorded calls
    pub fn clear(&mut self) {
        self.ops.clear();
    }

    /// Text drawn so far, concatenated in draw order
    pub fn drawn_text(&self) -> String {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Recorded calls formatted one per line, for snapshots
    pub fn trace(&self) -> String {
        self.ops
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl TextMeasure for RecordingCanvas {
    fn measure_text(&self, units: &[char]) -> u32 {
        self.measure.measure_text(units)
    }

    fn font_size(&self) -> u32 {
        self.measure.font_size()
    }
}

impl Canvas for RecordingCanvas {
    fn set_text_color(&mut self, color: Color) {
        self.ops.push(DrawOp::TextColor(color));
    }

    fn set_fill_color(&mut self, color: Color) {
        self.ops.push(DrawOp::FillColor(color));
    }

    fn set_stroke_color(&mut self, color: Color) {
        self.ops.push(DrawOp::StrokeColor(color));
    }

    fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32) {
        self.ops.push(DrawOp::FillRect { x, y, w, h });
    }

    fn draw_text(&mut self, units: &[char], x: i32, y: i32) {
        self.ops.push(DrawOp::Text {
            text: units.iter().collect(),
            x,
            y,
        });
    }

    fn draw_vline(&mut self, x: i32, y: i32, h: u32) {
        self.ops.push(DrawOp::VLine { x, y, h });
    }
}

/// Clipboard whose contents stay observable after it is handed to a session.
///
/// Clones share the same storage.
#[derive(Debug, Clone, Default)]
pub struct SharedClipboard {
    text: Arc<Mutex<Option<String>>>,
}

impl SharedClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current contents
    pub fn contents(&self) -> Option<String> {
        self.text.lock().ok().and_then(|text| text.clone())
    }

    /// Replace the contents from the host side
    pub fn set_contents(&self, text: &str) {
        if let Ok(mut current) = self.text.lock() {
            *current = Some(text.to_string());
        }
    }
}

impl Clipboard for SharedClipboard {
    fn set_text(&mut self, text: &str) {
        self.set_contents(text);
    }

    fn get_text(&self) -> Option<String> {
        self.contents()
    }
}
