//! Paint adapter: turns rows, selection and caret into canvas draw calls.
//!
//! The renderer walks the rows visible through the viewport and draws each
//! code unit whose horizontal span intersects it. Units inside the normalized
//! selection get a background rectangle and the selected-text color. The caret
//! is drawn as a single vertical stroke only while the selection is empty.

use crate::buffer::EditBuffer;
use crate::canvas::{Canvas, Color};
use crate::config::PaintStyle;
use crate::layout::{CaretPosition, LayoutInfo};
use crate::line_break::NEWLINE;
use crate::rows::RowIndex;
use crate::state::EditState;

/// Borrowed snapshot of everything the paint pass needs.
pub struct Renderer<'a, B: EditBuffer + ?Sized> {
    pub buffer: &'a B,
    pub rows: &'a RowIndex,
    pub state: &'a EditState,
    pub info: &'a LayoutInfo,
    pub caret: CaretPosition,
    pub style: &'a PaintStyle,
    pub char_spacing: u32,
    pub line_height: u32,
}

impl<'a, B: EditBuffer + ?Sized> Renderer<'a, B> {
    /// Draw the visible text, selection highlight and caret onto `canvas`.
    ///
    /// Coordinates passed to the canvas are widget-local: content position
    /// plus margins, minus the scroll offset.
    pub fn render(&self, canvas: &mut dyn Canvas) {
        let info = self.info;
        let font_size = canvas.font_size();
        let (sel_min, sel_max) = self.state.selection();

        let view_top = info.oy as i64;
        let view_bottom = view_top + info.h as i64;
        let view_left = info.ox as i64;
        let view_right = view_left + info.w as i64;

        let mut current_color: Option<Color> = None;
        let mut drawn = 0usize;

        for (i, row) in self.rows.iter().enumerate() {
            let y = i as i64 * self.line_height as i64;
            if y + (self.line_height.max(font_size) as i64) <= view_top {
                continue;
            }
            if y >= view_bottom {
                break;
            }

            let screen_y = to_screen(y, info.margins.top, info.oy);
            let mut x: i64 = 0;
            for offset in row.offset as usize..row.end() {
                let Some(ch) = self.buffer.char_at(offset) else {
                    break;
                };
                let char_w = canvas.measure_text(&[ch]);
                let advance = char_w as i64 + self.char_spacing as i64;

                if x + advance <= view_left {
                    x += advance;
                    continue;
                }
                if x >= view_right {
                    break;
                }
                if ch == NEWLINE {
                    break;
                }

                let screen_x = to_screen(x, info.margins.left, info.ox);
                let color = if offset >= sel_min && offset < sel_max {
                    canvas.set_fill_color(self.style.selected_bg_color);
                    canvas.fill_rect(screen_x, screen_y, advance as u32, font_size);
                    self.style.selected_text_color
                } else {
                    self.style.text_color
                };
                if current_color != Some(color) {
                    canvas.set_text_color(color);
                    current_color = Some(color);
                }
                canvas.draw_text(&[ch], screen_x, screen_y);
                drawn += 1;

                x += advance;
            }
        }

        if !self.state.has_selection() {
            canvas.set_stroke_color(self.style.caret_color);
            canvas.draw_vline(
                to_screen(self.caret.x as i64, info.margins.left, info.ox),
                to_screen(self.caret.y as i64, info.margins.top, info.oy),
                font_size,
            );
        }

        log::trace!("painted {drawn} units");
    }
}

fn to_screen(content: i64, margin: i32, scroll: i32) -> i32 {
    (content + margin as i64 - scroll as i64).clamp(i32::MIN as i64, i32::MAX as i64) as i32
}
