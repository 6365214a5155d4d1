//! Greedy line-wrapping layout.
//!
//! [`layout`] walks the buffer from offset 0 and splits it into rows that fit
//! the content width, using the line/word break classifiers for a
//! one-character lookahead. The caret position falls out of the same walk.
//! [`offset_at_point`] is the inverse mapping from content coordinates back to
//! a buffer offset.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::buffer::EditBuffer;
use crate::canvas::TextMeasure;
use crate::line_break::{classify_line_break, classify_word_break, LineBreak, WordBreak, NEWLINE};
use crate::rows::{RowDescriptor, RowIndex};

/// Pixel margins between the widget border and the text content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Margins {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Margins {
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Margins {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Same margin on every side.
    pub const fn uniform(value: i32) -> Self {
        Self::new(value, value, value, value)
    }
}

impl Default for Margins {
    fn default() -> Self {
        Margins::new(16, 23, 8, 5)
    }
}

/// Caret position in content coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CaretPosition {
    pub x: i32,
    pub y: i32,
}

impl CaretPosition {
    pub fn new(x: i32, y: i32) -> Self {
        CaretPosition { x, y }
    }
}

/// Viewport geometry for the current layout pass.
///
/// `w`/`h` are the content size (widget size minus margins). The scroll offset
/// `ox`/`oy` survives geometry updates; only the caret-visibility rule moves it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LayoutInfo {
    pub widget_w: i32,
    pub widget_h: i32,
    pub margins: Margins,
    pub w: i32,
    pub h: i32,
    pub ox: i32,
    pub oy: i32,
    pub virtual_w: i32,
    pub virtual_h: i32,
}

impl LayoutInfo {
    /// Recompute content size from widget size and margins, keeping the scroll offset.
    pub fn update_geometry(&mut self, widget_w: i32, widget_h: i32, margins: Margins) {
        self.widget_w = widget_w;
        self.widget_h = widget_h;
        self.margins = margins;
        self.w = (widget_w - margins.left - margins.right).max(0);
        self.h = (widget_h - margins.top - margins.bottom).max(0);
    }

    /// Record the extent of the laid-out content.
    pub fn update_virtual_size(&mut self, rows: &RowIndex, line_height: u32) {
        let content_h = rows.len() as i64 * line_height as i64;
        self.virtual_w = (rows.max_pixel_width() as i32).max(self.widget_w);
        self.virtual_h = (content_h.min(i32::MAX as i64) as i32).max(self.widget_h);
    }
}

/// Inputs for a single layout pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutParams {
    /// Content width in pixels. `None` disables width-based wrapping.
    pub width: Option<u32>,
    /// Buffer offset whose pixel position is reported as the caret.
    pub cursor: usize,
    /// Honor the lookahead rule that avoids splitting a word at the edge.
    pub wrap_word: bool,
    /// Extra pixels added after every code unit.
    pub char_spacing: u32,
    pub line_height: u32,
}

/// Lay `buffer` out into `rows` and return the caret position.
///
/// Rows are produced until the buffer ends or `rows` reaches capacity; in the
/// latter case `rows.overflowed()` is set. Each row consumes at least one code
/// unit, so a zero width yields one unit per row.
///
/// # Examples
///
/// ```
/// use wrapedit_core::buffer::CharBuffer;
/// use wrapedit_core::canvas::TextMeasure;
/// use wrapedit_core::layout::{layout, LayoutParams};
/// use wrapedit_core::rows::RowIndex;
///
/// struct Fixed;
/// impl TextMeasure for Fixed {
///     fn measure_text(&self, units: &[char]) -> u32 { units.len() as u32 * 9 }
///     fn font_size(&self) -> u32 { 16 }
/// }
///
/// let buffer = CharBuffer::from_text("hello\nworld");
/// let mut rows = RowIndex::new(100);
/// let params = LayoutParams {
///     width: Some(500),
///     cursor: 7,
///     wrap_word: true,
///     char_spacing: 1,
///     line_height: 20,
/// };
/// let caret = layout(&buffer, &Fixed, &params, &mut rows);
///
/// assert_eq!(rows.len(), 2);
/// assert_eq!((caret.x, caret.y), (10, 20));
/// ```
pub fn layout<B: EditBuffer + ?Sized, M: TextMeasure + ?Sized>(
    buffer: &B,
    measure: &M,
    params: &LayoutParams,
    rows: &mut RowIndex,
) -> CaretPosition {
    rows.clear();

    let len = buffer.len();
    let mut caret: Option<CaretPosition> = None;
    let mut offset = 0usize;
    let mut row_y: i64 = 0;

    loop {
        if rows.is_full() {
            if offset < len {
                rows.mark_overflowed();
                log::debug!(
                    "layout stopped at {} rows with {} units left",
                    rows.len(),
                    len - offset
                );
            }
            break;
        }

        let y = clamp_i32(row_y);
        let mut x: u32 = 0;
        let mut i = offset;
        let mut hit_newline = false;

        while i < len {
            let Some(ch) = buffer.char_at(i) else {
                break;
            };
            if i - offset >= u16::MAX as usize {
                break;
            }
            let next = buffer.char_at(i + 1);
            let char_w = unit_width(measure, ch, params.char_spacing);

            if i == params.cursor {
                caret = Some(CaretPosition::new(x as i32, y));
            }

            let line_break = classify_line_break(ch, next);
            if line_break == LineBreak::Mandatory {
                i += 1;
                hit_newline = true;
                break;
            }

            if let (Some(width), true) = (params.width, i > offset) {
                if x.saturating_add(char_w) > width {
                    break;
                }
                if params.wrap_word {
                    if let Some(next) = next {
                        let next_w = unit_width(measure, next, params.char_spacing);
                        let word_break = classify_word_break(ch, Some(next));
                        if x.saturating_add(char_w).saturating_add(next_w) >= width
                            && (line_break == LineBreak::None || word_break == WordBreak::None)
                        {
                            break;
                        }
                    }
                }
            }

            x = x.saturating_add(char_w);
            i += 1;
        }

        if i == len && params.cursor == len && !hit_newline {
            caret = Some(CaretPosition::new(x as i32, y));
        }

        rows.push(RowDescriptor::new(
            offset as u32,
            (i - offset) as u16,
            x.min(u16::MAX as u32) as u16,
        ));

        // A trailing newline still gets an empty row for the caret to sit on.
        if i >= len && !hit_newline {
            break;
        }
        offset = i;
        row_y += params.line_height as i64;
    }

    caret.unwrap_or_else(|| fallback_caret(rows, params.line_height))
}

/// Caret at the end of the last row, used when the cursor was not reached.
fn fallback_caret(rows: &RowIndex, line_height: u32) -> CaretPosition {
    match rows.len() {
        0 => CaretPosition::default(),
        n => {
            let last = rows.as_slice()[n - 1];
            let y = (n as i64 - 1) * line_height as i64;
            CaretPosition::new(last.pixel_width as i32, clamp_i32(y))
        }
    }
}

/// Resolve content coordinates `(x, y)` to a buffer offset.
///
/// - above the first row resolves to 0, below the last row to `buffer.len()`
/// - left of a row resolves to the row start
/// - inside a row, the nearest boundary wins, splitting each unit at half width
/// - right of a row resolves to the row end, or before its trailing newline
///
/// With `single_line` set, `y` is ignored and the first row is used.
#[allow(clippy::too_many_arguments)]
pub fn offset_at_point<B: EditBuffer + ?Sized, M: TextMeasure + ?Sized>(
    buffer: &B,
    measure: &M,
    rows: &RowIndex,
    char_spacing: u32,
    line_height: u32,
    single_line: bool,
    x: i32,
    y: i32,
) -> usize {
    let len = buffer.len();
    if rows.is_empty() {
        return if x <= 0 && y <= 0 { 0 } else { len };
    }

    let row_idx = if single_line {
        0
    } else if y < 0 {
        return 0;
    } else if line_height == 0 {
        0
    } else {
        (y as u32 / line_height) as usize
    };

    let Some(row) = rows.get(row_idx) else {
        return len;
    };
    let start = row.offset as usize;
    if x < 0 || row.length == 0 {
        return start;
    }

    let mut prev_x: i64 = 0;
    let x = x as i64;
    for k in start..row.end() {
        let Some(ch) = buffer.char_at(k) else {
            break;
        };
        let w = unit_width(measure, ch, char_spacing) as i64;
        if x < prev_x + w {
            return if x < prev_x + w / 2 { k } else { k + 1 };
        }
        prev_x += w;
    }

    let end = row.end();
    if buffer.char_at(end - 1) == Some(NEWLINE) {
        end - 1
    } else {
        end
    }
}

/// Pixel advance for a single code unit.
pub(crate) fn unit_width<M: TextMeasure + ?Sized>(measure: &M, ch: char, char_spacing: u32) -> u32 {
    measure.measure_text(&[ch]).saturating_add(char_spacing)
}

fn clamp_i32(v: i64) -> i32 {
    v.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::CharBuffer;

    /// Every unit is 9px wide, so with 1px spacing each advances 10px.
    struct FixedMeasure;

    impl TextMeasure for FixedMeasure {
        fn measure_text(&self, units: &[char]) -> u32 {
            units.len() as u32 * 9
        }

        fn font_size(&self) -> u32 {
            16
        }
    }

    fn params(width: Option<u32>, cursor: usize) -> LayoutParams {
        LayoutParams {
            width,
            cursor,
            wrap_word: true,
            char_spacing: 1,
            line_height: 20,
        }
    }

    fn run(text: &str, p: LayoutParams, capacity: usize) -> (RowIndex, CaretPosition) {
        let buffer = CharBuffer::from_text(text);
        let mut rows = RowIndex::new(capacity);
        let caret = layout(&buffer, &FixedMeasure, &p, &mut rows);
        (rows, caret)
    }

    #[test]
    fn test_empty_buffer_yields_single_empty_row() {
        let (rows, caret) = run("", params(Some(100), 0), 100);
        assert_eq!(rows.as_slice(), &[RowDescriptor::new(0, 0, 0)]);
        assert_eq!(caret, CaretPosition::new(0, 0));
    }

    #[test]
    fn test_mandatory_break_splits_rows() {
        let (rows, _) = run("hello\nworl", params(Some(1000), 0), 100);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows.get(0).map(|r| r.length), Some(6));
        assert_eq!(rows.get(1).map(|r| r.length), Some(4));
        assert_eq!(rows.get(1).map(|r| r.offset), Some(6));
    }

    #[test]
    fn test_zero_width_gives_one_unit_per_row() {
        let (rows, _) = run("abc", params(Some(0), 0), 100);
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|r| r.length == 1));
    }

    #[test]
    fn test_word_wrap_breaks_before_word() {
        // 50px fits five units, "ab " then "cd" after the lookahead rule.
        let (rows, _) = run("ab cd", params(Some(50), 0), 100);
        assert_eq!(
            rows.as_slice(),
            &[RowDescriptor::new(0, 3, 30), RowDescriptor::new(3, 2, 20)]
        );
    }

    #[test]
    fn test_without_wrap_word_fills_rows() {
        let mut p = params(Some(50), 0);
        p.wrap_word = false;
        let (rows, _) = run("abcdefg", p, 100);
        assert_eq!(
            rows.as_slice(),
            &[RowDescriptor::new(0, 5, 50), RowDescriptor::new(5, 2, 20)]
        );
    }

    #[test]
    fn test_no_width_keeps_single_row() {
        let (rows, caret) = run("a long single line", params(None, 18), 1);
        assert_eq!(rows.len(), 1);
        assert_eq!(caret, CaretPosition::new(180, 0));
        assert!(!rows.overflowed());
    }

    #[test]
    fn test_caret_on_second_row() {
        let (_, caret) = run("hello\nworld", params(Some(1000), 8), 100);
        assert_eq!(caret, CaretPosition::new(20, 20));
    }

    #[test]
    fn test_caret_after_trailing_newline() {
        let (rows, caret) = run("hi\n", params(Some(1000), 3), 100);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows.get(1), Some(&RowDescriptor::new(3, 0, 0)));
        assert_eq!(caret, CaretPosition::new(0, 20));
    }

    #[test]
    fn test_caret_at_wrap_point_uses_later_row() {
        let mut p = params(Some(50), 5);
        p.wrap_word = false;
        let (_, caret) = run("abcdefg", p, 100);
        assert_eq!(caret, CaretPosition::new(0, 20));
    }

    #[test]
    fn test_capacity_overflow_is_reported() {
        let (rows, caret) = run("a\nb\nc\nd", params(Some(1000), 7), 2);
        assert_eq!(rows.len(), 2);
        assert!(rows.overflowed());
        // Cursor not reached: caret falls back to the end of the last row.
        assert_eq!(caret, CaretPosition::new(10, 20));
    }

    #[test]
    fn test_layout_is_idempotent() {
        let buffer = CharBuffer::from_text("the quick brown fox\njumps");
        let p = params(Some(60), 12);
        let mut first = RowIndex::new(100);
        let mut second = RowIndex::new(100);
        let a = layout(&buffer, &FixedMeasure, &p, &mut first);
        let b = layout(&buffer, &FixedMeasure, &p, &mut second);
        assert_eq!(first, second);
        assert_eq!(a, b);
    }

    #[test]
    fn test_rows_are_contiguous() {
        let buffer = CharBuffer::from_text("lorem ipsum dolor sit amet,\nconsectetur adipiscing");
        let mut rows = RowIndex::new(100);
        layout(&buffer, &FixedMeasure, &params(Some(70), 0), &mut rows);
        for pair in rows.as_slice().windows(2) {
            assert_eq!(pair[0].end(), pair[1].offset as usize);
        }
        assert_eq!(rows.end_offset(), buffer.len());
    }

    #[test]
    fn test_offset_at_point() {
        let buffer = CharBuffer::from_text("hello\nworld");
        let mut rows = RowIndex::new(100);
        layout(&buffer, &FixedMeasure, &params(Some(1000), 0), &mut rows);
        let at = |x, y| offset_at_point(&buffer, &FixedMeasure, &rows, 1, 20, false, x, y);

        assert_eq!(at(0, 0), 0);
        assert_eq!(at(14, 5), 1);
        assert_eq!(at(16, 5), 2);
        assert_eq!(at(-5, 25), 6);
        assert_eq!(at(999, 5), 5);
        assert_eq!(at(999, 25), 11);
        assert_eq!(at(10, -3), 0);
        assert_eq!(at(10, 400), 11);
    }

    #[test]
    fn test_offset_at_point_single_line_ignores_y() {
        let buffer = CharBuffer::from_text("abc");
        let mut rows = RowIndex::new(1);
        layout(&buffer, &FixedMeasure, &params(None, 0), &mut rows);
        assert_eq!(
            offset_at_point(&buffer, &FixedMeasure, &rows, 1, 20, true, 21, 300),
            2
        );
    }

    #[test]
    fn test_row_length_cap_splits_long_runs() {
        let text = "a".repeat(70_000);
        let (rows, caret) = run(&text, params(None, 70_000), 10);
        assert_eq!(
            rows.as_slice(),
            &[
                RowDescriptor::new(0, u16::MAX, u16::MAX),
                RowDescriptor::new(65_535, 4_465, 44_650),
            ]
        );
        assert_eq!(rows.end_offset(), 70_000);
        assert_eq!(caret, CaretPosition::new(44_650, 20));
    }

    #[test]
    fn test_layout_info_geometry() {
        let mut info = LayoutInfo {
            ox: 7,
            oy: 3,
            ..LayoutInfo::default()
        };
        info.update_geometry(200, 100, Margins::default());
        assert_eq!((info.w, info.h), (176, 72));
        assert_eq!((info.ox, info.oy), (7, 3));

        info.update_geometry(10, 10, Margins::default());
        assert_eq!((info.w, info.h), (0, 0));
    }
}
