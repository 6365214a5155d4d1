//! Viewport scrolling that keeps the caret visible.

use crate::layout::{CaretPosition, LayoutInfo};

/// Adjust `info.ox`/`info.oy` minimally so the caret rectangle
/// `[x, x + 1] x [y, y + caret_height]` lies inside the visible window.
///
/// Returns `true` if the scroll offset changed. Nothing moves while the caret
/// is already visible.
///
/// # Examples
///
/// ```
/// use wrapedit_core::layout::{CaretPosition, LayoutInfo};
/// use wrapedit_core::scroll::scroll_to_caret;
///
/// let mut info = LayoutInfo { w: 100, h: 40, ..LayoutInfo::default() };
/// assert!(scroll_to_caret(&mut info, CaretPosition::new(10, 60), 20));
/// assert_eq!(info.oy, 40);
/// ```
pub fn scroll_to_caret(info: &mut LayoutInfo, caret: CaretPosition, caret_height: u32) -> bool {
    let before = (info.ox, info.oy);

    let top = caret.y;
    let bottom = caret.y.saturating_add(caret_height as i32);
    let left = caret.x;
    let right = caret.x.saturating_add(1);

    if top < info.oy {
        info.oy = top;
    } else if bottom > info.oy + info.h {
        info.oy = bottom - info.h;
    }

    if left < info.ox {
        info.ox = left;
    } else if right > info.ox + info.w {
        info.ox = right - info.w;
    }

    if (info.ox, info.oy) != before {
        log::trace!("scrolled viewport to ({}, {})", info.ox, info.oy);
        true
    } else {
        false
    }
}
