//! Edit Session Example - drive a session with scripted input and print rows
//!
//! Usage: cargo run --example edit_session

use wrapedit_core::{EditCommand, Key, KeyEvent, Modifiers, TextEdit};
use wrapedit_io::{create_edit_session, create_mock_canvas, CharBuffer};

/// Print every row of the session with its offsets and width
fn print_rows(title: &str, edit: &TextEdit<CharBuffer>) {
    let units: Vec<char> = edit.text().chars().collect();
    println!("== {title}");
    for (i, row) in edit.rows().iter().enumerate() {
        let text: String = units[row.offset as usize..row.end()]
            .iter()
            .map(|&ch| if ch == '\n' { '⏎' } else { ch })
            .collect();
        println!(
            "  row {i:>2} @{:<4} len {:<3} {:>4}px |{text}|",
            row.offset, row.length, row.pixel_width
        );
    }
    let info = edit.get_info();
    let layout = edit.layout_info();
    println!(
        "  cursor {} select {}..{} caret ({}, {}) scroll ({}, {})",
        info.cursor,
        info.select_start,
        info.select_end,
        edit.caret().x,
        edit.caret().y,
        layout.ox,
        layout.oy
    );
    if edit.rows().overflowed() {
        println!("  (row capacity reached, remaining text not laid out)");
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (mut edit, clipboard) = create_edit_session("", false);
    edit.set_size(24 + 20 * 9, 28 + 5 * 20);

    for ch in "The quick brown fox jumps over the lazy dog.".chars() {
        edit.key_down(&KeyEvent::char(ch))?;
    }
    edit.key_down(&KeyEvent::simple(Key::Return))?;
    edit.paste_str("Pack my box with five dozen liquor jugs.")?;
    print_rows("typed", &edit);

    edit.key_down(&KeyEvent::new(Key::Home, Modifiers::CTRL))?;
    for _ in 0..3 {
        edit.key_down(&KeyEvent::new(Key::Right, Modifiers::CTRL_SHIFT))?;
    }
    edit.apply_command(EditCommand::Cut)?;
    println!("clipboard: {:?}", clipboard.contents());
    print_rows("cut first words", &edit);

    edit.key_down(&KeyEvent::ctrl(Key::Char('z')))?;
    print_rows("undo", &edit);

    let mut canvas = create_mock_canvas();
    edit.paint(&mut canvas);
    println!("== paint");
    for op in canvas.ops() {
        println!("  {op}");
    }

    Ok(())
}
