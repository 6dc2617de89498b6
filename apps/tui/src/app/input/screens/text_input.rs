use crate::app::state::{App, InputMode};
use crossterm::event::KeyCode;

/// Keys while a filter prompt is open. Returns false in normal mode.
pub fn handle_text_input(app: &mut App, key: KeyCode) -> bool {
    if app.input_mode == InputMode::Normal {
        return false;
    }

    match key {
        KeyCode::Esc => app.cancel_input(),
        KeyCode::Enter => app.submit_input(),
        KeyCode::Backspace => {
            app.current_input.pop();
        }
        KeyCode::Char(ch) => app.current_input.push(ch),
        _ => {}
    }

    true
}
