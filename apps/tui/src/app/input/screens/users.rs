use crate::app::input::helpers::move_selection;
use crate::app::state::{App, InputMode};
use crossterm::event::KeyCode;
use worklog_admin::view::TableKind;

pub fn handle_users_input(app: &mut App, key: KeyCode) {
    let total_rows = app.table(TableKind::Users).len();

    match key {
        KeyCode::Char('/') => app.begin_input(InputMode::UserSearch),
        KeyCode::Char('s') => app.cycle_user_sort(),
        KeyCode::Char('x') => app.clear_user_filter(),
        KeyCode::Char('d') | KeyCode::Delete => app.request_delete_selected_user(),
        _ => {
            app.selected_user_index = move_selection(app.selected_user_index, total_rows, key);
        }
    }
}
