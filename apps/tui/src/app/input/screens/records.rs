use crate::app::input::helpers::move_selection;
use crate::app::state::{App, InputMode};
use crossterm::event::KeyCode;
use worklog_admin::view::TableKind;

pub fn handle_records_input(app: &mut App, key: KeyCode) {
    let total_rows = app.table(TableKind::Records).len();

    match key {
        KeyCode::Char('/') => app.begin_input(InputMode::RecordSearch),
        KeyCode::Char('t') => app.begin_input(InputMode::RecordDate),
        KeyCode::Char('f') => app.begin_input(InputMode::RecordStatus),
        KeyCode::Char('x') => app.clear_record_filter(),
        _ => {
            app.selected_record_index = move_selection(app.selected_record_index, total_rows, key);
        }
    }
}
