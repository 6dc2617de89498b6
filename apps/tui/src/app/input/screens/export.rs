use crate::app::input::helpers::{wrap_decrement, wrap_increment};
use crate::app::state::App;
use crossterm::event::KeyCode;
use worklog_admin::domain::{ExportFormat, ExportSelection};

pub fn handle_export_input(app: &mut App, key: KeyCode) {
    let selections = ExportSelection::ALL.len();
    let formats = ExportFormat::ALL.len();

    match key {
        KeyCode::Up => {
            app.export_selection_index = wrap_decrement(app.export_selection_index, selections);
        }
        KeyCode::Down => {
            app.export_selection_index = wrap_increment(app.export_selection_index, selections);
        }
        KeyCode::Left => {
            app.export_format_index = wrap_decrement(app.export_format_index, formats);
        }
        KeyCode::Right => {
            app.export_format_index = wrap_increment(app.export_format_index, formats);
        }
        KeyCode::Enter => app.request_export(),
        _ => {}
    }
}
