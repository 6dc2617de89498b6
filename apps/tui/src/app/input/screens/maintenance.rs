use crate::app::input::helpers::{wrap_decrement, wrap_increment};
use crate::app::state::{App, MAINTENANCE_MENU};
use crossterm::event::KeyCode;

pub fn handle_maintenance_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Up => {
            app.maintenance_index = wrap_decrement(app.maintenance_index, MAINTENANCE_MENU.len());
        }
        KeyCode::Down => {
            app.maintenance_index = wrap_increment(app.maintenance_index, MAINTENANCE_MENU.len());
        }
        KeyCode::Enter => app.request_maintenance(),
        _ => {}
    }
}
