use crate::app::input::helpers::wrap_increment;
use crate::app::state::App;
use crossterm::event::KeyCode;

pub fn handle_dashboard_input(app: &mut App, key: KeyCode) {
    if matches!(key, KeyCode::Char('c') | KeyCode::Right | KeyCode::Left) {
        app.chart_tab_index = wrap_increment(app.chart_tab_index, 2);
    }
}
