mod helpers;
pub mod screens;

use crate::app::state::App;
use crossterm::event::KeyCode;

/// A controller notice stays on the status line until the next key.
pub fn handle_input(app: &mut App, key: KeyCode) {
    app.controller.view_mut().dismiss_notice();
    screens::dispatch_input(app, key);
}
