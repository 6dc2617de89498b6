use crate::app::state::{App, Command};
use crossterm::event::KeyCode;
use worklog_admin::view::ModalKind;

/// Keys while a modal is open. Returns false when no modal is shown.
pub fn handle_modal_input(app: &mut App, key: KeyCode) -> bool {
    let Some(kind) = app.modal_kind() else {
        return false;
    };

    match (kind, key) {
        (ModalKind::Confirm, KeyCode::Char('y' | 'Y') | KeyCode::Enter) => {
            app.queue(Command::Confirm);
        }
        (ModalKind::Confirm, KeyCode::Char('n' | 'N') | KeyCode::Esc) => {
            app.cancel_pending();
        }
        (ModalKind::Info | ModalKind::Error, KeyCode::Enter | KeyCode::Esc) => {
            app.controller.dismiss_modal();
        }
        _ => {}
    }

    true
}
