use crate::app::input::helpers::{wrap_decrement, wrap_increment};
use crate::app::state::{App, AppScreen, Command};
use crossterm::event::KeyCode;

mod dashboard;
mod export;
mod help;
mod maintenance;
mod modal;
mod records;
mod text_input;
mod users;

pub fn dispatch_input(app: &mut App, key: KeyCode) {
    if help::handle_help_toggle(app, key) {
        return;
    }

    if modal::handle_modal_input(app, key) {
        return;
    }

    if text_input::handle_text_input(app, key) {
        return;
    }

    if handle_global_input(app, key) {
        return;
    }

    match app.screen {
        AppScreen::Dashboard => dashboard::handle_dashboard_input(app, key),
        AppScreen::Users => users::handle_users_input(app, key),
        AppScreen::Records => records::handle_records_input(app, key),
        AppScreen::Maintenance => maintenance::handle_maintenance_input(app, key),
        AppScreen::Export => export::handle_export_input(app, key),
    }
}

fn handle_global_input(app: &mut App, key: KeyCode) -> bool {
    let screens = AppScreen::ALL.len();

    match key {
        KeyCode::Char('q') => app.running = false,
        KeyCode::Char('r') => app.queue(Command::Reload),
        KeyCode::Tab => {
            let next = wrap_increment(app.screen.index(), screens);
            app.switch_screen(AppScreen::ALL[next]);
        }
        KeyCode::BackTab => {
            let previous = wrap_decrement(app.screen.index(), screens);
            app.switch_screen(AppScreen::ALL[previous]);
        }
        KeyCode::Char(digit @ '1'..='5') => {
            let index = digit as usize - '1' as usize;
            app.switch_screen(AppScreen::ALL[index]);
        }
        KeyCode::Esc if app.screen != AppScreen::Dashboard => {
            app.switch_screen(AppScreen::Dashboard);
        }
        _ => return false,
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use worklog_admin::api::{Binding, SampleSource};
    use worklog_admin::domain::DataOperation;
    use worklog_admin::view::ModalKind;
    use worklog_admin::{DashboardController, ViewState};

    async fn loaded_app() -> App {
        let source = Binding::Sample(SampleSource::new(Duration::ZERO));
        let mut app = App::new(DashboardController::new(source, ViewState::default()));
        app.queued = None;
        app.controller.load_all().await;
        app
    }

    fn type_text(app: &mut App, text: &str) {
        for ch in text.chars() {
            dispatch_input(app, KeyCode::Char(ch));
        }
    }

    #[tokio::test]
    async fn search_keys_are_typed_not_dispatched() -> Result<(), Box<dyn std::error::Error>> {
        let mut app = loaded_app().await;
        dispatch_input(&mut app, KeyCode::Char('2'));
        assert_eq!(app.screen, AppScreen::Users);

        dispatch_input(&mut app, KeyCode::Char('/'));
        type_text(&mut app, "q王");
        assert!(app.running);
        assert_eq!(app.current_input, "q王");

        dispatch_input(&mut app, KeyCode::Backspace);
        dispatch_input(&mut app, KeyCode::Backspace);
        type_text(&mut app, "王");
        dispatch_input(&mut app, KeyCode::Enter);
        assert_eq!(app.selected_user_name().as_deref(), Some("王五"));
        Ok(())
    }

    #[tokio::test]
    async fn delete_waits_for_confirmation() -> Result<(), Box<dyn std::error::Error>> {
        let mut app = loaded_app().await;
        app.switch_screen(AppScreen::Users);
        dispatch_input(&mut app, KeyCode::Down);
        dispatch_input(&mut app, KeyCode::Char('d'));
        assert_eq!(
            app.queued,
            Some(Command::Run(DataOperation::DeleteUser("李四".to_string())))
        );

        let command = app.queued.take();
        if let Some(Command::Run(operation)) = command {
            app.controller.request(operation).await;
        }
        assert_eq!(app.modal_kind(), Some(ModalKind::Confirm));

        dispatch_input(&mut app, KeyCode::Char('q'));
        assert!(app.running);

        dispatch_input(&mut app, KeyCode::Esc);
        assert_eq!(app.modal_kind(), None);
        assert!(app.controller.pending().is_none());
        Ok(())
    }

    #[test]
    fn tab_cycles_screens() {
        let source = Binding::Sample(SampleSource::new(Duration::ZERO));
        let mut app = App::new(DashboardController::new(source, ViewState::default()));
        dispatch_input(&mut app, KeyCode::BackTab);
        assert_eq!(app.screen, AppScreen::Export);
        dispatch_input(&mut app, KeyCode::Tab);
        assert_eq!(app.screen, AppScreen::Dashboard);
    }
}
