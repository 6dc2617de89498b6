use std::time::Instant;

use chrono::NaiveDate;
use throbber_widgets_tui::ThrobberState;
use tracing::debug;

use worklog_admin::api::Binding;
use worklog_admin::domain::{DataOperation, ExportFormat, ExportSelection, UserSortKey};
use worklog_admin::view::{ModalKind, NoticeLevel, TableKind, TableModel};
use worklog_admin::{DashboardController, ViewState};

pub type Controller = DashboardController<Binding, ViewState>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppScreen {
    Dashboard,
    Users,
    Records,
    Maintenance,
    Export,
}

impl AppScreen {
    pub const ALL: [Self; 5] = [
        Self::Dashboard,
        Self::Users,
        Self::Records,
        Self::Maintenance,
        Self::Export,
    ];

    pub const fn title(self) -> &'static str {
        match self {
            Self::Dashboard => "Overview",
            Self::Users => "Users",
            Self::Records => "Work records",
            Self::Maintenance => "Data management",
            Self::Export => "Export",
        }
    }

    pub fn index(self) -> usize {
        Self::ALL
            .iter()
            .position(|screen| *screen == self)
            .unwrap_or_default()
    }
}

/// What the text input line is collecting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    UserSearch,
    RecordSearch,
    RecordDate,
    RecordStatus,
}

impl InputMode {
    pub const fn prompt(self) -> &'static str {
        match self {
            Self::Normal => "",
            Self::UserSearch => "Filter users by name",
            Self::RecordSearch => "Filter records by user or work",
            Self::RecordDate => "Show records for date (YYYY-MM-DD)",
            Self::RecordStatus => "Show records with status",
        }
    }
}

/// Async work queued by input and awaited by the event loop after a redraw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Reload,
    Run(DataOperation),
    Confirm,
}

impl Command {
    pub fn label(&self) -> String {
        match self {
            Self::Reload => "Loading dashboard data".to_string(),
            Self::Run(operation) => operation.title(),
            Self::Confirm => "Running confirmed operation".to_string(),
        }
    }
}

/// Operations offered on the data management screen.
pub const MAINTENANCE_MENU: [DataOperation; 4] = [
    DataOperation::CheckStatus,
    DataOperation::Backup,
    DataOperation::Migrate,
    DataOperation::Clean,
];

pub struct App {
    pub running: bool,
    pub controller: Controller,
    pub source_label: String,
    pub screen: AppScreen,
    pub input_mode: InputMode,
    pub current_input: String,
    pub status_message: String,
    pub show_help: bool,
    pub selected_user_index: usize,
    pub selected_record_index: usize,
    pub maintenance_index: usize,
    pub export_selection_index: usize,
    pub export_format_index: usize,
    pub chart_tab_index: usize,
    pub queued: Option<Command>,
    pub busy: Option<String>,
    pub throbber: ThrobberState,
    pub last_frame: Instant,
}

impl App {
    pub fn new(controller: Controller) -> Self {
        let source_label = controller.source().describe();
        Self {
            running: true,
            controller,
            source_label,
            screen: AppScreen::Dashboard,
            input_mode: InputMode::Normal,
            current_input: String::new(),
            status_message: String::new(),
            show_help: false,
            selected_user_index: 0,
            selected_record_index: 0,
            maintenance_index: 0,
            export_selection_index: 0,
            export_format_index: 0,
            chart_tab_index: 0,
            queued: Some(Command::Reload),
            busy: None,
            throbber: ThrobberState::default(),
            last_frame: Instant::now(),
        }
    }

    pub fn view(&self) -> &ViewState {
        self.controller.view()
    }

    /// Advances the throbber while something is loading.
    pub fn update(&mut self) {
        let now = Instant::now();
        if self.is_loading() && now.duration_since(self.last_frame).as_millis() >= 100 {
            self.throbber.calc_next();
            self.last_frame = now;
        }
    }

    /// Text for the status line and whether it reports an error. A notice
    /// from the controller wins over the app's own message.
    pub fn status_line(&self) -> (&str, bool) {
        self.view().notice.as_ref().map_or_else(
            || {
                (
                    self.status_message.as_str(),
                    self.status_message.starts_with("Error"),
                )
            },
            |notice| (notice.message.as_str(), notice.level == NoticeLevel::Error),
        )
    }

    pub fn is_loading(&self) -> bool {
        self.busy.is_some() || self.view().loading
    }

    pub fn table(&self, kind: TableKind) -> &TableModel {
        self.view().table(kind)
    }

    /// The modal currently shown, if any, and whether it waits for an answer.
    pub fn modal_kind(&self) -> Option<ModalKind> {
        self.view().modal.as_ref().map(|modal| modal.kind)
    }

    pub fn selected_user_name(&self) -> Option<String> {
        self.table(TableKind::Users)
            .rows
            .get(self.selected_user_index)
            .map(|row| row.key.clone())
    }

    pub fn queue(&mut self, command: Command) {
        if self.queued.is_some() || self.busy.is_some() {
            self.status_message = "Busy, please wait".to_string();
            return;
        }
        debug!(?command, "command queued");
        self.queued = Some(command);
    }

    pub fn begin_input(&mut self, mode: InputMode) {
        self.input_mode = mode;
        self.current_input.clear();
        self.status_message.clear();
    }

    pub fn cancel_input(&mut self) {
        self.input_mode = InputMode::Normal;
        self.current_input.clear();
    }

    /// Applies the text typed in the current input mode.
    pub fn submit_input(&mut self) {
        let text = std::mem::take(&mut self.current_input);
        let mode = std::mem::replace(&mut self.input_mode, InputMode::Normal);

        match mode {
            InputMode::Normal => {}
            InputMode::UserSearch => {
                let shown = self.controller.filter_users(&text);
                self.selected_user_index = 0;
                self.status_message = format!("{} users match \"{}\"", shown.len(), text.trim());
            }
            InputMode::RecordSearch => {
                let shown = self.controller.filter_records(&text);
                self.selected_record_index = 0;
                self.status_message = format!("{} record groups shown", shown.len());
            }
            InputMode::RecordDate => match NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d") {
                Ok(day) => {
                    let shown = self.controller.filter_records_by_date(day);
                    self.selected_record_index = 0;
                    self.status_message = format!("{} record groups on {day}", shown.len());
                }
                Err(_) => {
                    self.status_message = format!("Error: \"{}\" is not a date", text.trim());
                }
            },
            InputMode::RecordStatus => {
                let shown = self.controller.filter_records_by_status(&text);
                self.selected_record_index = 0;
                self.status_message = format!("{} record groups shown", shown.len());
            }
        }
    }

    /// Steps through the sort keys, then back to stored order.
    pub fn cycle_user_sort(&mut self) {
        let next = match self.controller.user_sort() {
            None => Some(UserSortKey::ALL[0]),
            Some(current) => UserSortKey::ALL
                .iter()
                .position(|key| *key == current)
                .and_then(|index| UserSortKey::ALL.get(index + 1))
                .copied(),
        };

        let key = next.map_or("", UserSortKey::as_str);
        self.controller.sort_users(key);
        self.selected_user_index = 0;
        self.status_message = next.map_or_else(
            || "Users in stored order".to_string(),
            |key| format!("Users sorted by {}", key.label().to_lowercase()),
        );
    }

    pub fn clear_user_filter(&mut self) {
        self.controller.clear_user_filter();
        self.selected_user_index = 0;
        self.status_message = "User filter cleared".to_string();
    }

    pub fn clear_record_filter(&mut self) {
        self.controller.clear_record_filter();
        self.selected_record_index = 0;
        self.status_message = "Record filter cleared".to_string();
    }

    pub fn request_delete_selected_user(&mut self) {
        if let Some(name) = self.selected_user_name() {
            self.queue(Command::Run(DataOperation::DeleteUser(name)));
        }
    }

    pub fn request_maintenance(&mut self) {
        if let Some(operation) = MAINTENANCE_MENU.get(self.maintenance_index) {
            self.queue(Command::Run(operation.clone()));
        }
    }

    pub fn export_choice(&self) -> (ExportSelection, ExportFormat) {
        (
            ExportSelection::ALL[self.export_selection_index % ExportSelection::ALL.len()],
            ExportFormat::ALL[self.export_format_index % ExportFormat::ALL.len()],
        )
    }

    /// The controller reports the outcome as a notice.
    pub fn request_export(&mut self) {
        let (selection, format) = self.export_choice();
        self.status_message.clear();
        self.controller.export_data(selection, format);
    }

    pub fn cancel_pending(&mut self) {
        self.controller.dismiss_modal();
        self.status_message = "Cancelled".to_string();
    }

    pub fn switch_screen(&mut self, screen: AppScreen) {
        self.screen = screen;
        self.cancel_input();
    }

    /// Keeps selections inside the tables after a reload or filter.
    pub fn clamp_selections(&mut self) {
        let users = self.table(TableKind::Users).len();
        let records = self.table(TableKind::Records).len();
        self.selected_user_index = self.selected_user_index.min(users.saturating_sub(1));
        self.selected_record_index = self.selected_record_index.min(records.saturating_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use worklog_admin::api::SampleSource;

    fn app() -> App {
        let source = Binding::Sample(SampleSource::new(Duration::ZERO));
        App::new(DashboardController::new(source, ViewState::default()))
    }

    #[tokio::test]
    async fn sort_cycles_back_to_stored_order() -> Result<(), Box<dyn std::error::Error>> {
        let mut app = app();
        app.controller.load_all().await;

        app.cycle_user_sort();
        assert_eq!(app.controller.user_sort(), Some(UserSortKey::SuccessRate));
        app.cycle_user_sort();
        app.cycle_user_sort();
        assert_eq!(app.controller.user_sort(), Some(UserSortKey::UserName));
        app.cycle_user_sort();
        assert_eq!(app.controller.user_sort(), None);
        assert_eq!(app.selected_user_name().as_deref(), Some("张三"));
        Ok(())
    }

    #[tokio::test]
    async fn bad_date_input_leaves_records_alone() -> Result<(), Box<dyn std::error::Error>> {
        let mut app = app();
        app.controller.load_all().await;

        app.begin_input(InputMode::RecordDate);
        app.current_input = "07/11".to_string();
        app.submit_input();

        assert!(app.status_message.starts_with("Error"));
        assert_eq!(app.table(TableKind::Records).len(), 3);
        assert_eq!(app.input_mode, InputMode::Normal);
        Ok(())
    }

    #[test]
    fn export_outcome_shows_until_the_next_key() {
        let mut app = app();
        app.status_message = "User filter cleared".to_string();

        app.request_export();
        assert_eq!(
            app.status_line(),
            (worklog_admin::controller::EXPORT_UNAVAILABLE_MESSAGE, true)
        );

        crate::app::handle_input(&mut app, crossterm::event::KeyCode::Down);
        assert_eq!(app.status_line(), ("", false));
    }

    #[tokio::test]
    async fn export_with_a_worker_reports_the_request() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let source = Binding::Sample(SampleSource::new(Duration::ZERO));
        let mut app = App::new(DashboardController::new(source, ViewState::default()).with_export_sink(tx));
        app.controller.load_all().await;

        app.export_format_index = 1;
        app.request_export();
        assert_eq!(app.status_line(), ("Export of Users as JSON requested", false));
        assert!(rx.try_recv().is_ok());
    }

    #[test]
    fn only_one_command_is_queued() {
        let mut app = app();
        assert_eq!(app.queued, Some(Command::Reload));
        app.queue(Command::Run(DataOperation::Backup));
        assert_eq!(app.queued, Some(Command::Reload));
        assert_eq!(app.status_message, "Busy, please wait");
    }
}
