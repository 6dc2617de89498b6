use color_eyre::Result;
use crossterm::event::{Event, EventStream, KeyEventKind};
use futures::StreamExt;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::convert::TryFrom;
use std::fmt;
use std::future::Future;
use std::io::Stdout;
use std::pin::Pin;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use worklog_admin::api::{ApiError, Binding, DataSource};
use worklog_admin::controller::{fetch_all, FetchedData};
use worklog_admin::domain::{DataOperation, MaintenanceReport};

use crate::app::{handle_input, App, Command};
use crate::ui;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum CommandState {
    Idle,
    Running,
    Success,
    Error,
}

impl fmt::Display for CommandState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Running => write!(f, "Running"),
            Self::Success => write!(f, "Success"),
            Self::Error => write!(f, "Error"),
        }
    }
}

#[derive(Clone, Debug)]
enum CommandEvent {
    Start(String),
    Success(String),
    Error(String),
    Reset,
}

impl fmt::Display for CommandEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start(label) => write!(f, "Start({label})"),
            Self::Success(message) => write!(f, "Success({message})"),
            Self::Error(message) => write!(f, "Error({message})"),
            Self::Reset => write!(f, "Reset"),
        }
    }
}

#[derive(Debug)]
struct StateTransitionError {
    from: CommandState,
    event: CommandEvent,
}

impl fmt::Display for StateTransitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid transition from {} with event {}",
            self.from, self.event
        )
    }
}

impl std::error::Error for StateTransitionError {}

/// Tracks the one queued command that may be in flight.
struct CommandMachine {
    state: CommandState,
}

impl CommandMachine {
    const fn new() -> Self {
        Self {
            state: CommandState::Idle,
        }
    }

    const fn state(&self) -> CommandState {
        self.state
    }

    fn process_event(
        &mut self,
        event: &CommandEvent,
        app: &mut App,
    ) -> std::result::Result<(), StateTransitionError> {
        let next_state = NextState::try_from((self.state, event, app))?;
        self.state = next_state.0;
        Ok(())
    }
}

struct NextState(CommandState);

impl TryFrom<(CommandState, &CommandEvent, &mut App)> for NextState {
    type Error = StateTransitionError;

    fn try_from(
        value: (CommandState, &CommandEvent, &mut App),
    ) -> std::result::Result<Self, Self::Error> {
        let (current_state, event, app) = value;

        match (current_state, event) {
            (CommandState::Idle, CommandEvent::Start(label)) => {
                app.busy = Some(label.clone());
                app.status_message = format!("{label}...");
                Ok(Self(CommandState::Running))
            }
            (CommandState::Running, CommandEvent::Success(message)) => {
                app.busy = None;
                app.status_message.clone_from(message);
                app.clamp_selections();
                Ok(Self(CommandState::Success))
            }
            (CommandState::Running, CommandEvent::Error(message)) => {
                app.busy = None;
                app.status_message = format!("Error: {message}");
                app.clamp_selections();
                Ok(Self(CommandState::Error))
            }
            (CommandState::Success | CommandState::Error, CommandEvent::Reset) => {
                Ok(Self(CommandState::Idle))
            }
            _ => Err(StateTransitionError {
                from: current_state,
                event: event.clone(),
            }),
        }
    }
}

/// What a background job hands back to the loop.
enum JobOutput {
    Loaded(FetchedData),
    Maintained {
        operation: DataOperation,
        result: std::result::Result<MaintenanceReport, ApiError>,
        /// Fresh data fetched after a successful job that changes stored data.
        reload: Option<FetchedData>,
    },
}

/// Remote work for one command. Owns a clone of the data source, so the app
/// stays free for drawing and input while it runs.
type Job = Pin<Box<dyn Future<Output = JobOutput>>>;

enum Started {
    Job(Job),
    Done(CommandEvent),
}

fn load_job(source: Binding) -> Job {
    Box::pin(async move { JobOutput::Loaded(fetch_all(&source).await) })
}

fn maintenance_job(source: Binding, operation: DataOperation) -> Job {
    Box::pin(async move {
        let result = source.run_maintenance(&operation).await;
        let reload = if result.is_ok() && operation.reloads() {
            Some(fetch_all(&source).await)
        } else {
            None
        };
        JobOutput::Maintained {
            operation,
            result,
            reload,
        }
    })
}

/// Applies the synchronous half of `command` and returns the remote half,
/// if there is one.
fn start(app: &mut App, command: Command) -> Started {
    let source = app.controller.source().clone();

    match command {
        Command::Reload => {
            app.controller.begin_load();
            Started::Job(load_job(source))
        }
        Command::Run(operation) => match app.controller.begin_request(operation) {
            Some(operation) => {
                app.controller.start_operation(&operation);
                Started::Job(maintenance_job(source, operation))
            }
            None => Started::Done(CommandEvent::Success(
                "Confirm with y, cancel with n".to_string(),
            )),
        },
        Command::Confirm => match app.controller.take_confirmed() {
            Some(operation) => {
                app.controller.start_operation(&operation);
                Started::Job(maintenance_job(source, operation))
            }
            None => Started::Done(CommandEvent::Error(
                "nothing is waiting for confirmation".to_string(),
            )),
        },
    }
}

/// Hands a finished job's results to the controller.
fn finish(app: &mut App, output: JobOutput) -> CommandEvent {
    match output {
        JobOutput::Loaded(fetched) => {
            let report = app.controller.finish_load(fetched);
            if report.all_failed {
                return CommandEvent::Error(
                    "could not reach the API, showing sample data".to_string(),
                );
            }
            CommandEvent::Success(format!(
                "Loaded: statistics {}, users {}, records {}",
                report.origins.stats.as_str(),
                report.origins.users.as_str(),
                report.origins.records.as_str()
            ))
        }
        JobOutput::Maintained {
            operation,
            result,
            reload,
        } => {
            let reload_due = app.controller.finish_operation(&operation, &result);
            if let (true, Some(fetched)) = (reload_due, reload) {
                app.controller.begin_load();
                app.controller.finish_load(fetched);
            }
            match result {
                Ok(report) => CommandEvent::Success(report.summary()),
                Err(error) => CommandEvent::Error(error.to_string()),
            }
        }
    }
}

async fn next_output(job: &mut Option<Job>) -> JobOutput {
    match job.as_mut() {
        Some(future) => future.await,
        None => std::future::pending().await,
    }
}

fn draw(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &App) -> Result<()> {
    terminal
        .draw(|f| ui::ui(app, f))
        .map(|_| ())
        .map_err(|e| color_eyre::eyre::eyre!("Terminal draw error: {e}"))
}

enum Wake {
    Frame,
    Terminal(Option<std::io::Result<Event>>),
    Finished(JobOutput),
}

/// Run the main application event loop
///
/// Input, redraws and the one running job are awaited together; a slow API
/// call never stalls the throbber or the quit key.
pub async fn run(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    const FRAME_INTERVAL: Duration = Duration::from_millis(50);

    let mut machine = CommandMachine::new();
    let mut events = EventStream::new();
    let mut frames = tokio::time::interval(FRAME_INTERVAL);
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut job: Option<Job> = None;

    while app.running {
        if job.is_none() && machine.state() == CommandState::Idle {
            if let Some(command) = app.queued.take() {
                job = begin(&mut machine, app, command);
            }
        }

        app.update();
        draw(terminal, app)?;

        let wake = tokio::select! {
            _ = frames.tick() => Wake::Frame,
            event = events.next() => Wake::Terminal(event),
            output = next_output(&mut job), if job.is_some() => Wake::Finished(output),
        };

        match wake {
            Wake::Frame => {}
            Wake::Terminal(Some(Ok(Event::Key(key)))) if key.kind == KeyEventKind::Press => {
                handle_input(app, key.code);
            }
            Wake::Terminal(Some(Ok(_))) => {}
            Wake::Terminal(Some(Err(e))) => warn!(%e, "failed to read terminal event"),
            Wake::Terminal(None) => {
                warn!("terminal event stream closed");
                break;
            }
            Wake::Finished(output) => {
                job = None;
                let event = finish(app, output);
                complete(&mut machine, app, &event);
            }
        }
    }

    Ok(())
}

/// Moves the machine to Running and starts `command`. Commands with no
/// remote half complete on the spot.
fn begin(machine: &mut CommandMachine, app: &mut App, command: Command) -> Option<Job> {
    if let Err(e) = machine.process_event(&CommandEvent::Start(command.label()), app) {
        warn!(%e, "command not started");
        return None;
    }

    match start(app, command) {
        Started::Job(job) => Some(job),
        Started::Done(event) => {
            complete(machine, app, &event);
            None
        }
    }
}

fn complete(machine: &mut CommandMachine, app: &mut App, event: &CommandEvent) {
    if let Err(e) = machine.process_event(event, app) {
        warn!(%e, "command result dropped");
    }
    if let Err(e) = machine.process_event(&CommandEvent::Reset, app) {
        warn!(%e, "command machine reset failed");
    }
    debug!(state = %machine.state(), "command finished");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::AppScreen;
    use crossterm::event::KeyCode;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};
    use worklog_admin::api::{ApiClient, SampleSource};
    use worklog_admin::controller::LOAD_FAILED_MESSAGE;
    use worklog_admin::view::ModalKind;
    use worklog_admin::{DashboardController, ViewState};

    fn app_with(source: Binding) -> App {
        let mut app = App::new(DashboardController::new(source, ViewState::default()));
        app.queued = None;
        app
    }

    fn sample_app(delay: Duration) -> App {
        app_with(Binding::Sample(SampleSource::new(delay)))
    }

    async fn run_to_end(machine: &mut CommandMachine, app: &mut App, command: Command) -> CommandEvent {
        let mut job = begin(machine, app, command);
        assert!(job.is_some(), "command finished without remote work");
        let event = finish(app, next_output(&mut job).await);
        complete(machine, app, &event);
        event
    }

    #[tokio::test]
    async fn clean_runs_through_confirmation() -> Result<()> {
        let mut app = sample_app(Duration::ZERO);
        app.controller.load_all().await;
        let mut machine = CommandMachine::new();

        let job = begin(&mut machine, &mut app, Command::Run(DataOperation::Clean));
        assert!(job.is_none());
        assert_eq!(machine.state(), CommandState::Idle);
        assert_eq!(app.status_message, "Confirm with y, cancel with n");
        assert!(app.controller.pending().is_some());

        let event = run_to_end(&mut machine, &mut app, Command::Confirm).await;
        assert!(matches!(event, CommandEvent::Success(ref message) if message.contains("Cleanup")));
        assert_eq!(machine.state(), CommandState::Idle);
        assert!(app.busy.is_none());
        assert!(!app.is_loading());
        assert_eq!(app.modal_kind(), Some(ModalKind::Info));
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn keys_are_handled_while_a_job_runs() {
        let mut app = sample_app(Duration::from_secs(5));
        let mut machine = CommandMachine::new();

        let mut job = begin(&mut machine, &mut app, Command::Run(DataOperation::Backup));
        assert!(job.is_some());
        assert!(app.is_loading());

        handle_input(&mut app, KeyCode::Char('2'));
        assert_eq!(app.screen, AppScreen::Users);
        handle_input(&mut app, KeyCode::Char('r'));
        assert_eq!(app.status_message, "Busy, please wait");

        let early = tokio::time::timeout(Duration::from_millis(100), next_output(&mut job)).await;
        assert!(early.is_err());

        let event = finish(&mut app, next_output(&mut job).await);
        complete(&mut machine, &mut app, &event);
        assert!(matches!(event, CommandEvent::Success(ref message) if message.starts_with("Backup finished")));
        assert!(!app.is_loading());

        handle_input(&mut app, KeyCode::Char('q'));
        assert!(app.running, "q closes the report modal first");
        handle_input(&mut app, KeyCode::Esc);
        handle_input(&mut app, KeyCode::Char('q'));
        assert!(!app.running);
    }

    #[tokio::test]
    async fn confirmed_delete_reloads_without_the_user() {
        let mut app = sample_app(Duration::ZERO);
        let mut machine = CommandMachine::new();
        run_to_end(&mut machine, &mut app, Command::Reload).await;

        let job = begin(
            &mut machine,
            &mut app,
            Command::Run(DataOperation::DeleteUser("李四".to_string())),
        );
        assert!(job.is_none());
        run_to_end(&mut machine, &mut app, Command::Confirm).await;

        assert!(app.controller.users().iter().all(|user| user.name != "李四"));
        assert_eq!(app.controller.users().len(), 4);
        assert!(!app.is_loading());
    }

    #[tokio::test]
    async fn failed_reload_puts_the_notice_on_the_status_line() -> Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        let client = ApiClient::new(&format!("{}/adminWeb", server.uri()), Duration::from_secs(2), 10)?;
        let mut app = app_with(Binding::Live(client));
        let mut machine = CommandMachine::new();

        let event = run_to_end(&mut machine, &mut app, Command::Reload).await;
        assert!(matches!(event, CommandEvent::Error(_)));
        assert_eq!(app.status_line(), (LOAD_FAILED_MESSAGE, true));

        handle_input(&mut app, KeyCode::Down);
        assert_eq!(app.view().notice, None);
        assert!(app.status_line().0.starts_with("Error: could not reach the API"));
        Ok(())
    }

    #[test]
    fn success_without_start_is_rejected() {
        let mut app = sample_app(Duration::ZERO);
        let mut machine = CommandMachine::new();
        let result = machine.process_event(&CommandEvent::Success("done".to_string()), &mut app);
        assert!(result.is_err());
        assert_eq!(machine.state(), CommandState::Idle);
    }
}
