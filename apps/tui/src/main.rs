mod app;
mod cli;
mod event;
mod terminal;
mod ui;

use app::App;
use clap::Parser;
use cli::CliArgs;
use color_eyre::Result;
use tracing::{info, warn};
use worklog_admin::api::Binding;
use worklog_admin::config::init_app_config;
use worklog_admin::logging::{init_file_logging, init_stderr_logging};
use worklog_admin::{DashboardController, ViewState};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = CliArgs::parse();
    args.apply_env_overrides();
    let config = init_app_config()?;

    let headless = args.headless || args.json || !is_terminal();

    // The terminal UI owns the screen, so its logs go to a file.
    let _log_guard = if headless {
        init_stderr_logging(config.debug);
        None
    } else {
        Some(init_file_logging(&config.log_file, config.debug))
    };

    let binding = Binding::from_config(&config)?;
    info!(source = %binding.describe(), headless, "starting dashboard");

    if headless {
        let mut controller = DashboardController::new(binding, ViewState::default());
        return event::run_headless(&mut controller, args.json).await;
    }

    let (exports, export_worker) = event::spawn_export_worker();
    let controller = DashboardController::new(binding, ViewState::default()).with_export_sink(exports);
    let mut app = App::new(controller);

    let mut terminal = terminal::setup_terminal()?;
    let result = event::run(&mut terminal, &mut app).await;
    terminal::cleanup_terminal_state(true, true);

    // Dropping the app closes the export channel and lets the worker finish.
    drop(app);
    if let Err(e) = export_worker.await {
        warn!(%e, "export worker stopped abnormally");
    }

    result
}

fn is_terminal() -> bool {
    atty::is(atty::Stream::Stdout)
}
