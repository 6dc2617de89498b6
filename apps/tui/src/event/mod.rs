mod loop_handler;

pub use loop_handler::run;

use color_eyre::Result;
use tokio::sync::mpsc::{unbounded_channel, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::info;

use worklog_admin::api::DataSource;
use worklog_admin::controller::ExportRequest;
use worklog_admin::view::{format_rate, DashboardView};
use worklog_admin::{DashboardController, DashboardSnapshot};

/// Load once and print, for scripts and the web dashboard's snapshot file.
pub async fn run_headless<S: DataSource, V: DashboardView>(
    controller: &mut DashboardController<S, V>,
    json: bool,
) -> Result<()> {
    let report = controller.load_all().await;
    if report.all_failed {
        eprintln!("Warning: the API could not be reached, printing sample data");
    }

    let snapshot = controller.snapshot();
    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        print_stats(&snapshot);
    }

    Ok(())
}

fn print_stats(snapshot: &DashboardSnapshot) {
    let stats = &snapshot.stats;

    println!("\nWork Record Statistics ({})", snapshot.origins.stats.as_str());
    println!("==============================");
    println!("Total users: {}", stats.total_users);
    println!("Active users (est.): {}", stats.active_users());
    println!("Total records: {}", stats.total_records);
    println!("Successful: {}", stats.total_success);
    println!("Success rate: {}", format_rate(stats.success_rate));

    println!("\nUsers ({}):", snapshot.origins.users.as_str());
    for user in &snapshot.users {
        println!(
            "- {} | {} records | {}",
            user.name,
            user.total_records,
            format_rate(user.success_rate)
        );
    }

    println!("\nRecent work ({}):", snapshot.origins.records.as_str());
    for group in &snapshot.records {
        println!(
            "- {} | {} | {} entries | {}",
            group.date,
            group.owner,
            group.entries.len(),
            group
                .success_rate()
                .map_or_else(|| "-".to_string(), format_rate)
        );
    }
}

/// Receives export requests off the UI task.
///
/// File generation lives outside this program; the worker acknowledges each
/// request in the log.
pub fn spawn_export_worker() -> (UnboundedSender<ExportRequest>, JoinHandle<()>) {
    let (tx, mut rx) = unbounded_channel::<ExportRequest>();

    let handle = tokio::spawn(async move {
        while let Some(request) = rx.recv().await {
            info!(
                selection = request.selection.label(),
                format = request.format.label(),
                users = request.snapshot.users.len(),
                records = request.snapshot.records.len(),
                "export request received"
            );
        }
    });

    (tx, handle)
}
