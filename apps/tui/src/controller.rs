//! The dashboard controller.
//!
//! Owns the last-loaded lists and drives a [`DashboardView`]. Each entity is
//! fetched independently and falls back to the sample dataset on its own, so
//! a broken records endpoint never hides live statistics.

use chrono::NaiveDate;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{error, info, warn};
pub use worklog_core::{DashboardSnapshot, Origins};

use crate::activity::{ActivityKind, ActivityLog};
use crate::api::{sample_records, sample_stats, sample_users, ApiError, DataSource};
use crate::domain::{
    DataOperation, EntityKind, ExportFormat, ExportSelection, MaintenanceReport, Origin,
    Statistics, UserSortKey, UserSummary, WorkRecordGroup,
};
use crate::filter;
use crate::view::{
    activity_feed, chart_model, record_table, stat_cards, user_detail, user_table, DashboardView,
    Modal, Notice, UserDetail,
};

pub const LOAD_FAILED_MESSAGE: &str = "Failed to load data, please retry";
pub const EXPORT_UNAVAILABLE_MESSAGE: &str = "Export is not available right now";

fn load_summary(origins: Origins, live: bool) -> String {
    let sample: Vec<&str> = EntityKind::ALL
        .iter()
        .filter(|kind| origins.get(**kind) == Origin::Fallback)
        .map(|kind| kind.label())
        .collect();

    if sample.is_empty() {
        "Loaded live data".to_string()
    } else if !live {
        "Loaded the sample dataset".to_string()
    } else {
        format!("Loaded; sample data shown for {}", sample.join(", "))
    }
}

/// Data of one entity together with where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Loaded<T> {
    pub data: T,
    pub origin: Origin,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EntityData {
    Stats(Loaded<Statistics>),
    Users(Loaded<Vec<UserSummary>>),
    Records(Loaded<Vec<WorkRecordGroup>>),
}

/// Outcome of one `load_all` cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadReport {
    pub origins: Origins,
    /// Every primary fetch failed and only sample data is shown.
    pub all_failed: bool,
}

/// Raw results of the three primary fetches, before any fallback.
#[derive(Debug)]
pub struct FetchedData {
    pub stats: Result<Statistics, ApiError>,
    pub users: Result<Vec<UserSummary>, ApiError>,
    pub records: Result<Vec<WorkRecordGroup>, ApiError>,
}

impl FetchedData {
    pub const fn all_failed(&self) -> bool {
        self.stats.is_err() && self.users.is_err() && self.records.is_err()
    }
}

/// Issues the three primary fetches concurrently and waits for all of them.
///
/// Borrows only the source, so a front end can run it on a clone while the
/// controller stays available for drawing.
pub async fn fetch_all<S: DataSource>(source: &S) -> FetchedData {
    let (stats, users, records) = tokio::join!(
        source.fetch_stats(),
        source.fetch_users(),
        source.fetch_records(),
    );
    FetchedData {
        stats,
        users,
        records,
    }
}

/// Handed to whatever produces export files.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRequest {
    pub selection: ExportSelection,
    pub format: ExportFormat,
    pub snapshot: DashboardSnapshot,
}

/// The filter currently applied to the record table. Only one at a time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RecordFilter {
    #[default]
    None,
    Text(String),
    Date(NaiveDate),
    Status(String),
}

impl RecordFilter {
    pub fn describe(&self) -> Option<String> {
        match self {
            Self::None => None,
            Self::Text(term) => Some(format!("matching \"{term}\"")),
            Self::Date(day) => Some(format!("on {day}")),
            Self::Status(status) => Some(format!("with status \"{status}\"")),
        }
    }
}

pub struct DashboardController<S, V> {
    source: S,
    view: V,
    stats: Statistics,
    users: Vec<UserSummary>,
    records: Vec<WorkRecordGroup>,
    origins: Origins,
    user_filter: String,
    user_sort: Option<UserSortKey>,
    record_filter: RecordFilter,
    pending: Option<DataOperation>,
    exports: Option<UnboundedSender<ExportRequest>>,
    activity: ActivityLog,
}

impl<S: DataSource, V: DashboardView> DashboardController<S, V> {
    pub fn new(source: S, view: V) -> Self {
        Self {
            source,
            view,
            stats: Statistics::default(),
            users: Vec::new(),
            records: Vec::new(),
            origins: Origins::default(),
            user_filter: String::new(),
            user_sort: None,
            record_filter: RecordFilter::None,
            pending: None,
            exports: None,
            activity: ActivityLog::default(),
        }
    }

    /// Routes `export_data` requests to `sink`.
    #[must_use]
    pub fn with_export_sink(mut self, sink: UnboundedSender<ExportRequest>) -> Self {
        self.exports = Some(sink);
        self
    }

    pub const fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub const fn source(&self) -> &S {
        &self.source
    }

    pub const fn stats(&self) -> &Statistics {
        &self.stats
    }

    pub fn users(&self) -> &[UserSummary] {
        &self.users
    }

    pub fn records(&self) -> &[WorkRecordGroup] {
        &self.records
    }

    pub const fn origins(&self) -> Origins {
        self.origins
    }

    pub fn user_filter(&self) -> &str {
        &self.user_filter
    }

    pub const fn user_sort(&self) -> Option<UserSortKey> {
        self.user_sort
    }

    pub const fn record_filter(&self) -> &RecordFilter {
        &self.record_filter
    }

    pub const fn pending(&self) -> Option<&DataOperation> {
        self.pending.as_ref()
    }

    pub const fn activity(&self) -> &ActivityLog {
        &self.activity
    }

    /// Detail for a stored user, `None` for names not in the list.
    pub fn user_detail(&self, name: &str) -> Option<UserDetail> {
        self.users
            .iter()
            .find(|user| user.name == name)
            .map(|user| user_detail(user, &self.records))
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        DashboardSnapshot {
            stats: self.stats.clone(),
            users: self.users.clone(),
            records: self.records.clone(),
            origins: self.origins,
        }
    }

    fn live_origin(&self) -> Origin {
        if self.source.is_live() {
            Origin::Live
        } else {
            Origin::Fallback
        }
    }

    fn settle<T>(&self, kind: EntityKind, result: Result<T, ApiError>, fallback: fn() -> T) -> Loaded<T> {
        match result {
            Ok(data) => Loaded {
                data,
                origin: self.live_origin(),
            },
            Err(error) => {
                warn!(entity = kind.label(), %error, "fetch failed, using sample data");
                Loaded {
                    data: fallback(),
                    origin: Origin::Fallback,
                }
            }
        }
    }

    /// One remote call for `kind`, replaced by sample data on any failure.
    pub async fn fetch_entity(&self, kind: EntityKind) -> EntityData {
        match kind {
            EntityKind::Stats => {
                let result = self.source.fetch_stats().await;
                EntityData::Stats(self.settle(kind, result, sample_stats))
            }
            EntityKind::Users => {
                let result = self.source.fetch_users().await;
                EntityData::Users(self.settle(kind, result, sample_users))
            }
            EntityKind::Records => {
                let result = self.source.fetch_records().await;
                EntityData::Records(self.settle(kind, result, sample_records))
            }
        }
    }

    fn log_activity(&mut self, kind: ActivityKind, message: impl Into<String>, failed: bool) {
        self.activity.record(kind, message, failed);
        self.view.render_activity(activity_feed(&self.activity));
    }

    /// Fetches all three entities concurrently and re-renders everything.
    ///
    /// The loading indicator is shown once on entry and hidden once on exit.
    /// A response that arrives after a newer load started is still rendered.
    pub async fn load_all(&mut self) -> LoadReport {
        self.begin_load();
        let fetched = fetch_all(&self.source).await;
        self.finish_load(fetched)
    }

    /// First half of [`load_all`](Self::load_all).
    pub fn begin_load(&mut self) {
        self.view.show_loading();
    }

    /// Second half of [`load_all`](Self::load_all): applies fallbacks,
    /// installs and renders the lists, then hides the loading indicator.
    pub fn finish_load(&mut self, fetched: FetchedData) -> LoadReport {
        let all_failed = fetched.all_failed();

        let stats = self.settle(EntityKind::Stats, fetched.stats, sample_stats);
        let users = self.settle(EntityKind::Users, fetched.users, sample_users);
        let records = self.settle(EntityKind::Records, fetched.records, sample_records);

        self.origins = Origins {
            stats: stats.origin,
            users: users.origin,
            records: records.origin,
        };
        self.stats = stats.data;
        self.users = users.data;
        self.records = records.data;

        info!(
            users = self.users.len(),
            records = self.records.len(),
            stats = self.origins.stats.as_str(),
            "dashboard data loaded"
        );

        self.render_all();

        if all_failed {
            error!("every dashboard fetch failed");
            self.view.notify(Notice::error(LOAD_FAILED_MESSAGE));
            self.log_activity(ActivityKind::Load, LOAD_FAILED_MESSAGE, true);
        } else {
            let message = load_summary(self.origins, self.source.is_live());
            self.log_activity(ActivityKind::Load, message, false);
        }

        self.view.hide_loading();

        LoadReport {
            origins: self.origins,
            all_failed,
        }
    }

    pub fn render_all(&mut self) {
        self.view
            .render_stats(stat_cards(&self.stats), self.origins.stats);
        self.render_users();
        self.render_records();
        self.view
            .render_charts(chart_model(&self.users, &self.records));
    }

    /// Stored users with the current filter and sort applied.
    pub fn displayed_users(&self) -> Vec<UserSummary> {
        filter::sort_users(
            &filter::filter_users(&self.users, &self.user_filter),
            self.user_sort,
        )
    }

    pub fn displayed_records(&self) -> Vec<WorkRecordGroup> {
        match &self.record_filter {
            RecordFilter::None => self.records.clone(),
            RecordFilter::Text(term) => filter::filter_records(&self.records, term),
            RecordFilter::Date(day) => filter::filter_records_by_date(&self.records, *day),
            RecordFilter::Status(status) => {
                filter::filter_records_by_status(&self.records, status)
            }
        }
    }

    fn render_users(&mut self) {
        let table = user_table(&self.displayed_users());
        self.view.render_list(table);
    }

    fn render_records(&mut self) {
        let table = record_table(&self.displayed_records());
        self.view.render_list(table);
    }

    pub fn filter_users(&mut self, term: &str) -> Vec<UserSummary> {
        self.user_filter = term.trim().to_string();
        let shown = self.displayed_users();
        self.view.render_list(user_table(&shown));
        shown
    }

    /// Orders the displayed users by `key` without touching the stored order.
    /// Unknown keys fall back to stored order.
    pub fn sort_users(&mut self, key: &str) -> Vec<UserSummary> {
        self.user_sort = UserSortKey::parse(key);
        if self.user_sort.is_none() && !key.trim().is_empty() {
            warn!(key, "unknown user sort key");
        }
        let shown = self.displayed_users();
        self.view.render_list(user_table(&shown));
        shown
    }

    /// Drops the name filter; the chosen sort stays in effect.
    pub fn clear_user_filter(&mut self) -> Vec<UserSummary> {
        self.filter_users("")
    }

    fn apply_record_filter(&mut self, record_filter: RecordFilter) -> Vec<WorkRecordGroup> {
        self.record_filter = record_filter;
        let shown = self.displayed_records();
        self.view.render_list(record_table(&shown));
        shown
    }

    pub fn filter_records(&mut self, term: &str) -> Vec<WorkRecordGroup> {
        let term = term.trim();
        if term.is_empty() {
            return self.apply_record_filter(RecordFilter::None);
        }
        self.apply_record_filter(RecordFilter::Text(term.to_string()))
    }

    pub fn filter_records_by_date(&mut self, date: NaiveDate) -> Vec<WorkRecordGroup> {
        self.apply_record_filter(RecordFilter::Date(date))
    }

    /// Entries carry no status in the current schema, so this is usually empty.
    pub fn filter_records_by_status(&mut self, status: &str) -> Vec<WorkRecordGroup> {
        self.apply_record_filter(RecordFilter::Status(status.trim().to_string()))
    }

    pub fn clear_record_filter(&mut self) -> Vec<WorkRecordGroup> {
        self.apply_record_filter(RecordFilter::None)
    }

    /// Hands an export job to the export sink. Never waits for it.
    pub fn export_data(&mut self, selection: ExportSelection, format: ExportFormat) -> bool {
        let request = ExportRequest {
            selection,
            format,
            snapshot: self.snapshot(),
        };

        let sent = self
            .exports
            .as_ref()
            .is_some_and(|sink| sink.send(request).is_ok());

        if sent {
            info!(?selection, ?format, "export requested");
            let message = format!("Export of {} as {} requested", selection.label(), format.label());
            self.view.notify(Notice::info(message.clone()));
            self.log_activity(ActivityKind::Export, message, false);
        } else {
            warn!(?selection, ?format, "no export handler available");
            self.view
                .notify(Notice::error(EXPORT_UNAVAILABLE_MESSAGE));
            self.log_activity(ActivityKind::Export, EXPORT_UNAVAILABLE_MESSAGE, true);
        }

        sent
    }

    /// Starts `operation`. Destructive ones only open a confirmation modal and
    /// return `None`; the rest run straight away.
    pub async fn request(
        &mut self,
        operation: DataOperation,
    ) -> Option<Result<MaintenanceReport, ApiError>> {
        let operation = self.begin_request(operation)?;
        Some(self.perform(operation).await)
    }

    /// Opens the confirmation modal for destructive operations and returns
    /// `None`; any other operation comes back ready to run.
    pub fn begin_request(&mut self, operation: DataOperation) -> Option<DataOperation> {
        if operation.is_destructive() {
            info!(action = operation.action(), "awaiting confirmation");
            self.view
                .show_modal(Modal::confirm(operation.title(), operation.description()));
            self.pending = Some(operation);
            return None;
        }
        Some(operation)
    }

    /// Runs the operation waiting in the confirmation modal, if any.
    pub async fn confirm(&mut self) -> Option<Result<MaintenanceReport, ApiError>> {
        let operation = self.take_confirmed()?;
        Some(self.perform(operation).await)
    }

    /// Hands out the operation waiting for confirmation, clearing it.
    pub fn take_confirmed(&mut self) -> Option<DataOperation> {
        self.pending.take()
    }

    /// Declines the pending operation. Nothing else changes.
    pub fn cancel(&mut self) {
        if let Some(operation) = self.pending.take() {
            info!(action = operation.action(), "operation cancelled");
            self.log_activity(
                ActivityKind::Maintenance,
                format!("{} cancelled", operation.title()),
                false,
            );
        }
        self.view.close_modal();
    }

    pub fn dismiss_modal(&mut self) {
        if self.pending.is_some() {
            self.cancel();
        } else {
            self.view.close_modal();
        }
    }

    async fn perform(&mut self, operation: DataOperation) -> Result<MaintenanceReport, ApiError> {
        self.start_operation(&operation);
        let result = self.source.run_maintenance(&operation).await;
        if self.finish_operation(&operation, &result) {
            self.load_all().await;
        }
        result
    }

    /// Shows the loading indicator for a job about to run.
    pub fn start_operation(&mut self, operation: &DataOperation) {
        info!(action = operation.action(), "running maintenance");
        self.view.show_loading();
    }

    /// Reports a finished job through the modal and the activity feed.
    /// Returns whether stored data changed and a reload is due.
    pub fn finish_operation(
        &mut self,
        operation: &DataOperation,
        result: &Result<MaintenanceReport, ApiError>,
    ) -> bool {
        self.view.hide_loading();

        match result {
            Ok(report) => {
                info!(action = operation.action(), ?report, "maintenance finished");
                self.view
                    .show_modal(Modal::info(operation.title(), report.summary()));
                self.log_activity(ActivityKind::Maintenance, report.summary(), false);
            }
            Err(error) => {
                warn!(action = operation.action(), %error, "maintenance failed");
                self.view.show_modal(Modal::error(
                    operation.title(),
                    format!("The operation failed: {error}"),
                ));
                self.log_activity(
                    ActivityKind::Maintenance,
                    format!("{} failed: {error}", operation.title()),
                    true,
                );
            }
        }

        result.is_ok() && operation.reloads()
    }

    pub async fn check_data_status(&mut self) -> Option<Result<MaintenanceReport, ApiError>> {
        self.request(DataOperation::CheckStatus).await
    }

    pub async fn backup_data(&mut self) -> Option<Result<MaintenanceReport, ApiError>> {
        self.request(DataOperation::Backup).await
    }

    pub async fn migrate_data(&mut self) -> Option<Result<MaintenanceReport, ApiError>> {
        self.request(DataOperation::Migrate).await
    }

    pub async fn clean_data(&mut self) -> Option<Result<MaintenanceReport, ApiError>> {
        self.request(DataOperation::Clean).await
    }

    pub async fn delete_user(&mut self, name: &str) -> Option<Result<MaintenanceReport, ApiError>> {
        self.request(DataOperation::DeleteUser(name.to_string())).await
    }
}
