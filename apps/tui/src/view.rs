//! Render-agnostic view models and the boundary the controller draws through.
//!
//! The controller never formats for a particular UI; it maps rows into the
//! models below and hands them to a [`DashboardView`]. The terminal UI draws
//! from [`ViewState`], the headless printer and tests read the same models.

use chrono::NaiveDate;
use serde::Serialize;
use worklog_core::daily_success_rates;
pub use worklog_core::format_rate;

use crate::activity::ActivityLog;
use crate::domain::{Origin, Statistics, UserSummary, WorkRecordGroup};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatCard {
    pub label: &'static str,
    pub value: String,
}

pub fn stat_cards(stats: &Statistics) -> Vec<StatCard> {
    vec![
        StatCard {
            label: "Total users",
            value: stats.total_users.to_string(),
        },
        StatCard {
            label: "Total records",
            value: stats.total_records.to_string(),
        },
        StatCard {
            label: "Successful",
            value: stats.total_success.to_string(),
        },
        StatCard {
            label: "Success rate",
            value: format_rate(stats.success_rate),
        },
        StatCard {
            label: "Active users (est.)",
            value: stats.active_users().to_string(),
        },
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TableKind {
    Users,
    Records,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableRow {
    /// Identifies the underlying entity: user name, or `owner@date`.
    pub key: String,
    pub cells: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableModel {
    pub kind: TableKind,
    pub columns: Vec<&'static str>,
    pub rows: Vec<TableRow>,
}

impl TableModel {
    pub const fn empty(kind: TableKind) -> Self {
        Self {
            kind,
            columns: Vec::new(),
            rows: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

pub fn user_table(users: &[UserSummary]) -> TableModel {
    let rows = users
        .iter()
        .map(|user| TableRow {
            key: user.name.clone(),
            cells: vec![
                user.name.clone(),
                user.total_records.to_string(),
                user.success_count.to_string(),
                user.fail_count.to_string(),
                format_rate(user.success_rate),
                user.last_active
                    .map_or_else(|| "-".to_string(), |day| day.to_string()),
            ],
        })
        .collect();

    TableModel {
        kind: TableKind::Users,
        columns: vec!["Name", "Records", "Success", "Fail", "Rate", "Last active"],
        rows,
    }
}

fn work_labels(group: &WorkRecordGroup) -> String {
    group
        .entries
        .iter()
        .map(|entry| entry.work_content.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn record_table(records: &[WorkRecordGroup]) -> TableModel {
    let rows = records
        .iter()
        .map(|group| {
            let work = work_labels(group);

            TableRow {
                key: format!("{}@{}", group.owner, group.date),
                cells: vec![
                    group.date.to_string(),
                    group.owner.clone(),
                    work,
                    group.data_count().to_string(),
                    group.success_count().to_string(),
                    group.fail_count().to_string(),
                    group
                        .success_rate()
                        .map_or_else(|| "-".to_string(), format_rate),
                ],
            }
        })
        .collect();

    TableModel {
        kind: TableKind::Records,
        columns: vec!["Date", "User", "Work", "Records", "Success", "Fail", "Rate"],
        rows,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartModel {
    /// Bar chart: one bar per user, in stored order.
    pub user_rates: Vec<(String, f64)>,
    /// Line chart: success rate per day, oldest first.
    pub daily_rates: Vec<(NaiveDate, f64)>,
}

pub fn chart_model(users: &[UserSummary], records: &[WorkRecordGroup]) -> ChartModel {
    let user_rates = users
        .iter()
        .map(|user| (user.name.clone(), user.success_rate))
        .collect();

    ChartModel {
        user_rates,
        daily_rates: daily_success_rates(records),
    }
}

/// Everything shown about one user beside the user table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserDetail {
    pub name: String,
    pub fields: Vec<(&'static str, String)>,
    /// One line per record group the user owns, newest first.
    pub recent_work: Vec<String>,
}

pub fn user_detail(user: &UserSummary, records: &[WorkRecordGroup]) -> UserDetail {
    let mut owned: Vec<&WorkRecordGroup> = records
        .iter()
        .filter(|group| group.owner == user.name)
        .collect();
    owned.sort_by(|a, b| b.date.cmp(&a.date));

    let recent_work = owned
        .iter()
        .map(|group| {
            format!(
                "{}  {}  {}",
                group.date,
                work_labels(group),
                group
                    .success_rate()
                    .map_or_else(|| "-".to_string(), format_rate)
            )
        })
        .collect();

    UserDetail {
        name: user.name.clone(),
        fields: vec![
            ("Records", user.total_records.to_string()),
            ("Successful", user.success_count.to_string()),
            ("Failed", user.fail_count.to_string()),
            ("Success rate", format_rate(user.success_rate)),
            (
                "Last active",
                user.last_active
                    .map_or_else(|| "-".to_string(), |day| day.to_string()),
            ),
        ],
        recent_work,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityItem {
    pub time: String,
    pub kind: &'static str,
    pub message: String,
    pub failed: bool,
}

pub fn activity_feed(log: &ActivityLog) -> Vec<ActivityItem> {
    log.entries()
        .map(|entry| ActivityItem {
            time: entry.at.format("%H:%M:%S").to_string(),
            kind: entry.kind.label(),
            message: entry.message.clone(),
            failed: entry.failed,
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ModalKind {
    /// Waiting for confirm or cancel.
    Confirm,
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Modal {
    pub kind: ModalKind,
    pub title: String,
    pub body: String,
}

impl Modal {
    pub fn confirm(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            kind: ModalKind::Confirm,
            title: title.into(),
            body: body.into(),
        }
    }

    pub fn info(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            kind: ModalKind::Info,
            title: title.into(),
            body: body.into(),
        }
    }

    pub fn error(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            kind: ModalKind::Error,
            title: title.into(),
            body: body.into(),
        }
    }

    pub const fn awaits_confirmation(&self) -> bool {
        matches!(self.kind, ModalKind::Confirm)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NoticeLevel {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// The passive render target driven by the controller.
pub trait DashboardView {
    fn show_loading(&mut self);

    fn hide_loading(&mut self);

    fn render_stats(&mut self, cards: Vec<StatCard>, origin: Origin);

    /// Replaces the table of `table.kind`.
    fn render_list(&mut self, table: TableModel);

    fn render_charts(&mut self, charts: ChartModel);

    /// Replaces the recent-activity feed, newest first.
    fn render_activity(&mut self, items: Vec<ActivityItem>);

    fn show_modal(&mut self, modal: Modal);

    fn close_modal(&mut self);

    fn notify(&mut self, notice: Notice);
}

/// Keeps the latest model of every panel for a UI to draw.
#[derive(Debug, Clone)]
pub struct ViewState {
    pub loading: bool,
    pub stats: Vec<StatCard>,
    pub stats_origin: Origin,
    pub users: TableModel,
    pub records: TableModel,
    pub charts: ChartModel,
    pub activity: Vec<ActivityItem>,
    pub modal: Option<Modal>,
    pub notice: Option<Notice>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            loading: false,
            stats: Vec::new(),
            stats_origin: Origin::default(),
            users: TableModel::empty(TableKind::Users),
            records: TableModel::empty(TableKind::Records),
            charts: ChartModel::default(),
            activity: Vec::new(),
            modal: None,
            notice: None,
        }
    }
}

impl ViewState {
    pub const fn table(&self, kind: TableKind) -> &TableModel {
        match kind {
            TableKind::Users => &self.users,
            TableKind::Records => &self.records,
        }
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }
}

impl DashboardView for ViewState {
    fn show_loading(&mut self) {
        self.loading = true;
    }

    fn hide_loading(&mut self) {
        self.loading = false;
    }

    fn render_stats(&mut self, cards: Vec<StatCard>, origin: Origin) {
        self.stats = cards;
        self.stats_origin = origin;
    }

    fn render_list(&mut self, table: TableModel) {
        match table.kind {
            TableKind::Users => self.users = table,
            TableKind::Records => self.records = table,
        }
    }

    fn render_charts(&mut self, charts: ChartModel) {
        self.charts = charts;
    }

    fn render_activity(&mut self, items: Vec<ActivityItem>) {
        self.activity = items;
    }

    fn show_modal(&mut self, modal: Modal) {
        self.modal = Some(modal);
    }

    fn close_modal(&mut self) {
        self.modal = None;
    }

    fn notify(&mut self, notice: Notice) {
        self.notice = Some(notice);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::ActivityKind;
    use crate::api::{sample_records, sample_stats, sample_users};

    #[test]
    fn user_rows_follow_input_order() {
        let table = user_table(&sample_users());
        let keys: Vec<&str> = table.rows.iter().map(|row| row.key.as_str()).collect();
        assert_eq!(keys, vec!["张三", "李四", "王五", "赵六", "钱七"]);
        assert_eq!(table.rows[0].cells[4], "88%");
        assert_eq!(table.columns.len(), table.rows[0].cells.len());
    }

    #[test]
    fn record_rows_aggregate_entries() {
        let table = record_table(&sample_records());
        let first = &table.rows[0];
        assert_eq!(first.key, "张三@2024-07-11");
        assert_eq!(first.cells[3], "5");
        assert_eq!(first.cells[4], "4");
        assert_eq!(first.cells[6], "80%");
    }

    #[test]
    fn daily_rates_are_sorted_and_merged() {
        let charts = chart_model(&sample_users(), &sample_records());
        let days: Vec<String> = charts
            .daily_rates
            .iter()
            .map(|(day, _)| day.to_string())
            .collect();
        assert_eq!(days, vec!["2024-07-10", "2024-07-11"]);
        // 2024-07-11: (4 + 3) successes over (5 + 3) records.
        assert!((charts.daily_rates[1].1 - 87.5).abs() < 1e-9);
        assert_eq!(charts.user_rates.len(), 5);
    }

    #[test]
    fn stat_cards_format_rates() {
        let cards = stat_cards(&sample_stats());
        let rate = cards
            .iter()
            .find(|card| card.label == "Success rate")
            .map(|card| card.value.as_str());
        assert_eq!(rate, Some("87.5%"));
    }

    #[test]
    fn user_detail_lists_their_work_newest_first() {
        let users = sample_users();
        let mut records = sample_records();
        records.push(WorkRecordGroup {
            owner: "王五".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 7, 12).unwrap_or_default(),
            entries: Vec::new(),
        });

        let detail = user_detail(&users[2], &records);
        assert_eq!(detail.name, "王五");
        assert_eq!(detail.fields[3], ("Success rate", "88%".to_string()));
        assert_eq!(
            detail.recent_work,
            vec![
                "2024-07-12    -".to_string(),
                "2024-07-10  入户调查, 数据核对  75%".to_string(),
            ]
        );
    }

    #[test]
    fn user_without_records_has_empty_history() {
        let detail = user_detail(&sample_users()[4], &sample_records());
        assert!(detail.recent_work.is_empty());
        assert_eq!(detail.fields[4], ("Last active", "2024-07-08".to_string()));
    }

    #[test]
    fn activity_feed_keeps_log_order() {
        let mut log = ActivityLog::default();
        log.record(ActivityKind::Load, "Loaded live data", false);
        log.record(ActivityKind::Maintenance, "Clean data failed", true);

        let feed = activity_feed(&log);
        assert_eq!(feed[0].kind, "data");
        assert!(feed[0].failed);
        assert_eq!(feed[1].message, "Loaded live data");
        assert_eq!(feed[1].time.len(), 8);
    }

    #[test]
    fn view_state_routes_tables_by_kind() {
        let mut state = ViewState::default();
        state.render_list(record_table(&sample_records()));
        assert_eq!(state.records.len(), 3);
        assert!(state.users.is_empty());
    }
}
