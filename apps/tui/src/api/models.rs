//! Wire format of the statistics cloud function.
//!
//! Every call is a `POST` with an `action` discriminator and every response is
//! wrapped in `{ success, data?, error? }`. Field names are camelCase.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{
    MaintenanceReport, Statistics, UserSummary, WorkRecordEntry, WorkRecordGroup,
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiRequest<'a> {
    pub action: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<&'a str>,
}

impl<'a> ApiRequest<'a> {
    pub const fn action(action: &'a str) -> Self {
        Self {
            action,
            page: None,
            limit: None,
            user_name: None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsPayload {
    #[serde(default)]
    pub total_users: u64,
    #[serde(default)]
    pub total_records: u64,
    #[serde(default)]
    pub total_success: u64,
    #[serde(default)]
    pub success_rate: f64,
    #[serde(default)]
    pub user_list: Vec<WireUser>,
}

impl StatsPayload {
    pub const fn statistics(&self) -> Statistics {
        Statistics {
            total_users: self.total_users,
            total_records: self.total_records,
            total_success: self.total_success,
            success_rate: self.success_rate,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireUser {
    pub user_name: Option<String>,
    #[serde(default)]
    pub total_records: u64,
    #[serde(default)]
    pub success_count: u64,
    #[serde(default)]
    pub fail_count: u64,
    #[serde(default)]
    pub success_rate: f64,
    pub last_active: Option<String>,
}

impl From<WireUser> for UserSummary {
    fn from(user: WireUser) -> Self {
        Self {
            name: user
                .user_name
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| "Unknown user".to_string()),
            total_records: user.total_records,
            success_count: user.success_count,
            fail_count: user.fail_count,
            success_rate: user.success_rate,
            last_active: user.last_active.as_deref().and_then(parse_day),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordsPayload {
    #[serde(default)]
    pub records: Vec<WireRecordGroup>,
    pub total: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireRecordGroup {
    pub user_name: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub items: Vec<WireEntry>,
}

impl From<WireRecordGroup> for WorkRecordGroup {
    fn from(group: WireRecordGroup) -> Self {
        Self {
            owner: group.user_name,
            date: group.date,
            entries: group.items.into_iter().map(WorkRecordEntry::from).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireEntry {
    pub work_content: String,
    #[serde(default)]
    pub data_count: u64,
    #[serde(default)]
    pub success_count: u64,
    #[serde(default)]
    pub fail_count: u64,
    pub success_rate: Option<f64>,
    pub remark: Option<String>,
    pub status: Option<String>,
}

impl From<WireEntry> for WorkRecordEntry {
    #[allow(clippy::cast_precision_loss)]
    fn from(entry: WireEntry) -> Self {
        let success_rate = entry.success_rate.unwrap_or_else(|| {
            if entry.data_count == 0 {
                0.0
            } else {
                entry.success_count as f64 / entry.data_count as f64 * 100.0
            }
        });

        Self {
            work_content: entry.work_content,
            data_count: entry.data_count,
            success_count: entry.success_count,
            fail_count: entry.fail_count,
            success_rate,
            remark: entry.remark.filter(|remark| !remark.is_empty()),
            status: entry.status,
        }
    }
}

/// Maintenance actions answer with a flat object; which counters are present
/// depends on the action.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenancePayload {
    pub legacy_records: Option<u64>,
    pub current_records: Option<u64>,
    pub migrated: Option<u64>,
    pub removed: Option<u64>,
    pub records: Option<u64>,
    pub location: Option<String>,
}

impl MaintenancePayload {
    pub fn into_report(self, operation: &crate::domain::DataOperation) -> MaintenanceReport {
        use crate::domain::DataOperation;

        match operation {
            DataOperation::CheckStatus => MaintenanceReport::Status {
                legacy_records: self.legacy_records.unwrap_or_default(),
                current_records: self.current_records.unwrap_or_default(),
            },
            DataOperation::Migrate => MaintenanceReport::Migrated {
                migrated: self.migrated.unwrap_or_default(),
            },
            DataOperation::Backup => MaintenanceReport::BackedUp {
                records: self.records.unwrap_or_default(),
                location: self.location.unwrap_or_else(|| "backup storage".to_string()),
            },
            DataOperation::Clean => MaintenanceReport::Cleaned {
                removed: self.removed.unwrap_or_default(),
            },
            DataOperation::DeleteUser(name) => MaintenanceReport::Deleted {
                user: name.clone(),
                records: self.removed.or(self.records).unwrap_or_default(),
            },
        }
    }
}

fn parse_day(value: &str) -> Option<NaiveDate> {
    let day = value.get(..10).unwrap_or(value);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}
