use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Aggregate counters shown on the overview cards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub total_users: u64,
    pub total_records: u64,
    pub total_success: u64,
    pub success_rate: f64,
}

impl Statistics {
    /// Active users are not reported by the API; the dashboard estimates 60%,
    /// rounded down. Split by tens so a huge remote count cannot overflow.
    pub const fn active_users(&self) -> u64 {
        self.total_users / 10 * 6 + self.total_users % 10 * 6 / 10
    }
}

/// One row of the user table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSummary {
    pub name: String,
    pub total_records: u64,
    pub success_count: u64,
    pub fail_count: u64,
    pub success_rate: f64,
    pub last_active: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkRecordEntry {
    pub work_content: String,
    pub data_count: u64,
    pub success_count: u64,
    pub fail_count: u64,
    pub success_rate: f64,
    pub remark: Option<String>,
    /// Never present in the sample schema; the API may add it later.
    #[serde(default)]
    pub status: Option<String>,
}

/// All work entries one user submitted on one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkRecordGroup {
    pub owner: String,
    pub date: NaiveDate,
    pub entries: Vec<WorkRecordEntry>,
}

impl WorkRecordGroup {
    pub fn data_count(&self) -> u64 {
        self.entries.iter().map(|entry| entry.data_count).sum()
    }

    pub fn success_count(&self) -> u64 {
        self.entries.iter().map(|entry| entry.success_count).sum()
    }

    pub fn fail_count(&self) -> u64 {
        self.entries.iter().map(|entry| entry.fail_count).sum()
    }

    /// Success percentage over the whole group, `None` when nothing was counted.
    #[allow(clippy::cast_precision_loss)]
    pub fn success_rate(&self) -> Option<f64> {
        let data = self.data_count();
        (data > 0).then(|| self.success_count() as f64 / data as f64 * 100.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Stats,
    Users,
    Records,
}

impl EntityKind {
    pub const ALL: [Self; 3] = [Self::Stats, Self::Users, Self::Records];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Stats => "Statistics",
            Self::Users => "Users",
            Self::Records => "Work records",
        }
    }
}

/// Where the currently held list of an entity came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    Live,
    #[default]
    Fallback,
}

impl Origin {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Live => "live",
            Self::Fallback => "sample",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserSortKey {
    SuccessRate,
    TotalRecords,
    UserName,
}

impl UserSortKey {
    pub const ALL: [Self; 3] = [Self::SuccessRate, Self::TotalRecords, Self::UserName];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SuccessRate => "successRate",
            Self::TotalRecords => "totalRecords",
            Self::UserName => "userName",
        }
    }

    /// Unknown keys map to `None`, which sorts as a no-op.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "successRate" => Some(Self::SuccessRate),
            "totalRecords" => Some(Self::TotalRecords),
            "userName" => Some(Self::UserName),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::SuccessRate => "Success rate",
            Self::TotalRecords => "Total records",
            Self::UserName => "Name",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportSelection {
    Users,
    Records,
    All,
}

impl ExportSelection {
    pub const ALL: [Self; 3] = [Self::Users, Self::Records, Self::All];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Users => "Users",
            Self::Records => "Work records",
            Self::All => "Everything",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Json,
    Xlsx,
}

impl ExportFormat {
    pub const ALL: [Self; 3] = [Self::Csv, Self::Json, Self::Xlsx];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Csv => "CSV",
            Self::Json => "JSON",
            Self::Xlsx => "Excel",
        }
    }
}

/// Backend maintenance jobs exposed on the data management screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataOperation {
    CheckStatus,
    Migrate,
    Backup,
    Clean,
    DeleteUser(String),
}

impl DataOperation {
    /// Destructive operations go through the confirm/cancel modal first.
    pub const fn is_destructive(&self) -> bool {
        matches!(self, Self::Migrate | Self::Clean | Self::DeleteUser(_))
    }

    /// Operations that change stored data and therefore force a reload.
    pub const fn reloads(&self) -> bool {
        matches!(self, Self::Migrate | Self::Clean | Self::DeleteUser(_))
    }

    pub const fn action(&self) -> &'static str {
        match self {
            Self::CheckStatus => "checkDataStatus",
            Self::Migrate => "migrateData",
            Self::Backup => "backupData",
            Self::Clean => "cleanData",
            Self::DeleteUser(_) => "deleteUser",
        }
    }

    pub fn title(&self) -> String {
        match self {
            Self::CheckStatus => "Data status".to_string(),
            Self::Migrate => "Migrate data".to_string(),
            Self::Backup => "Back up data".to_string(),
            Self::Clean => "Clean data".to_string(),
            Self::DeleteUser(name) => format!("Delete user {name}"),
        }
    }

    pub fn description(&self) -> String {
        match self {
            Self::CheckStatus => "Inspect how many records still use the legacy layout.".to_string(),
            Self::Migrate => {
                "Move every legacy work record into the current layout. This rewrites stored data."
                    .to_string()
            }
            Self::Backup => "Write a snapshot of all collections to backup storage.".to_string(),
            Self::Clean => {
                "Delete orphaned and malformed work records. This cannot be undone.".to_string()
            }
            Self::DeleteUser(name) => {
                format!("Remove {name} and every work record they submitted. This cannot be undone.")
            }
        }
    }
}

/// Structured result of a maintenance job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum MaintenanceReport {
    #[serde(rename_all = "camelCase")]
    Status {
        legacy_records: u64,
        current_records: u64,
    },
    #[serde(rename_all = "camelCase")]
    Migrated { migrated: u64 },
    #[serde(rename_all = "camelCase")]
    BackedUp { records: u64, location: String },
    #[serde(rename_all = "camelCase")]
    Cleaned { removed: u64 },
    #[serde(rename_all = "camelCase")]
    Deleted { user: String, records: u64 },
}

impl MaintenanceReport {
    pub fn summary(&self) -> String {
        match self {
            Self::Status {
                legacy_records,
                current_records,
            } => format!(
                "{legacy_records} legacy records waiting for migration, {current_records} records up to date."
            ),
            Self::Migrated { migrated } => format!("Migration finished: {migrated} records migrated."),
            Self::BackedUp { records, location } => {
                format!("Backup finished: {records} records written to {location}.")
            }
            Self::Cleaned { removed } => format!("Cleanup finished: {removed} records removed."),
            Self::Deleted { user, records } => {
                format!("Deleted {user} and {records} of their records.")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(data: u64, success: u64) -> WorkRecordEntry {
        WorkRecordEntry {
            work_content: "survey".to_string(),
            data_count: data,
            success_count: success,
            fail_count: data - success,
            success_rate: 0.0,
            remark: None,
            status: None,
        }
    }

    #[test]
    fn group_rate_sums_entries() {
        let group = WorkRecordGroup {
            owner: "a".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 7, 11).unwrap_or_default(),
            entries: vec![entry(3, 3), entry(1, 0)],
        };
        assert_eq!(group.data_count(), 4);
        assert_eq!(group.success_rate(), Some(75.0));
    }

    #[test]
    fn empty_group_has_no_rate() {
        let group = WorkRecordGroup {
            owner: "a".to_string(),
            date: NaiveDate::default(),
            entries: Vec::new(),
        };
        assert_eq!(group.success_rate(), None);
    }

    #[test]
    fn sort_key_parsing() {
        assert_eq!(UserSortKey::parse("successRate"), Some(UserSortKey::SuccessRate));
        assert_eq!(UserSortKey::parse("userName"), Some(UserSortKey::UserName));
        assert_eq!(UserSortKey::parse("registerTime"), None);
    }

    #[test]
    fn only_migrate_clean_and_delete_need_confirmation() {
        assert!(DataOperation::Migrate.is_destructive());
        assert!(DataOperation::Clean.is_destructive());
        assert!(DataOperation::DeleteUser("x".to_string()).is_destructive());
        assert!(!DataOperation::Backup.is_destructive());
        assert!(!DataOperation::CheckStatus.is_destructive());
    }

    #[test]
    fn active_users_estimate_rounds_down() {
        let stats = Statistics {
            total_users: 156,
            total_records: 0,
            total_success: 0,
            success_rate: 0.0,
        };
        assert_eq!(stats.active_users(), 93);
    }

    #[test]
    fn active_users_estimate_holds_at_the_top_of_the_range() {
        let mut stats = Statistics {
            total_users: u64::MAX,
            ..Statistics::default()
        };
        let exact = u128::from(u64::MAX) * 6 / 10;
        assert_eq!(u128::from(stats.active_users()), exact);

        stats.total_users = u64::MAX / 4;
        assert_eq!(
            u128::from(stats.active_users()),
            u128::from(u64::MAX / 4) * 6 / 10
        );

        stats.total_users = 9;
        assert_eq!(stats.active_users(), 5);
    }
}
