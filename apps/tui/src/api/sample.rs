//! Fixed sample dataset.
//!
//! Served verbatim whenever the live API is unavailable, and by
//! [`SampleSource`] when the dashboard runs without an API URL.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::NaiveDate;

use super::{ApiError, DataSource};
use crate::domain::{
    DataOperation, MaintenanceReport, Statistics, UserSummary, WorkRecordEntry, WorkRecordGroup,
};

pub fn sample_stats() -> Statistics {
    Statistics {
        total_users: 156,
        total_records: 1248,
        total_success: 1092,
        success_rate: 87.5,
    }
}

pub fn sample_users() -> Vec<UserSummary> {
    vec![
        user("张三", 25, 22, 3, 88.0, (2024, 7, 11)),
        user("李四", 18, 15, 3, 83.0, (2024, 7, 10)),
        user("王五", 32, 28, 4, 88.0, (2024, 7, 11)),
        user("赵六", 12, 10, 2, 83.0, (2024, 7, 9)),
        user("钱七", 20, 16, 4, 80.0, (2024, 7, 8)),
    ]
}

pub fn sample_records() -> Vec<WorkRecordGroup> {
    vec![
        WorkRecordGroup {
            owner: "张三".to_string(),
            date: day((2024, 7, 11)),
            entries: vec![
                entry("入户调查", 3, 3, 0, None),
                entry("电话回访", 2, 1, 1, Some("一户无人接听")),
            ],
        },
        WorkRecordGroup {
            owner: "李四".to_string(),
            date: day((2024, 7, 11)),
            entries: vec![entry("问卷录入", 3, 3, 0, None)],
        },
        WorkRecordGroup {
            owner: "王五".to_string(),
            date: day((2024, 7, 10)),
            entries: vec![
                entry("入户调查", 5, 4, 1, None),
                entry("数据核对", 3, 2, 1, Some("两条记录待复核")),
            ],
        },
    ]
}

fn user(
    name: &str,
    total_records: u64,
    success_count: u64,
    fail_count: u64,
    success_rate: f64,
    last_active: (i32, u32, u32),
) -> UserSummary {
    UserSummary {
        name: name.to_string(),
        total_records,
        success_count,
        fail_count,
        success_rate,
        last_active: Some(day(last_active)),
    }
}

#[allow(clippy::cast_precision_loss)]
fn entry(
    work_content: &str,
    data_count: u64,
    success_count: u64,
    fail_count: u64,
    remark: Option<&str>,
) -> WorkRecordEntry {
    WorkRecordEntry {
        work_content: work_content.to_string(),
        data_count,
        success_count,
        fail_count,
        success_rate: success_count as f64 / data_count as f64 * 100.0,
        remark: remark.map(str::to_string),
        status: None,
    }
}

fn day((year, month, date): (i32, u32, u32)) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, date).unwrap_or_default()
}

/// Data source bound to the sample dataset only.
///
/// Maintenance jobs have no backend to talk to, so they wait `delay` and
/// report counts derived from the sample records. Deleted users stay hidden
/// from later fetches for the life of the source and all its clones.
#[derive(Debug, Clone)]
pub struct SampleSource {
    delay: Duration,
    deleted: Arc<Mutex<BTreeSet<String>>>,
}

impl SampleSource {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deleted: Arc::default(),
        }
    }

    fn deleted(&self) -> MutexGuard<'_, BTreeSet<String>> {
        self.deleted.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn users(&self) -> Vec<UserSummary> {
        let deleted = self.deleted();
        sample_users()
            .into_iter()
            .filter(|user| !deleted.contains(&user.name))
            .collect()
    }

    fn records(&self) -> Vec<WorkRecordGroup> {
        let deleted = self.deleted();
        sample_records()
            .into_iter()
            .filter(|group| !deleted.contains(&group.owner))
            .collect()
    }
}

impl Default for SampleSource {
    fn default() -> Self {
        Self::new(Duration::from_millis(600))
    }
}

impl DataSource for SampleSource {
    fn is_live(&self) -> bool {
        false
    }

    async fn fetch_stats(&self) -> Result<Statistics, ApiError> {
        Ok(sample_stats())
    }

    async fn fetch_users(&self) -> Result<Vec<UserSummary>, ApiError> {
        Ok(self.users())
    }

    async fn fetch_records(&self) -> Result<Vec<WorkRecordGroup>, ApiError> {
        Ok(self.records())
    }

    async fn run_maintenance(
        &self,
        operation: &DataOperation,
    ) -> Result<MaintenanceReport, ApiError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let records = self.records();
        let total: u64 = records.iter().map(|group| group.entries.len() as u64).sum();

        let report = match operation {
            DataOperation::CheckStatus => MaintenanceReport::Status {
                legacy_records: 0,
                current_records: total,
            },
            DataOperation::Migrate => MaintenanceReport::Migrated { migrated: 0 },
            DataOperation::Backup => MaintenanceReport::BackedUp {
                records: total,
                location: "local sample store".to_string(),
            },
            DataOperation::Clean => MaintenanceReport::Cleaned { removed: 0 },
            DataOperation::DeleteUser(name) => {
                let owned = records
                    .iter()
                    .filter(|group| &group.owner == name)
                    .map(|group| group.entries.len() as u64)
                    .sum();
                self.deleted().insert(name.clone());
                MaintenanceReport::Deleted {
                    user: name.clone(),
                    records: owned,
                }
            }
        };

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_users_match_published_rates() {
        let users = sample_users();
        let rates: Vec<f64> = users.iter().map(|user| user.success_rate).collect();
        assert_eq!(users.len(), 5);
        assert_eq!(rates, vec![88.0, 83.0, 88.0, 83.0, 80.0]);
    }

    #[test]
    fn sample_records_have_no_status() {
        assert!(sample_records()
            .iter()
            .flat_map(|group| &group.entries)
            .all(|entry| entry.status.is_none()));
    }

    #[tokio::test]
    async fn sample_delete_counts_owned_entries() -> Result<(), ApiError> {
        let source = SampleSource::new(Duration::ZERO);
        let report = source
            .run_maintenance(&DataOperation::DeleteUser("王五".to_string()))
            .await?;
        assert_eq!(
            report,
            MaintenanceReport::Deleted {
                user: "王五".to_string(),
                records: 2,
            }
        );
        Ok(())
    }

    #[tokio::test]
    async fn deleted_user_stays_gone_across_clones() -> Result<(), ApiError> {
        let source = SampleSource::new(Duration::ZERO);
        let clone = source.clone();
        clone
            .run_maintenance(&DataOperation::DeleteUser("张三".to_string()))
            .await?;

        let users = source.fetch_users().await?;
        assert_eq!(users.len(), 4);
        assert!(users.iter().all(|user| user.name != "张三"));
        assert_eq!(source.fetch_records().await?.len(), 2);

        let again = source
            .run_maintenance(&DataOperation::DeleteUser("张三".to_string()))
            .await?;
        assert_eq!(
            again,
            MaintenanceReport::Deleted {
                user: "张三".to_string(),
                records: 0,
            }
        );
        Ok(())
    }
}
