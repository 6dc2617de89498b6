//! Client-side filtering and sorting.
//!
//! Every function borrows the stored list and returns a new one; the stored
//! lists are never touched.

use chrono::NaiveDate;

use crate::domain::{UserSortKey, UserSummary, WorkRecordGroup};

fn contains_ignore_case(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

/// Users whose name contains `term`, ignoring case. An empty term keeps all.
pub fn filter_users(users: &[UserSummary], term: &str) -> Vec<UserSummary> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return users.to_vec();
    }

    users
        .iter()
        .filter(|user| contains_ignore_case(&user.name, &needle))
        .cloned()
        .collect()
}

/// Stable sort by `key`; `None` (an unrecognized key) keeps the input order.
pub fn sort_users(users: &[UserSummary], key: Option<UserSortKey>) -> Vec<UserSummary> {
    let mut sorted = users.to_vec();
    match key {
        Some(UserSortKey::SuccessRate) => {
            sorted.sort_by(|a, b| b.success_rate.total_cmp(&a.success_rate));
        }
        Some(UserSortKey::TotalRecords) => {
            sorted.sort_by(|a, b| b.total_records.cmp(&a.total_records));
        }
        Some(UserSortKey::UserName) => sorted.sort_by(|a, b| a.name.cmp(&b.name)),
        None => {}
    }
    sorted
}

/// Groups whose owner, or any entry's work content, contains `term`.
pub fn filter_records(records: &[WorkRecordGroup], term: &str) -> Vec<WorkRecordGroup> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return records.to_vec();
    }

    records
        .iter()
        .filter(|group| {
            contains_ignore_case(&group.owner, &needle)
                || group
                    .entries
                    .iter()
                    .any(|entry| contains_ignore_case(&entry.work_content, &needle))
        })
        .cloned()
        .collect()
}

pub fn filter_records_by_date(records: &[WorkRecordGroup], date: NaiveDate) -> Vec<WorkRecordGroup> {
    records
        .iter()
        .filter(|group| group.date == date)
        .cloned()
        .collect()
}

/// Groups with at least one entry whose status equals `status`.
///
/// Entries without a status never match, so the sample dataset always yields
/// an empty list.
pub fn filter_records_by_status(records: &[WorkRecordGroup], status: &str) -> Vec<WorkRecordGroup> {
    records
        .iter()
        .filter(|group| {
            group
                .entries
                .iter()
                .any(|entry| entry.status.as_deref() == Some(status))
        })
        .cloned()
        .collect()
}
