//! Success-rate helpers both front ends draw with.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::domain::WorkRecordGroup;

/// `88%` for whole numbers, `87.5%` otherwise.
pub fn format_rate(rate: f64) -> String {
    if (rate - rate.round()).abs() < 0.05 {
        format!("{rate:.0}%")
    } else {
        format!("{rate:.1}%")
    }
}

/// Traffic-light band a rate is coloured with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateBand {
    Good,
    Fair,
    Poor,
}

impl RateBand {
    pub const GOOD_FROM: f64 = 85.0;
    pub const FAIR_FROM: f64 = 70.0;

    pub fn of(rate: f64) -> Self {
        if rate >= Self::GOOD_FROM {
            Self::Good
        } else if rate >= Self::FAIR_FROM {
            Self::Fair
        } else {
            Self::Poor
        }
    }
}

/// Success rate per day over every group, oldest day first. Days with
/// nothing counted are skipped.
#[allow(clippy::cast_precision_loss)]
pub fn daily_success_rates(records: &[WorkRecordGroup]) -> Vec<(NaiveDate, f64)> {
    let mut per_day: BTreeMap<NaiveDate, (u64, u64)> = BTreeMap::new();
    for group in records {
        let totals = per_day.entry(group.date).or_default();
        totals.0 += group.data_count();
        totals.1 += group.success_count();
    }

    per_day
        .into_iter()
        .filter(|(_, (data, _))| *data > 0)
        .map(|(day, (data, success))| (day, success as f64 / data as f64 * 100.0))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::WorkRecordEntry;

    fn group(day: u32, data: u64, success: u64) -> WorkRecordGroup {
        WorkRecordGroup {
            owner: "张三".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 7, day).unwrap_or_default(),
            entries: vec![WorkRecordEntry {
                work_content: "入户调查".to_string(),
                data_count: data,
                success_count: success,
                fail_count: data - success,
                success_rate: 0.0,
                remark: None,
                status: None,
            }],
        }
    }

    #[test]
    fn rates_print_without_needless_decimals() {
        assert_eq!(format_rate(88.0), "88%");
        assert_eq!(format_rate(87.5), "87.5%");
    }

    #[test]
    fn bands_split_at_85_and_70() {
        assert_eq!(RateBand::of(85.0), RateBand::Good);
        assert_eq!(RateBand::of(80.0), RateBand::Fair);
        assert_eq!(RateBand::of(69.9), RateBand::Poor);
    }

    #[test]
    fn days_merge_and_sort() {
        let rates = daily_success_rates(&[group(11, 5, 4), group(10, 4, 2), group(11, 3, 3), group(9, 0, 0)]);
        let days: Vec<String> = rates.iter().map(|(day, _)| day.to_string()).collect();
        assert_eq!(days, vec!["2024-07-10", "2024-07-11"]);
        assert!((rates[1].1 - 87.5).abs() < 1e-9);
    }
}
