//! The dashboard snapshot printed by `worklog-admin --json` and read by the
//! web dashboard.

use serde::{Deserialize, Serialize};

use crate::domain::{EntityKind, Origin, Statistics, UserSummary, WorkRecordGroup};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Origins {
    pub stats: Origin,
    pub users: Origin,
    pub records: Origin,
}

impl Origins {
    pub const fn get(&self, kind: EntityKind) -> Origin {
        match kind {
            EntityKind::Stats => self.stats,
            EntityKind::Users => self.users,
            EntityKind::Records => self.records,
        }
    }

    /// True when any panel holds the sample dataset.
    pub fn any_sample(&self) -> bool {
        EntityKind::ALL
            .iter()
            .any(|kind| self.get(*kind) == Origin::Fallback)
    }
}

/// Everything the controller holds, in a form other renderers can read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub stats: Statistics,
    pub users: Vec<UserSummary>,
    pub records: Vec<WorkRecordGroup>,
    #[serde(default)]
    pub origins: Origins,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SNAPSHOT: &str = r#"{
        "stats": {"total_users": 156, "total_records": 1248, "total_success": 1092, "success_rate": 87.5},
        "users": [
            {"name": "张三", "total_records": 25, "success_count": 22, "fail_count": 3,
             "success_rate": 88.0, "last_active": "2024-07-11"}
        ],
        "records": [
            {"owner": "张三", "date": "2024-07-11", "entries": [
                {"work_content": "入户调查", "data_count": 3, "success_count": 3, "fail_count": 0,
                 "success_rate": 100.0, "remark": null, "status": null},
                {"work_content": "电话回访", "data_count": 2, "success_count": 1, "fail_count": 1,
                 "success_rate": 50.0, "remark": "一户无人接听", "status": null}
            ]}
        ],
        "origins": {"stats": "live", "users": "fallback", "records": "live"}
    }"#;

    #[test]
    fn reads_the_headless_snapshot() -> Result<(), Box<dyn std::error::Error>> {
        let snapshot: DashboardSnapshot = serde_json::from_str(SNAPSHOT)?;
        assert_eq!(snapshot.stats.active_users(), 93);
        assert_eq!(snapshot.records[0].success_rate(), Some(80.0));
        assert_eq!(snapshot.origins.users, Origin::Fallback);
        assert!(snapshot.origins.any_sample());
        Ok(())
    }

    #[test]
    fn missing_origins_read_as_sample() -> Result<(), Box<dyn std::error::Error>> {
        let snapshot: DashboardSnapshot = serde_json::from_str(
            r#"{"stats": {"total_users": 0, "total_records": 0, "total_success": 0, "success_rate": 0.0},
                "users": [], "records": []}"#,
        )?;
        assert!(snapshot.origins.any_sample());
        Ok(())
    }
}
