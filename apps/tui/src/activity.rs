//! Recent activity: a bounded, newest-first log of loads, maintenance jobs
//! and export requests.

use std::collections::VecDeque;

use chrono::{DateTime, Local};
use serde::Serialize;

pub const MAX_ACTIVITY: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ActivityKind {
    Load,
    Maintenance,
    Export,
}

impl ActivityKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Load => "load",
            Self::Maintenance => "data",
            Self::Export => "export",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActivityEntry {
    pub at: DateTime<Local>,
    pub kind: ActivityKind,
    pub message: String,
    pub failed: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ActivityLog {
    entries: VecDeque<ActivityEntry>,
}

impl ActivityLog {
    pub fn record(&mut self, kind: ActivityKind, message: impl Into<String>, failed: bool) {
        self.entries.push_front(ActivityEntry {
            at: Local::now(),
            kind,
            message: message.into(),
            failed,
        });
        self.entries.truncate(MAX_ACTIVITY);
    }

    /// Newest first.
    pub fn entries(&self) -> impl Iterator<Item = &ActivityEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newest_entry_comes_first() {
        let mut log = ActivityLog::default();
        log.record(ActivityKind::Load, "first", false);
        log.record(ActivityKind::Export, "second", true);

        let messages: Vec<&str> = log.entries().map(|entry| entry.message.as_str()).collect();
        assert_eq!(messages, vec!["second", "first"]);
        assert!(log.entries().next().is_some_and(|entry| entry.failed));
    }

    #[test]
    fn oldest_entries_fall_off() {
        let mut log = ActivityLog::default();
        for index in 0..MAX_ACTIVITY + 5 {
            log.record(ActivityKind::Load, index.to_string(), false);
        }

        assert_eq!(log.len(), MAX_ACTIVITY);
        let oldest = log.entries().last().map(|entry| entry.message.clone());
        assert_eq!(oldest.as_deref(), Some("5"));
    }
}
