//! Step journal.
//!
//! Every observed page operation and every scenario step leaves one
//! [`StepRecord`] behind: label, outcome, elapsed time and the screenshot
//! taken for it. The journal replaces a report attachment system; it is a
//! plain in-memory list the caller can inspect or serialize.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

/// Step outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum StepStatus {
    /// Step completed
    Passed,
    /// Step failed
    Failed {
        /// Error message
        message: String,
    },
}

impl StepStatus {
    /// Check if status is passing
    #[must_use]
    pub const fn is_passed(&self) -> bool {
        matches!(self, Self::Passed)
    }

    /// Check if status is failing
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// One observed step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepRecord {
    /// Step label
    pub label: String,
    /// Outcome
    #[serde(flatten)]
    pub status: StepStatus,
    /// Wall time spent in the step
    pub duration: Duration,
    /// Screenshot captured for the step, if capture succeeded
    pub screenshot: Option<PathBuf>,
    /// Completion time
    pub finished_at: DateTime<Utc>,
}

impl StepRecord {
    /// Create a passing record
    #[must_use]
    pub fn passed(label: impl Into<String>, duration: Duration) -> Self {
        Self {
            label: label.into(),
            status: StepStatus::Passed,
            duration,
            screenshot: None,
            finished_at: Utc::now(),
        }
    }

    /// Create a failing record
    #[must_use]
    pub fn failed(label: impl Into<String>, duration: Duration, message: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            status: StepStatus::Failed {
                message: message.into(),
            },
            duration,
            screenshot: None,
            finished_at: Utc::now(),
        }
    }

    /// Attach the step screenshot
    #[must_use]
    pub fn with_screenshot(mut self, path: Option<PathBuf>) -> Self {
        self.screenshot = path;
        self
    }
}

/// Append-only list of step records
#[derive(Debug, Default)]
pub struct StepJournal {
    records: Mutex<Vec<StepRecord>>,
}

impl StepJournal {
    /// Create an empty journal
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record
    pub fn record(&self, record: StepRecord) {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record);
    }

    /// Copy of all records in order
    #[must_use]
    pub fn records(&self) -> Vec<StepRecord> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of records
    #[must_use]
    pub fn len(&self) -> usize {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether nothing has been recorded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Records that failed
    #[must_use]
    pub fn failures(&self) -> Vec<StepRecord> {
        self.records()
            .into_iter()
            .filter(|r| r.status.is_failed())
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_journal_keeps_order() {
        let journal = StepJournal::new();
        journal.record(StepRecord::passed("open", Duration::from_millis(5)));
        journal.record(StepRecord::failed("click", Duration::from_millis(7), "timeout"));

        let labels: Vec<_> = journal.records().into_iter().map(|r| r.label).collect();
        assert_eq!(labels, vec!["open", "click"]);
        assert_eq!(journal.failures().len(), 1);
        assert!(!journal.is_empty());
    }

    #[test]
    fn test_record_serializes_flat_status() {
        let record = StepRecord::failed("verify total", Duration::ZERO, "mismatch");
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["status"], "failed");
        assert_eq!(json["message"], "mismatch");
        assert_eq!(json["label"], "verify total");
    }
}
