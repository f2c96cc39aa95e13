use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessStatus {
    #[default]
    Open,
    InProgress,
    Finished,
    Cancelled,
}

impl ProcessStatus {
    pub const ALL: [ProcessStatus; 4] = [
        ProcessStatus::Open,
        ProcessStatus::InProgress,
        ProcessStatus::Finished,
        ProcessStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessStatus::Open => "open",
            ProcessStatus::InProgress => "in_progress",
            ProcessStatus::Finished => "finished",
            ProcessStatus::Cancelled => "cancelled",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ProcessStatus::Open => "Open",
            ProcessStatus::InProgress => "In progress",
            ProcessStatus::Finished => "Finished",
            ProcessStatus::Cancelled => "Cancelled",
        }
    }

    pub fn parse(raw: &str) -> Option<ProcessStatus> {
        match raw.trim() {
            "open" => Some(ProcessStatus::Open),
            "in_progress" => Some(ProcessStatus::InProgress),
            "finished" => Some(ProcessStatus::Finished),
            "cancelled" => Some(ProcessStatus::Cancelled),
            _ => None,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, ProcessStatus::Open | ProcessStatus::InProgress)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProcessEntry {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub job_title: String,
    pub department: Option<String>,
    pub status: String,
    pub start_date: chrono::NaiveDate,
    pub end_date: Option<chrono::NaiveDate>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl ProcessEntry {
    pub fn is_active(&self) -> bool {
        ProcessStatus::parse(&self.status)
            .map(|s| s.is_active())
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_labels_round_trip() {
        for status in ProcessStatus::ALL {
            assert_eq!(ProcessStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(ProcessStatus::parse("archived"), None);
        assert_eq!(ProcessStatus::parse(""), None);
    }

    #[test]
    fn only_open_and_in_progress_are_active() {
        assert!(ProcessStatus::Open.is_active());
        assert!(ProcessStatus::InProgress.is_active());
        assert!(!ProcessStatus::Finished.is_active());
        assert!(!ProcessStatus::Cancelled.is_active());
    }
}
