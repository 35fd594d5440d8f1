//! Task snapshot pushed to dashboards
//!
//! Tasks are persisted elsewhere; this is only the shape clients receive in
//! `task_update` events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    Running,
    Completed,
    Failed,
    Cancelled,
}

impl TaskStatus {
    /// Whether the task has stopped and will not change again
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Cancelled)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskSnapshot {
    pub id: i64,
    pub title: String,
    pub task_type: String,
    pub url: String,
    pub status: TaskStatus,
    /// 0-100
    pub progress: u8,
    pub created_at: Option<DateTime<Utc>>,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
    pub has_result: bool,
    pub error: Option<String>,
}

impl TaskSnapshot {
    /// Freshly created task: pending, no progress, created now
    pub fn new(
        id: i64,
        title: impl Into<String>,
        task_type: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            task_type: task_type.into(),
            url: url.into(),
            status: TaskStatus::Pending,
            progress: 0,
            created_at: Some(Utc::now()),
            started_at: None,
            finished_at: None,
            has_result: false,
            error: None,
        }
    }
}
