//! Task records

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::classification::{UrlCategory, UrlVerdict};

/// Task identifier (UUID v4, hyphenated)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for TaskId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for TaskId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Status of a scan task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Queued or being worked on
    #[default]
    Processing,

    /// Classification finished
    Completed,

    /// Classification raised an error
    Failed,
}

impl TaskStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Processing => write!(f, "processing"),
            Self::Completed => write!(f, "completed"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// The stored state of one URL scan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub task_id: TaskId,
    pub status: TaskStatus,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<UrlCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_at: Option<DateTime<Utc>>,
}

impl TaskRecord {
    /// A freshly queued scan of `url`
    pub fn processing(task_id: TaskId, url: impl Into<String>) -> Self {
        Self {
            task_id,
            status: TaskStatus::Processing,
            url: url.into(),
            result: None,
            category: None,
            error: None,
            created_at: Utc::now(),
            completed_at: None,
            failed_at: None,
        }
    }

    /// Record the verdict. Returns false if the task already finished.
    pub fn complete(&mut self, verdict: UrlVerdict) -> bool {
        if self.status.is_terminal() {
            return false;
        }

        self.status = TaskStatus::Completed;
        self.result = Some(verdict.raw);
        self.category = verdict.category;
        self.completed_at = Some(Utc::now());
        true
    }

    /// Record the failure. Returns false if the task already finished.
    pub fn fail(&mut self, error: impl Into<String>) -> bool {
        if self.status.is_terminal() {
            return false;
        }

        self.status = TaskStatus::Failed;
        self.error = Some(error.into());
        self.failed_at = Some(Utc::now());
        true
    }

    /// When the task left `processing`, if it has
    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at.or(self.failed_at)
    }
}

/// Aggregate counts over the registry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TaskStats {
    pub total: usize,
    pub processing: usize,
    pub completed: usize,
    pub failed: usize,
}

impl TaskStats {
    pub fn count(&mut self, status: TaskStatus) {
        self.total += 1;
        match status {
            TaskStatus::Processing => self.processing += 1,
            TaskStatus::Completed => self.completed += 1,
            TaskStatus::Failed => self.failed += 1,
        }
    }
}
