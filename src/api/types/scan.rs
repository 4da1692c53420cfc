//! Request and response bodies for the scan API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{TaskId, TaskStats, TaskStatus};

#[derive(Debug, Clone, Deserialize)]
pub struct ScanUrlRequest {
    pub url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScanContentRequest {
    pub content: Option<String>,
}

/// Answer to an accepted URL scan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanStarted {
    pub task_id: TaskId,
    pub status: TaskStatus,
    pub message: String,
    pub check_url: String,
}

impl ScanStarted {
    pub fn new(task_id: TaskId) -> Self {
        let check_url = format!("/api/v1/task/{}", task_id);
        Self {
            task_id,
            status: TaskStatus::Processing,
            message: "URL scan started. Use task_id to check results.".to_string(),
            check_url,
        }
    }
}

/// Answer to a synchronous content scan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentScanResponse {
    pub status: TaskStatus,
    pub result: String,
    pub content_length: usize,
    pub scanned_at: DateTime<Utc>,
}

impl ContentScanResponse {
    pub fn completed(result: String, content_length: usize) -> Self {
        Self {
            status: TaskStatus::Completed,
            result,
            content_length,
            scanned_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsResponse {
    pub total_tasks: usize,
    pub processing_tasks: usize,
    pub completed_tasks: usize,
    pub failed_tasks: usize,
    pub active_api_keys: usize,
    pub timestamp: DateTime<Utc>,
}

impl StatsResponse {
    /// Stats body from task counts and the number of registered keys
    pub fn new(stats: TaskStats, active_api_keys: usize) -> Self {
        Self {
            total_tasks: stats.total,
            processing_tasks: stats.processing,
            completed_tasks: stats.completed,
            failed_tasks: stats.failed,
            active_api_keys,
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedKeyResponse {
    pub api_key: String,
    pub message: String,
}

impl GeneratedKeyResponse {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            message: "API key generated successfully".to_string(),
        }
    }
}
