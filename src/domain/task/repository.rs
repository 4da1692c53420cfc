//! Task registry trait

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{TaskId, TaskRecord, TaskStats};
use crate::domain::classification::UrlVerdict;
use crate::domain::DomainError;

/// Storage for task records shared by handlers and workers
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Insert a new record
    async fn create(&self, record: TaskRecord) -> Result<TaskRecord, DomainError>;

    async fn get(&self, id: &TaskId) -> Result<Option<TaskRecord>, DomainError>;

    /// Mark completed; a no-op returning the stored record if it already finished
    async fn complete(&self, id: &TaskId, verdict: UrlVerdict) -> Result<TaskRecord, DomainError>;

    /// Mark failed; a no-op returning the stored record if it already finished
    async fn fail(&self, id: &TaskId, error: String) -> Result<TaskRecord, DomainError>;

    async fn stats(&self) -> Result<TaskStats, DomainError>;

    /// Drop finished records that finished before `before`
    async fn purge_finished_before(&self, before: DateTime<Utc>) -> Result<u64, DomainError>;
}
