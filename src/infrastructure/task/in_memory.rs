//! In-memory task registry

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::domain::classification::UrlVerdict;
use crate::domain::task::{TaskId, TaskRecord, TaskRepository, TaskStats};
use crate::domain::DomainError;

#[derive(Debug, Default)]
pub struct InMemoryTaskRepository {
    tasks: Arc<RwLock<HashMap<TaskId, TaskRecord>>>,
}

impl InMemoryTaskRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn task_not_found(id: &TaskId) -> DomainError {
    DomainError::not_found(format!("Task '{}'", id))
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn create(&self, record: TaskRecord) -> Result<TaskRecord, DomainError> {
        let mut tasks = self.tasks.write().await;

        if tasks.contains_key(&record.task_id) {
            return Err(DomainError::internal(format!(
                "Task '{}' already exists",
                record.task_id
            )));
        }

        tasks.insert(record.task_id.clone(), record.clone());
        Ok(record)
    }

    async fn get(&self, id: &TaskId) -> Result<Option<TaskRecord>, DomainError> {
        let tasks = self.tasks.read().await;
        Ok(tasks.get(id).cloned())
    }

    async fn complete(&self, id: &TaskId, verdict: UrlVerdict) -> Result<TaskRecord, DomainError> {
        let mut tasks = self.tasks.write().await;
        let record = tasks.get_mut(id).ok_or_else(|| task_not_found(id))?;

        record.complete(verdict);
        Ok(record.clone())
    }

    async fn fail(&self, id: &TaskId, error: String) -> Result<TaskRecord, DomainError> {
        let mut tasks = self.tasks.write().await;
        let record = tasks.get_mut(id).ok_or_else(|| task_not_found(id))?;

        record.fail(error);
        Ok(record.clone())
    }

    async fn stats(&self) -> Result<TaskStats, DomainError> {
        let tasks = self.tasks.read().await;

        let mut stats = TaskStats::default();
        for record in tasks.values() {
            stats.count(record.status);
        }

        Ok(stats)
    }

    async fn purge_finished_before(&self, before: DateTime<Utc>) -> Result<u64, DomainError> {
        let mut tasks = self.tasks.write().await;
        let initial = tasks.len();

        tasks.retain(|_, record| record.finished_at().is_none_or(|finished| finished >= before));

        Ok((initial - tasks.len()) as u64)
    }
}
