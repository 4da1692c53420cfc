//! Bounded scan queue drained by a fixed pool of workers

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::domain::classification::Classifier;
use crate::domain::task::{TaskId, TaskRepository};
use crate::domain::DomainError;
use crate::infrastructure::observability::record_task_finished;

/// One queued URL scan
#[derive(Debug, Clone)]
pub struct ScanJob {
    pub task_id: TaskId,
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct TaskQueueConfig {
    pub concurrency: usize,
    pub queue_capacity: usize,
    pub processing_delay: Duration,
}

impl Default for TaskQueueConfig {
    fn default() -> Self {
        Self {
            concurrency: 4,
            queue_capacity: 256,
            processing_delay: Duration::from_millis(2000),
        }
    }
}

/// Handle used by request handlers to submit scans
///
/// Workers stop once every handle has been dropped and the queue is drained.
#[derive(Debug, Clone)]
pub struct TaskQueue {
    sender: mpsc::Sender<ScanJob>,
}

impl TaskQueue {
    /// Spawn the worker pool. Must be called inside a tokio runtime.
    pub fn start(
        config: TaskQueueConfig,
        classifier: Arc<Classifier>,
        repository: Arc<dyn TaskRepository>,
    ) -> Self {
        let (sender, receiver) = mpsc::channel(config.queue_capacity.max(1));
        let receiver = Arc::new(Mutex::new(receiver));
        let concurrency = config.concurrency.max(1);

        for worker_id in 0..concurrency {
            tokio::spawn(run_worker(
                worker_id,
                receiver.clone(),
                classifier.clone(),
                repository.clone(),
                config.processing_delay,
            ));
        }

        info!(
            concurrency,
            queue_capacity = config.queue_capacity,
            "Scan workers started"
        );

        Self { sender }
    }

    /// Queue a scan without waiting; fails when the queue is full or closed
    pub fn enqueue(&self, job: ScanJob) -> Result<(), DomainError> {
        self.sender.try_send(job).map_err(|e| match e {
            mpsc::error::TrySendError::Full(job) => {
                warn!(task_id = %job.task_id, "Scan queue is full");
                DomainError::queue("Scan queue is full")
            }
            mpsc::error::TrySendError::Closed(job) => {
                error!(task_id = %job.task_id, "Scan queue is closed");
                DomainError::queue("Scan queue is closed")
            }
        })
    }
}

async fn run_worker(
    worker_id: usize,
    receiver: Arc<Mutex<mpsc::Receiver<ScanJob>>>,
    classifier: Arc<Classifier>,
    repository: Arc<dyn TaskRepository>,
    processing_delay: Duration,
) {
    loop {
        let job = {
            let mut receiver = receiver.lock().await;
            receiver.recv().await
        };

        let Some(job) = job else {
            debug!(worker_id, "Scan queue closed, worker exiting");
            return;
        };

        process_job(&job, &classifier, repository.as_ref(), processing_delay).await;
    }
}

async fn process_job(
    job: &ScanJob,
    classifier: &Classifier,
    repository: &dyn TaskRepository,
    processing_delay: Duration,
) {
    let start = Instant::now();

    if !processing_delay.is_zero() {
        tokio::time::sleep(processing_delay).await;
    }

    match classifier.classify_url(&job.url).await {
        Ok(verdict) => {
            let result = verdict.raw.clone();
            let malicious = verdict.category.is_some_and(|c| c.is_malicious());
            match repository.complete(&job.task_id, verdict).await {
                Ok(_) => {
                    record_task_finished("completed", start.elapsed());
                    info!(task_id = %job.task_id, result = %result, malicious, "URL scan completed");
                }
                Err(e) => {
                    error!(task_id = %job.task_id, error = %e, "Failed to store scan result");
                }
            }
        }
        Err(e) => {
            let message = e.to_string();
            match repository.fail(&job.task_id, message.clone()).await {
                Ok(_) => {
                    record_task_finished("failed", start.elapsed());
                    warn!(task_id = %job.task_id, error = %message, "URL scan failed");
                }
                Err(store_err) => {
                    error!(
                        task_id = %job.task_id,
                        error = %store_err,
                        "Failed to store scan failure"
                    );
                }
            }
        }
    }
}

/// Periodically purge finished tasks older than `retention`
pub fn spawn_retention_sweeper(
    repository: Arc<dyn TaskRepository>,
    retention: Duration,
) -> JoinHandle<()> {
    let period = (retention / 4).clamp(Duration::from_secs(1), Duration::from_secs(300));

    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);

        loop {
            interval.tick().await;

            let Ok(retention) = chrono::Duration::from_std(retention) else {
                error!("Task retention window is out of range, sweeper stopped");
                return;
            };

            match repository.purge_finished_before(Utc::now() - retention).await {
                Ok(0) => {}
                Ok(purged) => info!(purged, "Purged finished tasks"),
                Err(e) => warn!(error = %e, "Failed to purge finished tasks"),
            }
        }
    })
}
