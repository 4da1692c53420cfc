//! Task registry and background scan workers

mod in_memory;
mod queue;

pub use in_memory::InMemoryTaskRepository;
pub use queue::{spawn_retention_sweeper, ScanJob, TaskQueue, TaskQueueConfig};
