//! Background URL scan tasks

mod entity;
mod repository;

pub use entity::{TaskId, TaskRecord, TaskStats, TaskStatus};
pub use repository::TaskRepository;
