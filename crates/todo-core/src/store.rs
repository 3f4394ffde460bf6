//! The `TaskRepository` trait.
//!
//! Implemented by storage backends (e.g. `todo-store-postgres`). The use-case
//! layer depends on this abstraction, not on any concrete backend.

use std::future::Future;

use crate::{
  Result,
  task::{NewTask, Task, TaskId},
};

/// Aggregate-level persistence for tasks.
///
/// The repository is the only writer of task data and owns transactional
/// boundaries: a task and its items are inserted atomically and removed
/// together.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`). Dropping a returned future before
/// it completes abandons the operation; an uncommitted write is rolled back.
pub trait TaskRepository: Send + Sync {
  /// Persist `task` and all of its items in a single transaction.
  ///
  /// Both timestamps of the task and every item are set to the same `now`.
  /// Returns the stored aggregate with every id assigned.
  fn create(&self, task: NewTask) -> impl Future<Output = Result<Task>> + Send + '_;

  /// Fetch one task with all of its items, ordered by item id.
  ///
  /// Fails with [`Error::TaskNotFound`](crate::Error::TaskNotFound) if no task
  /// has this id.
  fn get_by_id(&self, id: TaskId) -> impl Future<Output = Result<Task>> + Send + '_;

  /// Every task with its items, newest `created_at` first.
  fn list(&self) -> impl Future<Output = Result<Vec<Task>>> + Send + '_;

  /// Delete a task; its items go with it.
  ///
  /// Fails with [`Error::TaskNotFound`](crate::Error::TaskNotFound) if nothing
  /// was deleted.
  fn delete(&self, id: TaskId) -> impl Future<Output = Result<()>> + Send + '_;
}

impl<R: TaskRepository> TaskRepository for std::sync::Arc<R> {
  fn create(&self, task: NewTask) -> impl Future<Output = Result<Task>> + Send + '_ {
    (**self).create(task)
  }

  fn get_by_id(&self, id: TaskId) -> impl Future<Output = Result<Task>> + Send + '_ {
    (**self).get_by_id(id)
  }

  fn list(&self) -> impl Future<Output = Result<Vec<Task>>> + Send + '_ {
    (**self).list()
  }

  fn delete(&self, id: TaskId) -> impl Future<Output = Result<()>> + Send + '_ {
    (**self).delete(id)
  }
}
