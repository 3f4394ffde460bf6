//! [`MemoryTaskStore`] — an in-process implementation of [`TaskRepository`].
//!
//! Honours the same aggregate contract as the SQL backend: ids come from
//! monotonically increasing counters, items are owned by exactly one task, and
//! deleting a task removes its items. Intended for tests and local
//! experiments; nothing is persisted.

use std::{
  collections::BTreeMap,
  sync::{Mutex, MutexGuard, PoisonError},
};

use crate::{
  Error, Result,
  store::TaskRepository,
  task::{NewTask, Task, TaskId, TaskItemId, now_micros},
};

#[derive(Debug, Default)]
struct State {
  last_task_id: TaskId,
  last_item_id: TaskItemId,
  tasks:        BTreeMap<TaskId, Task>,
}

#[derive(Debug, Default)]
pub struct MemoryTaskStore {
  state: Mutex<State>,
}

impl MemoryTaskStore {
  pub fn new() -> Self {
    Self::default()
  }

  /// Total number of items across all stored tasks.
  pub fn item_count(&self) -> usize {
    self.lock().tasks.values().map(|t| t.items.len()).sum()
  }

  /// Number of stored tasks.
  pub fn task_count(&self) -> usize {
    self.lock().tasks.len()
  }

  fn lock(&self) -> MutexGuard<'_, State> {
    // The state is only mutated after every fallible step has succeeded, so a
    // poisoned guard still holds a consistent map.
    self.state.lock().unwrap_or_else(PoisonError::into_inner)
  }
}

impl TaskRepository for MemoryTaskStore {
  async fn create(&self, task: NewTask) -> Result<Task> {
    let now = now_micros();
    let mut state = self.lock();

    state.last_task_id += 1;
    let id = state.last_task_id;
    let first_item = state.last_item_id + 1;
    state.last_item_id += task.items.len() as TaskItemId;

    let task = task.into_task(id, first_item.., now);
    state.tasks.insert(id, task.clone());
    Ok(task)
  }

  async fn get_by_id(&self, id: TaskId) -> Result<Task> {
    self.lock().tasks.get(&id).cloned().ok_or(Error::TaskNotFound(id))
  }

  async fn list(&self) -> Result<Vec<Task>> {
    let mut tasks: Vec<Task> = self.lock().tasks.values().cloned().collect();
    tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
    Ok(tasks)
  }

  async fn delete(&self, id: TaskId) -> Result<()> {
    self
      .lock()
      .tasks
      .remove(&id)
      .map(|_| ())
      .ok_or(Error::TaskNotFound(id))
  }
}
