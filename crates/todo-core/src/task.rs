//! The task aggregate root and its owned items.
//!
//! A task and its items are persisted, read and deleted as one unit. Items
//! carry their parent's id as a plain foreign key value; there is no
//! back-reference.

use chrono::{DateTime, SubsecRound as _, Utc};
use serde::{Deserialize, Serialize};

pub type TaskId = i64;
pub type TaskItemId = i64;

/// A persisted task together with its items, ordered by item id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
  pub id:          TaskId,
  pub title:       String,
  pub description: String,
  pub created_at:  DateTime<Utc>,
  pub updated_at:  DateTime<Utc>,
  pub items:       Vec<TaskItem>,
}

/// A persisted item. Only ever created and destroyed with its parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskItem {
  pub id:         TaskItemId,
  pub task_id:    TaskId,
  pub title:      String,
  pub completed:  bool,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// A task that has not been stored yet. Ids and timestamps are assigned by
/// the store.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewTask {
  pub title:       String,
  pub description: String,
  pub items:       Vec<NewTaskItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewTaskItem {
  pub title:     String,
  pub completed: bool,
}

impl NewTask {
  pub fn new(title: impl Into<String>) -> Self {
    Self { title: title.into(), ..Self::default() }
  }

  pub fn with_description(mut self, description: impl Into<String>) -> Self {
    self.description = description.into();
    self
  }

  pub fn with_item(mut self, title: impl Into<String>, completed: bool) -> Self {
    self.items.push(NewTaskItem { title: title.into(), completed });
    self
  }

  /// Materialise the aggregate once the store has assigned ids.
  ///
  /// `item_ids` must be in the same order as `self.items`. Both timestamps of
  /// the task and of every item are set to `now`.
  pub fn into_task(
    self,
    id:       TaskId,
    item_ids: impl IntoIterator<Item = TaskItemId>,
    now:      DateTime<Utc>,
  ) -> Task {
    let items = self
      .items
      .into_iter()
      .zip(item_ids)
      .map(|(item, item_id)| TaskItem {
        id:         item_id,
        task_id:    id,
        title:      item.title,
        completed:  item.completed,
        created_at: now,
        updated_at: now,
      })
      .collect();

    Task {
      id,
      title: self.title,
      description: self.description,
      created_at: now,
      updated_at: now,
      items,
    }
  }
}

/// Current time at the precision a SQL `TIMESTAMP` column keeps, so a value
/// handed back on insert compares equal to the one read back later.
pub fn now_micros() -> DateTime<Utc> {
  Utc::now().trunc_subsecs(6)
}
