//! Row types and the fold from joined `tasks ⟕ task_items` rows back into
//! aggregates.

use chrono::NaiveDateTime;
use todo_core::task::{Task, TaskItem};

/// Column list shared by every aggregate read. `t` is `tasks`, `i` is the
/// left-joined `task_items`.
pub(crate) const AGGREGATE_COLUMNS: &str = "
  t.id, t.title, t.description, t.created_at, t.updated_at,
  i.id         AS item_id,
  i.title      AS item_title,
  i.completed  AS item_completed,
  i.created_at AS item_created_at,
  i.updated_at AS item_updated_at";

/// One row of the task/item join. Item columns are `NULL` for a task without
/// items.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct AggregateRow {
  pub id:              i64,
  pub title:           String,
  pub description:     Option<String>,
  pub created_at:      NaiveDateTime,
  pub updated_at:      NaiveDateTime,
  pub item_id:         Option<i64>,
  pub item_title:      Option<String>,
  pub item_completed:  Option<bool>,
  pub item_created_at: Option<NaiveDateTime>,
  pub item_updated_at: Option<NaiveDateTime>,
}

impl AggregateRow {
  fn item(&mut self) -> Option<TaskItem> {
    let id = self.item_id?;
    Some(TaskItem {
      id,
      task_id:    self.id,
      title:      self.item_title.take().unwrap_or_default(),
      completed:  self.item_completed.unwrap_or(false),
      created_at: self.item_created_at.unwrap_or(self.created_at).and_utc(),
      updated_at: self.item_updated_at.unwrap_or(self.updated_at).and_utc(),
    })
  }

  fn into_task(self) -> Task {
    Task {
      id:          self.id,
      title:       self.title,
      description: self.description.unwrap_or_default(),
      created_at:  self.created_at.and_utc(),
      updated_at:  self.updated_at.and_utc(),
      items:       Vec::new(),
    }
  }
}

/// Fold joined rows into aggregates.
///
/// Rows must arrive grouped by task id (i.e. ordered by the task sort key
/// first) and by item id within each task; the resulting order is preserved.
pub(crate) fn assemble(rows: Vec<AggregateRow>) -> Vec<Task> {
  let mut tasks: Vec<Task> = Vec::new();

  for mut row in rows {
    let item = row.item();
    if tasks.last().is_none_or(|task| task.id != row.id) {
      tasks.push(row.into_task());
    }
    if let (Some(task), Some(item)) = (tasks.last_mut(), item) {
      task.items.push(item);
    }
  }

  tasks
}
