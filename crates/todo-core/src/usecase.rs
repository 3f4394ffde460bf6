//! Task use-cases: input validation, aggregate construction and conversion of
//! stored aggregates into transport-neutral results.

use std::future::Future;

use chrono::{DateTime, Utc};

use crate::{
  Error, Result,
  store::TaskRepository,
  task::{NewTask, NewTaskItem, Task, TaskId, TaskItem, TaskItemId},
};

// ─── Params ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CreateTaskParams {
  pub title:       String,
  pub description: String,
  pub items:       Vec<CreateTaskItemParams>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CreateTaskItemParams {
  pub title:     String,
  pub completed: bool,
}

// ─── Results ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskResult {
  pub id:          TaskId,
  pub title:       String,
  pub description: String,
  pub created_at:  DateTime<Utc>,
  pub updated_at:  DateTime<Utc>,
  pub items:       Vec<TaskItemResult>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskItemResult {
  pub id:         TaskItemId,
  pub task_id:    TaskId,
  pub title:      String,
  pub completed:  bool,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaskListResult {
  pub tasks: Vec<TaskResult>,
}

impl From<Task> for TaskResult {
  fn from(task: Task) -> Self {
    TaskResult {
      id:          task.id,
      title:       task.title,
      description: task.description,
      created_at:  task.created_at,
      updated_at:  task.updated_at,
      items:       task.items.into_iter().map(TaskItemResult::from).collect(),
    }
  }
}

impl From<TaskItem> for TaskItemResult {
  fn from(item: TaskItem) -> Self {
    TaskItemResult {
      id:         item.id,
      task_id:    item.task_id,
      title:      item.title,
      completed:  item.completed,
      created_at: item.created_at,
      updated_at: item.updated_at,
    }
  }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// The operations the HTTP adapter may invoke.
///
/// Input errors are reported as [`Error::Invalid`]; repository errors pass
/// through unchanged.
pub trait TaskUseCase: Send + Sync {
  fn create_task(
    &self,
    params: CreateTaskParams,
  ) -> impl Future<Output = Result<TaskResult>> + Send + '_;

  fn get_task(&self, id: TaskId) -> impl Future<Output = Result<TaskResult>> + Send + '_;

  fn list_tasks(&self) -> impl Future<Output = Result<TaskListResult>> + Send + '_;

  fn delete_task(&self, id: TaskId) -> impl Future<Output = Result<()>> + Send + '_;
}

// ─── Service ─────────────────────────────────────────────────────────────────

/// Stateless [`TaskUseCase`] implementation over any [`TaskRepository`].
#[derive(Debug, Clone)]
pub struct TaskService<R> {
  repo: R,
}

impl<R: TaskRepository> TaskService<R> {
  pub fn new(repo: R) -> Self {
    Self { repo }
  }
}

fn validate_id(id: TaskId) -> Result<()> {
  if id <= 0 {
    return Err(Error::Invalid("invalid task ID".to_string()));
  }
  Ok(())
}

impl TryFrom<CreateTaskParams> for NewTask {
  type Error = Error;

  fn try_from(params: CreateTaskParams) -> Result<Self> {
    if params.title.is_empty() {
      return Err(Error::Invalid("task title is required".to_string()));
    }

    let items = params
      .items
      .into_iter()
      .map(|item| {
        if item.title.is_empty() {
          return Err(Error::Invalid("task item title is required".to_string()));
        }
        Ok(NewTaskItem { title: item.title, completed: item.completed })
      })
      .collect::<Result<Vec<_>>>()?;

    Ok(NewTask { title: params.title, description: params.description, items })
  }
}

impl<R: TaskRepository> TaskUseCase for TaskService<R> {
  async fn create_task(&self, params: CreateTaskParams) -> Result<TaskResult> {
    let task = NewTask::try_from(params)?;
    let stored = self.repo.create(task).await?;
    Ok(stored.into())
  }

  async fn get_task(&self, id: TaskId) -> Result<TaskResult> {
    validate_id(id)?;
    Ok(self.repo.get_by_id(id).await?.into())
  }

  async fn list_tasks(&self) -> Result<TaskListResult> {
    let tasks = self.repo.list().await?;
    Ok(TaskListResult { tasks: tasks.into_iter().map(TaskResult::from).collect() })
  }

  async fn delete_task(&self, id: TaskId) -> Result<()> {
    validate_id(id)?;
    self.repo.delete(id).await
  }
}
