//! Wire types for the `/tasks` endpoints and their conversions to and from
//! use-case types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use todo_core::{
  task::{TaskId, TaskItemId},
  usecase::{
    CreateTaskItemParams, CreateTaskParams, TaskItemResult, TaskListResult, TaskResult,
  },
};

use crate::{error::ApiError, validation::ValidationErrors};

// ─── Requests ────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /tasks`.
///
/// Everything is optional at the decoding stage so that a missing `title`
/// surfaces as a field-level validation error rather than a decoder error.
#[derive(Debug, Default, Deserialize)]
pub struct CreateTaskRequest {
  pub title:       Option<String>,
  pub description: Option<String>,
  pub items:       Option<Vec<CreateTaskItemRequest>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateTaskItemRequest {
  pub title:     Option<String>,
  pub completed: Option<bool>,
}

impl CreateTaskRequest {
  pub fn validate(&self) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    errors.require("Title", self.title.as_deref());
    for item in self.items.iter().flatten() {
      errors.require("Title", item.title.as_deref());
    }
    errors.into_result()
  }
}

impl TryFrom<CreateTaskRequest> for CreateTaskParams {
  type Error = ValidationErrors;

  fn try_from(req: CreateTaskRequest) -> Result<Self, Self::Error> {
    req.validate()?;
    Ok(CreateTaskParams {
      title:       req.title.unwrap_or_default(),
      description: req.description.unwrap_or_default(),
      items:       req
        .items
        .unwrap_or_default()
        .into_iter()
        .map(|item| CreateTaskItemParams {
          title:     item.title.unwrap_or_default(),
          completed: item.completed.unwrap_or(false),
        })
        .collect(),
    })
  }
}

/// Decode a JSON body. Syntax and type errors become a 400 with the decoder's
/// message.
pub fn decode_json<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
  serde_json::from_slice(body).map_err(|e| ApiError::BadRequest(e.to_string()))
}

// ─── Responses ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskResponse {
  pub id:          TaskId,
  pub title:       String,
  pub description: String,
  pub created_at:  DateTime<Utc>,
  pub updated_at:  DateTime<Utc>,
  pub items:       Vec<TaskItemResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskItemResponse {
  pub id:         TaskItemId,
  pub task_id:    TaskId,
  pub title:      String,
  pub completed:  bool,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskListResponse {
  pub tasks: Vec<TaskResponse>,
}

impl From<TaskResult> for TaskResponse {
  fn from(r: TaskResult) -> Self {
    TaskResponse {
      id:          r.id,
      title:       r.title,
      description: r.description,
      created_at:  r.created_at,
      updated_at:  r.updated_at,
      items:       r.items.into_iter().map(TaskItemResponse::from).collect(),
    }
  }
}

impl From<TaskItemResult> for TaskItemResponse {
  fn from(r: TaskItemResult) -> Self {
    TaskItemResponse {
      id:         r.id,
      task_id:    r.task_id,
      title:      r.title,
      completed:  r.completed,
      created_at: r.created_at,
      updated_at: r.updated_at,
    }
  }
}

impl From<TaskListResult> for TaskListResponse {
  fn from(r: TaskListResult) -> Self {
    TaskListResponse { tasks: r.tasks.into_iter().map(TaskResponse::from).collect() }
  }
}
