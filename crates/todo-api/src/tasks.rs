//! Handlers for `/tasks` endpoints.
//!
//! | Method   | Path         | Notes |
//! |----------|--------------|-------|
//! | `POST`   | `/tasks`     | Body: [`CreateTaskRequest`]; returns 201 + [`TaskResponse`] |
//! | `GET`    | `/tasks`     | Returns [`TaskListResponse`], newest first |
//! | `GET`    | `/tasks/:id` | 400 if `id` is not an integer, 404 if absent |
//! | `DELETE` | `/tasks/:id` | 204 with an empty body |

use std::sync::Arc;

use axum::{
  Json,
  body::Bytes,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use todo_core::{
  task::TaskId,
  usecase::{CreateTaskParams, TaskUseCase},
};

use crate::{
  dto::{CreateTaskRequest, TaskListResponse, TaskResponse, decode_json},
  error::ApiError,
};

fn parse_id(raw: &str) -> Result<TaskId, ApiError> {
  raw.parse().map_err(|_| ApiError::InvalidId)
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /tasks`
///
/// The body is read as raw bytes so that a missing `Content-Type` header is
/// not an error.
pub async fn create<U>(
  State(usecase): State<Arc<U>>,
  body: Bytes,
) -> Result<impl IntoResponse, ApiError>
where
  U: TaskUseCase + 'static,
{
  let request: CreateTaskRequest = decode_json(&body)?;
  let params = CreateTaskParams::try_from(request).map_err(ApiError::Validation)?;

  let task = usecase.create_task(params).await?;
  tracing::info!(task_id = task.id, items = task.items.len(), "task created");
  Ok((StatusCode::CREATED, Json(TaskResponse::from(task))))
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /tasks`
pub async fn list<U>(State(usecase): State<Arc<U>>) -> Result<Json<TaskListResponse>, ApiError>
where
  U: TaskUseCase + 'static,
{
  let tasks = usecase.list_tasks().await?;
  Ok(Json(tasks.into()))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /tasks/:id`
pub async fn get_one<U>(
  State(usecase): State<Arc<U>>,
  Path(id): Path<String>,
) -> Result<Json<TaskResponse>, ApiError>
where
  U: TaskUseCase + 'static,
{
  let id = parse_id(&id)?;
  let task = usecase.get_task(id).await?;
  Ok(Json(task.into()))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /tasks/:id`
pub async fn delete_one<U>(
  State(usecase): State<Arc<U>>,
  Path(id): Path<String>,
) -> Result<StatusCode, ApiError>
where
  U: TaskUseCase + 'static,
{
  let id = parse_id(&id)?;
  usecase.delete_task(id).await?;
  tracing::info!(task_id = id, "task deleted");
  Ok(StatusCode::NO_CONTENT)
}
