//! Error types for `todo-core`.

use thiserror::Error;

use crate::task::TaskId;

#[derive(Debug, Error)]
pub enum Error {
  /// No task row matched the supplied id.
  #[error("task not found")]
  TaskNotFound(TaskId),

  /// Caller-supplied input was rejected before reaching the store.
  #[error("{0}")]
  Invalid(String),

  #[error(transparent)]
  Store(Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Wrap a backend-specific error as a pass-through store failure.
  pub fn store<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Error::Store(Box::new(err))
  }

  pub fn is_not_found(&self) -> bool {
    matches!(self, Error::TaskNotFound(_))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
