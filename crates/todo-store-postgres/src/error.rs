//! Error type for `todo-store-postgres`.

use thiserror::Error;
use todo_core::task::TaskId;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] sqlx::Error),

  #[error("migration error: {0}")]
  Migrate(#[from] sqlx::migrate::MigrateError),

  #[error("invalid ssl mode: {0:?}")]
  InvalidSslMode(String),

  #[error("task not found: {0}")]
  TaskNotFound(TaskId),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl From<Error> for todo_core::Error {
  fn from(err: Error) -> Self {
    match err {
      Error::TaskNotFound(id) => todo_core::Error::TaskNotFound(id),
      other => todo_core::Error::store(other),
    }
  }
}
