//! [`PgTaskStore`] — the PostgreSQL implementation of [`TaskRepository`].

use sqlx::{PgPool, Postgres, QueryBuilder};
use todo_core::{
  store::TaskRepository,
  task::{NewTask, Task, TaskId, now_micros},
};

use crate::{
  DatabaseConfig, Error, Result,
  rows::{AGGREGATE_COLUMNS, AggregateRow, assemble},
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A task store backed by a PostgreSQL connection pool.
///
/// Cloning is cheap; the pool is reference-counted.
#[derive(Debug, Clone)]
pub struct PgTaskStore {
  pool: PgPool,
}

impl PgTaskStore {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }

  /// Open a pool sized by `config.pool` and check that the database answers.
  pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
    let pool = config
      .pool
      .pool_options()
      .connect_with(config.connect_options()?)
      .await?;

    tracing::info!(
      host      = %config.host,
      port      = config.port,
      database  = %config.name,
      min_conns = config.pool.min_conns,
      max_conns = config.pool.max_conns,
      "database connection established"
    );

    Ok(Self { pool })
  }

  pub fn pool(&self) -> &PgPool {
    &self.pool
  }

  /// Wait for checked-out connections to return, then close the pool.
  pub async fn close(&self) {
    self.pool.close().await;
  }

  async fn insert_aggregate(&self, task: NewTask) -> Result<Task> {
    let now = now_micros();
    let stamp = now.naive_utc();

    // Dropping `tx` without committing rolls the whole aggregate back.
    let mut tx = self.pool.begin().await?;

    let id: TaskId = sqlx::query_scalar(
      "INSERT INTO tasks (title, description, created_at, updated_at)
       VALUES ($1, $2, $3, $3)
       RETURNING id",
    )
    .bind(&task.title)
    .bind(&task.description)
    .bind(stamp)
    .fetch_one(&mut *tx)
    .await?;

    let mut item_ids: Vec<i64> = Vec::with_capacity(task.items.len());
    if !task.items.is_empty() {
      let mut insert = QueryBuilder::<Postgres>::new(
        "INSERT INTO task_items (task_id, title, completed, created_at, updated_at) ",
      );
      insert.push_values(&task.items, |mut row, item| {
        row
          .push_bind(id)
          .push_bind(item.title.clone())
          .push_bind(item.completed)
          .push_bind(stamp)
          .push_bind(stamp);
      });
      insert.push(" RETURNING id");

      item_ids = insert
        .build_query_scalar::<i64>()
        .fetch_all(&mut *tx)
        .await?;
      // BIGSERIAL hands out ids in VALUES order, so ascending ids line up with
      // the input items.
      item_ids.sort_unstable();
    }

    tx.commit().await?;

    tracing::debug!(task_id = id, items = item_ids.len(), "task created");
    Ok(task.into_task(id, item_ids, now))
  }

  async fn select_one(&self, id: TaskId) -> Result<Task> {
    let rows: Vec<AggregateRow> = sqlx::query_as(&format!(
      "SELECT {AGGREGATE_COLUMNS}
       FROM tasks t
       LEFT JOIN task_items i ON i.task_id = t.id
       WHERE t.id = $1
       ORDER BY i.id ASC"
    ))
    .bind(id)
    .fetch_all(&self.pool)
    .await?;

    assemble(rows).into_iter().next().ok_or(Error::TaskNotFound(id))
  }

  async fn select_all(&self) -> Result<Vec<Task>> {
    let rows: Vec<AggregateRow> = sqlx::query_as(&format!(
      "SELECT {AGGREGATE_COLUMNS}
       FROM tasks t
       LEFT JOIN task_items i ON i.task_id = t.id
       ORDER BY t.created_at DESC, t.id DESC, i.id ASC"
    ))
    .fetch_all(&self.pool)
    .await?;

    Ok(assemble(rows))
  }

  async fn delete_row(&self, id: TaskId) -> Result<()> {
    // `task_items.task_id` cascades, so items go with the task.
    let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
      .bind(id)
      .execute(&self.pool)
      .await?;

    if result.rows_affected() == 0 {
      return Err(Error::TaskNotFound(id));
    }

    tracing::debug!(task_id = id, "task deleted");
    Ok(())
  }
}

// ─── TaskRepository impl ─────────────────────────────────────────────────────

impl TaskRepository for PgTaskStore {
  async fn create(&self, task: NewTask) -> todo_core::Result<Task> {
    Ok(self.insert_aggregate(task).await?)
  }

  async fn get_by_id(&self, id: TaskId) -> todo_core::Result<Task> {
    Ok(self.select_one(id).await?)
  }

  async fn list(&self) -> todo_core::Result<Vec<Task>> {
    Ok(self.select_all().await?)
  }

  async fn delete(&self, id: TaskId) -> todo_core::Result<()> {
    Ok(self.delete_row(id).await?)
  }
}
