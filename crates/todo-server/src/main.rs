//! `todo-app` — task list HTTP service backed by PostgreSQL.
//!
//! # Usage
//!
//! ```text
//! todo-app migrate up --db-host localhost
//! todo-app serve --config config.yaml --server-port 8080
//! todo-app migrate down
//! ```

mod cli;
mod settings;
mod telemetry;

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use todo_core::usecase::TaskService;
use todo_store_postgres::PgTaskStore;
use tokio::net::TcpListener;

use crate::{
  cli::{Cli, Command, MigrateCommand},
  settings::{ServerMode, Settings},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  let cli = Cli::parse();

  let settings = match &cli.command {
    Command::Serve(args) => args.settings(),
    Command::Migrate(MigrateCommand::Up(args) | MigrateCommand::Down(args)) => args.settings(),
  }?;
  telemetry::init(&settings.log)?;

  let result = match cli.command {
    Command::Serve(_) => serve(settings).await,
    Command::Migrate(MigrateCommand::Up(_)) => migrate(settings, Direction::Up).await,
    Command::Migrate(MigrateCommand::Down(_)) => migrate(settings, Direction::Down).await,
  };

  if let Err(err) = &result {
    tracing::error!(error = format!("{err:#}"), "fatal error");
  }
  result
}

// ─── Serve ────────────────────────────────────────────────────────────────────

async fn serve(settings: Settings) -> anyhow::Result<()> {
  let store = PgTaskStore::connect(&settings.db)
    .await
    .context("failed to connect to database")?;
  store.migrate_up().await.context("failed to run migrations")?;

  let service = TaskService::new(store.clone());
  let app = todo_api::router(Arc::new(service));

  if settings.server.mode == ServerMode::Debug {
    for (method, path) in todo_api::ROUTES {
      tracing::debug!(method, path, "route registered");
    }
  }

  let address = SocketAddr::from(([0, 0, 0, 0], settings.server.port));
  let listener = TcpListener::bind(address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  tracing::info!(%address, mode = %settings.server.mode, "listening");
  axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

  store.close().await;
  tracing::info!("server stopped");
  Ok(())
}

async fn shutdown_signal() {
  let ctrl_c = async {
    if let Err(err) = tokio::signal::ctrl_c().await {
      tracing::warn!(error = %err, "failed to listen for ctrl-c");
      std::future::pending::<()>().await;
    }
  };

  #[cfg(unix)]
  let terminate = async {
    match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
      Ok(mut sigterm) => {
        sigterm.recv().await;
      }
      Err(err) => {
        tracing::warn!(error = %err, "failed to listen for SIGTERM");
        std::future::pending::<()>().await;
      }
    }
  };

  #[cfg(not(unix))]
  let terminate = std::future::pending::<()>();

  tokio::select! {
    () = ctrl_c => {},
    () = terminate => {},
  }
  tracing::info!("shutdown signal received, draining connections");
}

// ─── Migrate ──────────────────────────────────────────────────────────────────

enum Direction {
  Up,
  Down,
}

async fn migrate(settings: Settings, direction: Direction) -> anyhow::Result<()> {
  let store = PgTaskStore::connect(&settings.db)
    .await
    .context("failed to connect to database")?;

  let outcome = match direction {
    Direction::Up => store.migrate_up().await.context("failed to apply migrations"),
    Direction::Down => store.migrate_down().await.context("failed to revert migrations"),
  };

  store.close().await;
  outcome
}
