//! Command-line interface.
//!
//! Every flag also reads an environment variable. Flags are `Option`s so a
//! value that was actually given (on the command line or in the environment)
//! can be told apart from one that was not, and only the former overrides the
//! config file.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::settings::{LogLevel, ServerMode, Settings};

#[derive(Parser, Debug)]
#[command(name = "todo-app", version, about = "Task list HTTP service backed by PostgreSQL")]
pub struct Cli {
  #[command(subcommand)]
  pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
  /// Apply pending migrations, then serve the HTTP API.
  Serve(ServeArgs),

  /// Apply or revert the database schema.
  #[command(subcommand)]
  Migrate(MigrateCommand),
}

#[derive(Subcommand, Debug)]
pub enum MigrateCommand {
  /// Apply every pending migration.
  Up(CommonArgs),
  /// Revert every applied migration.
  Down(CommonArgs),
}

// ─── Argument groups ──────────────────────────────────────────────────────────

#[derive(Args, Debug)]
pub struct ServeArgs {
  #[command(flatten)]
  pub common: CommonArgs,
  #[command(flatten)]
  pub pool:   PoolArgs,
  #[command(flatten)]
  pub server: ServerArgs,
}

/// Flags shared by every subcommand.
#[derive(Args, Debug)]
pub struct CommonArgs {
  /// Path to the YAML configuration file.
  #[arg(short, long, env = "CONFIG_FILE", default_value = "config.yaml", value_name = "FILE")]
  pub config: PathBuf,
  #[command(flatten)]
  pub db:     DbArgs,
  #[command(flatten)]
  pub log:    LogArgs,
}

#[derive(Args, Debug, Default)]
pub struct DbArgs {
  #[arg(long, env = "DB_HOST")]
  pub db_host:     Option<String>,
  #[arg(long, env = "DB_PORT")]
  pub db_port:     Option<u16>,
  #[arg(long, env = "DB_USER")]
  pub db_user:     Option<String>,
  #[arg(long, env = "DB_PASSWORD", hide_env_values = true)]
  pub db_password: Option<String>,
  #[arg(long, env = "DB_NAME")]
  pub db_name:     Option<String>,
  /// libpq sslmode (`disable`, `prefer`, `require`, ...).
  #[arg(long, env = "DB_SSLMODE")]
  pub db_sslmode:  Option<String>,
}

#[derive(Args, Debug, Default)]
pub struct PoolArgs {
  #[arg(long, env = "DB_POOL_MIN_CONNS")]
  pub db_pool_min_conns:          Option<u32>,
  #[arg(long, env = "DB_POOL_MAX_CONNS")]
  pub db_pool_max_conns:          Option<u32>,
  /// Minutes.
  #[arg(long, env = "DB_POOL_MAX_CONN_LIFETIME", value_name = "MINUTES")]
  pub db_pool_max_conn_lifetime:  Option<u64>,
  /// Minutes.
  #[arg(long, env = "DB_POOL_MAX_CONN_IDLE_TIME", value_name = "MINUTES")]
  pub db_pool_max_conn_idle_time: Option<u64>,
}

#[derive(Args, Debug, Default)]
pub struct ServerArgs {
  #[arg(long, env = "SERVER_PORT")]
  pub server_port: Option<u16>,
  #[arg(long, env = "SERVER_MODE", value_enum)]
  pub server_mode: Option<ServerMode>,
}

#[derive(Args, Debug, Default)]
pub struct LogArgs {
  #[arg(long, env = "LOG_LEVEL", value_enum)]
  pub log_level:  Option<LogLevel>,
  /// Human-readable output instead of JSON lines.
  #[arg(
    long,
    env = "LOG_PRETTY",
    value_name = "BOOL",
    num_args = 0..=1,
    default_missing_value = "true"
  )]
  pub log_pretty: Option<bool>,
}

// ─── Overrides ────────────────────────────────────────────────────────────────

fn set<T>(target: &mut T, value: Option<T>) {
  if let Some(value) = value {
    *target = value;
  }
}

impl CommonArgs {
  /// Load the config file and apply every given flag on top.
  pub fn settings(&self) -> anyhow::Result<Settings> {
    let mut settings = Settings::load(&self.config)?;
    self.apply(&mut settings);
    Ok(settings)
  }

  pub fn apply(&self, settings: &mut Settings) {
    self.db.apply(settings);
    self.log.apply(settings);
  }
}

impl ServeArgs {
  pub fn settings(&self) -> anyhow::Result<Settings> {
    let mut settings = self.common.settings()?;
    self.pool.apply(&mut settings);
    self.server.apply(&mut settings);
    Ok(settings)
  }
}

impl DbArgs {
  pub fn apply(&self, settings: &mut Settings) {
    let db = &mut settings.db;
    set(&mut db.host, self.db_host.clone());
    set(&mut db.port, self.db_port);
    set(&mut db.user, self.db_user.clone());
    set(&mut db.password, self.db_password.clone());
    set(&mut db.name, self.db_name.clone());
    set(&mut db.ssl_mode, self.db_sslmode.clone());
  }
}

impl PoolArgs {
  pub fn apply(&self, settings: &mut Settings) {
    let pool = &mut settings.db.pool;
    set(&mut pool.min_conns, self.db_pool_min_conns);
    set(&mut pool.max_conns, self.db_pool_max_conns);
    set(&mut pool.max_conn_lifetime, self.db_pool_max_conn_lifetime);
    set(&mut pool.max_conn_idle_time, self.db_pool_max_conn_idle_time);
  }
}

impl ServerArgs {
  pub fn apply(&self, settings: &mut Settings) {
    set(&mut settings.server.port, self.server_port);
    set(&mut settings.server.mode, self.server_mode);
  }
}

impl LogArgs {
  pub fn apply(&self, settings: &mut Settings) {
    set(&mut settings.log.level, self.log_level);
    set(&mut settings.log.pretty, self.log_pretty);
  }
}
