//! Connection and pool settings.

use std::{str::FromStr as _, time::Duration};

use serde::Deserialize;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};

use crate::{Error, Result};

/// Where and how to connect, as read from the `db` section of the config
/// file. Keys are camelCase (`sslMode`, `pool.maxConns`); the all-lowercase
/// spelling is accepted as well.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DatabaseConfig {
  pub host:     String,
  pub port:     u16,
  pub user:     String,
  pub password: String,
  pub name:     String,
  #[serde(alias = "sslmode")]
  pub ssl_mode: String,
  pub pool:     PoolConfig,
}

/// Pool bounds. Lifetimes are in minutes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PoolConfig {
  #[serde(alias = "minconns")]
  pub min_conns:          u32,
  #[serde(alias = "maxconns")]
  pub max_conns:          u32,
  #[serde(alias = "maxconnlifetime")]
  pub max_conn_lifetime:  u64,
  #[serde(alias = "maxconnidletime")]
  pub max_conn_idle_time: u64,
}

impl Default for DatabaseConfig {
  fn default() -> Self {
    Self {
      host:     "localhost".to_string(),
      port:     5432,
      user:     "postgres".to_string(),
      password: "postgres".to_string(),
      name:     "todo_db".to_string(),
      ssl_mode: "disable".to_string(),
      pool:     PoolConfig::default(),
    }
  }
}

impl Default for PoolConfig {
  fn default() -> Self {
    Self {
      min_conns:          3,
      max_conns:          5,
      max_conn_lifetime:  5,
      max_conn_idle_time: 5,
    }
  }
}

impl DatabaseConfig {
  pub fn connect_options(&self) -> Result<PgConnectOptions> {
    let ssl_mode = PgSslMode::from_str(&self.ssl_mode)
      .map_err(|_| Error::InvalidSslMode(self.ssl_mode.clone()))?;

    Ok(
      PgConnectOptions::new()
        .host(&self.host)
        .port(self.port)
        .username(&self.user)
        .password(&self.password)
        .database(&self.name)
        .ssl_mode(ssl_mode),
    )
  }
}

impl PoolConfig {
  pub fn max_conn_lifetime(&self) -> Duration {
    Duration::from_secs(self.max_conn_lifetime * 60)
  }

  pub fn max_conn_idle_time(&self) -> Duration {
    Duration::from_secs(self.max_conn_idle_time * 60)
  }

  pub fn pool_options(&self) -> PgPoolOptions {
    PgPoolOptions::new()
      .min_connections(self.min_conns)
      .max_connections(self.max_conns)
      .max_lifetime(self.max_conn_lifetime())
      .idle_timeout(self.max_conn_idle_time())
  }
}
