//! Layered application settings.
//!
//! Values come from built-in defaults, then the optional YAML file, then
//! whatever command-line flags or environment variables were actually given
//! (see [`crate::cli`]).

use std::{fmt, path::Path};

use anyhow::Context as _;
use clap::ValueEnum;
use config::{File, FileFormat};
use serde::Deserialize;
use todo_store_postgres::DatabaseConfig;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
  pub db:     DatabaseConfig,
  pub server: ServerConfig,
  pub log:    LogConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
  pub port: u16,
  pub mode: ServerMode,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self { port: 8080, mode: ServerMode::Debug }
  }
}

/// Runtime mode. `debug` additionally logs the route table at startup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ServerMode {
  #[default]
  Debug,
  Release,
  Test,
}

impl fmt::Display for ServerMode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      ServerMode::Debug => "debug",
      ServerMode::Release => "release",
      ServerMode::Test => "test",
    })
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LogConfig {
  pub level:  LogLevel,
  /// Human-readable multi-line output instead of JSON lines.
  pub pretty: bool,
}

impl Default for LogConfig {
  fn default() -> Self {
    Self { level: LogLevel::Info, pretty: true }
  }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
  Debug,
  #[default]
  Info,
  Warn,
  Error,
}

impl LogLevel {
  pub fn as_str(self) -> &'static str {
    match self {
      LogLevel::Debug => "debug",
      LogLevel::Info => "info",
      LogLevel::Warn => "warn",
      LogLevel::Error => "error",
    }
  }
}

impl Settings {
  /// Defaults overlaid with `path`. A missing file is not an error; an
  /// unreadable or malformed one is.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let mut builder = config::Config::builder();
    // Only absence is tolerated; read and parse errors must surface.
    if path.exists() {
      builder = builder.add_source(File::from(path).format(FileFormat::Yaml).required(true));
    }
    builder
      .build()
      .with_context(|| format!("failed to read config file {}", path.display()))?
      .try_deserialize()
      .with_context(|| format!("failed to parse config file {}", path.display()))
  }
}
