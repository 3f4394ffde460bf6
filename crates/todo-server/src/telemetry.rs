//! Tracing subscriber setup.

use anyhow::Context as _;
use tracing_subscriber::{
  EnvFilter, Registry, fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _,
};

use crate::settings::LogConfig;

/// Install the global subscriber. `RUST_LOG`, when set, takes precedence over
/// `log.level`.
pub fn init(config: &LogConfig) -> anyhow::Result<()> {
  let filter = EnvFilter::try_from_default_env()
    .or_else(|_| EnvFilter::try_new(config.level.as_str()))
    .context("invalid log level")?;

  let registry = Registry::default().with(filter);

  let installed = if config.pretty {
    registry
      .with(fmt::layer().pretty().with_target(true))
      .try_init()
  } else {
    registry
      .with(
        fmt::layer()
          .json()
          .with_target(true)
          .with_current_span(true)
          .flatten_event(true),
      )
      .try_init()
  };
  installed.context("failed to install tracing subscriber")?;

  tracing::debug!(level = config.level.as_str(), pretty = config.pretty, "logging initialised");
  Ok(())
}
