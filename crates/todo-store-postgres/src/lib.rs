//! PostgreSQL backend for the task service.
//!
//! Built on [`sqlx`]: a bounded [`sqlx::PgPool`] is shared by all requests and
//! every aggregate write runs inside one transaction. Schema migrations are
//! embedded in the binary and are reversible.

mod config;
mod migrate;
mod rows;
mod store;

pub mod error;

pub use config::{DatabaseConfig, PoolConfig};
pub use error::{Error, Result};
pub use migrate::MIGRATOR;
pub use store::PgTaskStore;
