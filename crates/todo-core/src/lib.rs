//! Core types and trait definitions for the task service.
//!
//! This crate has no HTTP or database dependencies.
//! Storage backends implement [`store::TaskRepository`]; the HTTP layer talks
//! to [`usecase::TaskUseCase`].

pub mod error;
pub mod memory;
pub mod store;
pub mod task;
pub mod usecase;

pub use error::{Error, Result};
