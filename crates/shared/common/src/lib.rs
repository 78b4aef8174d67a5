//! Common utilities shared across the workspace.
//!
//! This crate provides:
//! - Unified error handling with HTTP mapping
//! - Configuration structures
//! - Locks shared between services

pub mod config;
pub mod error;
pub mod sync;

pub use config::*;
pub use error::{AppError, AppResult, OptionExt};
pub use sync::EmailLock;
