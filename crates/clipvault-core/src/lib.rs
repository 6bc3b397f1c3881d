//! Core types for the Clipvault service.
//!
//! This crate holds the pieces shared by every other crate: configuration,
//! the unified error type, domain models, and upload validation. It has no
//! HTTP or storage dependencies of its own.

pub mod config;
pub mod error;
pub mod models;
pub mod validation;

pub use config::{Config, StorageBackend};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use validation::{UploadError, UploadValidator};
