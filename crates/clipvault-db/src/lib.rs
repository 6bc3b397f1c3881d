//! Database repositories for data access layer
//!
//! This crate contains all repository implementations for database
//! operations. Each repository wraps a `PgPool` and is responsible for a
//! single domain entity.

pub mod accounts;
pub mod videos;

pub use accounts::AccountRepository;
pub use videos::VideoRepository;
