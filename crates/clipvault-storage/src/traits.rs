//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must implement.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use clipvault_core::StorageBackend;
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("Signing failed: {0}")]
    SignFailed(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Ownership and lifecycle information about an upload. The S3 backend
/// writes it onto the object as metadata attributes; the local backend
/// only logs it.
#[derive(Debug, Clone)]
pub struct UploadMetadata {
    pub owner_id: Uuid,
    pub original_name: String,
    pub expires_at: DateTime<Utc>,
}

/// Storage abstraction trait
///
/// All storage backends (S3, local filesystem) must implement this trait.
/// This allows the upload and delete paths to work with any backend without
/// coupling to specific implementation details.
///
/// **Key format:** `videos/{timestamp}-{random}-{sanitized_filename}`.
/// See the `keys` module.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Upload a file under the given storage key.
    async fn upload(
        &self,
        storage_key: &str,
        content_type: &str,
        data: Bytes,
        metadata: &UploadMetadata,
    ) -> StorageResult<()>;

    /// Delete a file by its storage key.
    ///
    /// Deleting a key that does not exist is not an error; backends must
    /// treat it as a successful no-op so delete paths stay idempotent.
    async fn delete(&self, storage_key: &str) -> StorageResult<()>;

    /// Generate a temporary URL for direct GET access to the object.
    ///
    /// For S3 this is a presigned URL that expires after `expires_in`.
    /// The local backend serves files through the application and returns
    /// a plain URL that ignores the expiry.
    async fn presigned_url(
        &self,
        storage_key: &str,
        expires_in: Duration,
    ) -> StorageResult<String>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
