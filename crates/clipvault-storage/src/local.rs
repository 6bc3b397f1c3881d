use crate::traits::{Storage, StorageError, StorageResult, UploadMetadata};
use async_trait::async_trait;
use bytes::Bytes;
use clipvault_core::StorageBackend;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Local filesystem storage implementation
///
/// Intended for development and tests. Files are served at
/// `{base_url}/{storage_key}`; URLs are plain and do not expire.
#[derive(Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
    base_url: String,
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory for file storage (e.g., "/var/lib/clipvault/videos")
    /// * `base_url` - Base URL for serving files (e.g., "http://localhost:3000/files")
    pub async fn new(base_path: impl Into<PathBuf>, base_url: String) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage {
            base_path,
            base_url,
        })
    }

    /// Convert storage key to filesystem path with security validation
    ///
    /// Rejects keys containing path traversal sequences that could escape
    /// the base storage directory.
    fn key_to_path(&self, storage_key: &str) -> StorageResult<PathBuf> {
        if storage_key.is_empty()
            || storage_key.contains("..")
            || storage_key.starts_with('/')
            || storage_key.contains('\\')
        {
            return Err(StorageError::InvalidKey(
                "Storage key contains invalid characters".to_string(),
            ));
        }

        Ok(self.base_path.join(storage_key))
    }

    fn generate_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), key)
    }

    /// Ensure parent directory exists
    async fn ensure_parent_dir(&self, path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn upload(
        &self,
        storage_key: &str,
        _content_type: &str,
        data: Bytes,
        _metadata: &UploadMetadata,
    ) -> StorageResult<()> {
        let path = self.key_to_path(storage_key)?;
        let size = data.len();

        self.ensure_parent_dir(&path).await?;

        let mut file = fs::File::create(&path).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to create file {}: {}", path.display(), e))
        })?;

        file.write_all(&data).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to write file {}: {}", path.display(), e))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        tracing::info!(
            storage_key = %storage_key,
            size_bytes = size,
            "Local upload successful"
        );

        Ok(())
    }

    async fn delete(&self, storage_key: &str) -> StorageResult<()> {
        let path = self.key_to_path(storage_key)?;

        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            // Already gone; delete stays idempotent.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::DeleteFailed(format!(
                "Failed to delete file {}: {}",
                path.display(),
                e
            ))),
        }
    }

    async fn presigned_url(
        &self,
        storage_key: &str,
        _expires_in: Duration,
    ) -> StorageResult<String> {
        // No signing for local files; validate the key and hand back the
        // plain serving URL.
        self.key_to_path(storage_key)?;
        Ok(self.generate_url(storage_key))
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn test_metadata() -> UploadMetadata {
        UploadMetadata {
            owner_id: Uuid::new_v4(),
            original_name: "clip.mp4".to_string(),
            expires_at: Utc::now(),
        }
    }

    async fn test_storage() -> (tempfile::TempDir, LocalStorage) {
        let dir = tempfile::tempdir().expect("tempdir");
        let storage = LocalStorage::new(dir.path(), "http://localhost:3000/files".to_string())
            .await
            .expect("create storage");
        (dir, storage)
    }

    #[tokio::test]
    async fn test_upload_writes_file() {
        let (dir, storage) = test_storage().await;

        storage
            .upload(
                "videos/1-abc-clip.mp4",
                "video/mp4",
                Bytes::from_static(b"fake video data"),
                &test_metadata(),
            )
            .await
            .expect("upload");

        let written = std::fs::read(dir.path().join("videos/1-abc-clip.mp4")).expect("read back");
        assert_eq!(written, b"fake video data");
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let (_dir, storage) = test_storage().await;

        storage
            .upload(
                "videos/1-abc-clip.mp4",
                "video/mp4",
                Bytes::from_static(b"x"),
                &test_metadata(),
            )
            .await
            .expect("upload");

        storage.delete("videos/1-abc-clip.mp4").await.expect("first delete");
        storage
            .delete("videos/1-abc-clip.mp4")
            .await
            .expect("second delete of missing key");
    }

    #[tokio::test]
    async fn test_rejects_path_traversal() {
        let (_dir, storage) = test_storage().await;

        let err = storage.delete("../outside").await.unwrap_err();
        assert!(matches!(err, StorageError::InvalidKey(_)));

        let err = storage
            .presigned_url("/etc/passwd", Duration::from_secs(60))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::InvalidKey(_)));
    }

    #[tokio::test]
    async fn test_url_joins_base_url() {
        let (_dir, storage) = test_storage().await;

        let url = storage
            .presigned_url("videos/1-abc-clip.mp4", Duration::from_secs(3600))
            .await
            .expect("url");
        assert_eq!(url, "http://localhost:3000/files/videos/1-abc-clip.mp4");
    }
}
