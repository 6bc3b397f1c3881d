//! S3-compatible storage backend built on `object_store`.
//!
//! Works against AWS S3 and any S3-compatible provider (MinIO, R2) via the
//! optional custom endpoint. Credentials come from the standard AWS
//! environment variables.

use crate::traits::{Storage, StorageError, StorageResult, UploadMetadata};
use async_trait::async_trait;
use bytes::Bytes;
use clipvault_core::StorageBackend;
use http::Method;
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::path::Path;
use object_store::signer::Signer;
use object_store::Error as ObjectStoreError;
use object_store::{
    Attribute, Attributes, ObjectStore, ObjectStoreExt, PutOptions, PutPayload,
    Result as ObjectResult,
};
use std::time::Duration;

#[derive(Clone)]
pub struct S3Storage {
    store: AmazonS3,
    bucket: String,
}

impl S3Storage {
    /// Build the S3 client from the standard AWS environment plus explicit
    /// bucket/region. `endpoint` overrides the AWS endpoint for
    /// S3-compatible providers; plain-http endpoints are allowed for local
    /// development setups.
    pub fn new(bucket: String, region: String, endpoint: Option<String>) -> StorageResult<Self> {
        let mut builder = AmazonS3Builder::from_env()
            .with_region(region)
            .with_bucket_name(bucket.clone());

        if let Some(ref endpoint) = endpoint {
            let allow_http = endpoint.starts_with("http://");
            builder = builder
                .with_endpoint(endpoint.clone())
                .with_allow_http(allow_http);
        }

        let store = builder
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        Ok(S3Storage { store, bucket })
    }
}

/// Object attributes written alongside the upload: the content type so
/// presigned GETs serve the right MIME type, plus owner, original name and
/// expiry so the object stays attributable without a database lookup.
fn upload_attributes(content_type: &str, metadata: &UploadMetadata) -> Attributes {
    let mut attributes = Attributes::new();
    attributes.insert(Attribute::ContentType, content_type.to_string().into());
    attributes.insert(
        Attribute::Metadata("owner-id".into()),
        metadata.owner_id.to_string().into(),
    );
    attributes.insert(
        Attribute::Metadata("original-name".into()),
        metadata.original_name.clone().into(),
    );
    attributes.insert(
        Attribute::Metadata("expires-at".into()),
        metadata.expires_at.to_rfc3339().into(),
    );
    attributes
}

#[async_trait]
impl Storage for S3Storage {
    #[tracing::instrument(skip(self, data, content_type, metadata), fields(
        s3.bucket = %self.bucket,
        s3.key = %storage_key,
        s3.size = %data.len(),
        owner_id = %metadata.owner_id
    ))]
    async fn upload(
        &self,
        storage_key: &str,
        content_type: &str,
        data: Bytes,
        metadata: &UploadMetadata,
    ) -> StorageResult<()> {
        let size = data.len() as u64;
        let location = Path::from(storage_key.to_string());
        let options = PutOptions::from(upload_attributes(content_type, metadata));
        let start = std::time::Instant::now();

        let result: ObjectResult<_> = self
            .store
            .put_opts(&location, PutPayload::from(data), options)
            .await;

        result.map_err(|e| {
            tracing::error!(
                error = %e,
                size_bytes = size,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "S3 upload failed"
            );
            StorageError::UploadFailed(e.to_string())
        })?;

        tracing::info!(
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 upload successful"
        );

        Ok(())
    }

    #[tracing::instrument(skip(self), fields(s3.bucket = %self.bucket, s3.key = %storage_key))]
    async fn delete(&self, storage_key: &str) -> StorageResult<()> {
        let location = Path::from(storage_key.to_string());
        let start = std::time::Instant::now();

        let result: ObjectResult<_> = self.store.delete(&location).await;

        match result {
            Ok(_) => {
                tracing::info!(
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 delete successful"
                );
                Ok(())
            }
            // The key may already be gone (reaper raced a manual delete, or
            // a retried request). Treat that as success.
            Err(ObjectStoreError::NotFound { .. }) => {
                tracing::debug!("S3 object already absent");
                Ok(())
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 delete failed"
                );
                Err(StorageError::DeleteFailed(e.to_string()))
            }
        }
    }

    #[tracing::instrument(skip(self), fields(s3.bucket = %self.bucket, s3.key = %storage_key))]
    async fn presigned_url(
        &self,
        storage_key: &str,
        expires_in: Duration,
    ) -> StorageResult<String> {
        let location = Path::from(storage_key.to_string());
        let url_result: ObjectResult<_> = self
            .store
            .signed_url(Method::GET, &location, expires_in)
            .await;

        let url = url_result
            .map_err(|e| StorageError::SignFailed(e.to_string()))?
            .to_string();

        Ok(url)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use object_store::AttributeValue;
    use uuid::Uuid;

    #[test]
    fn test_upload_attributes_carry_content_type_and_ownership() {
        let metadata = UploadMetadata {
            owner_id: Uuid::nil(),
            original_name: "holiday.mp4".to_string(),
            expires_at: Utc.with_ymd_and_hms(2026, 9, 4, 12, 0, 0).unwrap(),
        };

        let attributes = upload_attributes("video/mp4", &metadata);

        assert_eq!(
            attributes.get(&Attribute::ContentType),
            Some(&AttributeValue::from("video/mp4".to_string()))
        );
        assert_eq!(
            attributes.get(&Attribute::Metadata("owner-id".into())),
            Some(&AttributeValue::from(Uuid::nil().to_string()))
        );
        assert_eq!(
            attributes.get(&Attribute::Metadata("original-name".into())),
            Some(&AttributeValue::from("holiday.mp4".to_string()))
        );
        assert_eq!(
            attributes.get(&Attribute::Metadata("expires-at".into())),
            Some(&AttributeValue::from(metadata.expires_at.to_rfc3339()))
        );
    }
}
