//! Upload admission checks.
//!
//! These run against the multipart headers before any storage or database
//! work happens, so oversized or non-video payloads are rejected cheaply.

use crate::error::AppError;

/// Why an upload was refused.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("no file provided")]
    Empty,

    #[error("file size {size} exceeds maximum of {max} bytes")]
    TooLarge { size: u64, max: u64 },

    #[error("unsupported content type '{content_type}', only video files are accepted")]
    NotVideo { content_type: String },
}

impl From<UploadError> for AppError {
    fn from(err: UploadError) -> Self {
        // Every admission failure, size included, is a 400 to the client.
        AppError::Validation(err.to_string())
    }
}

/// Validates upload declarations against the configured size cap.
#[derive(Debug, Clone, Copy)]
pub struct UploadValidator {
    max_size_bytes: u64,
}

impl UploadValidator {
    pub fn new(max_size_bytes: u64) -> Self {
        Self { max_size_bytes }
    }

    pub fn max_size_bytes(&self) -> u64 {
        self.max_size_bytes
    }

    /// Accepts any `video/*` media type, nothing else.
    pub fn check_content_type(&self, content_type: &str) -> Result<(), UploadError> {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or(content_type)
            .trim()
            .to_ascii_lowercase();
        if essence.starts_with("video/") && essence.len() > "video/".len() {
            Ok(())
        } else {
            Err(UploadError::NotVideo {
                content_type: content_type.to_string(),
            })
        }
    }

    pub fn check_size(&self, size: u64) -> Result<(), UploadError> {
        if size == 0 {
            return Err(UploadError::Empty);
        }
        if size > self.max_size_bytes {
            return Err(UploadError::TooLarge {
                size,
                max: self.max_size_bytes,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator() -> UploadValidator {
        UploadValidator::new(200 * 1024 * 1024)
    }

    #[test]
    fn test_accepts_any_video_subtype() {
        let v = validator();
        assert!(v.check_content_type("video/mp4").is_ok());
        assert!(v.check_content_type("video/webm").is_ok());
        assert!(v.check_content_type("video/x-matroska").is_ok());
        assert!(v.check_content_type("VIDEO/MP4; codecs=avc1").is_ok());
    }

    #[test]
    fn test_rejects_non_video_types() {
        let v = validator();
        assert!(matches!(
            v.check_content_type("image/png"),
            Err(UploadError::NotVideo { .. })
        ));
        assert!(matches!(
            v.check_content_type("application/octet-stream"),
            Err(UploadError::NotVideo { .. })
        ));
        assert!(matches!(
            v.check_content_type("video/"),
            Err(UploadError::NotVideo { .. })
        ));
    }

    #[test]
    fn test_size_cap_is_inclusive() {
        let v = validator();
        assert!(v.check_size(200 * 1024 * 1024).is_ok());
        assert!(matches!(
            v.check_size(200 * 1024 * 1024 + 1),
            Err(UploadError::TooLarge { .. })
        ));
    }

    #[test]
    fn test_empty_upload_rejected() {
        assert!(matches!(validator().check_size(0), Err(UploadError::Empty)));
    }

    #[test]
    fn test_too_large_maps_to_validation() {
        let err: AppError = UploadError::TooLarge {
            size: 10,
            max: 5,
        }
        .into();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
