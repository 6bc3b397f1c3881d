//! Domain models and API response shapes.
//!
//! Rows come out of the database as `Account` / `Video`; the API serializes
//! the `*Response` types, which use camelCase field names on the wire.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// A registered account. Immutable after creation.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Account {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// An uploaded video with a fixed expiry.
///
/// `id` is a sequential numeric id; the public share surface is keyed on it
/// by design. `expires_at` is set once at creation and never recomputed.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Video {
    pub id: i64,
    pub owner_id: Uuid,
    pub original_name: String,
    pub storage_key: String,
    pub file_size: i64,
    pub content_type: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Video {
    /// True once the retention window has passed; the expiry instant itself
    /// already counts as expired.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// Computes the expiry timestamp for an upload created at `created_at`.
pub fn expiry_for(created_at: DateTime<Utc>, retention_days: i64) -> DateTime<Utc> {
    created_at + Duration::days(retention_days)
}

/// Account information in responses (never includes the password hash).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
}

impl From<&Account> for UserResponse {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            username: account.username.clone(),
            email: account.email.clone(),
        }
    }
}

/// Token plus account info, returned by register and login.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

/// Video information in responses.
///
/// `url` and `shareable_url` carry freshly generated temporary access URLs
/// where applicable; a null value means URL generation failed for this video
/// (the failure is logged server-side) or the endpoint does not produce URLs.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VideoResponse {
    pub id: i64,
    pub original_name: String,
    pub size: i64,
    pub content_type: String,
    pub url: Option<String>,
    pub shareable_url: Option<String>,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl From<&Video> for VideoResponse {
    fn from(video: &Video) -> Self {
        Self {
            id: video.id,
            original_name: video.original_name.clone(),
            size: video.file_size,
            content_type: video.content_type.clone(),
            url: None,
            shareable_url: None,
            expires_at: video.expires_at,
            created_at: video.created_at,
        }
    }
}

impl VideoResponse {
    pub fn with_urls(mut self, url: Option<String>, shareable_url: Option<String>) -> Self {
        self.url = url;
        self.shareable_url = shareable_url;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expiry_is_exactly_retention_window() {
        let created = Utc::now();
        let expires = expiry_for(created, 5);
        assert_eq!(expires - created, Duration::days(5));
    }

    #[test]
    fn test_is_expired_boundary() {
        let now = Utc::now();
        let video = Video {
            id: 1,
            owner_id: Uuid::new_v4(),
            original_name: "clip.mp4".to_string(),
            storage_key: "videos/1-abc-clip.mp4".to_string(),
            file_size: 1024,
            content_type: "video/mp4".to_string(),
            expires_at: now,
            created_at: now - Duration::days(5),
        };
        // The expiry instant itself counts as expired.
        assert!(video.is_expired(now));
        assert!(!video.is_expired(now - Duration::seconds(1)));
    }

    #[test]
    fn test_video_response_uses_camel_case() {
        let now = Utc::now();
        let video = Video {
            id: 7,
            owner_id: Uuid::new_v4(),
            original_name: "demo.webm".to_string(),
            storage_key: "videos/7-xyz-demo.webm".to_string(),
            file_size: 2048,
            content_type: "video/webm".to_string(),
            expires_at: now + Duration::days(5),
            created_at: now,
        };
        let json = serde_json::to_value(VideoResponse::from(&video)).expect("serialize");
        assert!(json.get("originalName").is_some());
        assert!(json.get("expiresAt").is_some());
        assert!(json.get("shareableUrl").is_some());
        assert!(json.get("storage_key").is_none());
    }
}
