mod helpers;

use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use clipvault_core::StorageBackend;
use clipvault_db::VideoRepository;
use clipvault_reaper::ExpiryReaper;
use clipvault_storage::{Storage, StorageError, StorageResult, UploadMetadata};
use helpers::auth::register_test_user;
use helpers::{setup_test_app, TEST_MAX_VIDEO_SIZE_BYTES};
use std::sync::Arc;
use std::time::Duration;

fn video_form(file_name: &str, content_type: &str, data: Vec<u8>) -> MultipartForm {
    MultipartForm::new().add_part(
        "video",
        Part::bytes(data)
            .file_name(file_name)
            .mime_type(content_type),
    )
}

async fn upload_video(client: &TestServer, token: &str, file_name: &str) -> serde_json::Value {
    let response = client
        .post("/api/videos/upload")
        .add_header("Authorization", format!("Bearer {}", token))
        .multipart(video_form(file_name, "video/mp4", b"fake mp4 payload".to_vec()))
        .await;

    assert_eq!(
        response.status_code(),
        200,
        "upload failed: {}",
        response.text()
    );
    let body: serde_json::Value = response.json();
    body["video"].clone()
}

#[tokio::test]
async fn test_upload_video_succeeds() {
    let app = setup_test_app().await;
    let client = app.client();

    let user = register_test_user(client, None, None, None).await;
    let video = upload_video(client, &user.token, "holiday.mp4").await;

    assert_eq!(video["originalName"], "holiday.mp4");
    assert_eq!(video["contentType"], "video/mp4");
    assert_eq!(video["size"], 16);

    // Expiry lands exactly five days after creation
    let created_at: DateTime<Utc> = video["createdAt"]
        .as_str()
        .and_then(|s| s.parse().ok())
        .expect("createdAt missing");
    let expires_at: DateTime<Utc> = video["expiresAt"]
        .as_str()
        .and_then(|s| s.parse().ok())
        .expect("expiresAt missing");
    assert_eq!(expires_at - created_at, ChronoDuration::days(5));
}

#[tokio::test]
async fn test_upload_rejects_non_video_content_type() {
    let app = setup_test_app().await;
    let client = app.client();

    let user = register_test_user(client, None, None, None).await;

    let response = client
        .post("/api/videos/upload")
        .add_header("Authorization", format!("Bearer {}", user.token))
        .multipart(video_form("photo.png", "image/png", b"not a video".to_vec()))
        .await;

    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn test_upload_rejects_oversized_file() {
    let app = setup_test_app().await;
    let client = app.client();

    let user = register_test_user(client, None, None, None).await;

    let oversized = vec![0u8; TEST_MAX_VIDEO_SIZE_BYTES + 1];
    let response = client
        .post("/api/videos/upload")
        .add_header("Authorization", format!("Bearer {}", user.token))
        .multipart(video_form("huge.mp4", "video/mp4", oversized))
        .await;

    // Oversized files are an admission failure like any other invalid file
    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn test_upload_rejects_missing_file() {
    let app = setup_test_app().await;
    let client = app.client();

    let user = register_test_user(client, None, None, None).await;

    let response = client
        .post("/api/videos/upload")
        .add_header("Authorization", format!("Bearer {}", user.token))
        .multipart(MultipartForm::new().add_text("note", "no file here"))
        .await;

    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn test_upload_requires_token() {
    let app = setup_test_app().await;
    let client = app.client();

    let response = client
        .post("/api/videos/upload")
        .multipart(video_form("clip.mp4", "video/mp4", b"data".to_vec()))
        .await;

    assert_eq!(response.status_code(), 401);
}

#[tokio::test]
async fn test_list_videos_newest_first_with_urls() {
    let app = setup_test_app().await;
    let client = app.client();

    let user = register_test_user(client, None, None, None).await;
    upload_video(client, &user.token, "first.mp4").await;
    upload_video(client, &user.token, "second.mp4").await;

    let response = client
        .get("/api/videos")
        .add_header("Authorization", format!("Bearer {}", user.token))
        .await;

    assert_eq!(response.status_code(), 200);

    let body: serde_json::Value = response.json();
    let videos = body["videos"].as_array().expect("videos array");
    assert_eq!(videos.len(), 2);
    assert_eq!(videos[0]["originalName"], "second.mp4");
    assert_eq!(videos[1]["originalName"], "first.mp4");

    for video in videos {
        assert!(video["url"].as_str().is_some_and(|u| !u.is_empty()));
        assert!(video["shareableUrl"].as_str().is_some_and(|u| !u.is_empty()));
    }
}

#[tokio::test]
async fn test_list_only_returns_own_videos() {
    let app = setup_test_app().await;
    let client = app.client();

    let owner = register_test_user(client, Some("owner"), Some("owner@example.com"), None).await;
    let other = register_test_user(client, Some("other"), Some("other@example.com"), None).await;
    upload_video(client, &owner.token, "private.mp4").await;

    let response = client
        .get("/api/videos")
        .add_header("Authorization", format!("Bearer {}", other.token))
        .await;

    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body["videos"].as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn test_delete_own_video() {
    let app = setup_test_app().await;
    let client = app.client();

    let user = register_test_user(client, None, None, None).await;
    let video = upload_video(client, &user.token, "doomed.mp4").await;
    let id = video["id"].as_i64().expect("video id");

    let response = client
        .delete(&format!("/api/videos/{}", id))
        .add_header("Authorization", format!("Bearer {}", user.token))
        .await;

    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Video deleted successfully");

    // The row is gone
    let list: serde_json::Value = client
        .get("/api/videos")
        .add_header("Authorization", format!("Bearer {}", user.token))
        .await
        .json();
    assert_eq!(list["videos"].as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn test_delete_someone_elses_video_returns_404() {
    let app = setup_test_app().await;
    let client = app.client();

    let owner = register_test_user(client, Some("owner"), Some("owner@example.com"), None).await;
    let other = register_test_user(client, Some("other"), Some("other@example.com"), None).await;
    let video = upload_video(client, &owner.token, "mine.mp4").await;
    let id = video["id"].as_i64().expect("video id");

    let response = client
        .delete(&format!("/api/videos/{}", id))
        .add_header("Authorization", format!("Bearer {}", other.token))
        .await;

    assert_eq!(response.status_code(), 404);
}

#[tokio::test]
async fn test_delete_missing_video_returns_404() {
    let app = setup_test_app().await;
    let client = app.client();

    let user = register_test_user(client, None, None, None).await;

    let response = client
        .delete("/api/videos/999999")
        .add_header("Authorization", format!("Bearer {}", user.token))
        .await;

    assert_eq!(response.status_code(), 404);
}

/// Rewind a video's expiry so it reads as already expired.
async fn expire_video(pool: &sqlx::PgPool, id: i64) {
    sqlx::query("UPDATE videos SET expires_at = NOW() - INTERVAL '1 hour' WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .expect("failed to rewind expiry");
}

async fn storage_key_of(pool: &sqlx::PgPool, id: i64) -> String {
    sqlx::query_scalar("SELECT storage_key FROM videos WHERE id = $1")
        .bind(id)
        .fetch_one(pool)
        .await
        .expect("failed to read storage key")
}

async fn video_row_count(pool: &sqlx::PgPool, id: i64) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM videos WHERE id = $1")
        .bind(id)
        .fetch_one(pool)
        .await
        .expect("failed to count rows")
}

#[tokio::test]
async fn test_share_page_renders_player() {
    let app = setup_test_app().await;
    let client = app.client();

    let user = register_test_user(client, None, None, None).await;
    let video = upload_video(client, &user.token, "party.mp4").await;
    let id = video["id"].as_i64().expect("video id");

    let response = client.get(&format!("/api/videos/share/{}", id)).await;

    assert_eq!(response.status_code(), 200);
    let html = response.text();
    assert!(html.contains("og:title"));
    assert!(html.contains("og:video"));
    assert!(html.contains("twitter:card"));
    assert!(html.contains("<video"));
    assert!(html.contains("autoplay"));
    assert!(html.contains("party.mp4"));
    // The page refreshes itself before the signed URL goes stale
    assert!(html.contains("3500000"));
}

#[tokio::test]
async fn test_share_page_missing_video_returns_404() {
    let app = setup_test_app().await;
    let client = app.client();

    let response = client.get("/api/videos/share/999999").await;
    assert_eq!(response.status_code(), 404);
}

#[tokio::test]
async fn test_share_page_expired_video_returns_410() {
    let app = setup_test_app().await;
    let client = app.client();

    let user = register_test_user(client, None, None, None).await;
    let video = upload_video(client, &user.token, "old.mp4").await;
    let id = video["id"].as_i64().expect("video id");

    expire_video(&app.pool, id).await;

    let response = client.get(&format!("/api/videos/share/{}", id)).await;
    assert_eq!(response.status_code(), 410);
}

#[tokio::test]
async fn test_thumbnail_active_video() {
    let app = setup_test_app().await;
    let client = app.client();

    let user = register_test_user(client, None, None, None).await;
    let video = upload_video(client, &user.token, "beach.mp4").await;
    let id = video["id"].as_i64().expect("video id");

    let response = client.get(&format!("/api/videos/thumbnail/{}", id)).await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "image/svg+xml"
    );
    let svg = response.text();
    assert!(svg.contains("<svg"));
    assert!(svg.contains("beach.mp4"));
}

#[tokio::test]
async fn test_thumbnail_expired_video() {
    let app = setup_test_app().await;
    let client = app.client();

    let user = register_test_user(client, None, None, None).await;
    let video = upload_video(client, &user.token, "stale.mp4").await;
    let id = video["id"].as_i64().expect("video id");

    expire_video(&app.pool, id).await;

    let response = client.get(&format!("/api/videos/thumbnail/{}", id)).await;

    assert_eq!(response.status_code(), 200);
    assert!(response.text().contains("Video Expired"));
}

#[tokio::test]
async fn test_thumbnail_missing_video_still_returns_200() {
    let app = setup_test_app().await;
    let client = app.client();

    let response = client.get("/api/videos/thumbnail/999999").await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "image/svg+xml"
    );
    assert!(response.text().contains("Video Player"));
}

#[tokio::test]
async fn test_reaper_sweep_removes_expired_videos() {
    let app = setup_test_app().await;
    let client = app.client();

    let user = register_test_user(client, None, None, None).await;
    let keep = upload_video(client, &user.token, "keep.mp4").await;
    let reap = upload_video(client, &user.token, "reap.mp4").await;
    let keep_id = keep["id"].as_i64().expect("video id");
    let reap_id = reap["id"].as_i64().expect("video id");

    let keep_key = storage_key_of(&app.pool, keep_id).await;
    let reap_key = storage_key_of(&app.pool, reap_id).await;
    assert!(app.temp_dir.path().join(&reap_key).exists());

    expire_video(&app.pool, reap_id).await;

    let reaper = ExpiryReaper::new(
        VideoRepository::new(app.pool.clone()),
        app.storage.clone(),
        Duration::from_secs(3600),
    );

    let removed = reaper.sweep_once().await.expect("sweep failed");
    assert_eq!(removed, 1);

    // Both the stored object and the row are gone
    assert!(!app.temp_dir.path().join(&reap_key).exists());
    assert_eq!(video_row_count(&app.pool, reap_id).await, 0);

    // Second sweep finds nothing; the sweep is idempotent
    let removed_again = reaper.sweep_once().await.expect("sweep failed");
    assert_eq!(removed_again, 0);

    // The fresh video and its object survive
    assert!(app.temp_dir.path().join(&keep_key).exists());
    let list: serde_json::Value = client
        .get("/api/videos")
        .add_header("Authorization", format!("Bearer {}", user.token))
        .await
        .json();
    let videos = list["videos"].as_array().expect("videos array");
    assert_eq!(videos.len(), 1);
    assert_eq!(videos[0]["id"], keep["id"]);
}

/// Storage stub whose deletes always fail, standing in for an unreachable
/// backend.
struct UnreachableStorage;

#[async_trait::async_trait]
impl Storage for UnreachableStorage {
    async fn upload(
        &self,
        _storage_key: &str,
        _content_type: &str,
        _data: bytes::Bytes,
        _metadata: &UploadMetadata,
    ) -> StorageResult<()> {
        Err(StorageError::UploadFailed("storage offline".to_string()))
    }

    async fn delete(&self, _storage_key: &str) -> StorageResult<()> {
        Err(StorageError::DeleteFailed("storage offline".to_string()))
    }

    async fn presigned_url(
        &self,
        _storage_key: &str,
        _expires_in: Duration,
    ) -> StorageResult<String> {
        Err(StorageError::SignFailed("storage offline".to_string()))
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}

#[tokio::test]
async fn test_reaper_retries_row_after_storage_delete_failure() {
    let app = setup_test_app().await;
    let client = app.client();

    let user = register_test_user(client, None, None, None).await;
    let video = upload_video(client, &user.token, "stuck.mp4").await;
    let id = video["id"].as_i64().expect("video id");
    let key = storage_key_of(&app.pool, id).await;

    expire_video(&app.pool, id).await;

    // While storage is down the row must survive, or the object would be
    // orphaned with nothing left referencing its key
    let broken = ExpiryReaper::new(
        VideoRepository::new(app.pool.clone()),
        Arc::new(UnreachableStorage),
        Duration::from_secs(3600),
    );
    let removed = broken.sweep_once().await.expect("sweep failed");
    assert_eq!(removed, 0);
    assert_eq!(video_row_count(&app.pool, id).await, 1);
    assert!(app.temp_dir.path().join(&key).exists());

    // Storage is back; the next sweep picks the row up again
    let healthy = ExpiryReaper::new(
        VideoRepository::new(app.pool.clone()),
        app.storage.clone(),
        Duration::from_secs(3600),
    );
    let removed = healthy.sweep_once().await.expect("sweep failed");
    assert_eq!(removed, 1);
    assert_eq!(video_row_count(&app.pool, id).await, 0);
    assert!(!app.temp_dir.path().join(&key).exists());
}
