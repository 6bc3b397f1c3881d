//! Multipart video upload.

use crate::auth::models::AuthContext;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::extract::{Multipart, State};
use axum::Json;
use bytes::{Bytes, BytesMut};
use chrono::Utc;
use clipvault_core::models::{expiry_for, VideoResponse};
use clipvault_core::{AppError, UploadError};
use clipvault_storage::{generate_storage_key, UploadMetadata};
use std::sync::Arc;

/// Multipart field carrying the file.
const VIDEO_FIELD: &str = "video";

struct UploadedFile {
    original_name: String,
    content_type: String,
    data: Bytes,
}

/// Pull the `video` field out of the multipart body.
///
/// The content type is checked before reading a single chunk, and the size
/// cap is enforced while buffering, so bad uploads never reach storage or
/// the database.
async fn read_video_field(
    state: &AppState,
    mut multipart: Multipart,
) -> Result<UploadedFile, HttpAppError> {
    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() != Some(VIDEO_FIELD) {
            continue;
        }

        let content_type = field
            .content_type()
            .map(|ct| ct.to_string())
            .unwrap_or_default();
        state.upload_validator.check_content_type(&content_type)?;

        let original_name = field
            .file_name()
            .map(|name| name.to_string())
            .unwrap_or_else(|| "upload".to_string());

        let max = state.upload_validator.max_size_bytes();
        let mut data = BytesMut::new();
        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read upload: {}", e)))?
        {
            if data.len() as u64 + chunk.len() as u64 > max {
                return Err(UploadError::TooLarge {
                    size: data.len() as u64 + chunk.len() as u64,
                    max,
                }
                .into());
            }
            data.extend_from_slice(&chunk);
        }

        state.upload_validator.check_size(data.len() as u64)?;

        return Ok(UploadedFile {
            original_name,
            content_type,
            data: data.freeze(),
        });
    }

    Err(UploadError::Empty.into())
}

#[utoipa::path(
    post,
    path = "/api/videos/upload",
    tag = "videos",
    security(("bearer_token" = [])),
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Video uploaded successfully", body = VideoResponse),
        (status = 400, description = "Invalid, non-video or oversized file", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn upload_video(
    State(state): State<Arc<AppState>>,
    auth: AuthContext,
    multipart: Multipart,
) -> Result<Json<serde_json::Value>, HttpAppError> {
    let file = read_video_field(&state, multipart).await?;

    let file_size = file.data.len() as i64;
    let storage_key = generate_storage_key(&file.original_name);
    let created_at = Utc::now();
    let expires_at = expiry_for(created_at, state.config.retention_days);

    let metadata = UploadMetadata {
        owner_id: auth.account_id,
        original_name: file.original_name.clone(),
        expires_at,
    };
    state
        .storage
        .upload(&storage_key, &file.content_type, file.data, &metadata)
        .await?;

    let video = match state
        .videos
        .create(
            auth.account_id,
            &file.original_name,
            &storage_key,
            file_size,
            &file.content_type,
            created_at,
            expires_at,
        )
        .await
    {
        Ok(video) => video,
        Err(e) => {
            // The object is already written; reclaim it in the background so
            // a failed insert does not leave an orphan.
            let storage = state.storage.clone();
            tokio::spawn(async move {
                if let Err(cleanup_err) = storage.delete(&storage_key).await {
                    tracing::debug!(
                        error = %cleanup_err,
                        storage_key = %storage_key,
                        "Failed to cleanup storage file after DB error"
                    );
                }
            });
            return Err(e.into());
        }
    };

    tracing::info!(
        video_id = %video.id,
        owner_id = %auth.account_id,
        size_bytes = file_size,
        "Video uploaded"
    );

    Ok(Json(serde_json::json!({
        "video": VideoResponse::from(&video)
    })))
}
