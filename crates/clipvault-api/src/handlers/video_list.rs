//! Owner video listing with fresh temporary URLs.

use crate::auth::models::AuthContext;
use crate::constants::{SHARE_URL_TTL_SECS, STREAM_URL_TTL_SECS};
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::extract::State;
use axum::Json;
use clipvault_core::models::{Video, VideoResponse};
use clipvault_storage::Storage;
use std::sync::Arc;
use std::time::Duration;

/// Sign both URLs for one video. A signing failure downgrades that video's
/// URLs to null instead of failing the whole listing.
async fn annotate_with_urls(storage: &Arc<dyn Storage>, video: &Video) -> VideoResponse {
    let url = match storage
        .presigned_url(&video.storage_key, Duration::from_secs(STREAM_URL_TTL_SECS))
        .await
    {
        Ok(url) => Some(url),
        Err(e) => {
            tracing::error!(
                error = %e,
                video_id = %video.id,
                storage_key = %video.storage_key,
                "Failed to sign streaming URL"
            );
            None
        }
    };

    let shareable_url = match storage
        .presigned_url(&video.storage_key, Duration::from_secs(SHARE_URL_TTL_SECS))
        .await
    {
        Ok(url) => Some(url),
        Err(e) => {
            tracing::error!(
                error = %e,
                video_id = %video.id,
                storage_key = %video.storage_key,
                "Failed to sign shareable URL"
            );
            None
        }
    };

    VideoResponse::from(video).with_urls(url, shareable_url)
}

#[utoipa::path(
    get,
    path = "/api/videos",
    tag = "videos",
    security(("bearer_token" = [])),
    responses(
        (status = 200, description = "Videos owned by the caller, newest first"),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn list_videos(
    State(state): State<Arc<AppState>>,
    auth: AuthContext,
) -> Result<Json<serde_json::Value>, HttpAppError> {
    let videos = state.videos.list_by_owner(auth.account_id).await?;

    let mut responses = Vec::with_capacity(videos.len());
    for video in &videos {
        responses.push(annotate_with_urls(&state.storage, video).await);
    }

    Ok(Json(serde_json::json!({ "videos": responses })))
}
