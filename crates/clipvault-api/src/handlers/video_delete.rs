//! Owner-scoped video deletion.

use crate::auth::models::AuthContext;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::Json;
use clipvault_core::AppError;
use std::sync::Arc;

#[utoipa::path(
    delete,
    path = "/api/videos/{id}",
    tag = "videos",
    security(("bearer_token" = [])),
    params(
        ("id" = i64, Path, description = "Video ID")
    ),
    responses(
        (status = 200, description = "Video deleted"),
        (status = 404, description = "Video not found or owned by someone else", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(account_id = %auth.account_id, video_id = %id))]
pub async fn delete_video(
    State(state): State<Arc<AppState>>,
    auth: AuthContext,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, HttpAppError> {
    // Ownership is enforced in the lookup; someone else's video 404s.
    let video = state
        .videos
        .find_owned(id, auth.account_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;

    // Remote delete is best effort; the row goes away regardless so the
    // object cannot resurface through the API.
    if let Err(e) = state.storage.delete(&video.storage_key).await {
        tracing::error!(
            error = %e,
            storage_key = %video.storage_key,
            "Failed to delete video from storage, continuing with database deletion"
        );
    }

    state.videos.delete_by_id(video.id).await?;

    tracing::info!("Video deleted");

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Video deleted successfully"
    })))
}
