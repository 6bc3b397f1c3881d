//! Public share page and thumbnail endpoints.
//!
//! These routes carry no authentication: anyone holding a share link can
//! watch until the video expires. Ids are sequential and guessable; that
//! tradeoff is accepted for this surface.

use crate::constants::STREAM_URL_TTL_SECS;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use crate::views;
use axum::extract::{Path, State};
use axum::http::{header, HeaderMap};
use axum::response::{Html, IntoResponse, Response};
use chrono::Utc;
use clipvault_core::AppError;
use std::sync::Arc;
use std::time::Duration;

/// Reconstruct the externally visible base URL for og:url / og:image tags.
/// Honors X-Forwarded-Proto when the service sits behind a proxy.
fn request_base_url(headers: &HeaderMap) -> String {
    let proto = headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("http");
    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("localhost");
    format!("{}://{}", proto, host)
}

#[utoipa::path(
    get,
    path = "/api/videos/share/{id}",
    tag = "share",
    params(
        ("id" = i64, Path, description = "Video ID")
    ),
    responses(
        (status = 200, description = "HTML player page", content_type = "text/html"),
        (status = 404, description = "Video not found", body = ErrorResponse),
        (status = 410, description = "Video has expired", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn share_video(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Result<Html<String>, HttpAppError> {
    let video = state
        .videos
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;

    if video.is_expired(Utc::now()) {
        return Err(AppError::Gone("Video has expired".to_string()).into());
    }

    let stream_url = state
        .storage
        .presigned_url(&video.storage_key, Duration::from_secs(STREAM_URL_TTL_SECS))
        .await?;

    let base_url = request_base_url(&headers);
    Ok(Html(views::render_share_page(&video, &stream_url, &base_url)))
}

fn svg_response(body: String) -> Response {
    ([(header::CONTENT_TYPE, "image/svg+xml")], body).into_response()
}

#[utoipa::path(
    get,
    path = "/api/videos/thumbnail/{id}",
    tag = "share",
    params(
        ("id" = i64, Path, description = "Video ID")
    ),
    responses(
        (status = 200, description = "SVG preview image", content_type = "image/svg+xml")
    )
)]
pub async fn video_thumbnail(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Response {
    // Link scrapers fetch this; always answer with some SVG rather than an
    // error status.
    let video = match state.videos.get_by_id(id).await {
        Ok(Some(video)) => video,
        Ok(None) => return svg_response(views::render_default_thumbnail()),
        Err(e) => {
            tracing::error!(error = %e, video_id = %id, "Failed to load video for thumbnail");
            return svg_response(views::render_default_thumbnail());
        }
    };

    if video.is_expired(Utc::now()) {
        return svg_response(views::render_expired_thumbnail());
    }

    svg_response(views::render_thumbnail(&video))
}
