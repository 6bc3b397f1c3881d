//! OpenAPI documentation.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::error;
use crate::handlers;
use clipvault_core::models;

/// Returns the OpenAPI spec served at /api/openapi.json.
pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_token",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "ClipVault API",
        version = "0.1.0",
        description = "Expiring video sharing API. Authenticated users upload videos to object storage; each video expires five days after upload and is removed by a background reaper. Share links serve an HTML player page with Open Graph tags."
    ),
    paths(
        // Auth
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::me,
        // Videos
        handlers::video_upload::upload_video,
        handlers::video_list::list_videos,
        handlers::video_delete::delete_video,
        handlers::video_share::share_video,
        handlers::video_share::video_thumbnail,
    ),
    components(
        schemas(
            models::Video,
            models::VideoResponse,
            models::UserResponse,
            models::AuthResponse,
            handlers::auth::RegisterRequest,
            handlers::auth::LoginRequest,
            error::ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Account registration, login, and session inspection"),
        (name = "videos", description = "Video upload, listing, and deletion"),
        (name = "share", description = "Public share page and thumbnail endpoints")
    )
)]
pub struct ApiDoc;
