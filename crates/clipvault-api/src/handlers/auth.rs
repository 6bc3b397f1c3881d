//! Registration, login, and current-account handlers.

use crate::auth::models::AuthContext;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{extract::State, Json};
use clipvault_core::models::{AuthResponse, UserResponse};
use clipvault_core::AppError;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 50))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Account created", body = AuthResponse),
        (status = 400, description = "Invalid input or identity already taken", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn register(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> Result<Json<AuthResponse>, HttpAppError> {
    request.validate().map_err(AppError::from)?;

    let password_hash = bcrypt::hash(&request.password, bcrypt::DEFAULT_COST)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;

    // Uniqueness is settled by the DB constraint; a race here surfaces as Conflict.
    let account = state
        .accounts
        .create(&request.username, &request.email, &password_hash)
        .await?;

    tracing::info!(account_id = %account.id, "Account registered");

    let token = state.jwt.issue_token(&account)?;
    Ok(Json(AuthResponse {
        token,
        user: UserResponse::from(&account),
    }))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 400, description = "Invalid credentials", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> Result<Json<AuthResponse>, HttpAppError> {
    request.validate().map_err(AppError::from)?;

    // Unknown email and wrong password must be indistinguishable.
    let account = state
        .accounts
        .get_by_email(&request.email)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    let matches = bcrypt::verify(&request.password, &account.password_hash)
        .map_err(|e| AppError::Internal(format!("Failed to verify password: {}", e)))?;
    if !matches {
        return Err(AppError::InvalidCredentials.into());
    }

    let token = state.jwt.issue_token(&account)?;
    Ok(Json(AuthResponse {
        token,
        user: UserResponse::from(&account),
    }))
}

#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "auth",
    security(("bearer_token" = [])),
    responses(
        (status = 200, description = "Current account"),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "Account no longer exists", body = ErrorResponse)
    )
)]
pub async fn me(
    State(state): State<Arc<AppState>>,
    auth: AuthContext,
) -> Result<Json<serde_json::Value>, HttpAppError> {
    // Read back from the database rather than trusting stale claims.
    let account = state
        .accounts
        .get_by_id(auth.account_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(serde_json::json!({
        "user": UserResponse::from(&account)
    })))
}
