//! Authentication endpoints

use axum::{extract::State, http::StatusCode, Json};
use validator::Validate;

use crate::middleware::{auth::create_token, AuthUser};
use crate::models::{AuthResponse, LoginRequest, RegisterUserRequest, UserPublic};
use crate::services::AuthService;
use crate::utils::error::{AppError, AppResult};
use crate::AppState;

/// POST /auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterUserRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    input.validate()?;

    let user = AuthService::new(state.db.clone()).create_user(&input).await?;
    let token = create_token(
        &user,
        &state.config.auth.jwt_secret,
        state.config.auth.token_expiry_hours,
    )
    .map_err(|e| AppError::Internal(format!("Failed to issue token: {}", e)))?;

    tracing::info!(username = %user.username, role = %user.role, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "Registration successful".to_string(),
            token,
            token_type: "Bearer".to_string(),
            expires_in: state.config.auth.token_expiry_hours * 3600,
            user: user.into(),
        }),
    ))
}

/// POST /auth/login
///
/// The `username` field accepts either a username or an email address.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let user = AuthService::new(state.db.clone())
        .authenticate(&input.username, &input.password)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid credentials".to_string()))?;

    let token = create_token(
        &user,
        &state.config.auth.jwt_secret,
        state.config.auth.token_expiry_hours,
    )
    .map_err(|e| AppError::Internal(format!("Failed to issue token: {}", e)))?;

    tracing::info!(username = %user.username, "User logged in");

    Ok(Json(AuthResponse {
        message: "Login successful".to_string(),
        token,
        token_type: "Bearer".to_string(),
        expires_in: state.config.auth.token_expiry_hours * 3600,
        user: user.into(),
    }))
}

/// GET /auth/me
pub async fn me(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<Json<UserPublic>> {
    let user = AuthService::new(state.db.clone())
        .get_user_by_id(&auth_user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(user.into()))
}
