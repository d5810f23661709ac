use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use service_core::error::AppError;
use validator::Validate;

use crate::dtos::{AuthResponse, LoginRequest, SignupRequest, UserResponse};
use crate::middleware::AuthUser;
use crate::services::password;
use crate::startup::AppState;

pub async fn signup(
    State(state): State<AppState>,
    Json(request): Json<SignupRequest>,
) -> Result<impl IntoResponse, AppError> {
    request.validate()?;

    if state
        .db
        .find_user_by_username(&request.user_name)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict(anyhow::anyhow!(
            "Username already exists"
        )));
    }

    let password_hash = password::hash_password(&request.password)?;
    let user = state
        .db
        .insert_user(&request.user_name, &password_hash, &request.business_name)
        .await?;

    let token = state.jwt.generate_token(&user)?;

    tracing::info!(user_id = %user.id, "New merchant registered");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            user: UserResponse::from(user),
            token,
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    request.validate()?;

    // Same error for unknown user and wrong password, no account probing.
    let user = state
        .db
        .find_user_by_username(&request.user_name)
        .await?
        .ok_or_else(|| AppError::AuthError(anyhow::anyhow!("Invalid credentials")))?;

    if !password::verify_password(&request.password, &user.password) {
        return Err(AppError::AuthError(anyhow::anyhow!("Invalid credentials")));
    }

    let token = state.jwt.generate_token(&user)?;

    Ok(Json(AuthResponse {
        user: UserResponse::from(user),
        token,
    }))
}

pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let user = state
        .db
        .find_user_by_id(auth.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("User not found")))?;

    Ok(Json(UserResponse::from(user)))
}
