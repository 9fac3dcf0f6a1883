use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHasher};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use quill_db::models::UserRow;
use quill_types::api::{CreateUserRequest, UserResponse};

use crate::auth::AppState;
use crate::error::ApiError;
use crate::parse_db_time;

pub async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    // Hash password with Argon2id
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(req.password.as_bytes(), &salt)
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("password hash failed: {e}")))?
        .to_string();

    // The insert is not pre-checked; any failure here surfaces as a
    // duplicate registration (the unique email constraint in practice).
    let row = state
        .db
        .create_user(&req.email, &password_hash)
        .map_err(|_| ApiError::Conflict("Email already registered".to_string()))?;

    Ok((StatusCode::CREATED, Json(user_response(&row))))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<UserResponse>, ApiError> {
    let row = state
        .db
        .get_user_by_id(id)?
        .ok_or_else(|| ApiError::NotFound(format!("User with id {id} not found")))?;

    Ok(Json(user_response(&row)))
}

pub(crate) fn user_response(row: &UserRow) -> UserResponse {
    UserResponse {
        id: row.id,
        email: row.email.clone(),
        created_at: parse_db_time(&row.created_at, "user", row.id),
    }
}
