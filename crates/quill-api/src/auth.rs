use std::sync::Arc;

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use axum::{extract::State, Form, Json};

use quill_db::Database;
use quill_types::api::{LoginForm, TokenResponse};

use crate::error::ApiError;
use crate::token::{self, TokenConfig};

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub tokens: TokenConfig,
}

/// OAuth2-style password login: the form's `username` field carries the
/// email address.
pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Json<TokenResponse>, ApiError> {
    if form.username.is_empty() || form.password.is_empty() {
        return Err(ApiError::Unprocessable(
            "Username and password are required".to_string(),
        ));
    }

    // Unknown email and wrong password produce identical errors so the
    // response never reveals which check failed.
    let user = state
        .db
        .get_user_by_email(&form.username)?
        .ok_or_else(invalid_credentials)?;

    let parsed_hash = PasswordHash::new(&user.password)
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("stored hash unreadable: {e}")))?;

    Argon2::default()
        .verify_password(form.password.as_bytes(), &parsed_hash)
        .map_err(|_| invalid_credentials())?;

    let access_token = token::issue(&state.tokens, user.id)?;

    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
    }))
}

fn invalid_credentials() -> ApiError {
    ApiError::Forbidden("Invalid credentials".to_string())
}
