use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

use quill_types::models::User;

use crate::auth::AppState;
use crate::error::ApiError;
use crate::{parse_db_time, token};

/// The caller resolved by the auth guard, available to protected handlers
/// through request extensions.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Extract and verify the bearer token, then resolve the claimed identity
/// with a single users lookup. Missing header, malformed header, failed
/// verification, and a vanished user all look identical to the client.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(unauthenticated)?;

    let bearer = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(unauthenticated)?;

    let claims = token::verify(&state.tokens, bearer)?;

    let row = state
        .db
        .get_user_by_id(claims.user_id)?
        .ok_or_else(unauthenticated)?;

    let user = User {
        id: row.id,
        email: row.email,
        created_at: parse_db_time(&row.created_at, "user", row.id),
        phone_number: row.phone_number,
    };

    req.extensions_mut().insert(CurrentUser(user));
    Ok(next.run(req).await)
}

fn unauthenticated() -> ApiError {
    ApiError::Unauthenticated("Could not validate credentials".to_string())
}
