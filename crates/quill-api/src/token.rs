use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

use quill_types::api::Claims;

use crate::error::ApiError;

/// Immutable token-service configuration, built once at process start and
/// injected through `AppState`.
#[derive(Debug, Clone)]
pub struct TokenConfig {
    pub secret: String,
    pub expire_minutes: i64,
}

/// Encode a `{user_id, exp}` claim set into an HS256 JWT.
pub fn issue(config: &TokenConfig, user_id: i64) -> Result<String, ApiError> {
    let claims = Claims {
        user_id,
        exp: (chrono::Utc::now() + chrono::Duration::minutes(config.expire_minutes)).timestamp()
            as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
    .map_err(|e| ApiError::Internal(e.into()))
}

/// Decode and check signature + expiry. Signature and expiry are the only
/// validity checks — there is no revocation list, so a token stays good
/// until it expires even after logout.
pub fn verify(config: &TokenConfig, token: &str) -> Result<Claims, ApiError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| ApiError::Unauthenticated("Could not validate credentials".to_string()))
}
