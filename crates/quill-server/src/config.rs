use anyhow::{Context, Result};

/// Process-wide configuration, read from the environment once at startup
/// and passed into the token service and store initializer.
#[derive(Debug, Clone)]
pub struct Config {
    pub secret_key: String,
    pub token_expire_minutes: i64,
    pub db_path: String,
    pub host: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let secret_key =
            std::env::var("QUILL_SECRET_KEY").unwrap_or_else(|_| "dev-secret-change-me".into());
        let token_expire_minutes: i64 = std::env::var("QUILL_TOKEN_EXPIRE_MINUTES")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .context("QUILL_TOKEN_EXPIRE_MINUTES must be an integer")?;
        let db_path = std::env::var("QUILL_DB_PATH").unwrap_or_else(|_| "quill.db".into());
        let host = std::env::var("QUILL_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port: u16 = std::env::var("QUILL_PORT")
            .unwrap_or_else(|_| "8000".into())
            .parse()
            .context("QUILL_PORT must be a port number")?;

        Ok(Self {
            secret_key,
            token_expire_minutes,
            db_path,
            host,
            port,
        })
    }
}
