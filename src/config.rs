use std::env;
use anyhow::{Context, Result};

/// The application's configuration.
#[derive(Clone)]
pub struct Config {
    /// The URL of the PostgreSQL database.
    pub database_url: String,
    /// The secret used to sign session tokens.
    pub session_secret: String,
    /// The static administrator's email address.
    pub admin_email: String,
    /// The static administrator's Argon2 password hash, if configured.
    /// When absent, the development fallback password is used instead.
    pub admin_password_hash: Option<String>,
    /// The static administrator's display name.
    pub admin_name: String,
    /// The port the server listens on.
    pub port: u16,
}

impl Config {
    /// Creates a new `Config` from environment variables.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `Config`.
    pub fn from_env() -> Result<Self> {
        let session_secret = env::var("SESSION_SECRET")
            .context("SESSION_SECRET must be set (generate with: openssl rand -hex 32)")?;

        if session_secret.len() < 32 {
            anyhow::bail!("SESSION_SECRET must be at least 32 characters");
        }

        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .context("DATABASE_URL must be set")?,
            session_secret,
            admin_email: env::var("ADMIN_EMAIL")
                .context("ADMIN_EMAIL must be set")?,
            admin_password_hash: env::var("ADMIN_PASSWORD_HASH").ok(),
            admin_name: env::var("ADMIN_NAME")
                .unwrap_or_else(|_| "Admin User".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .context("Invalid PORT")?,
        })
    }
}
