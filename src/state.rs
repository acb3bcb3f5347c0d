use std::sync::Arc;
use std::time::Duration;

use deadpool_postgres::Pool;

use crate::config::Config;
use crate::error::Result;
use crate::middleware_layer::rate_limit::RateLimitStore;
use crate::services::auth::{CredentialSource, StaticAdminSource, StoredUserSource};
use crate::services::session::SessionKeys;
use crate::services::settings::DbSettings;

/// Login attempts allowed per client IP within one window.
const LOGIN_ATTEMPT_LIMIT: u32 = 5;
/// The fixed rate-limit window for login attempts.
const LOGIN_ATTEMPT_WINDOW: Duration = Duration::from_secs(15 * 60);

/// The application's state.
#[derive(Clone)]
pub struct AppState {
    /// The database connection pool.
    pub db: Pool,
    /// The application's configuration.
    pub config: Config,
    /// Settings provider; read on every session validation.
    pub settings: DbSettings,
    /// Keys for signing and checking session tokens.
    pub session_keys: SessionKeys,
    /// The ordered credential chain: static admin first, then the
    /// persisted user store.
    pub credential_sources: Arc<Vec<Box<dyn CredentialSource>>>,
    /// In-process fixed-window limiter for the login route.
    pub login_limiter: RateLimitStore,
}

impl AppState {
    /// Creates a new `AppState`.
    ///
    /// # Arguments
    ///
    /// * `config` - The application's configuration.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `AppState`.
    pub fn new(config: &Config) -> Result<Self> {
        let db = crate::db::create_pool(&config.database_url)?;
        tracing::info!("PostgreSQL pool initialized");

        let settings = DbSettings::new(db.clone());
        let session_keys = SessionKeys::new(&config.session_secret);

        let credential_sources: Vec<Box<dyn CredentialSource>> = vec![
            Box::new(StaticAdminSource::new(
                config.admin_email.clone(),
                config.admin_password_hash.clone(),
                config.admin_name.clone(),
            )),
            Box::new(StoredUserSource::new(db.clone())),
        ];

        let login_limiter = RateLimitStore::new(LOGIN_ATTEMPT_LIMIT, LOGIN_ATTEMPT_WINDOW);
        tracing::info!("Login rate limiter initialized (in-process, fixed window)");

        Ok(AppState {
            db,
            config: config.clone(),
            settings,
            session_keys,
            credential_sources: Arc::new(credential_sources),
            login_limiter,
        })
    }
}
