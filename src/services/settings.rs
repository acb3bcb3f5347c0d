use std::time::Duration;

use deadpool_postgres::Pool;
use futures::future::BoxFuture;

use crate::error::{AppError, Result};
use crate::models::settings::Settings;
use crate::repositories::settings as settings_repo;

/// Bound on the settings fetch during session validation; beyond this the
/// validator falls back to the default duration instead of stalling the
/// request.
const FETCH_TIMEOUT: Duration = Duration::from_secs(3);

/// Provider of the currently configured session duration. Injected into
/// the session validator so tests can stub it without a datastore.
pub trait SessionDurationSource: Send + Sync {
    fn session_duration_secs(&self) -> BoxFuture<'_, Result<i64>>;
}

/// Reads the duration from the settings row on every call. No caching:
/// a settings change must take effect on the very next validation.
#[derive(Clone)]
pub struct DbSettings {
    pool: Pool,
}

impl DbSettings {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    /// Fetches the full settings row (settings endpoints).
    pub async fn fetch(&self) -> Result<Settings> {
        settings_repo::get_or_create(&self.pool).await
    }
}

impl SessionDurationSource for DbSettings {
    fn session_duration_secs(&self) -> BoxFuture<'_, Result<i64>> {
        Box::pin(async {
            let settings = tokio::time::timeout(FETCH_TIMEOUT, self.fetch())
                .await
                .map_err(|_| AppError::Internal("Settings fetch timed out".to_string()))??;
            Ok(settings.session_duration)
        })
    }
}
