use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::error::{AppError, Result};
use crate::models::principal::Principal;
use crate::models::session::{AuthSession, Claims};
use crate::models::settings::DEFAULT_SESSION_DURATION_SECS;
use crate::services::settings::SessionDurationSource;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "session_token";

/// HS256 keys derived from `SESSION_SECRET`.
#[derive(Clone)]
pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl SessionKeys {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

/// Mints the claims for a freshly verified principal. Called exactly once
/// per login; `iat` is never touched again.
pub fn issue(principal: &Principal) -> Claims {
    issue_at(principal, Utc::now().timestamp())
}

fn issue_at(principal: &Principal, now: i64) -> Claims {
    Claims {
        sub: principal.id.clone(),
        email: principal.email.clone(),
        name: principal.display_name.clone(),
        role: principal.role,
        iat: now,
    }
}

/// Signs claims into the cookie value.
pub fn encode(claims: &Claims, keys: &SessionKeys) -> Result<String> {
    jsonwebtoken::encode(&Header::default(), claims, &keys.encoding)
        .map_err(|e| AppError::Internal(format!("Token signing failed: {}", e)))
}

/// Checks the signature and deserializes the claims. There is no `exp`
/// claim to check here; lifetime is enforced by [`validate`] against the
/// live configuration.
pub fn decode(token: &str, keys: &SessionKeys) -> Option<Claims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = false;
    validation.required_spec_claims.clear();

    match jsonwebtoken::decode::<Claims>(token, &keys.decoding, &validation) {
        Ok(data) => Some(data.claims),
        Err(e) => {
            tracing::debug!("Rejecting session token: {}", e);
            None
        }
    }
}

/// Re-derives the session's validity from the current configuration.
///
/// Runs on every authenticated request. An expired session yields `None`
/// ("no session"), not an error; a configuration fetch failure degrades
/// to the default duration and is never surfaced.
pub async fn validate<D: SessionDurationSource>(
    claims: &Claims,
    durations: &D,
) -> Option<AuthSession> {
    let duration = match durations.session_duration_secs().await {
        Ok(secs) => secs,
        Err(e) => {
            tracing::debug!("Settings unavailable, using default duration: {}", e);
            DEFAULT_SESSION_DURATION_SECS
        }
    };
    validate_at(claims, duration, Utc::now().timestamp())
}

/// Pure validity check: the session is live while `elapsed <= duration`
/// (valid at exact equality, invalid just past it).
pub fn validate_at(claims: &Claims, duration_secs: i64, now: i64) -> Option<AuthSession> {
    let elapsed = now - claims.iat;
    if elapsed > duration_secs {
        return None;
    }

    Some(AuthSession {
        user_id: claims.sub.clone(),
        email: claims.email.clone(),
        name: claims.name.clone(),
        role: claims.role,
        issued_at: claims.iat,
        expires_at: claims.iat + duration_secs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::models::principal::Role;
    use futures::future::BoxFuture;
    use std::sync::atomic::{AtomicI64, Ordering};
    use std::sync::Arc;

    fn principal() -> Principal {
        Principal {
            id: "admin-1".to_string(),
            email: "admin@example.com".to_string(),
            display_name: "Admin User".to_string(),
            role: Role::Admin,
        }
    }

    /// A duration source backed by a mutable value, standing in for the
    /// settings row.
    struct StubDurations(Arc<AtomicI64>);

    impl SessionDurationSource for StubDurations {
        fn session_duration_secs(&self) -> BoxFuture<'_, Result<i64>> {
            let value = self.0.load(Ordering::SeqCst);
            Box::pin(async move { Ok(value) })
        }
    }

    /// A duration source whose store is always down.
    struct BrokenDurations;

    impl SessionDurationSource for BrokenDurations {
        fn session_duration_secs(&self) -> BoxFuture<'_, Result<i64>> {
            Box::pin(async { Err(crate::error::AppError::Internal("down".to_string())) })
        }
    }

    #[test]
    fn validity_boundary_around_configured_duration() {
        let claims = issue_at(&principal(), 1_000);
        let d = 3600;

        assert!(validate_at(&claims, d, 1_000 + d - 1).is_some());
        // Exactly-equal elapsed is still valid; only elapsed > duration
        // invalidates.
        assert!(validate_at(&claims, d, 1_000 + d).is_some());
        assert!(validate_at(&claims, d, 1_000 + d + 1).is_none());
    }

    #[test]
    fn expires_at_is_derived_from_issuance_and_duration() {
        let claims = issue_at(&principal(), 1_000);
        let session = validate_at(&claims, 7200, 1_500).unwrap();
        assert_eq!(session.issued_at, 1_000);
        assert_eq!(session.expires_at, 8_200);
    }

    #[test]
    fn repeated_validation_is_idempotent() {
        let claims = issue_at(&principal(), 1_000);
        let first = validate_at(&claims, 3600, 2_000).unwrap();
        let second = validate_at(&claims, 3600, 2_000).unwrap();
        assert_eq!(first.expires_at, second.expires_at);
        assert_eq!(first.user_id, second.user_id);
    }

    #[tokio::test]
    async fn duration_change_applies_to_live_sessions_immediately() {
        let duration = Arc::new(AtomicI64::new(7200));
        let source = StubDurations(duration.clone());
        let mut claims = issue_at(&principal(), Utc::now().timestamp());
        // Issued two hours ago, just inside the 7200 s window.
        claims.iat -= 7200;

        assert!(validate(&claims, &source).await.is_some());

        // Shrinking the configured duration invalidates the session on
        // the very next validation, without re-login.
        duration.store(3600, Ordering::SeqCst);
        assert!(validate(&claims, &source).await.is_none());
    }

    #[tokio::test]
    async fn settings_outage_falls_back_to_default_duration() {
        let now = Utc::now().timestamp();
        let mut claims = issue_at(&principal(), now);

        // Inside the default hour: valid despite the outage.
        claims.iat = now - (DEFAULT_SESSION_DURATION_SECS - 60);
        assert!(validate(&claims, &BrokenDurations).await.is_some());

        // Past the default hour: invalid.
        claims.iat = now - (DEFAULT_SESSION_DURATION_SECS + 60);
        assert!(validate(&claims, &BrokenDurations).await.is_none());
    }

    #[test]
    fn token_round_trip_and_tamper_rejection() {
        let keys = SessionKeys::new("0123456789abcdef0123456789abcdef");
        let claims = issue_at(&principal(), 1_000);
        let token = encode(&claims, &keys).unwrap();

        let decoded = decode(&token, &keys).unwrap();
        assert_eq!(decoded.sub, "admin-1");
        assert_eq!(decoded.iat, 1_000);
        assert_eq!(decoded.role, Role::Admin);

        let other_keys = SessionKeys::new("ffffffffffffffffffffffffffffffff");
        assert!(decode(&token, &other_keys).is_none());
        assert!(decode("not-a-token", &keys).is_none());
    }
}
