use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, ParamsBuilder,
};
use deadpool_postgres::Pool;
use futures::future::BoxFuture;
use rand::rngs::OsRng;
use rand::RngCore;
use subtle::ConstantTimeEq;
use zeroize::Zeroize;

use crate::error::{AppError, Result};
use crate::models::principal::{Principal, Role};
use crate::repositories::user as user_repo;

/// The memory cost for Argon2 in MB.
const ARGON2_MEMORY_MB: u32 = 19;
/// The number of iterations for Argon2.
const ARGON2_ITERATIONS: u32 = 3;
/// The parallelism factor for Argon2.
const ARGON2_PARALLELISM: u32 = 4;

/// Fixed literal accepted for the static admin when no password hash is
/// configured. Development only.
const DEV_FALLBACK_PASSWORD: &str = "#!nclude<Adm!n_123>";

/// Principal id used for the static admin (never stored in the database).
const STATIC_ADMIN_ID: &str = "admin-1";

/// Hashes a password using Argon2id.
///
/// # Arguments
///
/// * `password` - The password to hash.
///
/// # Returns
///
/// A `Result` containing the hashed password.
pub fn hash_password(password: &str) -> Result<String> {
    let mut password_bytes = password.as_bytes().to_vec();

    let mut salt_bytes = [0u8; 16];
    OsRng.fill_bytes(&mut salt_bytes);

    let salt = SaltString::encode_b64(&salt_bytes)
        .map_err(|e| AppError::Internal(format!("Salt encoding error: {}", e)))?;

    let argon2 = Argon2::new(
        argon2::Algorithm::Argon2id,
        argon2::Version::V0x13,
        ParamsBuilder::new()
            .m_cost(ARGON2_MEMORY_MB * 1024)
            .t_cost(ARGON2_ITERATIONS)
            .p_cost(ARGON2_PARALLELISM)
            .build()
            .map_err(|e| AppError::Internal(format!("Argon2 params: {}", e)))?,
    );

    let password_hash = argon2
        .hash_password(&password_bytes, &salt)
        .map_err(|e| AppError::Internal(format!("Argon2 hash error: {}", e)))?
        .to_string();

    password_bytes.zeroize();
    Ok(password_hash)
}

/// Verifies a password against an Argon2 hash.
///
/// # Arguments
///
/// * `password` - The password to verify.
/// * `hash` - The hash to verify against.
///
/// # Returns
///
/// A `Result` containing `true` if the password is valid, `false` otherwise.
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let mut password_bytes = password.as_bytes().to_vec();
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| AppError::Internal(format!("Hash parse error: {}", e)))?;
    let argon2 = Argon2::default();
    let result = argon2
        .verify_password(&password_bytes, &parsed_hash)
        .is_ok();

    password_bytes.zeroize();
    Ok(result)
}

/// One strategy in the ordered credential chain. Sources are evaluated
/// strictly in sequence; the first to return a principal wins.
pub trait CredentialSource: Send + Sync {
    /// Short name for logging.
    fn name(&self) -> &'static str;

    /// Returns `Ok(None)` on mismatch so the chain falls through to the
    /// next source. Availability failures inside a source must be
    /// swallowed as `Ok(None)`, never propagated.
    fn try_authenticate<'a>(
        &'a self,
        email: &'a str,
        password: &'a str,
    ) -> BoxFuture<'a, Result<Option<Principal>>>;
}

/// The static administrator identity from process configuration. Checked
/// before the persisted store so a store outage can never block admin
/// login.
pub struct StaticAdminSource {
    email: String,
    password_hash: Option<String>,
    display_name: String,
}

impl StaticAdminSource {
    pub fn new(email: String, password_hash: Option<String>, display_name: String) -> Self {
        Self {
            email,
            password_hash,
            display_name,
        }
    }

    fn principal(&self) -> Principal {
        Principal {
            id: STATIC_ADMIN_ID.to_string(),
            email: self.email.clone(),
            display_name: self.display_name.clone(),
            role: Role::Admin,
        }
    }
}

impl CredentialSource for StaticAdminSource {
    fn name(&self) -> &'static str {
        "static-admin"
    }

    fn try_authenticate<'a>(
        &'a self,
        email: &'a str,
        password: &'a str,
    ) -> BoxFuture<'a, Result<Option<Principal>>> {
        Box::pin(async move {
            // Case-sensitive exact match against the configured email.
            if email != self.email {
                return Ok(None);
            }

            let valid = match self.password_hash {
                Some(ref hash) => match verify_password(password, hash) {
                    Ok(v) => v,
                    Err(e) => {
                        tracing::warn!("Static admin hash unusable: {}", e);
                        false
                    }
                },
                // No hash configured: constant-time compare against the
                // development fallback literal.
                None => password
                    .as_bytes()
                    .ct_eq(DEV_FALLBACK_PASSWORD.as_bytes())
                    .into(),
            };

            if valid {
                tracing::info!("Static admin authenticated");
                Ok(Some(self.principal()))
            } else {
                // Mismatch falls through: the same email could exist in
                // the persisted store.
                Ok(None)
            }
        })
    }
}

/// Secondary accounts from the `users` table. Any store error is treated
/// as "no match" to keep the generic-failure contract and to avoid
/// leaking infrastructure state.
pub struct StoredUserSource {
    pool: Pool,
}

impl StoredUserSource {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }
}

impl CredentialSource for StoredUserSource {
    fn name(&self) -> &'static str {
        "stored-user"
    }

    fn try_authenticate<'a>(
        &'a self,
        email: &'a str,
        password: &'a str,
    ) -> BoxFuture<'a, Result<Option<Principal>>> {
        Box::pin(async move {
            let user = match user_repo::find_by_email(&self.pool, email).await {
                Ok(user) => user,
                Err(e) => {
                    tracing::warn!("User store unavailable during login: {}", e);
                    return Ok(None);
                }
            };

            let Some(user) = user else {
                return Ok(None);
            };

            let valid = match verify_password(password, &user.password) {
                Ok(v) => v,
                Err(e) => {
                    tracing::warn!("Stored hash unusable for {}: {}", user.id, e);
                    false
                }
            };

            if valid {
                tracing::info!("Stored user authenticated: {}", user.id);
                Ok(Some(Principal {
                    id: user.id.to_string(),
                    email: user.email,
                    display_name: user.name,
                    // Role taken verbatim from the stored field.
                    role: Role::parse(&user.role),
                }))
            } else {
                Ok(None)
            }
        })
    }
}

/// Runs the credential chain. Missing fields fail immediately without any
/// lookup; all failures collapse to the same generic error.
pub async fn verify_credentials(
    sources: &[Box<dyn CredentialSource>],
    email: &str,
    password: &str,
) -> Result<Principal> {
    if email.is_empty() || password.is_empty() {
        return Err(AppError::InvalidCredentials);
    }

    for source in sources {
        match source.try_authenticate(email, password).await {
            Ok(Some(principal)) => return Ok(principal),
            Ok(None) => {}
            Err(e) => {
                tracing::warn!("Credential source {} failed: {}", source.name(), e);
            }
        }
    }

    Err(AppError::InvalidCredentials)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn static_admin_with_hash(password: &str) -> StaticAdminSource {
        StaticAdminSource::new(
            "admin@example.com".to_string(),
            Some(hash_password(password).unwrap()),
            "Admin User".to_string(),
        )
    }

    /// A source whose backing store is down on every call.
    struct OutageSource;

    impl CredentialSource for OutageSource {
        fn name(&self) -> &'static str {
            "outage"
        }

        fn try_authenticate<'a>(
            &'a self,
            _email: &'a str,
            _password: &'a str,
        ) -> BoxFuture<'a, Result<Option<Principal>>> {
            Box::pin(async { Err(AppError::Internal("store unreachable".to_string())) })
        }
    }

    /// A stub persisted-store source accepting one fixed pair.
    struct FixedUserSource {
        email: &'static str,
        password: &'static str,
    }

    impl CredentialSource for FixedUserSource {
        fn name(&self) -> &'static str {
            "fixed-user"
        }

        fn try_authenticate<'a>(
            &'a self,
            email: &'a str,
            password: &'a str,
        ) -> BoxFuture<'a, Result<Option<Principal>>> {
            Box::pin(async move {
                if email == self.email && password == self.password {
                    Ok(Some(Principal {
                        id: "u-1".to_string(),
                        email: email.to_string(),
                        display_name: "Stored User".to_string(),
                        role: Role::User,
                    }))
                } else {
                    Ok(None)
                }
            })
        }
    }

    #[tokio::test]
    async fn static_admin_logs_in_with_configured_hash() {
        let sources: Vec<Box<dyn CredentialSource>> =
            vec![Box::new(static_admin_with_hash("correct horse"))];
        let principal = verify_credentials(&sources, "admin@example.com", "correct horse")
            .await
            .unwrap();
        assert_eq!(principal.id, "admin-1");
        assert_eq!(principal.role, Role::Admin);
    }

    #[tokio::test]
    async fn static_admin_accepts_fallback_literal_without_hash() {
        let sources: Vec<Box<dyn CredentialSource>> = vec![Box::new(StaticAdminSource::new(
            "admin@example.com".to_string(),
            None,
            "Admin User".to_string(),
        ))];
        let principal = verify_credentials(&sources, "admin@example.com", DEV_FALLBACK_PASSWORD)
            .await
            .unwrap();
        assert_eq!(principal.role, Role::Admin);

        let err = verify_credentials(&sources, "admin@example.com", "nope").await;
        assert!(matches!(err, Err(AppError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn admin_email_match_is_case_sensitive() {
        let sources: Vec<Box<dyn CredentialSource>> =
            vec![Box::new(static_admin_with_hash("correct horse"))];
        let err = verify_credentials(&sources, "Admin@example.com", "correct horse").await;
        assert!(matches!(err, Err(AppError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn static_admin_login_survives_store_outage() {
        let sources: Vec<Box<dyn CredentialSource>> = vec![
            Box::new(static_admin_with_hash("correct horse")),
            Box::new(OutageSource),
        ];
        let principal = verify_credentials(&sources, "admin@example.com", "correct horse")
            .await
            .unwrap();
        assert_eq!(principal.role, Role::Admin);
    }

    #[tokio::test]
    async fn store_outage_yields_generic_failure_not_an_error_detail() {
        let sources: Vec<Box<dyn CredentialSource>> = vec![
            Box::new(static_admin_with_hash("correct horse")),
            Box::new(OutageSource),
        ];
        let err = verify_credentials(&sources, "someone@example.com", "whatever").await;
        assert!(matches!(err, Err(AppError::InvalidCredentials)));
    }

    // Pins the literal order-of-checks behavior: a stored user sharing
    // the static admin's email authenticates via the store when the
    // static password does not match.
    #[tokio::test]
    async fn static_mismatch_falls_through_to_stored_user() {
        let sources: Vec<Box<dyn CredentialSource>> = vec![
            Box::new(static_admin_with_hash("static password")),
            Box::new(FixedUserSource {
                email: "admin@example.com",
                password: "stored password",
            }),
        ];
        let principal = verify_credentials(&sources, "admin@example.com", "stored password")
            .await
            .unwrap();
        assert_eq!(principal.id, "u-1");
        assert_eq!(principal.role, Role::User);
    }

    #[tokio::test]
    async fn missing_fields_fail_without_any_lookup() {
        let sources: Vec<Box<dyn CredentialSource>> = vec![Box::new(OutageSource)];
        assert!(matches!(
            verify_credentials(&sources, "", "secret").await,
            Err(AppError::InvalidCredentials)
        ));
        assert!(matches!(
            verify_credentials(&sources, "a@b.c", "").await,
            Err(AppError::InvalidCredentials)
        ));
    }

    #[test]
    fn password_hash_round_trip() {
        let hash = hash_password("s3cret!").unwrap();
        assert!(verify_password("s3cret!", &hash).unwrap());
        assert!(!verify_password("s3cret", &hash).unwrap());
    }
}
