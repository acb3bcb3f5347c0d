use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A user record from the `users` table. These are secondary accounts;
/// the static admin never appears here.
#[derive(Clone, Debug)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    /// Argon2 password hash.
    pub password: String,
    pub name: String,
    /// Role string as stored; taken verbatim when building a principal.
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
