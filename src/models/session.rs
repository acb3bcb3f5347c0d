use serde::{Deserialize, Serialize};

use crate::models::principal::Role;

/// The signed claims carried by the session cookie.
///
/// There is deliberately no `exp` claim: the validity window is not fixed
/// at issuance. Expiry is recomputed on every request from the currently
/// configured session duration, so a settings change applies immediately
/// to all live sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// The principal id.
    pub sub: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    /// Issuance time in Unix seconds. Set once at login, never refreshed.
    pub iat: i64,
}

/// A validated session as seen by handlers and the expiry monitor.
///
/// `expires_at` is derived (`iat + current duration`), not stored in the
/// token, so collaborators can read it without redoing the computation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    pub user_id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub issued_at: i64,
    pub expires_at: i64,
}
