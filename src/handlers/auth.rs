use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use tower_cookies::cookie::time::Duration;
use tower_cookies::{Cookie, Cookies};

use crate::{
    error::Result,
    models::session::AuthSession,
    services::auth as auth_service,
    services::session,
    state::AppState,
    validation::auth::validate_login,
    validation::settings::MAX_SESSION_HOURS,
};

/// The request payload for login.
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// The response payload for authentication-related requests.
#[derive(Serialize)]
pub struct AuthResponse {
    pub success: bool,
    pub message: String,
}

/// Creates a secure cookie with the given name and value.
fn create_secure_cookie(name: &'static str, value: String, max_age_secs: i64) -> Cookie<'static> {
    let mut cookie = Cookie::new(name, value);

    let is_production =
        std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()) == "production";

    cookie.set_http_only(true);
    if is_production {
        cookie.set_secure(true);
    }
    cookie.set_same_site(tower_cookies::cookie::SameSite::Lax);
    cookie.set_max_age(Duration::seconds(max_age_secs));
    cookie.set_path("/");

    cookie
}

/// Handles login: runs the credential chain and, on success, mints the
/// signed session token. Failures are one generic message regardless of
/// which check failed.
#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    cookies: Cookies,
    Json(payload): Json<LoginRequest>,
) -> Result<Response> {
    validate_login(&payload.email, &payload.password)?;

    let principal =
        auth_service::verify_credentials(&state.credential_sources, &payload.email, &payload.password)
            .await?;

    let claims = session::issue(&principal);
    let token = session::encode(&claims, &state.session_keys)?;

    // Cookie persistence only needs to outlast the largest configurable
    // duration; the actual lifetime is enforced per request against the
    // live settings value.
    let session_cookie =
        create_secure_cookie(session::SESSION_COOKIE, token, MAX_SESSION_HOURS * 3600);
    cookies.add(session_cookie);

    tracing::info!("Login successful for principal {}", principal.id);

    let response = AuthResponse {
        success: true,
        message: "Login successful".to_string(),
    };

    Ok((StatusCode::OK, Json(response)).into_response())
}

/// Handles sign-out: drops the session cookie. The token itself is
/// stateless, so removal on the client is the whole transition to
/// Invalid; a new login is required afterwards.
#[axum::debug_handler]
pub async fn logout(
    Extension(auth_session): Extension<AuthSession>,
    cookies: Cookies,
) -> Result<Response> {
    tracing::info!("Logout for principal {}", auth_session.user_id);

    let mut session_cookie = Cookie::new(session::SESSION_COOKIE, "");
    session_cookie.set_max_age(Duration::seconds(0));
    session_cookie.set_path("/");
    cookies.remove(session_cookie);

    let response = AuthResponse {
        success: true,
        message: "Logout successful".to_string(),
    };

    Ok((StatusCode::OK, Json(response)).into_response())
}

/// Returns the validated session, including the computed `expiresAt`
/// collaborators poll (notably the expiry monitor).
#[axum::debug_handler]
pub async fn current_session(
    Extension(auth_session): Extension<AuthSession>,
) -> Result<Response> {
    Ok((StatusCode::OK, Json(auth_session)).into_response())
}
