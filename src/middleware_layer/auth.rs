use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use tower_cookies::Cookies;

use crate::{
    error::{AppError, Result},
    models::session::AuthSession,
    services::session,
    state::AppState,
};

/// Runs the full validation pass for one request: cookie → signature →
/// lifetime against the live configuration. Expired or malformed tokens
/// come back as `Unauthorized`, indistinguishable from no token at all.
async fn authenticate(state: &AppState, cookies: &Cookies) -> Result<AuthSession> {
    let token = cookies
        .get(session::SESSION_COOKIE)
        .map(|c| c.value().to_string())
        .ok_or(AppError::Unauthorized)?;

    let claims = session::decode(&token, &state.session_keys).ok_or(AppError::Unauthorized)?;

    session::validate(&claims, &state.settings)
        .await
        .ok_or(AppError::Unauthorized)
}

/// A middleware that requires a valid session.
pub async fn require_auth(
    State(state): State<AppState>,
    cookies: Cookies,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response> {
    let auth_session = authenticate(&state, &cookies).await?;
    tracing::debug!("Authenticated request for {}", auth_session.user_id);

    request.extensions_mut().insert(auth_session);
    Ok(next.run(request).await)
}

/// A middleware that requires a valid session with the admin role.
/// Insufficient role is `Forbidden` (403), a distinct condition from the
/// `Unauthorized` (401) produced by a missing or expired session.
pub async fn require_admin(
    State(state): State<AppState>,
    cookies: Cookies,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response> {
    let auth_session = authenticate(&state, &cookies).await?;

    if !auth_session.role.is_admin() {
        tracing::warn!("Non-admin {} hit an admin route", auth_session.user_id);
        return Err(AppError::Forbidden);
    }

    request.extensions_mut().insert(auth_session);
    Ok(next.run(request).await)
}
