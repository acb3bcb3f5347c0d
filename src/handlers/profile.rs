use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::{
    error::{AppError, Result},
    models::profile::Profile,
    repositories::profile as profile_repo,
    state::AppState,
};

/// Empty strings submitted from the editor become NULLs.
fn normalize(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Returns the public about-page profile.
#[axum::debug_handler]
pub async fn get_profile(State(state): State<AppState>) -> Result<Response> {
    let profile = profile_repo::find(&state.db)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok((StatusCode::OK, Json(profile)).into_response())
}

/// Upserts the profile singleton (admin only).
#[axum::debug_handler]
pub async fn update_profile(
    State(state): State<AppState>,
    Json(payload): Json<Profile>,
) -> Result<Response> {
    let cleaned = Profile {
        name: normalize(payload.name),
        title: normalize(payload.title),
        bio: normalize(payload.bio),
        email: normalize(payload.email),
        location: normalize(payload.location),
        avatar_url: normalize(payload.avatar_url),
        resume_url: normalize(payload.resume_url),
        github_url: normalize(payload.github_url),
        linkedin_url: normalize(payload.linkedin_url),
    };

    let profile = profile_repo::upsert(&state.db, &cleaned).await?;
    tracing::info!("Profile updated");
    Ok((StatusCode::OK, Json(profile)).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_fields_become_null() {
        assert_eq!(normalize(Some(String::new())), None);
        assert_eq!(normalize(Some("   ".to_string())), None);
        assert_eq!(normalize(Some("kept".to_string())), Some("kept".to_string()));
        assert_eq!(normalize(None), None);
    }
}
