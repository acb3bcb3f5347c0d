use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use crate::{
    error::Result,
    models::settings::hours_to_seconds,
    repositories::settings as settings_repo,
    state::AppState,
    validation::settings::{validate_primary_color, validate_session_duration_hours},
};

/// The request payload for updating settings. `session_duration` is in
/// hours; fields left out keep their current value.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettingsRequest {
    pub primary_color: Option<String>,
    pub session_duration: Option<i64>,
}

/// Returns the current settings. Public: the theme color is needed
/// before any login. Duration is exposed in hours.
#[axum::debug_handler]
pub async fn get_settings(State(state): State<AppState>) -> Result<Response> {
    let settings = state.settings.fetch().await?;
    Ok((StatusCode::OK, Json(settings.to_view())).into_response())
}

/// Updates the settings singleton (admin only). Hours are validated
/// before the conversion to seconds so out-of-range values never reach
/// the store. Takes effect on the next validation pass of every live
/// session.
#[axum::debug_handler]
pub async fn update_settings(
    State(state): State<AppState>,
    Json(payload): Json<UpdateSettingsRequest>,
) -> Result<Response> {
    if let Some(ref color) = payload.primary_color {
        validate_primary_color(color)?;
    }

    let duration_secs = match payload.session_duration {
        Some(hours) => {
            validate_session_duration_hours(hours)?;
            Some(hours_to_seconds(hours))
        }
        None => None,
    };

    let settings = settings_repo::update(
        &state.db,
        payload.primary_color.as_deref(),
        duration_secs,
    )
    .await?;

    tracing::info!(
        "Settings updated: color={} duration={}s",
        settings.primary_color,
        settings.session_duration
    );

    Ok((StatusCode::OK, Json(settings.to_view())).into_response())
}
