use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::{AppError, Result},
    models::statistic::Statistic,
    repositories::statistic as statistic_repo,
    state::AppState,
};

#[derive(Deserialize)]
pub struct StatisticListQuery {
    /// `true` includes inactive statistics (admin editing view).
    pub all: Option<bool>,
}

#[derive(Serialize)]
pub struct StatisticListResponse {
    pub statistics: Vec<Statistic>,
}

/// The request payload for creating a statistic.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateStatisticRequest {
    pub label: String,
    pub value: i32,
    pub suffix: Option<String>,
    pub icon: Option<String>,
    pub sort_order: Option<i32>,
    pub active: Option<bool>,
}

/// The request payload for updating a statistic. Absent fields keep
/// their current value.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatisticRequest {
    pub label: Option<String>,
    pub value: Option<i32>,
    pub suffix: Option<String>,
    pub icon: Option<String>,
    pub sort_order: Option<i32>,
    pub active: Option<bool>,
}

/// Lists statistics in display order. Public callers see active ones.
#[axum::debug_handler]
pub async fn list_statistics(
    State(state): State<AppState>,
    Query(query): Query<StatisticListQuery>,
) -> Result<Response> {
    let statistics = statistic_repo::list(&state.db, !query.all.unwrap_or(false)).await?;
    Ok((StatusCode::OK, Json(StatisticListResponse { statistics })).into_response())
}

/// Creates a statistic (admin only).
#[axum::debug_handler]
pub async fn create_statistic(
    State(state): State<AppState>,
    Json(payload): Json<CreateStatisticRequest>,
) -> Result<Response> {
    if payload.label.trim().is_empty() {
        return Err(AppError::Validation("Label is required".to_string()));
    }

    let statistic = statistic_repo::create(
        &state.db,
        &payload.label,
        payload.value,
        payload.suffix.as_deref(),
        payload.icon.as_deref(),
        payload.sort_order.unwrap_or(0),
        payload.active.unwrap_or(true),
    )
    .await?;

    tracing::info!("Statistic created: {}", statistic.id);
    Ok((StatusCode::CREATED, Json(statistic)).into_response())
}

/// Updates a statistic (admin only).
#[axum::debug_handler]
pub async fn update_statistic(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStatisticRequest>,
) -> Result<Response> {
    let existing = statistic_repo::find_by_id(&state.db, &id)
        .await?
        .ok_or(AppError::NotFound)?;

    let statistic = statistic_repo::update(
        &state.db,
        &id,
        &payload.label.unwrap_or(existing.label),
        payload.value.unwrap_or(existing.value),
        payload.suffix.or(existing.suffix).as_deref(),
        payload.icon.or(existing.icon).as_deref(),
        payload.sort_order.unwrap_or(existing.sort_order),
        payload.active.unwrap_or(existing.active),
    )
    .await?;

    tracing::info!("Statistic updated: {}", statistic.id);
    Ok((StatusCode::OK, Json(statistic)).into_response())
}

/// Deletes a statistic (admin only).
#[axum::debug_handler]
pub async fn delete_statistic(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response> {
    statistic_repo::delete(&state.db, &id).await?;
    tracing::info!("Statistic deleted: {}", id);
    Ok(StatusCode::NO_CONTENT.into_response())
}
