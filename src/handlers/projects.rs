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
    models::pagination::{normalize_limit, normalize_page, Pagination},
    models::project::Project,
    repositories::project as project_repo,
    repositories::project::ProjectFilter,
    state::AppState,
    util::slugify,
};

#[derive(Deserialize)]
pub struct ProjectListQuery {
    /// `all` shows unpublished projects too (admin view); anything else
    /// defaults to published-only.
    pub published: Option<String>,
    pub featured: Option<bool>,
    pub category: Option<String>,
    pub search: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Serialize)]
pub struct ProjectListResponse {
    pub projects: Vec<Project>,
    pub pagination: Pagination,
}

/// The request payload for creating a project.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    pub title: String,
    pub description: String,
    pub long_description: Option<String>,
    pub image_url: Option<String>,
    pub demo_url: Option<String>,
    pub github_url: Option<String>,
    pub technologies: Option<Vec<String>>,
    pub category: Option<String>,
    #[serde(default)]
    pub featured: bool,
    pub published: Option<bool>,
}

/// The request payload for updating a project. Absent fields keep their
/// current value.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProjectRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub long_description: Option<String>,
    pub image_url: Option<String>,
    pub demo_url: Option<String>,
    pub github_url: Option<String>,
    pub technologies: Option<Vec<String>>,
    pub category: Option<String>,
    pub featured: Option<bool>,
    pub published: Option<bool>,
}

fn encode_technologies(technologies: Option<Vec<String>>) -> Result<String> {
    sonic_rs::to_string(&technologies.unwrap_or_default())
        .map_err(|e| AppError::Internal(format!("Technology serialization failed: {}", e)))
}

/// Lists projects, featured first, with filters and pagination.
#[axum::debug_handler]
pub async fn list_projects(
    State(state): State<AppState>,
    Query(query): Query<ProjectListQuery>,
) -> Result<Response> {
    let published = match query.published.as_deref() {
        Some("all") => None,
        _ => Some(true),
    };
    let filter = ProjectFilter {
        published,
        featured: query.featured,
        category: query.category,
        search: query.search,
    };

    let page = normalize_page(query.page);
    let limit = normalize_limit(query.limit, 9);
    let offset = (page - 1) * limit;

    let total = project_repo::count(&state.db, &filter).await?;
    let projects = project_repo::list(&state.db, &filter, limit, offset).await?;

    let response = ProjectListResponse {
        projects,
        pagination: Pagination::new(page, limit, total),
    };
    Ok((StatusCode::OK, Json(response)).into_response())
}

/// Creates a project (admin only).
#[axum::debug_handler]
pub async fn create_project(
    State(state): State<AppState>,
    Json(payload): Json<CreateProjectRequest>,
) -> Result<Response> {
    if payload.title.trim().is_empty() || payload.description.trim().is_empty() {
        return Err(AppError::Validation(
            "Title and description are required".to_string(),
        ));
    }

    let slug = slugify(&payload.title);
    let technologies = encode_technologies(payload.technologies)?;

    let project = project_repo::create(
        &state.db,
        &payload.title,
        &slug,
        &payload.description,
        payload.long_description.as_deref().unwrap_or(""),
        payload.image_url.as_deref().unwrap_or(""),
        payload.demo_url.as_deref().unwrap_or(""),
        payload.github_url.as_deref().unwrap_or(""),
        &technologies,
        payload.category.as_deref(),
        payload.featured,
        payload.published.unwrap_or(true),
    )
    .await?;

    tracing::info!("Project created: {}", project.id);
    Ok((StatusCode::CREATED, Json(project)).into_response())
}

/// Updates a project (admin only).
#[axum::debug_handler]
pub async fn update_project(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProjectRequest>,
) -> Result<Response> {
    let existing = project_repo::find_by_id(&state.db, &id)
        .await?
        .ok_or(AppError::NotFound)?;

    let title = payload.title.unwrap_or(existing.title);
    let slug = slugify(&title);
    let technologies = match payload.technologies {
        Some(technologies) => encode_technologies(Some(technologies))?,
        None => existing.technologies,
    };

    let project = project_repo::update(
        &state.db,
        &id,
        &title,
        &slug,
        &payload.description.unwrap_or(existing.description),
        &payload.long_description.unwrap_or(existing.long_description),
        &payload.image_url.unwrap_or(existing.image_url),
        &payload.demo_url.unwrap_or(existing.demo_url),
        &payload.github_url.unwrap_or(existing.github_url),
        &technologies,
        payload.category.or(existing.category).as_deref(),
        payload.featured.unwrap_or(existing.featured),
        payload.published.unwrap_or(existing.published),
    )
    .await?;

    tracing::info!("Project updated: {}", project.id);
    Ok((StatusCode::OK, Json(project)).into_response())
}

/// Deletes a project (admin only).
#[axum::debug_handler]
pub async fn delete_project(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response> {
    project_repo::delete(&state.db, &id).await?;
    tracing::info!("Project deleted: {}", id);
    Ok(StatusCode::NO_CONTENT.into_response())
}
