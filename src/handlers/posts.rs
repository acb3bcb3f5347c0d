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
    models::post::Post,
    repositories::post as post_repo,
    repositories::post::PostFilter,
    state::AppState,
    util::slugify,
};

#[derive(Deserialize)]
pub struct PostListQuery {
    pub published: Option<bool>,
    pub featured: Option<bool>,
    pub search: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Serialize)]
pub struct PostListResponse {
    pub posts: Vec<Post>,
    pub pagination: Pagination,
}

/// The request payload for creating a post.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
    pub slug: Option<String>,
    pub excerpt: Option<String>,
    #[serde(default)]
    pub published: bool,
    #[serde(default)]
    pub featured: bool,
    pub tags: Option<Vec<String>>,
    pub image_url: Option<String>,
}

/// The request payload for updating a post. Absent fields keep their
/// current value.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub slug: Option<String>,
    pub excerpt: Option<String>,
    pub published: Option<bool>,
    pub featured: Option<bool>,
    pub tags: Option<Vec<String>>,
    pub image_url: Option<String>,
}

fn encode_tags(tags: Option<Vec<String>>) -> Result<String> {
    sonic_rs::to_string(&tags.unwrap_or_default())
        .map_err(|e| AppError::Internal(format!("Tag serialization failed: {}", e)))
}

/// Lists posts, newest first, with filters and pagination.
#[axum::debug_handler]
pub async fn list_posts(
    State(state): State<AppState>,
    Query(query): Query<PostListQuery>,
) -> Result<Response> {
    let filter = PostFilter {
        published: query.published,
        featured: query.featured,
        search: query.search,
    };

    let page = normalize_page(query.page);
    let limit = normalize_limit(query.limit, 10);
    let offset = (page - 1) * limit;

    let total = post_repo::count(&state.db, &filter).await?;
    let posts = post_repo::list(&state.db, &filter, limit, offset).await?;

    let response = PostListResponse {
        posts,
        pagination: Pagination::new(page, limit, total),
    };
    Ok((StatusCode::OK, Json(response)).into_response())
}

/// Fetches a single post. Accepts either the row id or, for public post
/// pages, the slug.
#[axum::debug_handler]
pub async fn get_post(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Response> {
    let post = match Uuid::parse_str(&key) {
        Ok(id) => post_repo::find_by_id(&state.db, &id).await?,
        Err(_) => post_repo::find_by_slug(&state.db, &key).await?,
    }
    .ok_or(AppError::NotFound)?;
    Ok((StatusCode::OK, Json(post)).into_response())
}

/// Creates a post (admin only).
#[axum::debug_handler]
pub async fn create_post(
    State(state): State<AppState>,
    Json(payload): Json<CreatePostRequest>,
) -> Result<Response> {
    if payload.title.trim().is_empty() || payload.content.trim().is_empty() {
        return Err(AppError::Validation(
            "Title and content are required".to_string(),
        ));
    }

    let slug = payload
        .slug
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| slugify(&payload.title));
    let tags = encode_tags(payload.tags)?;

    let post = post_repo::create(
        &state.db,
        &payload.title,
        &slug,
        &payload.content,
        payload.excerpt.as_deref().unwrap_or(""),
        payload.published,
        payload.featured,
        &tags,
        payload.image_url.as_deref(),
    )
    .await?;

    tracing::info!("Post created: {}", post.id);
    Ok((StatusCode::CREATED, Json(post)).into_response())
}

/// Updates a post (admin only).
#[axum::debug_handler]
pub async fn update_post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePostRequest>,
) -> Result<Response> {
    let existing = post_repo::find_by_id(&state.db, &id)
        .await?
        .ok_or(AppError::NotFound)?;

    let title = payload.title.unwrap_or(existing.title);
    let slug = payload
        .slug
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(existing.slug);
    let tags = match payload.tags {
        Some(tags) => encode_tags(Some(tags))?,
        None => existing.tags,
    };

    let post = post_repo::update(
        &state.db,
        &id,
        &title,
        &slug,
        &payload.content.unwrap_or(existing.content),
        &payload.excerpt.unwrap_or(existing.excerpt),
        payload.published.unwrap_or(existing.published),
        payload.featured.unwrap_or(existing.featured),
        &tags,
        payload.image_url.or(existing.image_url).as_deref(),
    )
    .await?;

    tracing::info!("Post updated: {}", post.id);
    Ok((StatusCode::OK, Json(post)).into_response())
}

/// Deletes a post (admin only).
#[axum::debug_handler]
pub async fn delete_post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response> {
    post_repo::delete(&state.db, &id).await?;
    tracing::info!("Post deleted: {}", id);
    Ok(StatusCode::NO_CONTENT.into_response())
}
