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
    models::testimonial::Testimonial,
    repositories::testimonial as testimonial_repo,
    repositories::testimonial::TestimonialFilter,
    state::AppState,
};

#[derive(Deserialize)]
pub struct TestimonialListQuery {
    /// `all` shows unpublished testimonials too (admin view); anything
    /// else defaults to published-only.
    pub published: Option<String>,
    pub featured: Option<bool>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Serialize)]
pub struct TestimonialListResponse {
    pub testimonials: Vec<Testimonial>,
    pub pagination: Pagination,
}

/// The request payload for creating a testimonial.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTestimonialRequest {
    pub client_name: String,
    pub client_title: String,
    pub company: Option<String>,
    pub feedback: String,
    pub avatar_url: Option<String>,
    pub rating: Option<i32>,
    #[serde(default)]
    pub featured: bool,
    pub published: Option<bool>,
}

/// The request payload for updating a testimonial. Absent fields keep
/// their current value.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTestimonialRequest {
    pub client_name: Option<String>,
    pub client_title: Option<String>,
    pub company: Option<String>,
    pub feedback: Option<String>,
    pub avatar_url: Option<String>,
    pub rating: Option<i32>,
    pub featured: Option<bool>,
    pub published: Option<bool>,
}

fn validate_rating(rating: i32) -> Result<()> {
    if !(1..=5).contains(&rating) {
        return Err(AppError::Validation(
            "Rating must be between 1 and 5".to_string(),
        ));
    }
    Ok(())
}

/// Lists testimonials, featured first.
#[axum::debug_handler]
pub async fn list_testimonials(
    State(state): State<AppState>,
    Query(query): Query<TestimonialListQuery>,
) -> Result<Response> {
    let published = match query.published.as_deref() {
        Some("all") => None,
        Some(value) => Some(value == "true"),
        None => Some(true),
    };
    let filter = TestimonialFilter {
        published,
        featured: query.featured,
    };

    let page = normalize_page(query.page);
    let limit = normalize_limit(query.limit, 10);
    let offset = (page - 1) * limit;

    let total = testimonial_repo::count(&state.db, &filter).await?;
    let testimonials =
        testimonial_repo::list(&state.db, &filter, Some(limit), Some(offset)).await?;

    let response = TestimonialListResponse {
        testimonials,
        pagination: Pagination::new(page, limit, total),
    };
    Ok((StatusCode::OK, Json(response)).into_response())
}

/// Creates a testimonial (admin only).
#[axum::debug_handler]
pub async fn create_testimonial(
    State(state): State<AppState>,
    Json(payload): Json<CreateTestimonialRequest>,
) -> Result<Response> {
    if payload.client_name.trim().is_empty()
        || payload.client_title.trim().is_empty()
        || payload.feedback.trim().is_empty()
    {
        return Err(AppError::Validation(
            "Client name, title, and feedback are required".to_string(),
        ));
    }

    let rating = payload.rating.unwrap_or(5);
    validate_rating(rating)?;

    let testimonial = testimonial_repo::create(
        &state.db,
        &payload.client_name,
        &payload.client_title,
        payload.company.as_deref(),
        &payload.feedback,
        payload.avatar_url.as_deref(),
        rating,
        payload.featured,
        payload.published.unwrap_or(true),
    )
    .await?;

    tracing::info!("Testimonial created: {}", testimonial.id);
    Ok((StatusCode::CREATED, Json(testimonial)).into_response())
}

/// Updates a testimonial (admin only).
#[axum::debug_handler]
pub async fn update_testimonial(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateTestimonialRequest>,
) -> Result<Response> {
    let existing = testimonial_repo::find_by_id(&state.db, &id)
        .await?
        .ok_or(AppError::NotFound)?;

    let rating = payload.rating.unwrap_or(existing.rating);
    validate_rating(rating)?;

    let testimonial = testimonial_repo::update(
        &state.db,
        &id,
        &payload.client_name.unwrap_or(existing.client_name),
        &payload.client_title.unwrap_or(existing.client_title),
        payload.company.or(existing.company).as_deref(),
        &payload.feedback.unwrap_or(existing.feedback),
        payload.avatar_url.or(existing.avatar_url).as_deref(),
        rating,
        payload.featured.unwrap_or(existing.featured),
        payload.published.unwrap_or(existing.published),
    )
    .await?;

    tracing::info!("Testimonial updated: {}", testimonial.id);
    Ok((StatusCode::OK, Json(testimonial)).into_response())
}

/// Deletes a testimonial (admin only).
#[axum::debug_handler]
pub async fn delete_testimonial(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response> {
    testimonial_repo::delete(&state.db, &id).await?;
    tracing::info!("Testimonial deleted: {}", id);
    Ok(StatusCode::NO_CONTENT.into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_bounds() {
        assert!(validate_rating(1).is_ok());
        assert!(validate_rating(5).is_ok());
        assert!(validate_rating(0).is_err());
        assert!(validate_rating(6).is_err());
    }
}
