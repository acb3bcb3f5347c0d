use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use garde::Validate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::{AppError, Result},
    models::contact::ContactMessage,
    models::pagination::{normalize_limit, normalize_page, Pagination},
    repositories::contact as contact_repo,
    repositories::contact::DateRange,
    state::AppState,
};

/// The public contact form payload.
#[derive(Deserialize, Validate)]
pub struct ContactRequest {
    #[garde(length(min = 1, max = 120))]
    pub name: String,
    #[garde(email)]
    pub email: String,
    #[garde(skip)]
    pub subject: Option<String>,
    #[garde(length(min = 1, max = 5000))]
    pub message: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactResponse {
    pub message: String,
    pub id: Uuid,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    /// Inclusive start date, `YYYY-MM-DD`.
    pub from_date: Option<NaiveDate>,
    /// Inclusive end date, `YYYY-MM-DD`.
    pub to_date: Option<NaiveDate>,
}

#[derive(Serialize)]
pub struct MessageListResponse {
    pub messages: Vec<ContactMessage>,
    pub pagination: Pagination,
}

fn day_start(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// Stores a contact form submission. Public.
#[axum::debug_handler]
pub async fn submit_message(
    State(state): State<AppState>,
    Json(payload): Json<ContactRequest>,
) -> Result<Response> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(format!("Invalid form data: {}", e)))?;

    let message = contact_repo::create(
        &state.db,
        &payload.name,
        &payload.email,
        payload.subject.as_deref(),
        &payload.message,
    )
    .await?;

    tracing::info!("Contact message received: {}", message.id);

    let response = ContactResponse {
        message: "Message sent successfully!".to_string(),
        id: message.id,
    };
    Ok((StatusCode::CREATED, Json(response)).into_response())
}

/// Lists contact messages with an optional date range (admin inbox).
#[axum::debug_handler]
pub async fn list_messages(
    State(state): State<AppState>,
    Query(query): Query<MessageListQuery>,
) -> Result<Response> {
    let range = DateRange {
        from: query.from_date.map(day_start),
        // The end date is inclusive: filter strictly before the next day.
        to: query.to_date.map(|d| day_start(d) + Duration::days(1)),
    };

    let page = normalize_page(query.page);
    let limit = normalize_limit(query.limit, 10);
    let offset = (page - 1) * limit;

    let total = contact_repo::count(&state.db, &range).await?;
    let messages = contact_repo::list(&state.db, &range, limit, offset).await?;

    let response = MessageListResponse {
        messages,
        pagination: Pagination::new(page, limit, total),
    };
    Ok((StatusCode::OK, Json(response)).into_response())
}

/// The request payload for updating a message's read state.
#[derive(Deserialize)]
pub struct UpdateMessageRequest {
    pub read: bool,
}

/// Marks a contact message read or unread (admin inbox).
#[axum::debug_handler]
pub async fn update_message(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateMessageRequest>,
) -> Result<Response> {
    let message = contact_repo::set_read(&state.db, &id, payload.read).await?;
    tracing::info!("Contact message {} marked read={}", id, message.read);
    Ok((StatusCode::OK, Json(message)).into_response())
}

/// Deletes a contact message (admin only).
#[axum::debug_handler]
pub async fn delete_message(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response> {
    contact_repo::delete(&state.db, &id).await?;
    tracing::info!("Contact message deleted: {}", id);
    Ok(StatusCode::NO_CONTENT.into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contact_payload_validation() {
        let valid = ContactRequest {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            subject: None,
            message: "Hello there".to_string(),
        };
        assert!(valid.validate().is_ok());

        let bad_email = ContactRequest {
            email: "not-an-email".to_string(),
            ..valid_clone(&valid)
        };
        assert!(bad_email.validate().is_err());

        let empty_message = ContactRequest {
            message: String::new(),
            ..valid_clone(&valid)
        };
        assert!(empty_message.validate().is_err());
    }

    #[test]
    fn read_toggle_payload_accepts_both_directions() {
        let mark: UpdateMessageRequest = serde_json::from_str(r#"{"read":true}"#).unwrap();
        assert!(mark.read);
        let unmark: UpdateMessageRequest = serde_json::from_str(r#"{"read":false}"#).unwrap();
        assert!(!unmark.read);
    }

    fn valid_clone(r: &ContactRequest) -> ContactRequest {
        ContactRequest {
            name: r.name.clone(),
            email: r.email.clone(),
            subject: r.subject.clone(),
            message: r.message.clone(),
        }
    }
}
