use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// A client testimonial.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Testimonial {
    pub id: Uuid,
    pub client_name: String,
    pub client_title: String,
    pub company: Option<String>,
    pub feedback: String,
    pub avatar_url: Option<String>,
    /// 1 through 5.
    pub rating: i32,
    pub featured: bool,
    pub published: bool,
    pub created_at: DateTime<Utc>,
}
