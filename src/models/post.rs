use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// A blog post.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: String,
    pub published: bool,
    pub featured: bool,
    /// JSON-encoded array of tag strings.
    pub tags: String,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
