use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// A portfolio project.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub long_description: String,
    pub image_url: String,
    pub demo_url: String,
    pub github_url: String,
    /// JSON-encoded array of technology names.
    pub technologies: String,
    pub category: Option<String>,
    pub featured: bool,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
