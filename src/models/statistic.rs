use serde::Serialize;
use uuid::Uuid;

/// A headline statistic shown on the landing page (e.g. "42 projects").
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistic {
    pub id: Uuid,
    pub label: String,
    pub value: i32,
    pub suffix: Option<String>,
    pub icon: Option<String>,
    pub sort_order: i32,
    pub active: bool,
}
