use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// A message submitted through the public contact form. `read` starts
/// false and is toggled from the admin inbox.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessage {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub subject: Option<String>,
    pub message: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_serializes_read_state() {
        let message = ContactMessage {
            id: Uuid::nil(),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            subject: None,
            message: "Hello".to_string(),
            read: false,
            created_at: DateTime::<Utc>::MIN_UTC,
        };
        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(json["read"], false);
        assert!(json["createdAt"].is_string());
    }
}
