use chrono::{DateTime, Utc};
use deadpool_postgres::Pool;
use tokio_postgres::Row;
use tokio_postgres::types::ToSql;
use uuid::Uuid;
use crate::{
    error::{AppError, Result},
    models::contact::ContactMessage,
};

/// Optional inclusive-from / exclusive-to date range for the admin inbox.
#[derive(Clone, Debug, Default)]
pub struct DateRange {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

fn row_to_message(row: &Row) -> Result<ContactMessage> {
    Ok(ContactMessage {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        subject: row.try_get("subject")?,
        message: row.try_get("message")?,
        read: row.try_get("read")?,
        created_at: row.try_get("created_at")?,
    })
}

fn range_clause<'a>(range: &'a DateRange) -> (String, Vec<&'a (dyn ToSql + Sync)>) {
    let mut conditions: Vec<String> = Vec::new();
    let mut params: Vec<&(dyn ToSql + Sync)> = Vec::new();

    if let Some(ref from) = range.from {
        params.push(from);
        conditions.push(format!("created_at >= ${}", params.len()));
    }
    if let Some(ref to) = range.to {
        params.push(to);
        conditions.push(format!("created_at < ${}", params.len()));
    }

    let clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };
    (clause, params)
}

/// Counts messages in the range.
pub async fn count(pool: &Pool, range: &DateRange) -> Result<i64> {
    let client = pool.get().await?;
    let (clause, params) = range_clause(range);
    let row = client
        .query_one(
            &format!("SELECT COUNT(*) AS total FROM contact_messages {clause}"),
            &params,
        )
        .await?;
    Ok(row.try_get("total")?)
}

/// Lists messages in the range, newest first.
pub async fn list(
    pool: &Pool,
    range: &DateRange,
    limit: i64,
    offset: i64,
) -> Result<Vec<ContactMessage>> {
    let client = pool.get().await?;
    let (clause, mut params) = range_clause(range);
    params.push(&limit);
    let limit_pos = params.len();
    params.push(&offset);
    let offset_pos = params.len();

    let rows = client
        .query(
            &format!(
                "SELECT id, name, email, subject, message, read, created_at \
                 FROM contact_messages {clause} \
                 ORDER BY created_at DESC \
                 LIMIT ${limit_pos} OFFSET ${offset_pos}"
            ),
            &params,
        )
        .await?;
    rows.iter().map(row_to_message).collect()
}

/// Stores a submitted contact message.
pub async fn create(
    pool: &Pool,
    name: &str,
    email: &str,
    subject: Option<&str>,
    message: &str,
) -> Result<ContactMessage> {
    let client = pool.get().await?;
    let id = Uuid::new_v4();
    let row = client
        .query_one(
            r#"
            INSERT INTO contact_messages (id, name, email, subject, message)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, email, subject, message, read, created_at
            "#,
            &[&id, &name, &email, &subject, &message],
        )
        .await?;
    row_to_message(&row)
}

/// Counts messages not yet marked read (dashboard badge).
pub async fn count_unread(pool: &Pool) -> Result<i64> {
    let client = pool.get().await?;
    let row = client
        .query_one(
            "SELECT COUNT(*) AS total FROM contact_messages WHERE read = FALSE",
            &[],
        )
        .await?;
    Ok(row.try_get("total")?)
}

/// Sets the read flag on a message.
pub async fn set_read(pool: &Pool, id: &Uuid, read: bool) -> Result<ContactMessage> {
    let client = pool.get().await?;
    let row = client
        .query_opt(
            r#"
            UPDATE contact_messages
            SET read = $2
            WHERE id = $1
            RETURNING id, name, email, subject, message, read, created_at
            "#,
            &[&id, &read],
        )
        .await?
        .ok_or(AppError::NotFound)?;
    row_to_message(&row)
}

/// Deletes a message by id.
pub async fn delete(pool: &Pool, id: &Uuid) -> Result<()> {
    let client = pool.get().await?;
    let deleted = client
        .execute("DELETE FROM contact_messages WHERE id = $1", &[id])
        .await?;
    if deleted == 0 {
        return Err(AppError::NotFound);
    }
    Ok(())
}
