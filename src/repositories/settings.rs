use deadpool_postgres::Pool;
use tokio_postgres::Row;
use crate::{
    error::Result,
    models::settings::{DEFAULT_PRIMARY_COLOR, DEFAULT_SESSION_DURATION_SECS, Settings},
};

fn row_to_settings(row: &Row) -> Result<Settings> {
    Ok(Settings {
        id: row.try_get("id")?,
        primary_color: row.try_get("primary_color")?,
        session_duration: row.try_get("session_duration")?,
    })
}

/// Fetches the singleton settings row, creating it with defaults on
/// first read.
pub async fn get_or_create(pool: &Pool) -> Result<Settings> {
    let client = pool.get().await?;
    let row = client
        .query_opt(
            r#"
            SELECT id, primary_color, session_duration
            FROM settings
            ORDER BY id
            LIMIT 1
            "#,
            &[],
        )
        .await?;

    if let Some(row) = row {
        return row_to_settings(&row);
    }

    let row = client
        .query_one(
            r#"
            INSERT INTO settings (primary_color, session_duration)
            VALUES ($1, $2)
            RETURNING id, primary_color, session_duration
            "#,
            &[&DEFAULT_PRIMARY_COLOR, &DEFAULT_SESSION_DURATION_SECS],
        )
        .await?;
    row_to_settings(&row)
}

/// Updates the singleton row. Fields left as `None` keep their current
/// value. Last-writer-wins; no optimistic concurrency for a single-admin
/// system.
pub async fn update(
    pool: &Pool,
    primary_color: Option<&str>,
    session_duration_secs: Option<i64>,
) -> Result<Settings> {
    let current = get_or_create(pool).await?;
    let client = pool.get().await?;

    let color = primary_color.unwrap_or(current.primary_color.as_str());
    let duration = session_duration_secs.unwrap_or(current.session_duration);

    let row = client
        .query_one(
            r#"
            UPDATE settings
            SET primary_color = $1, session_duration = $2, updated_at = NOW()
            WHERE id = $3
            RETURNING id, primary_color, session_duration
            "#,
            &[&color, &duration, &current.id],
        )
        .await?;
    row_to_settings(&row)
}
