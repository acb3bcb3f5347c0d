use deadpool_postgres::Pool;
use tokio_postgres::Row;
use uuid::Uuid;
use crate::{
    error::{AppError, Result},
    models::statistic::Statistic,
};

fn row_to_statistic(row: &Row) -> Result<Statistic> {
    Ok(Statistic {
        id: row.try_get("id")?,
        label: row.try_get("label")?,
        value: row.try_get("value")?,
        suffix: row.try_get("suffix")?,
        icon: row.try_get("icon")?,
        sort_order: row.try_get("sort_order")?,
        active: row.try_get("active")?,
    })
}

/// Lists statistics in display order. `active_only` is the public view.
pub async fn list(pool: &Pool, active_only: bool) -> Result<Vec<Statistic>> {
    let client = pool.get().await?;
    let sql = if active_only {
        "SELECT id, label, value, suffix, icon, sort_order, active \
         FROM statistics WHERE active = true ORDER BY sort_order"
    } else {
        "SELECT id, label, value, suffix, icon, sort_order, active \
         FROM statistics ORDER BY sort_order"
    };
    let rows = client.query(sql, &[]).await?;
    rows.iter().map(row_to_statistic).collect()
}

/// Finds a statistic by id.
pub async fn find_by_id(pool: &Pool, id: &Uuid) -> Result<Option<Statistic>> {
    let client = pool.get().await?;
    let row = client
        .query_opt(
            r#"
            SELECT id, label, value, suffix, icon, sort_order, active
            FROM statistics
            WHERE id = $1
            "#,
            &[id],
        )
        .await?;
    row.map(|r| row_to_statistic(&r)).transpose()
}

/// Inserts a new statistic.
pub async fn create(
    pool: &Pool,
    label: &str,
    value: i32,
    suffix: Option<&str>,
    icon: Option<&str>,
    sort_order: i32,
    active: bool,
) -> Result<Statistic> {
    let client = pool.get().await?;
    let id = Uuid::new_v4();
    let row = client
        .query_one(
            r#"
            INSERT INTO statistics (id, label, value, suffix, icon, sort_order, active)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, label, value, suffix, icon, sort_order, active
            "#,
            &[&id, &label, &value, &suffix, &icon, &sort_order, &active],
        )
        .await?;
    row_to_statistic(&row)
}

/// Updates an existing statistic.
#[allow(clippy::too_many_arguments)]
pub async fn update(
    pool: &Pool,
    id: &Uuid,
    label: &str,
    value: i32,
    suffix: Option<&str>,
    icon: Option<&str>,
    sort_order: i32,
    active: bool,
) -> Result<Statistic> {
    let client = pool.get().await?;
    let row = client
        .query_opt(
            r#"
            UPDATE statistics
            SET label = $2, value = $3, suffix = $4, icon = $5, sort_order = $6, active = $7
            WHERE id = $1
            RETURNING id, label, value, suffix, icon, sort_order, active
            "#,
            &[&id, &label, &value, &suffix, &icon, &sort_order, &active],
        )
        .await?
        .ok_or(AppError::NotFound)?;
    row_to_statistic(&row)
}

/// Deletes a statistic by id.
pub async fn delete(pool: &Pool, id: &Uuid) -> Result<()> {
    let client = pool.get().await?;
    let deleted = client
        .execute("DELETE FROM statistics WHERE id = $1", &[id])
        .await?;
    if deleted == 0 {
        return Err(AppError::NotFound);
    }
    Ok(())
}
