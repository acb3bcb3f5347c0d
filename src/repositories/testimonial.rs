use deadpool_postgres::Pool;
use tokio_postgres::Row;
use tokio_postgres::types::ToSql;
use uuid::Uuid;
use crate::{
    error::{AppError, Result},
    models::testimonial::Testimonial,
};

/// Filters for listing testimonials. `published: None` means all
/// (admin view); public callers default to published-only.
#[derive(Clone, Debug, Default)]
pub struct TestimonialFilter {
    pub published: Option<bool>,
    pub featured: Option<bool>,
}

fn row_to_testimonial(row: &Row) -> Result<Testimonial> {
    Ok(Testimonial {
        id: row.try_get("id")?,
        client_name: row.try_get("client_name")?,
        client_title: row.try_get("client_title")?,
        company: row.try_get("company")?,
        feedback: row.try_get("feedback")?,
        avatar_url: row.try_get("avatar_url")?,
        rating: row.try_get("rating")?,
        featured: row.try_get("featured")?,
        published: row.try_get("published")?,
        created_at: row.try_get("created_at")?,
    })
}

fn filter_clause<'a>(filter: &'a TestimonialFilter) -> (String, Vec<&'a (dyn ToSql + Sync)>) {
    let mut conditions: Vec<String> = Vec::new();
    let mut params: Vec<&(dyn ToSql + Sync)> = Vec::new();

    if let Some(ref published) = filter.published {
        params.push(published);
        conditions.push(format!("published = ${}", params.len()));
    }
    if let Some(ref featured) = filter.featured {
        params.push(featured);
        conditions.push(format!("featured = ${}", params.len()));
    }

    let clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };
    (clause, params)
}

/// Counts testimonials matching the filter.
pub async fn count(pool: &Pool, filter: &TestimonialFilter) -> Result<i64> {
    let client = pool.get().await?;
    let (clause, params) = filter_clause(filter);
    let row = client
        .query_one(
            &format!("SELECT COUNT(*) AS total FROM testimonials {clause}"),
            &params,
        )
        .await?;
    Ok(row.try_get("total")?)
}

/// Lists testimonials, featured first then newest.
pub async fn list(
    pool: &Pool,
    filter: &TestimonialFilter,
    limit: Option<i64>,
    offset: Option<i64>,
) -> Result<Vec<Testimonial>> {
    let client = pool.get().await?;
    let (clause, mut params) = filter_clause(filter);

    let mut tail = String::new();
    if let Some(ref limit) = limit {
        params.push(limit);
        tail.push_str(&format!(" LIMIT ${}", params.len()));
    }
    if let Some(ref offset) = offset {
        params.push(offset);
        tail.push_str(&format!(" OFFSET ${}", params.len()));
    }

    let rows = client
        .query(
            &format!(
                "SELECT id, client_name, client_title, company, feedback, avatar_url, \
                 rating, featured, published, created_at \
                 FROM testimonials {clause} \
                 ORDER BY featured DESC, created_at DESC{tail}"
            ),
            &params,
        )
        .await?;
    rows.iter().map(row_to_testimonial).collect()
}

/// Finds a testimonial by id.
pub async fn find_by_id(pool: &Pool, id: &Uuid) -> Result<Option<Testimonial>> {
    let client = pool.get().await?;
    let row = client
        .query_opt(
            r#"
            SELECT id, client_name, client_title, company, feedback, avatar_url,
                   rating, featured, published, created_at
            FROM testimonials
            WHERE id = $1
            "#,
            &[id],
        )
        .await?;
    row.map(|r| row_to_testimonial(&r)).transpose()
}

/// Inserts a new testimonial.
#[allow(clippy::too_many_arguments)]
pub async fn create(
    pool: &Pool,
    client_name: &str,
    client_title: &str,
    company: Option<&str>,
    feedback: &str,
    avatar_url: Option<&str>,
    rating: i32,
    featured: bool,
    published: bool,
) -> Result<Testimonial> {
    let client = pool.get().await?;
    let id = Uuid::new_v4();
    let row = client
        .query_one(
            r#"
            INSERT INTO testimonials (id, client_name, client_title, company, feedback,
                                      avatar_url, rating, featured, published)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, client_name, client_title, company, feedback, avatar_url,
                      rating, featured, published, created_at
            "#,
            &[
                &id, &client_name, &client_title, &company, &feedback,
                &avatar_url, &rating, &featured, &published,
            ],
        )
        .await?;
    row_to_testimonial(&row)
}

/// Updates an existing testimonial.
#[allow(clippy::too_many_arguments)]
pub async fn update(
    pool: &Pool,
    id: &Uuid,
    client_name: &str,
    client_title: &str,
    company: Option<&str>,
    feedback: &str,
    avatar_url: Option<&str>,
    rating: i32,
    featured: bool,
    published: bool,
) -> Result<Testimonial> {
    let client = pool.get().await?;
    let row = client
        .query_opt(
            r#"
            UPDATE testimonials
            SET client_name = $2, client_title = $3, company = $4, feedback = $5,
                avatar_url = $6, rating = $7, featured = $8, published = $9
            WHERE id = $1
            RETURNING id, client_name, client_title, company, feedback, avatar_url,
                      rating, featured, published, created_at
            "#,
            &[
                &id, &client_name, &client_title, &company, &feedback,
                &avatar_url, &rating, &featured, &published,
            ],
        )
        .await?
        .ok_or(AppError::NotFound)?;
    row_to_testimonial(&row)
}

/// Deletes a testimonial by id.
pub async fn delete(pool: &Pool, id: &Uuid) -> Result<()> {
    let client = pool.get().await?;
    let deleted = client
        .execute("DELETE FROM testimonials WHERE id = $1", &[id])
        .await?;
    if deleted == 0 {
        return Err(AppError::NotFound);
    }
    Ok(())
}
