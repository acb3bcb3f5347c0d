use deadpool_postgres::Pool;
use tokio_postgres::Row;
use tokio_postgres::error::SqlState;
use tokio_postgres::types::ToSql;
use uuid::Uuid;
use crate::{
    error::{AppError, Result},
    models::post::Post,
};

/// Filters for listing posts.
#[derive(Clone, Debug, Default)]
pub struct PostFilter {
    pub published: Option<bool>,
    pub featured: Option<bool>,
    pub search: Option<String>,
}

fn row_to_post(row: &Row) -> Result<Post> {
    Ok(Post {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        slug: row.try_get("slug")?,
        content: row.try_get("content")?,
        excerpt: row.try_get("excerpt")?,
        published: row.try_get("published")?,
        featured: row.try_get("featured")?,
        tags: row.try_get("tags")?,
        image_url: row.try_get("image_url")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn map_slug_conflict(e: tokio_postgres::Error) -> AppError {
    if e.code() == Some(&SqlState::UNIQUE_VIOLATION) {
        AppError::Conflict("A post with this title already exists".to_string())
    } else {
        AppError::Database(e)
    }
}

/// Builds the WHERE clause and parameter list for a filter. The returned
/// strings reference parameter positions starting at `$1`.
fn filter_clause<'a>(
    filter: &'a PostFilter,
    pattern: &'a Option<String>,
) -> (String, Vec<&'a (dyn ToSql + Sync)>) {
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
    if let Some(pattern) = pattern {
        params.push(pattern);
        let p = params.len();
        conditions.push(format!(
            "(title ILIKE ${p} OR content ILIKE ${p} OR excerpt ILIKE ${p} OR tags ILIKE ${p})"
        ));
    }

    let clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };
    (clause, params)
}

fn search_pattern(filter: &PostFilter) -> Option<String> {
    filter
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| format!("%{}%", s))
}

/// Counts posts matching the filter.
pub async fn count(pool: &Pool, filter: &PostFilter) -> Result<i64> {
    let client = pool.get().await?;
    let pattern = search_pattern(filter);
    let (clause, params) = filter_clause(filter, &pattern);
    let row = client
        .query_one(
            &format!("SELECT COUNT(*) AS total FROM posts {clause}"),
            &params,
        )
        .await?;
    Ok(row.try_get("total")?)
}

/// Lists posts matching the filter, newest first.
pub async fn list(
    pool: &Pool,
    filter: &PostFilter,
    limit: i64,
    offset: i64,
) -> Result<Vec<Post>> {
    let client = pool.get().await?;
    let pattern = search_pattern(filter);
    let (clause, mut params) = filter_clause(filter, &pattern);
    params.push(&limit);
    let limit_pos = params.len();
    params.push(&offset);
    let offset_pos = params.len();

    let rows = client
        .query(
            &format!(
                "SELECT id, title, slug, content, excerpt, published, featured, tags, \
                 image_url, created_at, updated_at \
                 FROM posts {clause} \
                 ORDER BY created_at DESC \
                 LIMIT ${limit_pos} OFFSET ${offset_pos}"
            ),
            &params,
        )
        .await?;
    rows.iter().map(row_to_post).collect()
}

/// Finds a post by id.
pub async fn find_by_id(pool: &Pool, id: &Uuid) -> Result<Option<Post>> {
    let client = pool.get().await?;
    let row = client
        .query_opt(
            r#"
            SELECT id, title, slug, content, excerpt, published, featured, tags,
                   image_url, created_at, updated_at
            FROM posts
            WHERE id = $1
            "#,
            &[id],
        )
        .await?;
    row.map(|r| row_to_post(&r)).transpose()
}

/// Finds a post by its slug (public post pages).
pub async fn find_by_slug(pool: &Pool, slug: &str) -> Result<Option<Post>> {
    let client = pool.get().await?;
    let row = client
        .query_opt(
            r#"
            SELECT id, title, slug, content, excerpt, published, featured, tags,
                   image_url, created_at, updated_at
            FROM posts
            WHERE slug = $1
            "#,
            &[&slug],
        )
        .await?;
    row.map(|r| row_to_post(&r)).transpose()
}

/// Inserts a new post.
#[allow(clippy::too_many_arguments)]
pub async fn create(
    pool: &Pool,
    title: &str,
    slug: &str,
    content: &str,
    excerpt: &str,
    published: bool,
    featured: bool,
    tags: &str,
    image_url: Option<&str>,
) -> Result<Post> {
    let client = pool.get().await?;
    let id = Uuid::new_v4();
    let row = client
        .query_one(
            r#"
            INSERT INTO posts (id, title, slug, content, excerpt, published, featured, tags, image_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, title, slug, content, excerpt, published, featured, tags,
                      image_url, created_at, updated_at
            "#,
            &[&id, &title, &slug, &content, &excerpt, &published, &featured, &tags, &image_url],
        )
        .await
        .map_err(map_slug_conflict)?;
    row_to_post(&row)
}

/// Updates an existing post.
#[allow(clippy::too_many_arguments)]
pub async fn update(
    pool: &Pool,
    id: &Uuid,
    title: &str,
    slug: &str,
    content: &str,
    excerpt: &str,
    published: bool,
    featured: bool,
    tags: &str,
    image_url: Option<&str>,
) -> Result<Post> {
    let client = pool.get().await?;
    let row = client
        .query_opt(
            r#"
            UPDATE posts
            SET title = $2, slug = $3, content = $4, excerpt = $5, published = $6,
                featured = $7, tags = $8, image_url = $9, updated_at = NOW()
            WHERE id = $1
            RETURNING id, title, slug, content, excerpt, published, featured, tags,
                      image_url, created_at, updated_at
            "#,
            &[&id, &title, &slug, &content, &excerpt, &published, &featured, &tags, &image_url],
        )
        .await
        .map_err(map_slug_conflict)?
        .ok_or(AppError::NotFound)?;
    row_to_post(&row)
}

/// Deletes a post by id.
pub async fn delete(pool: &Pool, id: &Uuid) -> Result<()> {
    let client = pool.get().await?;
    let deleted = client.execute("DELETE FROM posts WHERE id = $1", &[id]).await?;
    if deleted == 0 {
        return Err(AppError::NotFound);
    }
    Ok(())
}
