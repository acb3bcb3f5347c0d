use deadpool_postgres::Pool;
use tokio_postgres::Row;
use tokio_postgres::error::SqlState;
use tokio_postgres::types::ToSql;
use uuid::Uuid;
use crate::{
    error::{AppError, Result},
    models::project::Project,
};

/// Filters for listing projects.
#[derive(Clone, Debug, Default)]
pub struct ProjectFilter {
    pub published: Option<bool>,
    pub featured: Option<bool>,
    pub category: Option<String>,
    pub search: Option<String>,
}

fn row_to_project(row: &Row) -> Result<Project> {
    Ok(Project {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        slug: row.try_get("slug")?,
        description: row.try_get("description")?,
        long_description: row.try_get("long_description")?,
        image_url: row.try_get("image_url")?,
        demo_url: row.try_get("demo_url")?,
        github_url: row.try_get("github_url")?,
        technologies: row.try_get("technologies")?,
        category: row.try_get("category")?,
        featured: row.try_get("featured")?,
        published: row.try_get("published")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn map_slug_conflict(e: tokio_postgres::Error) -> AppError {
    if e.code() == Some(&SqlState::UNIQUE_VIOLATION) {
        AppError::Conflict("A project with this title already exists".to_string())
    } else {
        AppError::Database(e)
    }
}

struct FilterPatterns {
    category: Option<String>,
    search: Option<String>,
}

fn patterns(filter: &ProjectFilter) -> FilterPatterns {
    FilterPatterns {
        category: filter
            .category
            .as_deref()
            .filter(|c| !c.is_empty() && *c != "All")
            .map(|c| format!("%{}%", c)),
        search: filter
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{}%", s)),
    }
}

fn filter_clause<'a>(
    filter: &'a ProjectFilter,
    patterns: &'a FilterPatterns,
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
    if let Some(ref category) = patterns.category {
        params.push(category);
        conditions.push(format!("category ILIKE ${}", params.len()));
    }
    if let Some(ref search) = patterns.search {
        params.push(search);
        let p = params.len();
        conditions.push(format!(
            "(title ILIKE ${p} OR description ILIKE ${p} OR long_description ILIKE ${p} OR category ILIKE ${p})"
        ));
    }

    let clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };
    (clause, params)
}

/// Counts projects matching the filter.
pub async fn count(pool: &Pool, filter: &ProjectFilter) -> Result<i64> {
    let client = pool.get().await?;
    let pats = patterns(filter);
    let (clause, params) = filter_clause(filter, &pats);
    let row = client
        .query_one(
            &format!("SELECT COUNT(*) AS total FROM projects {clause}"),
            &params,
        )
        .await?;
    Ok(row.try_get("total")?)
}

/// Lists projects matching the filter, featured first then newest.
pub async fn list(
    pool: &Pool,
    filter: &ProjectFilter,
    limit: i64,
    offset: i64,
) -> Result<Vec<Project>> {
    let client = pool.get().await?;
    let pats = patterns(filter);
    let (clause, mut params) = filter_clause(filter, &pats);
    params.push(&limit);
    let limit_pos = params.len();
    params.push(&offset);
    let offset_pos = params.len();

    let rows = client
        .query(
            &format!(
                "SELECT id, title, slug, description, long_description, image_url, \
                 demo_url, github_url, technologies, category, featured, published, \
                 created_at, updated_at \
                 FROM projects {clause} \
                 ORDER BY featured DESC, created_at DESC \
                 LIMIT ${limit_pos} OFFSET ${offset_pos}"
            ),
            &params,
        )
        .await?;
    rows.iter().map(row_to_project).collect()
}

/// Finds a project by id.
pub async fn find_by_id(pool: &Pool, id: &Uuid) -> Result<Option<Project>> {
    let client = pool.get().await?;
    let row = client
        .query_opt(
            r#"
            SELECT id, title, slug, description, long_description, image_url,
                   demo_url, github_url, technologies, category, featured, published,
                   created_at, updated_at
            FROM projects
            WHERE id = $1
            "#,
            &[id],
        )
        .await?;
    row.map(|r| row_to_project(&r)).transpose()
}

/// Inserts a new project.
#[allow(clippy::too_many_arguments)]
pub async fn create(
    pool: &Pool,
    title: &str,
    slug: &str,
    description: &str,
    long_description: &str,
    image_url: &str,
    demo_url: &str,
    github_url: &str,
    technologies: &str,
    category: Option<&str>,
    featured: bool,
    published: bool,
) -> Result<Project> {
    let client = pool.get().await?;
    let id = Uuid::new_v4();
    let row = client
        .query_one(
            r#"
            INSERT INTO projects (id, title, slug, description, long_description, image_url,
                                  demo_url, github_url, technologies, category, featured, published)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING id, title, slug, description, long_description, image_url,
                      demo_url, github_url, technologies, category, featured, published,
                      created_at, updated_at
            "#,
            &[
                &id, &title, &slug, &description, &long_description, &image_url,
                &demo_url, &github_url, &technologies, &category, &featured, &published,
            ],
        )
        .await
        .map_err(map_slug_conflict)?;
    row_to_project(&row)
}

/// Updates an existing project.
#[allow(clippy::too_many_arguments)]
pub async fn update(
    pool: &Pool,
    id: &Uuid,
    title: &str,
    slug: &str,
    description: &str,
    long_description: &str,
    image_url: &str,
    demo_url: &str,
    github_url: &str,
    technologies: &str,
    category: Option<&str>,
    featured: bool,
    published: bool,
) -> Result<Project> {
    let client = pool.get().await?;
    let row = client
        .query_opt(
            r#"
            UPDATE projects
            SET title = $2, slug = $3, description = $4, long_description = $5,
                image_url = $6, demo_url = $7, github_url = $8, technologies = $9,
                category = $10, featured = $11, published = $12, updated_at = NOW()
            WHERE id = $1
            RETURNING id, title, slug, description, long_description, image_url,
                      demo_url, github_url, technologies, category, featured, published,
                      created_at, updated_at
            "#,
            &[
                &id, &title, &slug, &description, &long_description, &image_url,
                &demo_url, &github_url, &technologies, &category, &featured, &published,
            ],
        )
        .await
        .map_err(map_slug_conflict)?
        .ok_or(AppError::NotFound)?;
    row_to_project(&row)
}

/// Deletes a project by id.
pub async fn delete(pool: &Pool, id: &Uuid) -> Result<()> {
    let client = pool.get().await?;
    let deleted = client
        .execute("DELETE FROM projects WHERE id = $1", &[id])
        .await?;
    if deleted == 0 {
        return Err(AppError::NotFound);
    }
    Ok(())
}
