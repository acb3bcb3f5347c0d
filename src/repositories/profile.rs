use deadpool_postgres::Pool;
use tokio_postgres::Row;
use crate::{
    error::Result,
    models::profile::Profile,
};

fn row_to_profile(row: &Row) -> Result<Profile> {
    Ok(Profile {
        name: row.try_get("name")?,
        title: row.try_get("title")?,
        bio: row.try_get("bio")?,
        email: row.try_get("email")?,
        location: row.try_get("location")?,
        avatar_url: row.try_get("avatar_url")?,
        resume_url: row.try_get("resume_url")?,
        github_url: row.try_get("github_url")?,
        linkedin_url: row.try_get("linkedin_url")?,
    })
}

/// Fetches the singleton profile row, if one exists.
pub async fn find(pool: &Pool) -> Result<Option<Profile>> {
    let client = pool.get().await?;
    let row = client
        .query_opt(
            r#"
            SELECT name, title, bio, email, location, avatar_url,
                   resume_url, github_url, linkedin_url
            FROM profile
            WHERE id = 1
            "#,
            &[],
        )
        .await?;
    row.map(|r| row_to_profile(&r)).transpose()
}

/// Upserts the singleton profile row.
pub async fn upsert(pool: &Pool, profile: &Profile) -> Result<Profile> {
    let client = pool.get().await?;
    let row = client
        .query_one(
            r#"
            INSERT INTO profile (id, name, title, bio, email, location, avatar_url,
                                 resume_url, github_url, linkedin_url)
            VALUES (1, $1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (id) DO UPDATE
            SET name = $1, title = $2, bio = $3, email = $4, location = $5,
                avatar_url = $6, resume_url = $7, github_url = $8, linkedin_url = $9,
                updated_at = NOW()
            RETURNING name, title, bio, email, location, avatar_url,
                      resume_url, github_url, linkedin_url
            "#,
            &[
                &profile.name, &profile.title, &profile.bio, &profile.email,
                &profile.location, &profile.avatar_url, &profile.resume_url,
                &profile.github_url, &profile.linkedin_url,
            ],
        )
        .await?;
    row_to_profile(&row)
}
