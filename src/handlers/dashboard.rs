use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::{
    error::Result,
    repositories::contact as contact_repo,
    repositories::contact::DateRange,
    repositories::post as post_repo,
    repositories::post::PostFilter,
    state::AppState,
};

/// Counters shown on the admin dashboard.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_posts: i64,
    pub published_posts: i64,
    pub total_messages: i64,
    pub unread_messages: i64,
}

/// Returns the dashboard counters (admin only).
#[axum::debug_handler]
pub async fn get_dashboard_stats(State(state): State<AppState>) -> Result<Response> {
    let all_posts = PostFilter::default();
    let published_posts = PostFilter {
        published: Some(true),
        ..PostFilter::default()
    };

    let stats = DashboardStats {
        total_posts: post_repo::count(&state.db, &all_posts).await?,
        published_posts: post_repo::count(&state.db, &published_posts).await?,
        total_messages: contact_repo::count(&state.db, &DateRange::default()).await?,
        unread_messages: contact_repo::count_unread(&state.db).await?,
    };

    Ok((StatusCode::OK, Json(stats)).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_serialize_camel_case() {
        let stats = DashboardStats {
            total_posts: 10,
            published_posts: 7,
            total_messages: 3,
            unread_messages: 2,
        };
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["totalPosts"], 10);
        assert_eq!(json["publishedPosts"], 7);
        assert_eq!(json["totalMessages"], 3);
        assert_eq!(json["unreadMessages"], 2);
    }
}
