use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use crate::{
    blogs::filter_posts,
    error::AppError,
    models::BlogPost,
    state::AppState,
};

#[derive(Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub search: Option<String>,
}

/// Public listing: full fetch ordered pinned-first then newest-first, with
/// the optional search applied in memory over the fetched rows.
pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<BlogPost>>, AppError> {
    let posts: Vec<BlogPost> = state
        .store
        .table("blogs")
        .order("pinned", true)
        .order("created_at", true)
        .fetch()
        .await?;

    Ok(Json(filter_posts(posts, params.search.as_deref())))
}

/// Detail by slug. A missing slug is an explicit not-found view, not an
/// error. On a hit the view counter is bumped remotely without waiting for
/// the result.
pub async fn detail(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<Response, AppError> {
    let post: Option<BlogPost> = state
        .store
        .table("blogs")
        .eq("slug", &slug)
        .maybe_single()
        .await?;

    let Some(post) = post else {
        return Ok((
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Blog not found" })),
        )
            .into_response());
    };

    let store = state.store.clone();
    let id = post.id;
    tokio::spawn(async move {
        if let Err(e) = store.rpc("increment_views", &json!({ "blog_id": id })).await {
            warn!("Failed to increment views for blog {id}: {e}");
        }
    });

    Ok(Json(post).into_response())
}
