use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{
    blogs::{BlogPatch, category_counts},
    dashboard::{DashboardSummary, SurveyFilter},
    error::AppError,
    export,
    models::{BlogPost, NewBlogPost, SurveyResponse, Worker},
    state::AppState,
};

pub async fn dashboard(State(state): State<Arc<AppState>>) -> Json<DashboardSummary> {
    Json(state.dashboard.summary().await)
}

#[derive(Debug, Default, Deserialize)]
pub struct SurveyFilterParams {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn parse_date(value: Option<String>) -> Result<Option<NaiveDate>, AppError> {
    non_empty(value)
        .map(|v| {
            NaiveDate::parse_from_str(&v, "%Y-%m-%d")
                .map_err(|_| AppError::validation(format!("Invalid date: {v}")))
        })
        .transpose()
}

impl SurveyFilterParams {
    fn into_filter(self) -> Result<SurveyFilter, AppError> {
        Ok(SurveyFilter {
            name: non_empty(self.name),
            phone: non_empty(self.phone),
            from: parse_date(self.from)?,
            to: parse_date(self.to)?,
        })
    }
}

/// Survey listing. Any present param becomes a server-side re-query filter;
/// calling with none resets to the unfiltered table. The result replaces the
/// dashboard's loaded snapshot, which is what the exports act on.
pub async fn surveys(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SurveyFilterParams>,
) -> Result<Json<Vec<SurveyResponse>>, AppError> {
    let filter = params.into_filter()?;
    let rows = state.dashboard.refresh_surveys(&state.store, filter).await?;

    Ok(Json(rows))
}

pub async fn workers(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Worker>>, AppError> {
    let rows = state.dashboard.refresh_workers(&state.store).await?;

    Ok(Json(rows))
}

pub async fn export_csv(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, AppError> {
    let rows = state.dashboard.surveys().await;
    let body = export::to_csv(&rows)?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", export::CSV_FILENAME),
            ),
        ],
        body,
    ))
}

pub async fn export_xlsx(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let rows = state.dashboard.surveys().await;
    let body = export::to_xlsx(&rows)?;

    Ok((
        [
            (
                header::CONTENT_TYPE,
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet".to_string(),
            ),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", export::XLSX_FILENAME),
            ),
        ],
        body,
    ))
}

#[derive(serde::Serialize)]
pub struct BlogAdminListing {
    pub posts: Vec<BlogPost>,
    pub categories: Vec<CategoryEntry>,
}

#[derive(serde::Serialize)]
pub struct CategoryEntry {
    pub category: String,
    pub count: usize,
}

pub async fn list_blogs(State(state): State<Arc<AppState>>) -> Json<BlogAdminListing> {
    let posts = state.blog_admin.list().await;
    let categories = category_counts(&posts)
        .into_iter()
        .map(|(category, count)| CategoryEntry { category, count })
        .collect();

    Json(BlogAdminListing { posts, categories })
}

pub async fn create_blog(
    State(state): State<Arc<AppState>>,
    Json(body): Json<NewBlogPost>,
) -> Result<Json<BlogPost>, AppError> {
    let post = state.blog_admin.create(&state.store, body).await?;

    Ok(Json(post))
}

pub async fn update_blog(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(patch): Json<BlogPatch>,
) -> Result<Json<Value>, AppError> {
    state.blog_admin.apply_patch(&state.store, id, patch).await?;

    Ok(Json(json!({ "success": true })))
}

pub async fn delete_blog(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    state.blog_admin.remove(&state.store, id).await?;

    Ok(Json(json!({ "success": true })))
}

pub async fn toggle_pin(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let pinned = state.blog_admin.toggle_pin(&state.store, id).await?;

    Ok(Json(json!({ "pinned": pinned })))
}
