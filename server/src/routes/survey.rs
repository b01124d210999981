use std::sync::Arc;

use axum::{Json, extract::State};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{
    error::AppError,
    models::NewSurveyResponse,
    state::AppState,
    utils::sanitize_phone,
};

#[derive(Deserialize)]
pub struct SurveySubmission {
    pub full_name: String,
    pub phone: String,
    #[serde(default)]
    pub q3: Option<String>,
    #[serde(default)]
    pub q4: Option<String>,
    #[serde(default)]
    pub q5: Option<String>,
    #[serde(default)]
    pub q6: Option<Vec<String>>,
    #[serde(default)]
    pub q7: Option<Vec<String>>,
    #[serde(default)]
    pub q8: Option<String>,
    #[serde(default)]
    pub q9: Option<String>,
    #[serde(default)]
    pub q10: Option<String>,
    #[serde(default)]
    pub q11: Option<String>,
}

/// Single-pass intake: validate, package into one row, insert. The caller
/// keeps its form state, so a failed submission can simply be retried.
pub async fn submit(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SurveySubmission>,
) -> Result<Json<Value>, AppError> {
    if body.full_name.trim().is_empty() {
        return Err(AppError::validation("Full name is required"));
    }

    let phone = sanitize_phone(&body.phone);
    if phone.len() != 10 {
        return Err(AppError::validation("Phone number must be 10 digits"));
    }

    let row = NewSurveyResponse {
        full_name: body.full_name,
        phone,
        q3: body.q3,
        q4: body.q4,
        q5: body.q5,
        q6: body.q6,
        q7: body.q7,
        q8: body.q8,
        q9: body.q9,
        q10: body.q10,
        q11: body.q11,
    };

    state.store.insert("surveys", &[row]).await?;

    Ok(Json(json!({ "success": true })))
}
