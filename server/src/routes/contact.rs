use std::sync::Arc;

use axum::{Json, extract::State};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{error::AppError, models::NewContactMessage, state::AppState};

/// Fixed tag attached to every message from the contact form.
pub const CONTACT_CATEGORY: &str = "contact";

#[derive(Deserialize)]
pub struct ContactSubmission {
    pub full_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    pub message: String,
}

pub async fn submit(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ContactSubmission>,
) -> Result<Json<Value>, AppError> {
    if body.full_name.trim().is_empty() || body.message.trim().is_empty() {
        return Err(AppError::validation("Name and message are required"));
    }

    let row = NewContactMessage {
        full_name: body.full_name,
        email: body.email,
        phone: body.phone,
        address: body.address,
        message: body.message,
        category: CONTACT_CATEGORY.to_string(),
    };

    state.store.insert("contacts", &[row]).await?;

    Ok(Json(json!({ "success": true })))
}
