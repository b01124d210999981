use std::sync::Arc;

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::error;

use crate::{
    error::AppError,
    models::{NewRating, Rating},
    state::AppState,
};

#[derive(Deserialize)]
pub struct RatingSubmission {
    pub rating: i32,
}

#[derive(Serialize)]
pub struct RatingSummary {
    pub average: f64,
    pub count: usize,
}

/// One-tap rating after survey completion. Purely additive; there is no
/// edit afterward.
pub async fn submit(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RatingSubmission>,
) -> Result<Json<Value>, AppError> {
    if !(1..=5).contains(&body.rating) {
        return Err(AppError::validation("Rating must be between 1 and 5"));
    }

    state
        .store
        .insert("ratings", &[NewRating { rating: body.rating }])
        .await?;

    Ok(Json(json!({ "success": true })))
}

/// Mean and count over every rating row; zeros when the read fails.
pub async fn summary(State(state): State<Arc<AppState>>) -> Json<RatingSummary> {
    let rows: Vec<Rating> = match state.store.table("ratings").fetch().await {
        Ok(rows) => rows,
        Err(e) => {
            error!("Error fetching ratings: {e}");
            return Json(RatingSummary {
                average: 0.0,
                count: 0,
            });
        }
    };

    let count = rows.len();
    let average = if count > 0 {
        rows.iter().map(|r| r.rating as f64).sum::<f64>() / count as f64
    } else {
        0.0
    };

    Json(RatingSummary { average, count })
}
