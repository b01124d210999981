use std::sync::Arc;

use axum::{Json, extract::State};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{
    error::AppError,
    models::Worker,
    onboarding::{BasicInfo, Wizard, WizardError},
    state::AppState,
};

#[derive(Deserialize)]
pub struct OnboardingSubmission {
    #[serde(flatten)]
    pub basic: BasicInfo,
    #[serde(default)]
    pub categories: Vec<String>,
}

impl From<WizardError> for AppError {
    fn from(err: WizardError) -> Self {
        AppError::Validation(err.to_string())
    }
}

/// Completed onboarding. The payload is replayed through the wizard guards,
/// so nothing is written unless both steps pass; the single insert then
/// creates the one complete worker row.
pub async fn onboard(
    State(state): State<Arc<AppState>>,
    Json(submission): Json<OnboardingSubmission>,
) -> Result<Json<Value>, AppError> {
    let mut wizard = Wizard::new();

    wizard.submit_basic(submission.basic)?;
    let row = wizard.submit_skills(submission.categories)?;

    let stored: Vec<Worker> = state.store.insert_returning("workers", &[row]).await?;
    let worker = stored
        .into_iter()
        .next()
        .ok_or_else(|| AppError::internal("store returned no representation".to_string()))?;

    Ok(Json(json!({
        "id": worker.id,
        "worker_code": worker.worker_code,
    })))
}
