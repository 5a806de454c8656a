use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;

use evasio_core::form::{FormResponse, StoredFormResponse};
use evasio_core::trip::FormStatus;

use crate::{error::AppError, state::AppState};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveFormRequest {
    pub code: String,
    #[serde(flatten)]
    pub form: FormResponse,
}

pub fn routes() -> Router<AppState> {
    // Same segment, two meanings: GET takes a participant code, PATCH takes
    // the response's record id.
    Router::new()
        .route("/api/forms", post(save_form))
        .route("/api/forms/{id}", get(get_form).patch(update_form))
}

/// GET /api/forms/{code}
/// Fetch a participant's questionnaire response.
async fn get_form(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<StoredFormResponse>, AppError> {
    let repos = state.repos()?;
    let participant = repos
        .participants
        .find_by_code(&code)
        .await?
        .ok_or_else(|| AppError::NotFound("unknown participant code".into()))?;

    let stored = repos
        .forms
        .find_by_participant(&participant.record_id)
        .await?
        .ok_or_else(|| AppError::NotFound("no form response yet".into()))?;
    Ok(Json(stored))
}

/// POST /api/forms
/// First submission: create the response and mark the participant done,
/// which locks the rest of the group out of destination-affecting edits.
async fn save_form(
    State(state): State<AppState>,
    Json(req): Json<SaveFormRequest>,
) -> Result<Json<StoredFormResponse>, AppError> {
    let repos = state.repos()?;
    if req.code.trim().is_empty() {
        return Err(AppError::Validation("code is required".into()));
    }
    let participant = repos
        .participants
        .find_by_code(&req.code)
        .await?
        .ok_or_else(|| AppError::NotFound("unknown participant code".into()))?;

    let mut form = req.form;
    form.completed_at = Some(Utc::now());

    let stored = repos.forms.create(&participant.record_id, &form).await?;
    repos
        .participants
        .set_form_status(&participant.record_id, FormStatus::Completed)
        .await?;

    Ok(Json(stored))
}

/// PATCH /api/forms/{record_id}
/// Later edits to an existing response.
async fn update_form(
    State(state): State<AppState>,
    Path(record_id): Path<String>,
    Json(form): Json<FormResponse>,
) -> Result<Json<StoredFormResponse>, AppError> {
    let repos = state.repos()?;
    let stored = repos.forms.update(&record_id, &form).await?;
    Ok(Json(stored))
}
