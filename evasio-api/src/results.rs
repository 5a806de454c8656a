use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::{error::AppError, state::AppState};

/// Stable response shape: when the destination is ready every optional field
/// is present, defaulted to an empty string rather than omitted.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultsView {
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gallery_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pdf_url: Option<String>,
}

impl ResultsView {
    fn not_ready() -> Self {
        Self {
            available: false,
            message: Some("Your destination is not ready yet. You'll get an email!".to_string()),
            destination: None,
            description: None,
            gallery_url: None,
            pdf_url: None,
        }
    }
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/results/{code}", get(get_results))
}

/// GET /api/results/{code}
/// The assigned destination bundle, once the operator has filled it in.
/// "Not ready" is a normal 200, not an error; the frontend polls.
async fn get_results(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<ResultsView>, AppError> {
    let repos = state.repos()?;
    let participant = repos
        .participants
        .find_by_code(&code)
        .await?
        .ok_or_else(|| AppError::NotFound("unknown participant code".into()))?;

    let Some(trip_record_id) = &participant.trip_record_id else {
        return Ok(Json(ResultsView::not_ready()));
    };
    let trip = repos.trips.get(trip_record_id).await?;

    let Some(destination) = trip.destination else {
        return Ok(Json(ResultsView::not_ready()));
    };

    Ok(Json(ResultsView {
        available: true,
        message: None,
        destination: Some(destination),
        description: Some(trip.description.unwrap_or_default()),
        gallery_url: Some(trip.gallery_url.unwrap_or_default()),
        pdf_url: Some(trip.pdf_url.unwrap_or_default()),
    }))
}
