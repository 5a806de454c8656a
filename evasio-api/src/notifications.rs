use axum::{extract::State, routing::post, Json, Router};
use serde::Deserialize;

use evasio_notify::{DispatchReport, EmailKind, Recipient};

use crate::{error::AppError, state::AppState};

#[derive(Debug, Deserialize)]
pub struct NotifyRequest {
    pub kind: EmailKind,
    pub recipients: Vec<Recipient>,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/notifications", post(send_notifications))
}

/// POST /api/notifications
/// Manual (re)send of participant or gift-card emails. Delivery is
/// best-effort; the tally tells the caller what happened per recipient.
async fn send_notifications(
    State(state): State<AppState>,
    Json(req): Json<NotifyRequest>,
) -> Result<Json<DispatchReport>, AppError> {
    let notifier = state.notifier()?;
    if req.recipients.is_empty() {
        return Err(AppError::Validation("recipients must not be empty".into()));
    }
    let report = notifier.dispatch(req.kind, &req.recipients).await;
    Ok(Json(report))
}
