use std::collections::HashMap;

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use evasio_pay::{CheckoutRequest, CheckoutSession};

use crate::{error::AppError, state::AppState};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CheckoutKind {
    Trip,
    Gift,
}

impl CheckoutKind {
    fn product_name(&self) -> &'static str {
        match self {
            CheckoutKind::Trip => "Surprise trip",
            CheckoutKind::Gift => "Surprise trip gift card",
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    /// Amount in cents.
    pub amount: i64,
    pub product: CheckoutKind,
    /// Passed through to the payment provider and returned verbatim on the
    /// webhook; the frontend puts `type`, `nbParticipants` and
    /// `participants` here for group purchases.
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub id: String,
    pub payment_status: Option<String>,
    pub amount_total: Option<i64>,
    pub currency: Option<String>,
    pub customer_email: Option<String>,
    pub metadata: HashMap<String, String>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/checkout/sessions", post(create_session))
        .route("/api/checkout/sessions/{id}", get(get_session))
}

/// POST /api/checkout/sessions
/// Build a hosted payment session and return its redirect URL.
async fn create_session(
    State(state): State<AppState>,
    Json(req): Json<CreateSessionRequest>,
) -> Result<Json<CheckoutSession>, AppError> {
    let gateway = state.payments()?;
    if req.amount <= 0 {
        return Err(AppError::Validation("amount must be positive".into()));
    }

    let session = gateway
        .create_checkout_session(&CheckoutRequest {
            product_name: req.product.product_name().to_string(),
            amount_cents: req.amount,
            currency: "eur".to_string(),
            metadata: req.metadata,
        })
        .await?;

    Ok(Json(session))
}

/// GET /api/checkout/sessions/{id}
/// Server-side verification of a completed payment session.
async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionView>, AppError> {
    let gateway = state.payments()?;
    let details = gateway.get_checkout_session(&session_id).await?;

    Ok(Json(SessionView {
        id: details.id,
        payment_status: details.payment_status,
        amount_total: details.amount_total,
        currency: details.currency,
        customer_email: details.customer_details.and_then(|c| c.email),
        metadata: details.metadata,
    }))
}
