use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{patch, post},
    Json, Router,
};
use serde::Deserialize;

use evasio_core::codes::generate_code;
use evasio_core::giftcard::{GiftCard, GiftCardStatus, NewGiftCard};

use crate::{error::AppError, state::AppState};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGiftCardRequest {
    pub buyer_name: String,
    pub buyer_email: String,
    pub recipient_name: String,
    /// Generated when absent.
    pub code: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateGiftCardRequest {
    pub status: GiftCardStatus,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/giftcards", post(create_gift_card))
        .route("/api/giftcards/{record_id}", patch(update_gift_card))
}

/// POST /api/giftcards
async fn create_gift_card(
    State(state): State<AppState>,
    Json(req): Json<CreateGiftCardRequest>,
) -> Result<(StatusCode, Json<GiftCard>), AppError> {
    let repos = state.repos()?;
    if req.buyer_email.trim().is_empty() {
        return Err(AppError::Validation("buyerEmail is required".into()));
    }
    if req.recipient_name.trim().is_empty() {
        return Err(AppError::Validation("recipientName is required".into()));
    }

    let card = repos
        .gift_cards
        .create(&NewGiftCard {
            code: req.code.unwrap_or_else(generate_code),
            buyer_name: req.buyer_name,
            buyer_email: req.buyer_email,
            recipient_name: req.recipient_name,
            status: GiftCardStatus::Unused,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(card)))
}

/// PATCH /api/giftcards/{record_id}
/// Status transition, e.g. marking a card used after redemption.
async fn update_gift_card(
    State(state): State<AppState>,
    Path(record_id): Path<String>,
    Json(req): Json<UpdateGiftCardRequest>,
) -> Result<Json<GiftCard>, AppError> {
    let repos = state.repos()?;
    let card = repos.gift_cards.set_status(&record_id, req.status).await?;
    Ok(Json(card))
}
