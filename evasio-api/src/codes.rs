use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};

use evasio_core::giftcard::GiftCardStatus;
use evasio_core::repository::StoreError;
use evasio_core::trip::FormStatus;

use crate::{error::AppError, state::AppState, state::Repositories};

#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    pub code: String,
}

/// Tagged verification result: participant lookup runs first, so a code
/// present in both collections resolves as a participant.
#[derive(Debug, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CodeResolution {
    #[serde(rename_all = "camelCase")]
    Participant {
        valid: bool,
        code: String,
        first_name: String,
        last_name: String,
        form_status: FormStatus,
        has_trip: bool,
    },
    #[serde(rename_all = "camelCase")]
    Gift {
        valid: bool,
        code: String,
        recipient_name: String,
        status: GiftCardStatus,
    },
    None { valid: bool },
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/codes/verify", post(verify_code))
}

/// POST /api/codes/verify
async fn verify_code(
    State(state): State<AppState>,
    Json(req): Json<VerifyRequest>,
) -> Result<Json<CodeResolution>, AppError> {
    // This endpoint canonicalizes; stored codes are upper-case.
    let code = req.code.trim().to_uppercase();
    if code.is_empty() {
        return Err(AppError::Validation("code is required".into()));
    }
    let repos = state.repos()?;
    Ok(Json(resolve_code(repos, &code).await?))
}

pub async fn resolve_code(
    repos: &Repositories,
    code: &str,
) -> Result<CodeResolution, StoreError> {
    if let Some(participant) = repos.participants.find_by_code(code).await? {
        return Ok(CodeResolution::Participant {
            valid: true,
            code: participant.code,
            first_name: participant.first_name,
            last_name: participant.last_name,
            form_status: participant.form_status,
            has_trip: participant.trip_record_id.is_some(),
        });
    }

    if let Some(card) = repos.gift_cards.find_by_code(code).await? {
        return Ok(CodeResolution::Gift {
            valid: card.status == GiftCardStatus::Unused,
            code: card.code,
            recipient_name: card.recipient_name,
            status: card.status,
        });
    }

    Ok(CodeResolution::None { valid: false })
}
