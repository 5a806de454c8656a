use axum::{
    body::Bytes,
    extract::State,
    http::HeaderMap,
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};

use evasio_pay::webhook::{self, CheckoutSessionObject, CHECKOUT_COMPLETED};

use crate::{error::AppError, fulfillment, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/webhooks/stripe", post(handle_stripe_webhook))
}

/// POST /api/webhooks/stripe
/// Receive payment completion notifications. The signature is checked
/// against the raw body before any field is trusted. Fulfillment failures
/// are logged but still acknowledged: the provider only needs the 2xx, and
/// nothing here is retried or rolled back.
async fn handle_stripe_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, AppError> {
    let secret = state.webhook_secret()?;
    let signature = headers
        .get("stripe-signature")
        .and_then(|value| value.to_str().ok());
    if let Err(err) = webhook::verify_signature(&body, signature, secret) {
        tracing::warn!("rejected webhook: {}", err);
        return Err(AppError::Validation("invalid webhook signature".into()));
    }

    let event = webhook::parse_event(&body)
        .map_err(|e| AppError::Validation(format!("malformed webhook payload: {}", e)))?;
    tracing::info!("webhook event {} ({})", event.id, event.event_type);

    if event.event_type != CHECKOUT_COMPLETED {
        return Ok(Json(json!({ "received": true })));
    }

    let session: CheckoutSessionObject = serde_json::from_value(event.data.object)
        .map_err(|e| AppError::Validation(format!("malformed checkout session: {}", e)))?;

    match session.metadata.get("type").map(String::as_str) {
        Some("group") => {
            if let Err(err) =
                fulfillment::fulfill_group(state.repos()?, state.notifier()?, &session).await
            {
                tracing::error!("group fulfillment for session {} failed: {}", session.id, err);
            }
        }
        Some("solo") => {
            if let Err(err) =
                fulfillment::fulfill_solo(state.repos()?, state.notifier()?, &session).await
            {
                tracing::error!("solo fulfillment for session {} failed: {}", session.id, err);
            }
        }
        other => {
            tracing::info!(
                "ignoring checkout session {} with metadata type {:?}",
                session.id,
                other
            );
        }
    }

    Ok(Json(json!({ "received": true })))
}
