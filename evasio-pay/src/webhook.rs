use std::collections::HashMap;

use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;

use crate::{CustomerDetails, PayError};

type HmacSha256 = Hmac<Sha256>;

/// Outer webhook event envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: EventData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventData {
    /// Shape varies by event type; checkout completions decode into
    /// [`CheckoutSessionObject`].
    pub object: serde_json::Value,
}

/// The `data.object` of a `checkout.session.completed` event, narrowed to
/// the fields fulfillment needs.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutSessionObject {
    pub id: String,
    pub amount_total: Option<i64>,
    pub currency: Option<String>,
    pub payment_status: Option<String>,
    pub customer_details: Option<CustomerDetails>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

pub const CHECKOUT_COMPLETED: &str = "checkout.session.completed";

/// Verify the provider's `Stripe-Signature` header against the raw body.
/// The header carries a timestamp `t` and one or more `v1` HMAC-SHA256
/// signatures over `"{t}.{body}"`; any matching `v1` candidate accepts.
pub fn verify_signature(
    payload: &[u8],
    signature_header: Option<&str>,
    signing_secret: &str,
) -> Result<(), PayError> {
    let header = signature_header
        .ok_or_else(|| PayError::Signature("missing Stripe-Signature header".to_string()))?;

    let mut timestamp: Option<&str> = None;
    let mut candidates: Vec<&str> = Vec::new();
    for item in header.split(',') {
        if let Some((key, value)) = item.trim().split_once('=') {
            match key {
                "t" => timestamp = Some(value),
                "v1" => candidates.push(value),
                _ => {}
            }
        }
    }

    let timestamp = timestamp
        .ok_or_else(|| PayError::Signature("missing timestamp in signature header".to_string()))?;
    if candidates.is_empty() {
        return Err(PayError::Signature(
            "missing v1 signature in signature header".to_string(),
        ));
    }

    let mut mac = HmacSha256::new_from_slice(signing_secret.as_bytes())
        .map_err(|_| PayError::Signature("invalid signing secret".to_string()))?;
    mac.update(timestamp.as_bytes());
    mac.update(b".");
    mac.update(payload);
    let expected = hex::encode(mac.finalize().into_bytes());

    for candidate in candidates {
        if constant_time_eq(expected.as_bytes(), candidate.as_bytes()) {
            return Ok(());
        }
    }
    Err(PayError::Signature("signature mismatch".to_string()))
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

pub fn parse_event(payload: &[u8]) -> Result<StripeEvent, PayError> {
    Ok(serde_json::from_slice(payload)?)
}
