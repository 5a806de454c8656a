pub mod webhook;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

const API_ROOT: &str = "https://api.stripe.com/v1";

#[derive(Debug, thiserror::Error)]
pub enum PayError {
    #[error("payment API request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("payment API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("failed to parse payment API response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("webhook signature verification failed: {0}")]
    Signature(String),
}

/// What the caller asks to sell: a named line item plus opaque metadata that
/// comes back untouched on the webhook.
#[derive(Debug, Clone)]
pub struct CheckoutRequest {
    pub product_name: String,
    pub amount_cents: i64,
    pub currency: String,
    pub metadata: HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckoutSession {
    pub session_id: String,
    pub url: String,
}

#[derive(Debug, Deserialize)]
struct SessionCreated {
    id: String,
    url: Option<String>,
}

/// Retrieved session details, used for server-side payment verification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionDetails {
    pub id: String,
    pub amount_total: Option<i64>,
    pub currency: Option<String>,
    pub payment_status: Option<String>,
    pub status: Option<String>,
    pub customer_details: Option<CustomerDetails>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerDetails {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Hosted-checkout gateway. Talks to the provider's REST API directly; the
/// checkout page itself is hosted by the provider, we only hand the browser
/// a redirect URL.
pub struct StripeGateway {
    http: reqwest::Client,
    secret_key: String,
    success_url: String,
    cancel_url: String,
}

impl StripeGateway {
    pub fn new(secret_key: String, success_url: String, cancel_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            secret_key,
            success_url,
            cancel_url,
        }
    }

    pub async fn create_checkout_session(
        &self,
        request: &CheckoutRequest,
    ) -> Result<CheckoutSession, PayError> {
        // The provider's API is form-encoded with bracketed nesting.
        let mut form: Vec<(String, String)> = vec![
            ("mode".to_string(), "payment".to_string()),
            ("payment_method_types[]".to_string(), "card".to_string()),
            ("success_url".to_string(), self.success_url.clone()),
            ("cancel_url".to_string(), self.cancel_url.clone()),
            (
                "line_items[0][price_data][currency]".to_string(),
                request.currency.to_lowercase(),
            ),
            (
                "line_items[0][price_data][product_data][name]".to_string(),
                request.product_name.clone(),
            ),
            (
                "line_items[0][price_data][unit_amount]".to_string(),
                request.amount_cents.to_string(),
            ),
            ("line_items[0][quantity]".to_string(), "1".to_string()),
        ];
        for (key, value) in &request.metadata {
            form.push((format!("metadata[{}]", key), value.clone()));
        }

        let response = self
            .http
            .post(format!("{}/checkout/sessions", API_ROOT))
            .basic_auth(&self.secret_key, None::<&str>)
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(api_error(status.as_u16(), &body));
        }

        let created: SessionCreated = serde_json::from_str(&body)?;
        let url = created.url.ok_or_else(|| PayError::Api {
            status: status.as_u16(),
            message: "checkout session response missing redirect URL".to_string(),
        })?;
        tracing::info!("created checkout session {}", created.id);

        Ok(CheckoutSession {
            session_id: created.id,
            url,
        })
    }

    pub async fn get_checkout_session(&self, session_id: &str) -> Result<SessionDetails, PayError> {
        let response = self
            .http
            .get(format!("{}/checkout/sessions/{}", API_ROOT, session_id))
            .basic_auth(&self.secret_key, None::<&str>)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(api_error(status.as_u16(), &body));
        }
        Ok(serde_json::from_str(&body)?)
    }
}

/// Pull the human-readable message out of the provider's error envelope,
/// falling back to the raw body.
fn api_error(status: u16, body: &str) -> PayError {
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
                .map(str::to_owned)
        })
        .unwrap_or_else(|| body.to_string());
    PayError::Api { status, message }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_extracts_provider_message() {
        let body = r#"{"error": {"message": "No such session", "type": "invalid_request_error"}}"#;
        match api_error(404, body) {
            PayError::Api { status, message } => {
                assert_eq!(status, 404);
                assert_eq!(message, "No such session");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn api_error_falls_back_to_raw_body() {
        match api_error(500, "not json") {
            PayError::Api { message, .. } => assert_eq!(message, "not json"),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
