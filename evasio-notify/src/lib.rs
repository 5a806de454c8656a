pub mod notifier;
pub mod templates;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

pub use notifier::{DispatchOutcome, DispatchReport, EmailKind, Notifier, Recipient};

const API_URL: &str = "https://api.resend.com/emails";

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("email API request failed: {0}")]
    Transport(String),

    #[error("email API returned {status}: {body}")]
    Api { status: u16, body: String },
}

#[derive(Debug, Clone)]
pub struct OutboundEmail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// Seam for the email provider so the notifier can be exercised with a stub.
#[async_trait]
pub trait EmailSender: Send + Sync {
    /// Send one email, returning the provider's message id.
    async fn send(&self, email: &OutboundEmail) -> Result<String, MailError>;
}

#[derive(Debug, Deserialize)]
struct SendResponse {
    id: String,
}

/// Template-free HTML send API, one call per recipient.
pub struct ResendMailer {
    http: reqwest::Client,
    api_key: String,
}

impl ResendMailer {
    pub fn new(api_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
        }
    }
}

#[async_trait]
impl EmailSender for ResendMailer {
    async fn send(&self, email: &OutboundEmail) -> Result<String, MailError> {
        let response = self
            .http
            .post(API_URL)
            .bearer_auth(&self.api_key)
            .json(&json!({
                "from": email.from,
                "to": [email.to],
                "subject": email.subject,
                "html": email.html,
            }))
            .send()
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?;
        if !status.is_success() {
            return Err(MailError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let sent: SendResponse = serde_json::from_str(&body)
            .map_err(|e| MailError::Transport(format!("unexpected send response: {}", e)))?;
        Ok(sent.id)
    }
}
