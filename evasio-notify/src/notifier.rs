use std::sync::Arc;

use futures_util::future::join_all;
use serde::{Deserialize, Serialize};

use crate::templates;
use crate::{EmailSender, OutboundEmail};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EmailKind {
    TripInvite,
    GiftCard,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipient {
    pub name: String,
    pub email: String,
    pub code: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DispatchOutcome {
    pub email: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DispatchReport {
    pub sent: usize,
    pub failed: usize,
    pub outcomes: Vec<DispatchOutcome>,
}

/// Best-effort email fan-out: every recipient gets exactly one send attempt,
/// all attempts run concurrently, and one failure never blocks the rest.
/// The report is the only record of what happened; nothing is retried.
pub struct Notifier {
    sender: Arc<dyn EmailSender>,
    from: String,
    base_url: String,
}

impl Notifier {
    pub fn new(sender: Arc<dyn EmailSender>, from: String, base_url: String) -> Self {
        Self {
            sender,
            from,
            base_url,
        }
    }

    pub async fn dispatch(&self, kind: EmailKind, recipients: &[Recipient]) -> DispatchReport {
        let sends = recipients.iter().map(|recipient| {
            let email = self.render(kind, recipient);
            async move {
                match self.sender.send(&email).await {
                    Ok(message_id) => DispatchOutcome {
                        email: email.to,
                        success: true,
                        message_id: Some(message_id),
                        error: None,
                    },
                    Err(err) => {
                        tracing::warn!("email to {} failed: {}", email.to, err);
                        DispatchOutcome {
                            email: email.to,
                            success: false,
                            message_id: None,
                            error: Some(err.to_string()),
                        }
                    }
                }
            }
        });

        let outcomes = join_all(sends).await;
        let sent = outcomes.iter().filter(|o| o.success).count();
        let failed = outcomes.len() - sent;
        tracing::info!("email dispatch finished: {} sent, {} failed", sent, failed);

        DispatchReport {
            sent,
            failed,
            outcomes,
        }
    }

    fn render(&self, kind: EmailKind, recipient: &Recipient) -> OutboundEmail {
        let rendered = match kind {
            EmailKind::TripInvite => {
                templates::trip_invite(&recipient.name, &recipient.code, &self.base_url)
            }
            EmailKind::GiftCard => {
                templates::gift_card(&recipient.name, &recipient.code, &self.base_url)
            }
        };
        OutboundEmail {
            from: self.from.clone(),
            to: recipient.email.clone(),
            subject: rendered.subject,
            html: rendered.html,
        }
    }
}
