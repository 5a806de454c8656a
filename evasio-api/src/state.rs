use std::sync::Arc;

use evasio_core::repository::{
    FormResponseRepository, GiftCardRepository, ParticipantRepository, TripRepository,
};
use evasio_notify::Notifier;
use evasio_pay::StripeGateway;

use crate::error::AppError;

/// One handle per record collection. Handlers only ever see the traits, so
/// tests swap in in-memory implementations.
#[derive(Clone)]
pub struct Repositories {
    pub trips: Arc<dyn TripRepository>,
    pub participants: Arc<dyn ParticipantRepository>,
    pub forms: Arc<dyn FormResponseRepository>,
    pub gift_cards: Arc<dyn GiftCardRepository>,
}

/// Every provider binding is optional: a missing secret leaves its slot
/// `None` and the endpoints that need it answer with a configuration error
/// instead of a confusing downstream failure.
#[derive(Clone)]
pub struct AppState {
    pub repos: Option<Arc<Repositories>>,
    pub payments: Option<Arc<StripeGateway>>,
    pub notifier: Option<Arc<Notifier>>,
    pub webhook_secret: Option<String>,
    pub base_url: String,
}

impl AppState {
    pub fn repos(&self) -> Result<&Repositories, AppError> {
        self.repos.as_deref().ok_or_else(|| {
            AppError::Config("record store is not configured (airtable api_key/base_id)".into())
        })
    }

    pub fn payments(&self) -> Result<&StripeGateway, AppError> {
        self.payments.as_deref().ok_or_else(|| {
            AppError::Config("payment provider is not configured (stripe secret_key)".into())
        })
    }

    pub fn notifier(&self) -> Result<&Notifier, AppError> {
        self.notifier.as_deref().ok_or_else(|| {
            AppError::Config("email provider is not configured (resend api_key)".into())
        })
    }

    pub fn webhook_secret(&self) -> Result<&str, AppError> {
        self.webhook_secret.as_deref().ok_or_else(|| {
            AppError::Config("webhook signing secret is not configured".into())
        })
    }
}
