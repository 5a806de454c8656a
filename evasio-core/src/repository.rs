use async_trait::async_trait;

use crate::form::{FormResponse, StoredFormResponse};
use crate::giftcard::{GiftCard, GiftCardStatus, NewGiftCard};
use crate::trip::{FormStatus, NewParticipant, NewTrip, Participant, Trip};

/// Errors surfaced by a record-store binding. `Api` carries the upstream
/// status and body so the web tier can mirror it for diagnostics.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record not found: {0}")]
    NotFound(String),

    #[error("store request failed: {0}")]
    Transport(String),

    #[error("store returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("unexpected record shape: {0}")]
    Decode(String),
}

/// Repository trait for trip records
#[async_trait]
pub trait TripRepository: Send + Sync {
    async fn create(&self, trip: &NewTrip) -> Result<Trip, StoreError>;

    async fn get(&self, record_id: &str) -> Result<Trip, StoreError>;
}

/// Repository trait for participant records
#[async_trait]
pub trait ParticipantRepository: Send + Sync {
    async fn create(&self, participant: &NewParticipant) -> Result<Participant, StoreError>;

    async fn find_by_code(&self, code: &str) -> Result<Option<Participant>, StoreError>;

    async fn list_by_trip(&self, trip_record_id: &str) -> Result<Vec<Participant>, StoreError>;

    async fn set_form_status(
        &self,
        record_id: &str,
        status: FormStatus,
    ) -> Result<(), StoreError>;
}

/// Repository trait for questionnaire responses
#[async_trait]
pub trait FormResponseRepository: Send + Sync {
    async fn create(
        &self,
        participant_record_id: &str,
        form: &FormResponse,
    ) -> Result<StoredFormResponse, StoreError>;

    async fn find_by_participant(
        &self,
        participant_record_id: &str,
    ) -> Result<Option<StoredFormResponse>, StoreError>;

    async fn update(
        &self,
        record_id: &str,
        form: &FormResponse,
    ) -> Result<StoredFormResponse, StoreError>;
}

/// Repository trait for gift card records
#[async_trait]
pub trait GiftCardRepository: Send + Sync {
    async fn create(&self, card: &NewGiftCard) -> Result<GiftCard, StoreError>;

    async fn find_by_code(&self, code: &str) -> Result<Option<GiftCard>, StoreError>;

    async fn set_status(
        &self,
        record_id: &str,
        status: GiftCardStatus,
    ) -> Result<GiftCard, StoreError>;
}
