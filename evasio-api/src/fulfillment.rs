use serde::Deserialize;

use evasio_core::codes::generate_code;
use evasio_core::identity::split_full_name;
use evasio_core::repository::StoreError;
use evasio_core::trip::{FormStatus, NewParticipant, NewTrip, Participant, PaymentStatus, Trip};
use evasio_notify::{DispatchReport, EmailKind, Notifier, Recipient};
use evasio_pay::webhook::CheckoutSessionObject;

use crate::state::Repositories;

#[derive(Debug, thiserror::Error)]
pub enum FulfillmentError {
    #[error("unusable webhook metadata: {0}")]
    Metadata(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug)]
pub struct FulfillmentSummary {
    pub trip: Trip,
    pub participants: Vec<Participant>,
    pub emails: DispatchReport,
}

/// One entry of the `participants` metadata value. The keys are the
/// frontend's wire format and stay as-is.
#[derive(Debug, Deserialize)]
struct ParticipantEntry {
    #[serde(rename = "prenom")]
    first_name: String,
    #[serde(rename = "nom")]
    last_name: String,
    email: String,
}

/// Fulfil a paid group purchase: one trip row, one participant row per
/// metadata entry, then the invitation fan-out. The three steps are
/// sequential network calls with no rollback; a failure partway leaves
/// whatever was already created.
pub async fn fulfill_group(
    repos: &Repositories,
    notifier: &Notifier,
    session: &CheckoutSessionObject,
) -> Result<FulfillmentSummary, FulfillmentError> {
    let raw_entries = session
        .metadata
        .get("participants")
        .ok_or_else(|| FulfillmentError::Metadata("missing participants list".into()))?;
    let entries: Vec<ParticipantEntry> = serde_json::from_str(raw_entries)
        .map_err(|e| FulfillmentError::Metadata(format!("bad participants list: {}", e)))?;
    if entries.is_empty() {
        return Err(FulfillmentError::Metadata("empty participants list".into()));
    }

    // The count is advisory; the entries drive what gets created.
    if let Some(expected) = session
        .metadata
        .get("nbParticipants")
        .and_then(|raw| raw.parse::<usize>().ok())
    {
        if expected != entries.len() {
            tracing::warn!(
                "session {}: nbParticipants={} but {} entries",
                session.id,
                expected,
                entries.len()
            );
        }
    }

    let trip = create_paid_trip(repos, session).await?;

    let mut participants = Vec::with_capacity(entries.len());
    for entry in &entries {
        let participant = repos
            .participants
            .create(&NewParticipant {
                code: generate_code(),
                first_name: entry.first_name.clone(),
                last_name: entry.last_name.clone(),
                email: entry.email.clone(),
                form_status: FormStatus::Pending,
                trip_record_id: Some(trip.record_id.clone()),
            })
            .await?;
        participants.push(participant);
    }

    let emails = send_invites(notifier, &participants).await;
    tracing::info!(
        "fulfilled group session {}: trip {} with {} participants ({} invites sent)",
        session.id,
        trip.trip_id,
        participants.len(),
        emails.sent
    );

    Ok(FulfillmentSummary {
        trip,
        participants,
        emails,
    })
}

/// Fulfil a paid solo purchase from the session's customer details.
pub async fn fulfill_solo(
    repos: &Repositories,
    notifier: &Notifier,
    session: &CheckoutSessionObject,
) -> Result<FulfillmentSummary, FulfillmentError> {
    let customer = session
        .customer_details
        .as_ref()
        .ok_or_else(|| FulfillmentError::Metadata("missing customer details".into()))?;
    let email = customer
        .email
        .clone()
        .ok_or_else(|| FulfillmentError::Metadata("missing customer email".into()))?;
    let full_name = customer.name.clone().unwrap_or_default();
    let (first_name, last_name) = split_full_name(&full_name);

    let trip = create_paid_trip(repos, session).await?;

    let participant = repos
        .participants
        .create(&NewParticipant {
            code: generate_code(),
            first_name,
            last_name,
            email,
            form_status: FormStatus::Pending,
            trip_record_id: Some(trip.record_id.clone()),
        })
        .await?;
    let participants = vec![participant];

    let emails = send_invites(notifier, &participants).await;
    tracing::info!(
        "fulfilled solo session {}: trip {} ({} invite sent)",
        session.id,
        trip.trip_id,
        emails.sent
    );

    Ok(FulfillmentSummary {
        trip,
        participants,
        emails,
    })
}

async fn create_paid_trip(
    repos: &Repositories,
    session: &CheckoutSessionObject,
) -> Result<Trip, StoreError> {
    repos
        .trips
        .create(&NewTrip {
            trip_id: evasio_core::trip::next_trip_id(),
            payment_status: PaymentStatus::Paid,
            amount: session.amount_total.unwrap_or(0),
        })
        .await
}

async fn send_invites(notifier: &Notifier, participants: &[Participant]) -> DispatchReport {
    let recipients: Vec<Recipient> = participants
        .iter()
        .map(|p| Recipient {
            name: p.first_name.clone(),
            email: p.email.clone(),
            code: p.code.clone(),
        })
        .collect();
    notifier.dispatch(EmailKind::TripInvite, &recipients).await
}
