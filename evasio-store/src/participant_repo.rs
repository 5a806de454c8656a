use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use evasio_core::repository::{ParticipantRepository, StoreError};
use evasio_core::trip::{FormStatus, NewParticipant, Participant};

use crate::airtable::{exact_match, AirtableClient, Record};

const TABLE: &str = "Participants";

pub struct AirtableParticipantRepository {
    client: Arc<AirtableClient>,
}

impl AirtableParticipantRepository {
    pub fn new(client: Arc<AirtableClient>) -> Self {
        Self { client }
    }
}

fn participant_from_record(record: Record) -> Result<Participant, StoreError> {
    let fields = &record.fields;
    let code = fields["code"]
        .as_str()
        .ok_or_else(|| StoreError::Decode(format!("participant {} missing code", record.id)))?
        .to_string();
    let form_status = fields["form_status"]
        .as_str()
        .and_then(FormStatus::parse)
        .unwrap_or(FormStatus::Pending);

    Ok(Participant {
        record_id: record.id,
        code,
        first_name: fields["first_name"].as_str().unwrap_or_default().to_string(),
        last_name: fields["last_name"].as_str().unwrap_or_default().to_string(),
        email: fields["email"].as_str().unwrap_or_default().to_string(),
        form_status,
        trip_record_id: fields["trip_record_id"].as_str().map(str::to_owned),
    })
}

#[async_trait]
impl ParticipantRepository for AirtableParticipantRepository {
    async fn create(&self, participant: &NewParticipant) -> Result<Participant, StoreError> {
        let mut fields = json!({
            "code": participant.code,
            "first_name": participant.first_name,
            "last_name": participant.last_name,
            "email": participant.email,
            "form_status": participant.form_status.as_str(),
        });
        if let Some(trip_record_id) = &participant.trip_record_id {
            fields["trip_record_id"] = Value::String(trip_record_id.clone());
        }
        let record = self.client.create_record(TABLE, fields).await?;
        participant_from_record(record)
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Participant>, StoreError> {
        let records = self
            .client
            .find_by_formula(TABLE, &exact_match("code", code), Some(1))
            .await?;
        records
            .into_iter()
            .next()
            .map(participant_from_record)
            .transpose()
    }

    async fn list_by_trip(&self, trip_record_id: &str) -> Result<Vec<Participant>, StoreError> {
        let records = self
            .client
            .find_by_formula(TABLE, &exact_match("trip_record_id", trip_record_id), None)
            .await?;
        records.into_iter().map(participant_from_record).collect()
    }

    async fn set_form_status(
        &self,
        record_id: &str,
        status: FormStatus,
    ) -> Result<(), StoreError> {
        self.client
            .update_record(TABLE, record_id, json!({ "form_status": status.as_str() }))
            .await?;
        Ok(())
    }
}
