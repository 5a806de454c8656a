use std::sync::Arc;

use async_trait::async_trait;
use chrono::DateTime;
use serde_json::{json, Value};

use evasio_core::form::{join_multi, split_multi, FormResponse, StoredFormResponse};
use evasio_core::repository::{FormResponseRepository, StoreError};

use crate::airtable::{exact_match, AirtableClient, Record};

const TABLE: &str = "FormResponses";

pub struct AirtableFormRepository {
    client: Arc<AirtableClient>,
}

impl AirtableFormRepository {
    pub fn new(client: Arc<AirtableClient>) -> Self {
        Self { client }
    }
}

/// Flatten a form into text-only store columns. Multi-value answers are
/// always written (an empty list clears the cell); absent scalar answers are
/// skipped so a partial update leaves them untouched.
fn form_to_fields(participant_record_id: Option<&str>, form: &FormResponse) -> Value {
    let mut fields = json!({
        "motivations": join_multi(&form.motivations),
        "travel_styles": join_multi(&form.travel_styles),
        "activities": join_multi(&form.activities),
        "dietary_restrictions": join_multi(&form.dietary_restrictions),
        "avoid_destinations": join_multi(&form.avoid_destinations),
    });

    if let Some(id) = participant_record_id {
        fields["participant_record_id"] = Value::String(id.to_string());
    }
    set_text(&mut fields, "start_date", form.start_date.as_deref());
    set_text(&mut fields, "end_date", form.end_date.as_deref());
    if let Some(days) = form.duration_days {
        fields["duration_days"] = Value::from(days);
    }
    set_text(&mut fields, "budget", form.budget.as_deref());
    set_text(&mut fields, "departure_city", form.departure_city.as_deref());
    set_text(&mut fields, "climate", form.climate.as_deref());
    set_text(&mut fields, "accommodation", form.accommodation.as_deref());
    set_text(&mut fields, "pace", form.pace.as_deref());
    set_text(&mut fields, "group_relation", form.group_relation.as_deref());
    if let Some(flag) = form.passport_valid {
        fields["passport_valid"] = Value::Bool(flag);
    }
    if let Some(flag) = form.fear_of_flying {
        fields["fear_of_flying"] = Value::Bool(flag);
    }
    set_text(
        &mut fields,
        "previous_destinations",
        form.previous_destinations.as_deref(),
    );
    set_text(
        &mut fields,
        "dream_destination",
        form.dream_destination.as_deref(),
    );
    set_text(&mut fields, "notes", form.notes.as_deref());
    if let Some(ts) = form.completed_at {
        fields["completed_at"] = Value::String(ts.to_rfc3339());
    }

    fields
}

fn set_text(fields: &mut Value, key: &str, value: Option<&str>) {
    if let Some(value) = value {
        fields[key] = Value::String(value.to_string());
    }
}

fn form_from_record(record: Record) -> Result<StoredFormResponse, StoreError> {
    let fields = &record.fields;
    let participant_record_id = fields["participant_record_id"]
        .as_str()
        .ok_or_else(|| {
            StoreError::Decode(format!("form response {} missing participant link", record.id))
        })?
        .to_string();

    let text = |key: &str| fields[key].as_str().map(str::to_owned);
    let multi = |key: &str| split_multi(fields[key].as_str().unwrap_or_default());

    let form = FormResponse {
        start_date: text("start_date"),
        end_date: text("end_date"),
        duration_days: fields["duration_days"].as_i64(),
        budget: text("budget"),
        departure_city: text("departure_city"),
        motivations: multi("motivations"),
        travel_styles: multi("travel_styles"),
        activities: multi("activities"),
        dietary_restrictions: multi("dietary_restrictions"),
        avoid_destinations: multi("avoid_destinations"),
        climate: text("climate"),
        accommodation: text("accommodation"),
        pace: text("pace"),
        group_relation: text("group_relation"),
        passport_valid: fields["passport_valid"].as_bool(),
        fear_of_flying: fields["fear_of_flying"].as_bool(),
        previous_destinations: text("previous_destinations"),
        dream_destination: text("dream_destination"),
        notes: text("notes"),
        completed_at: fields["completed_at"]
            .as_str()
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map(|dt| dt.to_utc()),
    };

    Ok(StoredFormResponse {
        record_id: record.id,
        participant_record_id,
        form,
    })
}

#[async_trait]
impl FormResponseRepository for AirtableFormRepository {
    async fn create(
        &self,
        participant_record_id: &str,
        form: &FormResponse,
    ) -> Result<StoredFormResponse, StoreError> {
        let fields = form_to_fields(Some(participant_record_id), form);
        let record = self.client.create_record(TABLE, fields).await?;
        form_from_record(record)
    }

    async fn find_by_participant(
        &self,
        participant_record_id: &str,
    ) -> Result<Option<StoredFormResponse>, StoreError> {
        let records = self
            .client
            .find_by_formula(
                TABLE,
                &exact_match("participant_record_id", participant_record_id),
                Some(1),
            )
            .await?;
        records.into_iter().next().map(form_from_record).transpose()
    }

    async fn update(
        &self,
        record_id: &str,
        form: &FormResponse,
    ) -> Result<StoredFormResponse, StoreError> {
        let fields = form_to_fields(None, form);
        let record = self.client.update_record(TABLE, record_id, fields).await?;
        form_from_record(record)
    }
}
