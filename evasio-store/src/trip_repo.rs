use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use evasio_core::repository::{StoreError, TripRepository};
use evasio_core::trip::{NewTrip, PaymentStatus, Trip};

use crate::airtable::{AirtableClient, Record};

const TABLE: &str = "Trips";

pub struct AirtableTripRepository {
    client: Arc<AirtableClient>,
}

impl AirtableTripRepository {
    pub fn new(client: Arc<AirtableClient>) -> Self {
        Self { client }
    }
}

fn trip_from_record(record: Record) -> Result<Trip, StoreError> {
    let fields = &record.fields;
    let trip_id = fields["trip_id"]
        .as_str()
        .ok_or_else(|| StoreError::Decode(format!("trip {} missing trip_id", record.id)))?
        .to_string();
    let payment_status = fields["payment_status"]
        .as_str()
        .and_then(PaymentStatus::parse)
        .unwrap_or(PaymentStatus::Pending);

    Ok(Trip {
        record_id: record.id,
        trip_id,
        payment_status,
        amount: fields["amount"].as_i64().unwrap_or(0),
        destination: fields["destination"].as_str().map(str::to_owned),
        description: fields["description"].as_str().map(str::to_owned),
        gallery_url: fields["gallery_url"].as_str().map(str::to_owned),
        pdf_url: fields["pdf_url"].as_str().map(str::to_owned),
    })
}

#[async_trait]
impl TripRepository for AirtableTripRepository {
    async fn create(&self, trip: &NewTrip) -> Result<Trip, StoreError> {
        let fields = json!({
            "trip_id": trip.trip_id,
            "payment_status": trip.payment_status.as_str(),
            "amount": trip.amount,
        });
        let record = self.client.create_record(TABLE, fields).await?;
        trip_from_record(record)
    }

    async fn get(&self, record_id: &str) -> Result<Trip, StoreError> {
        let record = self.client.get_record(TABLE, record_id).await?;
        trip_from_record(record)
    }
}
