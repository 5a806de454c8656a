use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use evasio_core::giftcard::{GiftCard, GiftCardStatus, NewGiftCard};
use evasio_core::repository::{GiftCardRepository, StoreError};

use crate::airtable::{exact_match, AirtableClient, Record};

const TABLE: &str = "GiftCards";

pub struct AirtableGiftCardRepository {
    client: Arc<AirtableClient>,
}

impl AirtableGiftCardRepository {
    pub fn new(client: Arc<AirtableClient>) -> Self {
        Self { client }
    }
}

fn card_from_record(record: Record) -> Result<GiftCard, StoreError> {
    let fields = &record.fields;
    let code = fields["code"]
        .as_str()
        .ok_or_else(|| StoreError::Decode(format!("gift card {} missing code", record.id)))?
        .to_string();
    let status = fields["status"]
        .as_str()
        .and_then(GiftCardStatus::parse)
        .unwrap_or(GiftCardStatus::Unused);

    Ok(GiftCard {
        record_id: record.id,
        code,
        buyer_name: fields["buyer_name"].as_str().unwrap_or_default().to_string(),
        buyer_email: fields["buyer_email"].as_str().unwrap_or_default().to_string(),
        recipient_name: fields["recipient_name"].as_str().unwrap_or_default().to_string(),
        status,
    })
}

#[async_trait]
impl GiftCardRepository for AirtableGiftCardRepository {
    async fn create(&self, card: &NewGiftCard) -> Result<GiftCard, StoreError> {
        let fields = json!({
            "code": card.code,
            "buyer_name": card.buyer_name,
            "buyer_email": card.buyer_email,
            "recipient_name": card.recipient_name,
            "status": card.status.as_str(),
        });
        let record = self.client.create_record(TABLE, fields).await?;
        card_from_record(record)
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<GiftCard>, StoreError> {
        let records = self
            .client
            .find_by_formula(TABLE, &exact_match("code", code), Some(1))
            .await?;
        records.into_iter().next().map(card_from_record).transpose()
    }

    async fn set_status(
        &self,
        record_id: &str,
        status: GiftCardStatus,
    ) -> Result<GiftCard, StoreError> {
        let record = self
            .client
            .update_record(TABLE, record_id, json!({ "status": status.as_str() }))
            .await?;
        card_from_record(record)
    }
}
