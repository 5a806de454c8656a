use evasio_core::StoreError;
use serde::Deserialize;
use serde_json::{json, Value};

const API_ROOT: &str = "https://api.airtable.com/v0";

/// One record as the store returns it: opaque id plus a bag of fields.
#[derive(Debug, Clone, Deserialize)]
pub struct Record {
    pub id: String,
    #[serde(default)]
    pub fields: Value,
    #[serde(rename = "createdTime", default)]
    pub created_time: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RecordPage {
    #[serde(default)]
    records: Vec<Record>,
}

/// Thin client over the spreadsheet-backed record store. Every repository
/// goes through this; swapping the store means swapping the repositories,
/// not the business logic.
pub struct AirtableClient {
    http: reqwest::Client,
    api_key: String,
    base_id: String,
}

impl AirtableClient {
    pub fn new(api_key: String, base_id: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            base_id,
        }
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/{}/{}", API_ROOT, self.base_id, table)
    }

    pub async fn create_record(&self, table: &str, fields: Value) -> Result<Record, StoreError> {
        let response = self
            .http
            .post(self.table_url(table))
            .bearer_auth(&self.api_key)
            .json(&json!({ "fields": fields }))
            .send()
            .await
            .map_err(transport)?;

        decode_record(table, response).await
    }

    pub async fn get_record(&self, table: &str, record_id: &str) -> Result<Record, StoreError> {
        let response = self
            .http
            .get(format!("{}/{}", self.table_url(table), record_id))
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(transport)?;

        if response.status().as_u16() == 404 {
            return Err(StoreError::NotFound(format!("{}/{}", table, record_id)));
        }
        decode_record(table, response).await
    }

    pub async fn update_record(
        &self,
        table: &str,
        record_id: &str,
        fields: Value,
    ) -> Result<Record, StoreError> {
        let response = self
            .http
            .patch(format!("{}/{}", self.table_url(table), record_id))
            .bearer_auth(&self.api_key)
            .json(&json!({ "fields": fields }))
            .send()
            .await
            .map_err(transport)?;

        if response.status().as_u16() == 404 {
            return Err(StoreError::NotFound(format!("{}/{}", table, record_id)));
        }
        decode_record(table, response).await
    }

    /// List records matching a `filterByFormula` expression.
    pub async fn find_by_formula(
        &self,
        table: &str,
        formula: &str,
        max_records: Option<u32>,
    ) -> Result<Vec<Record>, StoreError> {
        let mut query: Vec<(&str, String)> = vec![("filterByFormula", formula.to_string())];
        if let Some(max) = max_records {
            query.push(("maxRecords", max.to_string()));
        }

        let response = self
            .http
            .get(self.table_url(table))
            .bearer_auth(&self.api_key)
            .query(&query)
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        let body = response.text().await.map_err(transport)?;
        if !status.is_success() {
            return Err(StoreError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let page: RecordPage =
            serde_json::from_str(&body).map_err(|e| StoreError::Decode(e.to_string()))?;
        Ok(page.records)
    }
}

/// Formula for an exact match on a single field.
pub fn exact_match(field: &str, value: &str) -> String {
    format!("{{{}}} = '{}'", field, value.replace('\'', "\\'"))
}

fn transport(err: reqwest::Error) -> StoreError {
    StoreError::Transport(err.to_string())
}

async fn decode_record(table: &str, response: reqwest::Response) -> Result<Record, StoreError> {
    let status = response.status();
    let body = response.text().await.map_err(transport)?;
    if !status.is_success() {
        tracing::warn!("store call on {} failed with {}: {}", table, status, body);
        return Err(StoreError::Api {
            status: status.as_u16(),
            body,
        });
    }
    serde_json::from_str(&body).map_err(|e| StoreError::Decode(e.to_string()))
}
