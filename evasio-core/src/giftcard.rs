use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GiftCardStatus {
    Unused,
    Used,
}

impl GiftCardStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GiftCardStatus::Unused => "unused",
            GiftCardStatus::Used => "used",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "unused" => Some(GiftCardStatus::Unused),
            "used" => Some(GiftCardStatus::Used),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GiftCard {
    pub record_id: String,
    pub code: String,
    pub buyer_name: String,
    pub buyer_email: String,
    pub recipient_name: String,
    pub status: GiftCardStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewGiftCard {
    pub code: String,
    pub buyer_name: String,
    pub buyer_email: String,
    pub recipient_name: String,
    pub status: GiftCardStatus,
}
