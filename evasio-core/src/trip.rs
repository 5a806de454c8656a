use chrono::Utc;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Paid,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Paid => "paid",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "pending" => Some(PaymentStatus::Pending),
            "paid" => Some(PaymentStatus::Paid),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FormStatus {
    Pending,
    Completed,
}

impl FormStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormStatus::Pending => "pending",
            FormStatus::Completed => "completed",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "pending" => Some(FormStatus::Pending),
            "completed" => Some(FormStatus::Completed),
            _ => None,
        }
    }
}

/// A purchased surprise trip. The destination fields stay empty until an
/// operator assigns them in the record store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    /// Store-assigned record id (opaque).
    pub record_id: String,
    pub trip_id: String,
    pub payment_status: PaymentStatus,
    /// Amount paid, in cents.
    pub amount: i64,
    pub destination: Option<String>,
    pub description: Option<String>,
    pub gallery_url: Option<String>,
    pub pdf_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTrip {
    pub trip_id: String,
    pub payment_status: PaymentStatus,
    pub amount: i64,
}

/// Time-based trip identifier. Collisions are possible only within the same
/// millisecond and are not deduplicated.
pub fn next_trip_id() -> String {
    format!("TRIP-{}", Utc::now().timestamp_millis())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub record_id: String,
    pub code: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub form_status: FormStatus,
    /// Record id of the linked trip, absent for participants created without
    /// one (e.g. gift redemptions that never got a trip row).
    pub trip_record_id: Option<String>,
}

impl Participant {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewParticipant {
    pub code: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub form_status: FormStatus,
    pub trip_record_id: Option<String>,
}

/// First-completion lock: a participant may still modify the shared
/// questionnaire only while no *other* member of the same trip has already
/// completed theirs. A participant with no co-participants (or no trip at
/// all) is never locked out.
pub fn can_modify_shared_form(own_code: &str, group: &[Participant]) -> bool {
    !group
        .iter()
        .any(|p| p.code != own_code && p.form_status == FormStatus::Completed)
}
