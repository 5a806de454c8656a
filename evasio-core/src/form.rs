use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Questionnaire answers for one participant. The record store only has text
/// columns, so multi-value fields are flattened with [`join_multi`] on write
/// and rebuilt with [`split_multi`] on read.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormResponse {
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub duration_days: Option<i64>,
    #[serde(default)]
    pub budget: Option<String>,
    #[serde(default)]
    pub departure_city: Option<String>,
    #[serde(default)]
    pub motivations: Vec<String>,
    #[serde(default)]
    pub travel_styles: Vec<String>,
    #[serde(default)]
    pub activities: Vec<String>,
    #[serde(default)]
    pub dietary_restrictions: Vec<String>,
    #[serde(default)]
    pub avoid_destinations: Vec<String>,
    #[serde(default)]
    pub climate: Option<String>,
    #[serde(default)]
    pub accommodation: Option<String>,
    #[serde(default)]
    pub pace: Option<String>,
    #[serde(default)]
    pub group_relation: Option<String>,
    #[serde(default)]
    pub passport_valid: Option<bool>,
    #[serde(default)]
    pub fear_of_flying: Option<bool>,
    #[serde(default)]
    pub previous_destinations: Option<String>,
    #[serde(default)]
    pub dream_destination: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

/// A stored form response: the store's record id plus the answers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredFormResponse {
    pub record_id: String,
    pub participant_record_id: String,
    #[serde(flatten)]
    pub form: FormResponse,
}

/// Flatten a string list into a single text cell.
pub fn join_multi(values: &[String]) -> String {
    values.join(", ")
}

/// Rebuild a list from a text cell: split on commas, trim, drop empties.
/// Lossy when an individual value itself contains a comma.
pub fn split_multi(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_then_split_round_trips_comma_free_values() {
        let values = vec![
            "plage".to_string(),
            "culture".to_string(),
            "gastronomie".to_string(),
        ];
        assert_eq!(split_multi(&join_multi(&values)), values);
    }

    #[test]
    fn join_uses_comma_space() {
        let values = vec!["plage".to_string(), "culture".to_string()];
        assert_eq!(join_multi(&values), "plage, culture");
    }

    #[test]
    fn split_trims_and_drops_empty_pieces() {
        assert_eq!(
            split_multi(" plage ,, culture ,"),
            vec!["plage".to_string(), "culture".to_string()]
        );
    }

    #[test]
    fn empty_cell_reads_as_empty_list() {
        assert!(split_multi("").is_empty());
    }

    #[test]
    fn embedded_comma_is_lossy() {
        let values = vec!["sea, sun".to_string()];
        // Documented limitation: the value splits into two on read.
        assert_eq!(
            split_multi(&join_multi(&values)),
            vec!["sea".to_string(), "sun".to_string()]
        );
    }
}
