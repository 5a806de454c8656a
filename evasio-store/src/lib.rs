pub mod airtable;
pub mod app_config;
pub mod form_repo;
pub mod giftcard_repo;
pub mod participant_repo;
pub mod trip_repo;

pub use airtable::AirtableClient;
