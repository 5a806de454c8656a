pub mod codes;
pub mod form;
pub mod giftcard;
pub mod identity;
pub mod repository;
pub mod trip;

pub use repository::StoreError;
