//! Outbound adapters and spreadsheet-backed stores.

pub mod round_store;
pub mod sheets;
pub mod user_store;

pub use round_store::RoundStore;
pub use user_store::{AuthError, RegistrationError, UserStore};
