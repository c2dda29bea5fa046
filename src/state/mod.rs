// Form and credential state
pub mod credential;
pub mod form;

pub use credential::CredentialSlot;
pub use form::{ConnectionForm, RadioOption};
