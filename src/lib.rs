pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod interfaces;

pub use application::encoder::{DecodedPayload, PixPayloadEncoder};
pub use domain::identity::PaymentIdentity;
pub use error::{PixError, Result};
