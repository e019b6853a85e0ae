//! Client-side boundary to the portal identity API.

pub mod client;
pub mod error;
pub mod types;

pub use client::ApiClient;
pub use error::ApiError;
pub use types::{
    Availability, Identity, OtpPurpose, Profile, RegistrationSubmission, DOCUMENT_TYPE_RUT,
};
